//! Schema-bound dictionary encoding and decoding.
//!
//! A [`Schema`] is an ordered, immutable list of `(escaped name, Kind)`
//! fields describing one dictionary's shape. Construction validates the
//! field names once: each must be a well-formed escaped identifier and
//! strictly greater than its predecessor when compared in unescaped byte
//! order. A schema that fails validation never exists, so encode and
//! decode can assume canonical key order without per-call checks.
//!
//! Decoding is positional: the key at each position must match the
//! declared field name byte-for-byte. Extra, missing, or reordered keys
//! fail the whole record — this is a binding, not a lookup.
//!
//! ## Examples
//!
//! ```rust
//! use benq::{Dict, Kind, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     ("left", Kind::Int64),
//!     ("right", Kind::Bytes),
//! ])
//! .unwrap();
//!
//! let mut record = Dict::new();
//! record.insert(b"left".to_vec(), Value::Integer(7));
//! record.insert(b"right".to_vec(), Value::from("x"));
//!
//! let mut buf = [0u8; 32];
//! let end = schema.encode(&record, &mut buf).unwrap();
//! assert_eq!(&buf[..end], b"d4:lefti7e5:right1:xe");
//!
//! let back = schema.decode(&buf[..end]).unwrap();
//! assert_eq!(back, record);
//! ```

use crate::decode;
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::escape::KeyEscape;
use crate::map::Dict;
use crate::value::Value;
use std::cmp::Ordering;

/// The declared type of one schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// An integer that must fit `i32`; decoding a wider value fails with
    /// [`Error::IntegerOverflow`] rather than truncating.
    Int32,
    /// A full-width signed 64-bit integer.
    Int64,
    /// A byte string of any length.
    Bytes,
    /// A byte string of exactly this length, for fixed arrays.
    FixedBytes(usize),
    /// A homogeneous sequence, implicitly wrapped in `l`/`e` markers so a
    /// field can declare a plain sequence without manual wrapping.
    List(Box<Kind>),
    /// A nested schema-bound record.
    Record(Schema),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldDef {
    /// The declared (escaped) name.
    name: String,
    /// The unescaped key bytes, cached at definition time.
    key: Vec<u8>,
    kind: Kind,
}

/// An ordered, immutable field list driving canonical dictionary
/// encode/decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDef>,
    escape: KeyEscape,
}

impl Schema {
    /// Defines a schema with the default escape marker.
    ///
    /// # Errors
    ///
    /// Fails at definition time if any field name is not a well-formed
    /// escaped identifier, or if the names are not strictly increasing in
    /// unescaped byte order ([`Error::SchemaOrderViolation`]). Duplicates
    /// and misordered names are structural defects in the schema itself,
    /// not recoverable runtime conditions.
    pub fn new(fields: Vec<(&str, Kind)>) -> Result<Self> {
        Self::with_escape(KeyEscape::default(), fields)
    }

    /// Defines a schema with a custom escape configuration.
    pub fn with_escape(escape: KeyEscape, fields: Vec<(&str, Kind)>) -> Result<Self> {
        let mut defs: Vec<FieldDef> = Vec::with_capacity(fields.len());
        for (name, kind) in fields {
            let key = escape.unescape(name)?;
            if let Some(prev) = defs.last() {
                if escape.compare(&prev.name, name) != Ordering::Less {
                    return Err(Error::schema_order(name));
                }
            }
            defs.push(FieldDef {
                name: name.to_string(),
                key,
                kind,
            });
        }
        Ok(Schema {
            fields: defs,
            escape,
        })
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The escape configuration this schema was defined with.
    #[must_use]
    pub fn escape(&self) -> &KeyEscape {
        &self.escape
    }

    /// The unescaped key bytes of the field at `index`.
    #[must_use]
    pub fn key(&self, index: usize) -> Option<&[u8]> {
        self.fields.get(index).map(|f| f.key.as_slice())
    }

    /// Encodes a record into `buf`, returning the end position.
    ///
    /// The record's entries must match the declared fields positionally:
    /// same keys, same order, values of the declared kinds. The first
    /// failing field aborts the whole record.
    pub fn encode(&self, record: &Dict, buf: &mut [u8]) -> Result<usize> {
        let mut enc = Encoder::new(buf);
        self.encode_into(record, &mut enc)
    }

    /// Encodes a record through an existing session, for callers composing
    /// a larger stream.
    pub fn encode_into(&self, record: &Dict, enc: &mut Encoder<'_>) -> Result<usize> {
        if record.len() != self.fields.len() {
            return Err(Error::grammar(format!(
                "record has {} fields, schema declares {}",
                record.len(),
                self.fields.len()
            )));
        }
        enc.push(&crate::Token::DictBegin)?;
        for ((key, value), field) in record.iter().zip(&self.fields) {
            if key.as_slice() != field.key.as_slice() {
                return Err(Error::key_mismatch(&field.key, key));
            }
            enc.push_bytes(&field.key)?;
            encode_field(&field.kind, value, enc)?;
        }
        enc.push(&crate::Token::DictEnd)
    }

    /// Decodes a record from the whole buffer.
    ///
    /// # Errors
    ///
    /// [`Error::KeyMismatch`] if the key at any position differs from the
    /// declared field name, plus every decoder error the field values can
    /// produce. Trailing bytes after the record fail the decode.
    pub fn decode(&self, input: &[u8]) -> Result<Dict> {
        let (record, rest) = self.decode_prefix(input)?;
        if !rest.is_empty() {
            return Err(Error::grammar("trailing data after record"));
        }
        Ok(record)
    }

    /// Decodes a record from the front of `input`, returning the remainder.
    pub fn decode_prefix<'a>(&self, input: &'a [u8]) -> Result<(Dict, &'a [u8])> {
        let mut pos = 0;
        let record = self.decode_at(input, &mut pos)?;
        Ok((record, &input[pos..]))
    }

    fn decode_at(&self, data: &[u8], pos: &mut usize) -> Result<Dict> {
        decode::expect_marker(data, pos, b'd')?;
        let mut record = Dict::with_capacity(self.fields.len());
        for field in &self.fields {
            let key = decode::parse_string(data, pos)?;
            if key != field.key.as_slice() {
                return Err(Error::key_mismatch(&field.key, key));
            }
            let value = decode_field(&field.kind, data, pos)?;
            record.insert(field.key.clone(), value);
        }
        decode::expect_marker(data, pos, b'e')?;
        Ok(record)
    }
}

fn encode_field(kind: &Kind, value: &Value, enc: &mut Encoder<'_>) -> Result<usize> {
    match (kind, value) {
        (Kind::Int32, Value::Integer(i)) => {
            if i32::try_from(*i).is_err() {
                return Err(Error::overflow(format!("{} does not fit in i32", i)));
            }
            enc.push_integer(*i)
        }
        (Kind::Int64, Value::Integer(i)) => enc.push_integer(*i),
        (Kind::Bytes, Value::Bytes(b)) => enc.push_bytes(b),
        (Kind::FixedBytes(n), Value::Bytes(b)) => {
            if b.len() != *n {
                return Err(Error::grammar(format!(
                    "expected {}-byte string, got {} bytes",
                    n,
                    b.len()
                )));
            }
            enc.push_bytes(b)
        }
        (Kind::List(item), Value::List(items)) => {
            enc.push(&crate::Token::ListBegin)?;
            for value in items {
                encode_field(item, value, enc)?;
            }
            enc.push(&crate::Token::ListEnd)
        }
        (Kind::Record(schema), Value::Dict(record)) => schema.encode_into(record, enc),
        (kind, value) => Err(Error::grammar(format!(
            "value {} does not match declared kind {:?}",
            value, kind
        ))),
    }
}

fn decode_field(kind: &Kind, data: &[u8], pos: &mut usize) -> Result<Value> {
    match kind {
        Kind::Int32 => {
            let n = decode::parse_integer(data, pos)?;
            if i32::try_from(n).is_err() {
                return Err(Error::overflow(format!("{} does not fit in i32", n)));
            }
            Ok(Value::Integer(n))
        }
        Kind::Int64 => decode::parse_integer(data, pos).map(Value::Integer),
        Kind::Bytes => decode::parse_string(data, pos).map(|b| Value::Bytes(b.to_vec())),
        Kind::FixedBytes(n) => {
            let bytes = decode::parse_string(data, pos)?;
            if bytes.len() != *n {
                return Err(Error::grammar(format!(
                    "expected {}-byte string, got {} bytes",
                    n,
                    bytes.len()
                )));
            }
            Ok(Value::Bytes(bytes.to_vec()))
        }
        Kind::List(item) => {
            decode::expect_marker(data, pos, b'l')?;
            let mut items = Vec::new();
            loop {
                match data.get(*pos) {
                    None => return Err(Error::Truncated),
                    Some(b'e') => {
                        *pos += 1;
                        return Ok(Value::List(items));
                    }
                    Some(_) => items.push(decode_field(item, data, pos)?),
                }
            }
        }
        Kind::Record(schema) => schema.decode_at(data, pos).map(Value::Dict),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            ("array", Kind::FixedBytes(3)),
            ("integer", Kind::Int32),
            ("integer64", Kind::Int64),
            ("string", Kind::Bytes),
            ("vector", Kind::List(Box::new(Kind::Int64))),
        ])
        .unwrap()
    }

    fn sample_record() -> Dict {
        let mut record = Dict::new();
        record.insert(b"array".to_vec(), Value::Bytes(vec![1, 2, 3]));
        record.insert(b"integer".to_vec(), Value::Integer(-5));
        record.insert(b"integer64".to_vec(), Value::Integer(1 << 40));
        record.insert(b"string".to_vec(), Value::from("asdf"));
        record.insert(
            b"vector".to_vec(),
            Value::List(vec![Value::Integer(1), Value::Integer(2)]),
        );
        record
    }

    #[test]
    fn round_trip() {
        let schema = sample_schema();
        let record = sample_record();
        let mut buf = [0u8; 128];
        let end = schema.encode(&record, &mut buf).unwrap();
        let back = schema.decode(&buf[..end]).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn out_of_order_fields_fail_at_definition() {
        let err = Schema::new(vec![("b", Kind::Int64), ("a", Kind::Int64)]).unwrap_err();
        assert_eq!(err, Error::SchemaOrderViolation("a".into()));
    }

    #[test]
    fn duplicate_fields_fail_at_definition() {
        let err = Schema::new(vec![("a", Kind::Int64), ("a", Kind::Int64)]).unwrap_err();
        assert_eq!(err, Error::SchemaOrderViolation("a".into()));
    }

    #[test]
    fn malformed_escaped_name_fails_at_definition() {
        assert!(Schema::new(vec![("Qzz", Kind::Int64)]).is_err());
    }

    #[test]
    fn escaped_names_order_by_unescaped_bytes() {
        // "Q20" unescapes to a space (0x20), which sorts before any letter.
        let schema = Schema::new(vec![("Q20pad", Kind::Int64), ("pad", Kind::Int64)]).unwrap();
        assert_eq!(schema.key(0), Some(&b" pad"[..]));
        assert_eq!(schema.key(1), Some(&b"pad"[..]));
    }

    #[test]
    fn decode_key_mismatch() {
        let schema = Schema::new(vec![("a", Kind::Int64)]).unwrap();
        let err = schema.decode(b"d1:bi1ee").unwrap_err();
        assert_eq!(
            err,
            Error::KeyMismatch {
                expected: "a".into(),
                found: "b".into()
            }
        );
    }

    #[test]
    fn decode_narrowing_overflow() {
        let schema = Schema::new(vec![("n", Kind::Int32)]).unwrap();
        assert!(schema.decode(b"d1:ni70000ee").is_ok());
        assert!(matches!(
            schema.decode(b"d1:ni3000000000ee"),
            Err(Error::IntegerOverflow(_))
        ));
    }

    #[test]
    fn fixed_bytes_length_is_enforced() {
        let schema = Schema::new(vec![("k", Kind::FixedBytes(3))]).unwrap();
        assert!(schema.decode(b"d1:k3:abce").is_ok());
        assert!(matches!(
            schema.decode(b"d1:k4:abcde"),
            Err(Error::MalformedGrammar(_))
        ));
    }

    #[test]
    fn nested_record() {
        let inner = Schema::new(vec![("x", Kind::Int64)]).unwrap();
        let schema = Schema::new(vec![("outer", Kind::Record(inner))]).unwrap();

        let mut inner_record = Dict::new();
        inner_record.insert(b"x".to_vec(), Value::Integer(9));
        let mut record = Dict::new();
        record.insert(b"outer".to_vec(), Value::Dict(inner_record));

        let mut buf = [0u8; 64];
        let end = schema.encode(&record, &mut buf).unwrap();
        assert_eq!(&buf[..end], b"d5:outerd1:xi9eee");
        assert_eq!(schema.decode(&buf[..end]).unwrap(), record);
    }

    #[test]
    fn record_list_round_trips() {
        let item = Schema::new(vec![("id", Kind::Int64)]).unwrap();
        let schema =
            Schema::new(vec![("items", Kind::List(Box::new(Kind::Record(item))))]).unwrap();

        let mut a = Dict::new();
        a.insert(b"id".to_vec(), Value::Integer(1));
        let mut b = Dict::new();
        b.insert(b"id".to_vec(), Value::Integer(2));
        let mut record = Dict::new();
        record.insert(
            b"items".to_vec(),
            Value::List(vec![Value::Dict(a), Value::Dict(b)]),
        );

        let mut buf = [0u8; 64];
        let end = schema.encode(&record, &mut buf).unwrap();
        assert_eq!(&buf[..end], b"d5:itemsld2:idi1eed2:idi2eeee");
        assert_eq!(schema.decode(&buf[..end]).unwrap(), record);
    }

    #[test]
    fn encode_failure_aborts_record() {
        let schema = sample_schema();
        let record = sample_record();
        let mut buf = [0u8; 16];
        assert_eq!(
            schema.encode(&record, &mut buf),
            Err(Error::BufferTooSmall)
        );
    }

    #[test]
    fn extra_input_key_fails() {
        let schema = Schema::new(vec![("a", Kind::Int64)]).unwrap();
        // A free-form decoder would accept this; positional binding must not.
        assert!(schema.decode(b"d1:ai1e1:bi2ee").is_err());
    }
}
