//! Recursive-descent validating decoder.
//!
//! Decoding is a pure function over a caller-supplied slice: it either
//! yields a typed value plus the unconsumed remainder, or an error, in
//! which case the whole attempt is void and no position information may be
//! relied upon. The grammar is validated exactly, not parsed
//! optimistically:
//!
//! ```text
//! INTEGER := 'i' ['-'] DIGIT+ 'e'
//! STRING  := DIGIT+ ':' BYTE{n}
//! LIST    := 'l' Value* 'e'
//! DICT    := 'd' (STRING Value)* 'e'
//! ```
//!
//! Strictness rules: no leading `+`, no leading zeros, `-0` rejected,
//! integer literals must fit `i64`, string payloads must fit the remaining
//! input, containers must reach their terminating `e` before end of buffer.
//! The decoder never reads past the length it was given, and nesting is
//! capped at 64 levels.
//!
//! Free-form dictionaries decode with whatever key order the input carries
//! (only schema-bound decoding enforces order), but duplicate keys are
//! rejected.
//!
//! ## Examples
//!
//! ```rust
//! use benq::decode;
//!
//! let value = decode::decode(b"d3:foo3:bare").unwrap();
//! assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
//!
//! // Prefix decoding returns the remainder.
//! let (n, rest) = decode::integer(b"i8e2:ok").unwrap();
//! assert_eq!(n, 8);
//! assert_eq!(rest, b"2:ok");
//! ```

use crate::error::{Error, Result};
use crate::map::Dict;
use crate::value::Value;

const MAX_DEPTH: usize = 64;

/// Decodes a complete value from the whole buffer.
///
/// # Errors
///
/// Any grammar violation, truncation, or trailing bytes after the value
/// fail the decode; see the module documentation for the strictness rules.
///
/// # Examples
///
/// ```rust
/// use benq::{decode, Value};
///
/// assert_eq!(decode::decode(b"i8e").unwrap(), Value::Integer(8));
/// assert!(decode::decode(b"i8eextra").is_err());
/// ```
pub fn decode(input: &[u8]) -> Result<Value> {
    let mut pos = 0;
    let value = parse_value(input, &mut pos, 0)?;
    if pos != input.len() {
        return Err(Error::grammar("trailing data after value"));
    }
    Ok(value)
}

/// Decodes one value from the front of `input`, returning the remainder.
pub fn value(input: &[u8]) -> Result<(Value, &[u8])> {
    let mut pos = 0;
    let value = parse_value(input, &mut pos, 0)?;
    Ok((value, &input[pos..]))
}

/// Decodes an integer token from the front of `input`.
///
/// # Examples
///
/// ```rust
/// use benq::decode;
///
/// let (n, rest) = decode::integer(b"i-42e").unwrap();
/// assert_eq!(n, -42);
/// assert!(rest.is_empty());
/// ```
pub fn integer(input: &[u8]) -> Result<(i64, &[u8])> {
    let mut pos = 0;
    let n = parse_integer(input, &mut pos)?;
    Ok((n, &input[pos..]))
}

/// Decodes a byte string token from the front of `input`. The payload
/// borrows from `input`.
pub fn byte_string(input: &[u8]) -> Result<(&[u8], &[u8])> {
    let mut pos = 0;
    let bytes = parse_string(input, &mut pos)?;
    Ok((bytes, &input[pos..]))
}

/// Decodes a list from the front of `input`.
pub fn list(input: &[u8]) -> Result<(Vec<Value>, &[u8])> {
    let mut pos = 0;
    let items = parse_list(input, &mut pos, 0)?;
    Ok((items, &input[pos..]))
}

/// Decodes a dictionary from the front of `input`, preserving the key
/// order found on the wire.
pub fn dict(input: &[u8]) -> Result<(Dict, &[u8])> {
    let mut pos = 0;
    let entries = parse_dict(input, &mut pos, 0)?;
    Ok((entries, &input[pos..]))
}

pub(crate) fn parse_value(data: &[u8], pos: &mut usize, depth: usize) -> Result<Value> {
    if depth > MAX_DEPTH {
        return Err(Error::NestingTooDeep);
    }
    match data.get(*pos) {
        None => Err(Error::Truncated),
        Some(b'i') => parse_integer(data, pos).map(Value::Integer),
        Some(b'l') => parse_list(data, pos, depth).map(Value::List),
        Some(b'd') => parse_dict(data, pos, depth).map(Value::Dict),
        Some(b'0'..=b'9') => parse_string(data, pos).map(|b| Value::Bytes(b.to_vec())),
        Some(&c) => Err(Error::grammar(format!(
            "unexpected byte {:?} at offset {}",
            c as char, *pos
        ))),
    }
}

pub(crate) fn parse_integer(data: &[u8], pos: &mut usize) -> Result<i64> {
    match data.get(*pos) {
        None => return Err(Error::Truncated),
        Some(b'i') => *pos += 1,
        Some(&c) => {
            return Err(Error::grammar(format!(
                "expected 'i', found {:?}",
                c as char
            )))
        }
    }

    let negative = data.get(*pos) == Some(&b'-');
    if negative {
        *pos += 1;
    }

    let start = *pos;
    let mut n: i64 = 0;
    while let Some(&c) = data.get(*pos) {
        if !c.is_ascii_digit() {
            break;
        }
        let digit = i64::from(c - b'0');
        // Accumulate negatively so i64::MIN decodes without overflow.
        n = n
            .checked_mul(10)
            .and_then(|n| n.checked_sub(digit))
            .ok_or_else(|| Error::overflow("integer literal does not fit in i64"))?;
        *pos += 1;
    }

    let digits = *pos - start;
    if digits == 0 {
        return match data.get(*pos) {
            None => Err(Error::Truncated),
            Some(_) => Err(Error::grammar("integer with no digits")),
        };
    }
    if digits > 1 && data[start] == b'0' {
        return Err(Error::grammar("integer with leading zeros"));
    }
    // Policy: reject -0, matching canonical output exactly.
    if negative && n == 0 {
        return Err(Error::grammar("negative zero integer"));
    }

    match data.get(*pos) {
        None => Err(Error::Truncated),
        Some(b'e') => {
            *pos += 1;
            if negative {
                Ok(n)
            } else {
                n.checked_neg()
                    .ok_or_else(|| Error::overflow("integer literal does not fit in i64"))
            }
        }
        Some(&c) => Err(Error::grammar(format!(
            "expected 'e' after integer, found {:?}",
            c as char
        ))),
    }
}

pub(crate) fn parse_string<'a>(data: &'a [u8], pos: &mut usize) -> Result<&'a [u8]> {
    let start = *pos;
    let mut len: usize = 0;
    while let Some(&c) = data.get(*pos) {
        if !c.is_ascii_digit() {
            break;
        }
        len = len
            .checked_mul(10)
            .and_then(|len| len.checked_add(usize::from(c - b'0')))
            // A length that overflows usize cannot fit any real buffer.
            .ok_or(Error::Truncated)?;
        *pos += 1;
    }

    let digits = *pos - start;
    if digits == 0 {
        return match data.get(*pos) {
            None => Err(Error::Truncated),
            Some(&c) => Err(Error::grammar(format!(
                "expected string length, found {:?}",
                c as char
            ))),
        };
    }
    if digits > 1 && data[start] == b'0' {
        return Err(Error::grammar("string length with leading zeros"));
    }

    match data.get(*pos) {
        None => return Err(Error::Truncated),
        Some(b':') => *pos += 1,
        Some(&c) => {
            return Err(Error::grammar(format!(
                "expected ':' after string length, found {:?}",
                c as char
            )))
        }
    }

    if len > data.len() - *pos {
        return Err(Error::Truncated);
    }
    let bytes = &data[*pos..*pos + len];
    *pos += len;
    Ok(bytes)
}

fn parse_list(data: &[u8], pos: &mut usize, depth: usize) -> Result<Vec<Value>> {
    expect_marker(data, pos, b'l')?;
    let mut items = Vec::new();
    loop {
        match data.get(*pos) {
            None => return Err(Error::Truncated),
            Some(b'e') => {
                *pos += 1;
                return Ok(items);
            }
            Some(_) => items.push(parse_value(data, pos, depth + 1)?),
        }
    }
}

fn parse_dict(data: &[u8], pos: &mut usize, depth: usize) -> Result<Dict> {
    expect_marker(data, pos, b'd')?;
    let mut dict = Dict::new();
    loop {
        match data.get(*pos) {
            None => return Err(Error::Truncated),
            Some(b'e') => {
                *pos += 1;
                return Ok(dict);
            }
            Some(_) => {
                let key = parse_string(data, pos)?.to_vec();
                let value = parse_value(data, pos, depth + 1)?;
                if dict.insert(key.clone(), value).is_some() {
                    return Err(Error::grammar(format!(
                        "duplicate dictionary key {:?}",
                        String::from_utf8_lossy(&key)
                    )));
                }
            }
        }
    }
}

pub(crate) fn expect_marker(data: &[u8], pos: &mut usize, marker: u8) -> Result<()> {
    match data.get(*pos) {
        None => Err(Error::Truncated),
        Some(&c) if c == marker => {
            *pos += 1;
            Ok(())
        }
        Some(&c) => Err(Error::grammar(format!(
            "expected {:?}, found {:?}",
            marker as char, c as char
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_integer() {
        assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
        assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
        assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
        assert_eq!(
            decode(b"i-9223372036854775808e").unwrap(),
            Value::Integer(i64::MIN)
        );
    }

    #[test]
    fn decode_integer_leaves_remainder() {
        let (n, rest) = integer(b"i8e").unwrap();
        assert_eq!(n, 8);
        assert!(rest.is_empty());
    }

    #[test]
    fn decode_integer_invalid() {
        assert!(matches!(decode(b"ie"), Err(Error::MalformedGrammar(_))));
        assert!(matches!(decode(b"i-0e"), Err(Error::MalformedGrammar(_))));
        assert!(matches!(decode(b"i03e"), Err(Error::MalformedGrammar(_))));
        assert!(matches!(decode(b"i+3e"), Err(Error::MalformedGrammar(_))));
        assert!(matches!(decode(b"i1x2e"), Err(Error::MalformedGrammar(_))));
        assert_eq!(decode(b"i88"), Err(Error::Truncated));
        assert_eq!(
            decode(b"i9223372036854775808e"),
            Err(Error::IntegerOverflow(
                "integer literal does not fit in i64".into()
            ))
        );
    }

    #[test]
    fn decode_string() {
        assert_eq!(decode(b"4:spam").unwrap(), Value::Bytes(b"spam".to_vec()));
        assert_eq!(decode(b"0:").unwrap(), Value::Bytes(vec![]));
        let (s, rest) = byte_string(b"5:array").unwrap();
        assert_eq!(s, b"array");
        assert!(rest.is_empty());
    }

    #[test]
    fn decode_string_truncated() {
        assert_eq!(decode(b"5:arr"), Err(Error::Truncated));
        assert_eq!(decode(b"5"), Err(Error::Truncated));
        assert_eq!(decode(b"5:"), Err(Error::Truncated));
        // A length far past the buffer must not read past it either.
        assert_eq!(decode(b"99999999999999999999999:x"), Err(Error::Truncated));
    }

    #[test]
    fn decode_string_invalid() {
        assert!(matches!(decode(b"04:spam"), Err(Error::MalformedGrammar(_))));
        assert!(matches!(
            byte_string(b"4x:spam"),
            Err(Error::MalformedGrammar(_))
        ));
    }

    #[test]
    fn decode_list() {
        let (items, rest) = list(b"li1ei2ei3ei4ee").unwrap();
        assert_eq!(
            items,
            vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3),
                Value::Integer(4)
            ]
        );
        assert!(rest.is_empty());
    }

    #[test]
    fn decode_list_truncated() {
        // Missing the final 'e': no partial list may be returned.
        assert_eq!(decode(b"li1ei2ei3ei4e"), Err(Error::Truncated));
        assert_eq!(list(b"li1ei2ei3ei4e").unwrap_err(), Error::Truncated);
    }

    #[test]
    fn decode_dict() {
        let result = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
        let dict = result.as_dict().unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(b"cow"), Some(&Value::Bytes(b"moo".to_vec())));
    }

    #[test]
    fn free_form_dict_accepts_unordered_keys() {
        let result = decode(b"d1:bi1e1:ai2ee").unwrap();
        let dict = result.as_dict().unwrap();
        let keys: Vec<_> = dict.keys().cloned().collect();
        assert_eq!(keys, vec![b"b".to_vec(), b"a".to_vec()]);
    }

    #[test]
    fn dict_rejects_duplicate_keys() {
        assert!(matches!(
            decode(b"d1:ai1e1:ai2ee"),
            Err(Error::MalformedGrammar(_))
        ));
    }

    #[test]
    fn dict_keys_must_be_strings() {
        assert!(matches!(
            decode(b"di1ei2ee"),
            Err(Error::MalformedGrammar(_))
        ));
    }

    #[test]
    fn trailing_data_is_rejected() {
        assert!(matches!(
            decode(b"i42eextra"),
            Err(Error::MalformedGrammar(_))
        ));
        // Prefix decoding hands the remainder back instead.
        let (v, rest) = value(b"i42eextra").unwrap();
        assert_eq!(v, Value::Integer(42));
        assert_eq!(rest, b"extra");
    }

    #[test]
    fn every_truncation_of_a_valid_encoding_fails() {
        let valid = b"d1:al1:bi-3e0:e4:spam4:eggse";
        assert!(decode(valid).is_ok());
        for cut in 0..valid.len() {
            let err = decode(&valid[..cut]).unwrap_err();
            assert!(
                matches!(err, Error::Truncated | Error::MalformedGrammar(_)),
                "cut at {}: {:?}",
                cut,
                err
            );
        }
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let mut input = Vec::new();
        input.extend(std::iter::repeat(b'l').take(200));
        input.extend(std::iter::repeat(b'e').take(200));
        assert_eq!(decode(&input), Err(Error::NestingTooDeep));
    }

    #[test]
    fn empty_input_is_truncated() {
        assert_eq!(decode(b""), Err(Error::Truncated));
    }
}
