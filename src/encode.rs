//! Bounded-buffer streaming encoder.
//!
//! An [`Encoder`] wraps a caller-owned byte buffer and writes bencode
//! tokens at a moving cursor. Each token is written in full or not at all:
//! a token that would exceed the remaining capacity leaves the buffer
//! untouched, permanently poisons the session, and returns
//! [`Error::BufferTooSmall`]. Independent calls on a live session continue
//! from the current cursor, so a stream can be built incrementally.
//!
//! ## Examples
//!
//! ```rust
//! use benq::{encode::Encoder, Token};
//!
//! let mut buf = [0u8; 16];
//! let mut enc = Encoder::new(&mut buf);
//! enc.push(&Token::Integer(3000)).unwrap();
//! enc.push(&Token::Bytes(b"asdf")).unwrap();
//! let end = enc.position();
//! assert_eq!(&buf[..end], b"i3000e4:asdf");
//! ```
//!
//! Once poisoned, a session refuses everything:
//!
//! ```rust
//! use benq::{encode::Encoder, Error, Token};
//!
//! let mut buf = [0u8; 8];
//! let mut enc = Encoder::new(&mut buf);
//! assert_eq!(enc.push(&Token::Bytes(b"abcdefgh")), Err(Error::BufferTooSmall));
//! assert!(enc.is_poisoned());
//! assert_eq!(enc.push(&Token::Integer(0)), Err(Error::BufferTooSmall));
//! ```

use crate::error::{Error, Result};
use crate::token::Token;
use crate::value::Value;

/// A stateful encoding session over a caller-owned buffer.
pub struct Encoder<'b> {
    buf: &'b mut [u8],
    pos: usize,
    poisoned: bool,
}

impl<'b> Encoder<'b> {
    /// Starts a session writing at the beginning of `buf`.
    pub fn new(buf: &'b mut [u8]) -> Self {
        Encoder {
            buf,
            pos: 0,
            poisoned: false,
        }
    }

    /// The current cursor: how many bytes have been written so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` once any write has overflowed. A poisoned session
    /// never writes another byte.
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Remaining capacity in bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Writes `parts` as one atomic unit: either all bytes land in the
    /// buffer or none do and the session is poisoned.
    fn write_atomic(&mut self, parts: &[&[u8]]) -> Result<()> {
        if self.poisoned {
            return Err(Error::BufferTooSmall);
        }
        let need: usize = parts.iter().map(|p| p.len()).sum();
        if need > self.remaining() {
            self.poisoned = true;
            return Err(Error::BufferTooSmall);
        }
        for part in parts {
            self.buf[self.pos..self.pos + part.len()].copy_from_slice(part);
            self.pos += part.len();
        }
        Ok(())
    }

    /// Writes an integer token `i<digits>e`.
    pub fn push_integer(&mut self, value: i64) -> Result<usize> {
        let digits = value.to_string();
        self.write_atomic(&[b"i", digits.as_bytes(), b"e"])?;
        Ok(self.pos)
    }

    /// Writes a byte string token `<len>:<bytes>`. The payload may contain
    /// any byte value, including NUL.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        let len = bytes.len().to_string();
        self.write_atomic(&[len.as_bytes(), b":", bytes])?;
        Ok(self.pos)
    }

    /// Writes one token, recursively flattening nested streams in place.
    ///
    /// Returns the new cursor on success.
    pub fn push(&mut self, token: &Token<'_>) -> Result<usize> {
        match token {
            Token::Integer(i) => self.push_integer(*i),
            Token::Bytes(b) => self.push_bytes(b),
            Token::ListBegin => self.push_marker(b"l"),
            Token::DictBegin => self.push_marker(b"d"),
            Token::ListEnd | Token::DictEnd => self.push_marker(b"e"),
            Token::Stream(tokens) => self.push_all(tokens),
        }
    }

    /// Writes a whole token stream in order, failing on the first token
    /// that does not fit.
    pub fn push_all(&mut self, tokens: &[Token<'_>]) -> Result<usize> {
        for token in tokens {
            self.push(token)?;
        }
        Ok(self.pos)
    }

    /// Writes a value tree. Dictionary keys must be unique and strictly
    /// increasing in raw byte order, else [`Error::UnorderedKeys`] — no
    /// canonical encoding exists for an out-of-order dictionary.
    pub fn push_value(&mut self, value: &Value) -> Result<usize> {
        match value {
            Value::Integer(i) => self.push_integer(*i),
            Value::Bytes(b) => self.push_bytes(b),
            Value::List(list) => {
                self.push_marker(b"l")?;
                for item in list {
                    self.push_value(item)?;
                }
                self.push_marker(b"e")
            }
            Value::Dict(dict) => {
                if !dict.is_canonical() {
                    return Err(Error::UnorderedKeys);
                }
                self.push_marker(b"d")?;
                for (key, item) in dict.iter() {
                    self.push_bytes(key)?;
                    self.push_value(item)?;
                }
                self.push_marker(b"e")
            }
        }
    }

    fn push_marker(&mut self, marker: &[u8; 1]) -> Result<usize> {
        self.write_atomic(&[marker])?;
        Ok(self.pos)
    }
}

/// Encodes a token stream into `buf`, returning the end position.
///
/// # Errors
///
/// [`Error::BufferTooSmall`] if any token would overflow the buffer; the
/// buffer contents before the failing token are whole, but the attempt
/// should be discarded.
///
/// # Examples
///
/// ```rust
/// use benq::{encode, Token};
///
/// let mut buf = [0u8; 16];
/// let end = encode::encode(&mut buf, &[Token::Integer(3000)]).unwrap();
/// assert_eq!(&buf[..end], b"i3000e");
/// ```
pub fn encode(buf: &mut [u8], tokens: &[Token<'_>]) -> Result<usize> {
    let mut enc = Encoder::new(buf);
    enc.push_all(tokens)
}

/// Encodes a value tree into `buf`, returning the end position.
pub fn encode_value(buf: &mut [u8], value: &Value) -> Result<usize> {
    let mut enc = Encoder::new(buf);
    enc.push_value(value)
}

/// The exact number of bytes [`encode_value`] would write for `value`.
#[must_use]
pub fn encoded_len(value: &Value) -> usize {
    fn dec_len(n: usize) -> usize {
        n.to_string().len()
    }
    match value {
        Value::Integer(i) => 2 + i.to_string().len(),
        Value::Bytes(b) => dec_len(b.len()) + 1 + b.len(),
        Value::List(list) => 2 + list.iter().map(encoded_len).sum::<usize>(),
        Value::Dict(dict) => {
            2 + dict
                .iter()
                .map(|(k, v)| dec_len(k.len()) + 1 + k.len() + encoded_len(v))
                .sum::<usize>()
        }
    }
}

/// Encodes a value tree into a freshly allocated, exactly sized vector.
///
/// # Examples
///
/// ```rust
/// use benq::{encode, Value};
///
/// let value = Value::List(vec![Value::from("a"), Value::from("b")]);
/// assert_eq!(encode::to_vec(&value).unwrap(), b"l1:a1:be");
/// ```
pub fn to_vec(value: &Value) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; encoded_len(value)];
    let end = encode_value(&mut buf, value)?;
    debug_assert_eq!(end, buf.len());
    Ok(buf)
}
