//! # benq
//!
//! A bencode codec built around three ideas: a bounded-buffer streaming
//! encoder that never writes past the caller's buffer, a strictly
//! validating recursive-descent decoder, and schema-bound records whose
//! dictionary key order is proven once, at definition time, through a
//! reversible identifier-escaping scheme. The escape marker is `Q`; the Q
//! is silent.
//!
//! ## Data Types
//!
//! Bencode supports four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! Canonical output carries dictionary keys in strictly increasing raw
//! byte order, no leading zeros, and no `-0`.
//!
//! ## Key Features
//!
//! - **Bounded buffers**: the encoder writes into a caller-owned slice,
//!   token-atomically, and poisons itself permanently on the first
//!   overflow — no half-written tokens, ever
//! - **Exact validation**: the decoder rejects malformed or truncated
//!   input deterministically and never reads past the supplied length
//! - **Escaped identifiers**: dictionary keys outside `[A-Za-z0-9_]` are
//!   declared as `Q`-escaped names, compared in unescaped byte order
//!   without ever materializing the raw bytes
//! - **Schema binding**: an ordered field list drives canonical dictionary
//!   encode/decode with positional key matching
//! - **No unsafe code**
//!
//! ## Quick Start
//!
//! ```rust
//! use benq::{benc, from_bytes, to_bytes};
//!
//! let value = benc!({
//!     "1": 2,
//!     "3": "4",
//! });
//!
//! let bytes = to_bytes(&value).unwrap();
//! assert_eq!(bytes, b"d1:1i2e1:31:4e");
//! assert_eq!(from_bytes(&bytes).unwrap(), value);
//! ```
//!
//! ## Bounded Encoding
//!
//! ```rust
//! use benq::{encode::Encoder, Error, Token};
//!
//! let mut buf = [0u8; 8];
//! let mut session = Encoder::new(&mut buf);
//! assert_eq!(
//!     session.push(&Token::Bytes(b"abcdefgh")),
//!     Err(Error::BufferTooSmall)
//! );
//! assert!(session.is_poisoned());
//! ```
//!
//! ## Schema-Bound Records
//!
//! ```rust
//! use benq::{Dict, Kind, Schema, Value};
//!
//! // Field names are escaped identifiers, validated and order-checked
//! // once, when the schema is defined.
//! let schema = Schema::new(vec![
//!     ("creationQ20date", Kind::Int64), // "creation date"
//!     ("name", Kind::Bytes),
//! ])
//! .unwrap();
//!
//! let mut record = Dict::new();
//! record.insert(b"creation date".to_vec(), Value::Integer(1700000000));
//! record.insert(b"name".to_vec(), Value::from("example"));
//!
//! let mut buf = [0u8; 64];
//! let end = schema.encode(&record, &mut buf).unwrap();
//! assert_eq!(schema.decode(&buf[..end]).unwrap(), record);
//! ```

pub mod decode;
pub mod encode;
pub mod error;
pub mod escape;
pub mod macros;
pub mod map;
pub mod schema;
pub mod token;
pub mod value;

pub use encode::Encoder;
pub use error::{Error, Result};
pub use escape::{KeyEscape, DEFAULT_MARKER};
pub use map::Dict;
pub use schema::{Kind, Schema};
pub use token::Token;
pub use value::Value;

/// Encodes a value tree into a freshly allocated, exactly sized vector.
///
/// Shorthand for [`encode::to_vec`].
///
/// # Errors
///
/// [`Error::UnorderedKeys`] if any dictionary's keys are not strictly
/// increasing in raw byte order.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    encode::to_vec(value)
}

/// Decodes a complete value from the whole buffer.
///
/// Shorthand for [`decode::decode`].
///
/// # Errors
///
/// Any grammar violation, truncation, or trailing data fails the decode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_bytes(data: &[u8]) -> Result<Value> {
    decode::decode(data)
}
