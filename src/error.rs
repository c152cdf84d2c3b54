//! Error types for bencode encoding and decoding.
//!
//! All failures surface as explicit [`Error`] values returned to the
//! immediate caller; nothing in the crate panics across the API boundary
//! and there is no partial recovery. A failed encode poisons its session,
//! a failed decode voids the whole attempt.
//!
//! ## Error Categories
//!
//! - **Encode**: [`Error::BufferTooSmall`], [`Error::UnorderedKeys`]
//! - **Decode**: [`Error::MalformedGrammar`], [`Error::Truncated`],
//!   [`Error::IntegerOverflow`], [`Error::NestingTooDeep`]
//! - **Schema**: [`Error::KeyMismatch`] at decode time,
//!   [`Error::SchemaOrderViolation`] at definition time
//!
//! ## Examples
//!
//! ```rust
//! use benq::{decode, Error};
//!
//! assert_eq!(decode::decode(b"i88"), Err(Error::Truncated));
//! assert!(matches!(decode::decode(b"i-0e"), Err(Error::MalformedGrammar(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The next token would overflow the remaining encode buffer capacity.
    /// The session is poisoned; every later write fails with this error.
    #[error("buffer too small for next token")]
    BufferTooSmall,

    /// A token's syntax violates the bencode grammar.
    #[error("malformed bencode: {0}")]
    MalformedGrammar(String),

    /// Fewer bytes remain than the current token requires.
    #[error("truncated input")]
    Truncated,

    /// A decoded integer does not fit the requested target width.
    #[error("integer overflow: {0}")]
    IntegerOverflow(String),

    /// Schema decode found a key that differs from the declared field name
    /// at that position.
    #[error("key mismatch: expected {expected:?}, found {found:?}")]
    KeyMismatch { expected: String, found: String },

    /// Schema field names are not strictly increasing. Raised once, at
    /// definition time; a schema that fails this check never exists.
    #[error("schema order violation: field {0:?} is not greater than its predecessor")]
    SchemaOrderViolation(String),

    /// Dictionary keys handed to the encoder are not in strictly increasing
    /// raw byte order, so no canonical encoding exists for them.
    #[error("dictionary keys not in canonical order")]
    UnorderedKeys,

    /// Recursion limit exceeded while decoding nested containers.
    #[error("nesting too deep")]
    NestingTooDeep,
}

impl Error {
    /// Creates a [`Error::MalformedGrammar`] with a display message.
    pub fn grammar<T: fmt::Display>(msg: T) -> Self {
        Error::MalformedGrammar(msg.to_string())
    }

    /// Creates an [`Error::IntegerOverflow`] with a display message.
    pub fn overflow<T: fmt::Display>(msg: T) -> Self {
        Error::IntegerOverflow(msg.to_string())
    }

    /// Creates a [`Error::KeyMismatch`] from the expected name and the raw
    /// key bytes actually decoded.
    pub fn key_mismatch(expected: &[u8], found: &[u8]) -> Self {
        Error::KeyMismatch {
            expected: String::from_utf8_lossy(expected).into_owned(),
            found: String::from_utf8_lossy(found).into_owned(),
        }
    }

    /// Creates a [`Error::SchemaOrderViolation`] naming the offending field.
    pub fn schema_order(field: &str) -> Self {
        Error::SchemaOrderViolation(field.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
