//! Reversible escaping for dictionary key identifiers.
//!
//! Bencode keys are arbitrary byte strings, but schema field names are
//! declared as textual identifiers. The escaping scheme bridges the two:
//! bytes outside the identifier set `[A-Za-z0-9_]` are written as a marker
//! character followed by two hex digits, and a doubled marker stands for
//! the marker byte itself. The default marker is `Q` (the Q is silent).
//!
//! Order comparison works directly on the escaped form: [`KeyEscape::compare`]
//! decodes one effective byte at a time from each side, so schema key-order
//! validation never materializes the unescaped names.
//!
//! ## Examples
//!
//! ```rust
//! use benq::KeyEscape;
//!
//! let esc = KeyEscape::default();
//! assert_eq!(esc.unescape("pieceQ20length").unwrap(), b"piece length");
//! assert_eq!(esc.escape(b"piece length"), "pieceQ20length");
//! assert_eq!(esc.unescape("QQ").unwrap(), b"Q");
//! ```

use crate::error::{Error, Result};
use std::cmp::Ordering;

/// The default escape marker.
pub const DEFAULT_MARKER: u8 = b'Q';

fn is_hex(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

fn hex_val(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'A'..=b'F' => b - b'A' + 10,
        _ => b - b'a' + 10,
    }
}

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Escaping configuration: the marker byte and the operations over it.
///
/// The marker must not be a hex digit, or unescaping would be ambiguous;
/// it must also be an ASCII letter or underscore so escaped names stay
/// plain identifiers. Both constraints are checked once, at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEscape {
    marker: u8,
}

impl Default for KeyEscape {
    fn default() -> Self {
        KeyEscape {
            marker: DEFAULT_MARKER,
        }
    }
}

impl KeyEscape {
    /// Creates an escaping configuration with a custom marker.
    ///
    /// # Errors
    ///
    /// Fails if the marker is a hex digit or not an ASCII letter or
    /// underscore.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use benq::KeyEscape;
    ///
    /// assert!(KeyEscape::new(b'Z').is_ok());
    /// assert!(KeyEscape::new(b'a').is_err()); // hex digit
    /// assert!(KeyEscape::new(b'%').is_err()); // not an identifier char
    /// ```
    pub fn new(marker: u8) -> Result<Self> {
        if is_hex(marker) {
            return Err(Error::grammar(format!(
                "escape marker {:?} must not be a hex digit",
                marker as char
            )));
        }
        if !marker.is_ascii_alphabetic() && marker != b'_' {
            return Err(Error::grammar(format!(
                "escape marker {:?} must be an ASCII letter or underscore",
                marker as char
            )));
        }
        Ok(KeyEscape { marker })
    }

    /// Returns the marker byte.
    #[must_use]
    pub fn marker(&self) -> u8 {
        self.marker
    }

    /// Returns `true` if every marker occurrence in `escaped` is followed by
    /// either the marker itself or exactly two hex digits.
    #[must_use]
    pub fn is_well_formed(&self, escaped: &str) -> bool {
        let bytes = escaped.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != self.marker {
                i += 1;
            } else if bytes.get(i + 1) == Some(&self.marker) {
                i += 2;
            } else if i + 2 < bytes.len() && is_hex(bytes[i + 1]) && is_hex(bytes[i + 2]) {
                i += 3;
            } else {
                return false;
            }
        }
        true
    }

    /// Computes the byte length of the unescaped form without allocating.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MalformedGrammar`] if `escaped` is not
    /// well-formed.
    pub fn unescaped_len(&self, escaped: &str) -> Result<usize> {
        if !self.is_well_formed(escaped) {
            return Err(Error::grammar(format!("malformed escaped key {:?}", escaped)));
        }
        Ok(EffectiveBytes::new(escaped.as_bytes(), self.marker).count())
    }

    /// Expands an escaped identifier into the raw key bytes.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MalformedGrammar`] if `escaped` is not
    /// well-formed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use benq::KeyEscape;
    ///
    /// let esc = KeyEscape::default();
    /// assert_eq!(esc.unescape("md5sum").unwrap(), b"md5sum");
    /// assert_eq!(esc.unescape("Q00").unwrap(), vec![0u8]);
    /// assert!(esc.unescape("Qx1").is_err());
    /// ```
    pub fn unescape(&self, escaped: &str) -> Result<Vec<u8>> {
        if !self.is_well_formed(escaped) {
            return Err(Error::grammar(format!("malformed escaped key {:?}", escaped)));
        }
        Ok(EffectiveBytes::new(escaped.as_bytes(), self.marker).collect())
    }

    /// Escapes raw key bytes into canonical escaped form: identifier bytes
    /// pass through, the marker is doubled, everything else becomes the
    /// marker plus two uppercase hex digits.
    ///
    /// `unescape(escape(raw)) == raw` holds for every byte string, and
    /// `escape(unescape(s)) == s` for every string this method can produce.
    #[must_use]
    pub fn escape(&self, raw: &[u8]) -> String {
        let mut out = String::with_capacity(raw.len());
        for &b in raw {
            if b == self.marker {
                out.push(self.marker as char);
                out.push(self.marker as char);
            } else if b.is_ascii_alphanumeric() || b == b'_' {
                out.push(b as char);
            } else {
                out.push(self.marker as char);
                out.push(HEX_UPPER[(b >> 4) as usize] as char);
                out.push(HEX_UPPER[(b & 0x0f) as usize] as char);
            }
        }
        out
    }

    /// Compares the unescaped forms of two escaped identifiers without
    /// materializing either, one effective byte at a time.
    ///
    /// Both inputs must be well-formed (see [`KeyEscape::is_well_formed`]);
    /// a malformed trailing group is compared as the literal marker byte.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use benq::KeyEscape;
    /// use std::cmp::Ordering;
    ///
    /// let esc = KeyEscape::default();
    /// // "piece length" < "pieces": shorter-is-smaller on a common prefix
    /// assert_eq!(esc.compare("pieceQ20length", "pieces"), Ordering::Less);
    /// assert_eq!(esc.compare("QQ", "Q51"), Ordering::Equal); // both "Q"
    /// ```
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let a = EffectiveBytes::new(a.as_bytes(), self.marker);
        let b = EffectiveBytes::new(b.as_bytes(), self.marker);
        a.cmp(b)
    }
}

/// Iterator over the unescaped bytes of an escaped identifier.
struct EffectiveBytes<'a> {
    rest: &'a [u8],
    marker: u8,
}

impl<'a> EffectiveBytes<'a> {
    fn new(escaped: &'a [u8], marker: u8) -> Self {
        EffectiveBytes {
            rest: escaped,
            marker,
        }
    }
}

impl Iterator for EffectiveBytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let (&first, tail) = self.rest.split_first()?;
        if first != self.marker {
            self.rest = tail;
            return Some(first);
        }
        match tail {
            [m, rest @ ..] if *m == self.marker => {
                self.rest = rest;
                Some(self.marker)
            }
            [hi, lo, rest @ ..] if is_hex(*hi) && is_hex(*lo) => {
                self.rest = rest;
                Some(hex_val(*hi) * 16 + hex_val(*lo))
            }
            _ => {
                // Malformed tail; yield the marker literally rather than
                // losing bytes. Callers validate with is_well_formed first.
                self.rest = tail;
                Some(self.marker)
            }
        }
    }
}
