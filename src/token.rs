//! Token stream model for the streaming encoder.
//!
//! The encoder consumes a flattened, ordered sequence of [`Token`]s: an
//! integer, a byte string, or a single structural marker. Composite
//! constructors like [`Token::list`] and [`Token::dict`] are sugar that
//! expand into a nested stream wrapped in matching begin/end markers, so
//! nesting is expressed by nested streams rather than mutable shared state.
//!
//! ## Examples
//!
//! ```rust
//! use benq::{encode, Token};
//!
//! let mut buf = [0u8; 32];
//! let stream = [Token::list([
//!     Token::Bytes(b"a"),
//!     Token::Bytes(b"b"),
//!     Token::Bytes(b"c"),
//!     Token::Bytes(b"d"),
//! ])];
//! let end = encode::encode(&mut buf, &stream).unwrap();
//! assert_eq!(&buf[..end], b"l1:a1:b1:c1:de");
//! ```

/// One atomic unit the encoder writes, or a nested stream of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// An integer, encoded as `i<digits>e`.
    Integer(i64),
    /// A byte string, encoded as `<len>:<bytes>`.
    Bytes(&'a [u8]),
    /// The list-begin marker `l`.
    ListBegin,
    /// The list-end marker `e`.
    ListEnd,
    /// The dict-begin marker `d`.
    DictBegin,
    /// The dict-end marker `e`.
    DictEnd,
    /// A nested stream, encoded in place as if its tokens appeared here.
    Stream(Vec<Token<'a>>),
}

impl<'a> Token<'a> {
    /// Wraps a stream of item tokens in list-begin/list-end markers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use benq::Token;
    ///
    /// let list = Token::list([Token::Integer(1), Token::Integer(2)]);
    /// let mut buf = [0u8; 16];
    /// let end = benq::encode::encode(&mut buf, &[list]).unwrap();
    /// assert_eq!(&buf[..end], b"li1ei2ee");
    /// ```
    pub fn list<I>(items: I) -> Token<'a>
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        let mut stream = vec![Token::ListBegin];
        stream.extend(items);
        stream.push(Token::ListEnd);
        Token::Stream(stream)
    }

    /// Wraps a stream of alternating key/value tokens in dict-begin/dict-end
    /// markers. Keys must already be in strictly increasing raw byte order
    /// for the output to be canonical; the token layer does not check.
    pub fn dict<I>(entries: I) -> Token<'a>
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        let mut stream = vec![Token::DictBegin];
        stream.extend(entries);
        stream.push(Token::DictEnd);
        Token::Stream(stream)
    }

    /// A key/value pair as a flat two-token stream, for use inside
    /// [`Token::dict`].
    pub fn pair(key: &'a [u8], value: Token<'a>) -> Token<'a> {
        Token::Stream(vec![Token::Bytes(key), value])
    }
}

impl<'a> From<i64> for Token<'a> {
    fn from(i: i64) -> Self {
        Token::Integer(i)
    }
}

impl<'a> From<&'a str> for Token<'a> {
    fn from(s: &'a str) -> Self {
        Token::Bytes(s.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Token<'a> {
    fn from(b: &'a [u8]) -> Self {
        Token::Bytes(b)
    }
}
