/// Builds a [`Value`](crate::Value) from a literal-ish description.
///
/// Integers become [`Value::Integer`](crate::Value), string and byte
/// literals become byte strings, `[...]` becomes a list, and `{...}`
/// becomes a dictionary with entries in the written order. Dictionary
/// order is not checked here; the encoder rejects non-canonical key order
/// when the value is written.
///
/// # Examples
///
/// ```rust
/// use benq::{benc, encode};
///
/// let value = benc!({
///     "1": 2,
///     "3": "4",
/// });
/// assert_eq!(encode::to_vec(&value).unwrap(), b"d1:1i2e1:31:4e");
///
/// let list = benc!(["a", "b", "c", "d"]);
/// assert_eq!(encode::to_vec(&list).unwrap(), b"l1:a1:b1:c1:de");
/// ```
#[macro_export]
macro_rules! benc {
    // Empty list
    ([]) => {
        $crate::Value::List(vec![])
    };

    // Non-empty list
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::benc!($elem)),*])
    };

    // Empty dictionary
    ({}) => {
        $crate::Value::Dict($crate::Dict::new())
    };

    // Non-empty dictionary; entries keep the written order
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut dict = $crate::Dict::new();
        $(
            dict.insert($key.as_bytes().to_vec(), $crate::benc!($value));
        )*
        $crate::Value::Dict(dict)
    }};

    // Anything with a From<_> for Value: integers, strings, byte arrays
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
