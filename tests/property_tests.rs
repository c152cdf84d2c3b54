//! Property-based tests covering the core codec guarantees: round-trip
//! fidelity, exact buffer-boundary behavior, truncation rejection, and
//! escaping invariants.

use benq::{decode, encode, to_bytes, Dict, Error, KeyEscape, Value};
use proptest::prelude::*;

/// Generates arbitrary canonical value trees: dictionaries get sorted,
/// deduplicated keys so every generated tree has an encoding.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ];
    leaf.prop_recursive(4, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::btree_map(prop::collection::vec(any::<u8>(), 0..8), inner, 0..6)
                .prop_map(|entries| {
                    // BTreeMap iteration is already strictly increasing.
                    Value::Dict(entries.into_iter().collect::<Dict>())
                }),
        ]
    })
}

proptest! {
    #[test]
    fn round_trip(value in arb_value()) {
        let bytes = to_bytes(&value).unwrap();
        prop_assert_eq!(decode::decode(&bytes).unwrap(), value);
    }

    #[test]
    fn exact_buffer_succeeds_one_short_fails(value in arb_value()) {
        let bytes = to_bytes(&value).unwrap();

        let mut exact = vec![0u8; bytes.len()];
        prop_assert_eq!(encode::encode_value(&mut exact, &value), Ok(bytes.len()));
        prop_assert_eq!(&exact, &bytes);

        let mut short = vec![0u8; bytes.len() - 1];
        let mut session = encode::Encoder::new(&mut short);
        prop_assert_eq!(session.push_value(&value), Err(Error::BufferTooSmall));
        prop_assert!(session.is_poisoned());
    }

    #[test]
    fn truncations_never_decode(value in arb_value(), frac in 0.0f64..1.0) {
        let bytes = to_bytes(&value).unwrap();
        let cut = ((bytes.len() as f64) * frac) as usize;
        prop_assert!(cut < bytes.len());
        prop_assert!(decode::decode(&bytes[..cut]).is_err());
    }

    #[test]
    fn escape_unescape_identity(raw in prop::collection::vec(any::<u8>(), 0..32)) {
        let esc = KeyEscape::default();
        let escaped = esc.escape(&raw);
        prop_assert!(esc.is_well_formed(&escaped));
        prop_assert_eq!(esc.unescaped_len(&escaped).unwrap(), raw.len());
        prop_assert_eq!(esc.unescape(&escaped).unwrap(), raw);
    }

    #[test]
    fn compare_agrees_with_unescaped_order(
        a in prop::collection::vec(any::<u8>(), 0..16),
        b in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let esc = KeyEscape::default();
        let ea = esc.escape(&a);
        let eb = esc.escape(&b);
        prop_assert_eq!(esc.compare(&ea, &eb), a.cmp(&b));
    }

    #[test]
    fn integer_digits_round_trip(n in any::<i64>()) {
        let bytes = to_bytes(&Value::Integer(n)).unwrap();
        let (back, rest) = decode::integer(&bytes).unwrap();
        prop_assert_eq!(back, n);
        prop_assert!(rest.is_empty());
    }
}
