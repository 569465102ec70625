use core_logic::quantity::{format_quantity, parse_quantity};
use num_bigint::BigUint;
use proptest::prelude::*;

proptest! {
    #[test]
    fn format_then_parse_is_identity(raw in any::<u128>(), decimals in 0u32..=30) {
        let amount = BigUint::from(raw);
        let text = format_quantity(&amount, decimals);
        prop_assert_eq!(parse_quantity(&text, decimals), Some(amount));
    }

    #[test]
    fn formatted_quantity_has_canonical_shape(raw in any::<u64>(), decimals in 0u32..=24) {
        let text = format_quantity(&BigUint::from(raw), decimals);
        prop_assert!(!text.contains('e') && !text.contains('E'));
        prop_assert!(!text.ends_with('.'));
        if text.contains('.') {
            prop_assert!(!text.ends_with('0'));
        }
        prop_assert!(!text.starts_with("00"));
    }

    #[test]
    fn wide_amounts_keep_every_digit(bytes in proptest::collection::vec(any::<u8>(), 1..40)) {
        let amount = BigUint::from_bytes_be(&bytes);
        let text = format_quantity(&amount, 18);
        prop_assert_eq!(parse_quantity(&text, 18), Some(amount));
    }
}
