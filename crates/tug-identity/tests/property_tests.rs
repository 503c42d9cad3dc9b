//! Property tests over the hex text encoding of the identity primitives.

use proptest::prelude::*;
use tug_identity::{Address, Word};

proptest! {
    /// Every address survives a Display / FromStr round trip.
    #[test]
    fn prop_address_hex_round_trips(bytes in any::<[u8; 20]>()) {
        let addr = Address::new(bytes);
        let text = addr.to_string();
        prop_assert!(text.starts_with("0x"));
        prop_assert_eq!(text.len(), 2 + 2 * Address::LEN);

        let parsed: Address = text.parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Every word survives a Display / FromStr round trip, with or
    /// without the leading `0x`.
    #[test]
    fn prop_word_hex_round_trips(bytes in any::<[u8; 32]>()) {
        let word = Word::new(bytes);
        let text = word.to_string();

        let parsed: Word = text.parse().unwrap();
        prop_assert_eq!(parsed, word);

        let bare: Word = text.trim_start_matches("0x").parse().unwrap();
        prop_assert_eq!(bare, word);
    }

    /// JSON serialization uses the same hex form and round trips.
    #[test]
    fn prop_word_serde_json_round_trips(bytes in any::<[u8; 32]>()) {
        let word = Word::new(bytes);
        let json = serde_json::to_string(&word).unwrap();
        let decoded: Word = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(decoded, word);
    }
}
