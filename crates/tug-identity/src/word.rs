//! Raw storage vocabulary
//!
//! A target's persistent state is a sparse array of 32-byte [`Word`]s
//! indexed by [`SlotIndex`]. Slots that were never written read as the
//! zero word.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte raw storage word
///
/// The unit of raw state. Compared bytewise; no interpretation of the
/// content is implied at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word([u8; 32]);

impl Word {
    /// Byte width of a word
    pub const LEN: usize = 32;

    /// Create a new Word from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The all-zero word, the value of any slot never written
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0; 32])
    }

    /// Encode an unsigned integer as a big-endian word
    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        let be = value.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[24 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to byte array (consumes self)
    #[inline]
    #[must_use]
    pub const fn into_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Create word from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, WordError> {
        if bytes.len() != Self::LEN {
            return Err(WordError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Check if this is the zero word
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < Self::LEN {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Decode as an unsigned integer if the upper 24 bytes are clear
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|&b| b != 0) {
            return None;
        }
        let mut be = [0u8; 8];
        be.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(be))
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl Default for Word {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl serde::Serialize for Word {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Word {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct WordVisitor;

        impl serde::de::Visitor<'_> for WordVisitor {
            type Value = Word;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 32-byte word as hex string or byte array")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Word::from_slice(value).map_err(serde::de::Error::custom)
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(WordVisitor)
        } else {
            deserializer.deserialize_bytes(WordVisitor)
        }
    }
}

/// Errors that can occur when constructing words
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WordError {
    /// Invalid word length
    #[error("invalid word length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

/// Index of a raw storage slot within a target
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct SlotIndex(u64);

impl SlotIndex {
    /// Create a new slot index
    #[inline]
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// The raw index value
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Index shifted by a relative offset, saturating at the top
    #[inline]
    #[must_use]
    pub const fn offset_by(&self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

impl Display for SlotIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SlotIndex {
    fn from(index: u64) -> Self {
        Self(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_zero_reads_as_zero() {
        assert!(Word::zero().is_zero());
        assert!(Word::default().is_zero());
        assert_eq!(Word::zero().as_u64(), Some(0));
    }

    #[test]
    fn word_from_u64_round_trips() {
        let w = Word::from_u64(0xdead_beef);
        assert_eq!(w.as_u64(), Some(0xdead_beef));
        assert!(!w.is_zero());
    }

    #[test]
    fn word_from_u64_is_big_endian() {
        let w = Word::from_u64(1);
        assert_eq!(w.as_bytes()[31], 1);
        assert_eq!(w.as_bytes()[..31], [0u8; 31]);
    }

    #[test]
    fn word_as_u64_rejects_wide_values() {
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        assert_eq!(Word::new(bytes).as_u64(), None);
    }

    #[test]
    fn word_from_slice_invalid_length() {
        let result = Word::from_slice(&[0u8; 16]);
        assert!(matches!(
            result,
            Err(WordError::InvalidLength {
                expected: 32,
                actual: 16
            })
        ));
    }

    #[test]
    fn word_hex_errors_compare_equal() {
        let a = "0xgg".parse::<Word>().unwrap_err();
        let b = "0xgg".parse::<Word>().unwrap_err();
        assert_eq!(a, b);
        assert!(matches!(a, WordError::HexDecode(_)));
    }

    #[test]
    fn word_display_and_parse() {
        let w = Word::from_u64(42);
        let s = w.to_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 2 + 64);

        let parsed: Word = s.parse().unwrap();
        assert_eq!(w, parsed);
    }

    #[test]
    fn word_serde_json() {
        let w = Word::from_u64(7);
        let json = serde_json::to_string(&w).unwrap();
        let decoded: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(w, decoded);
    }

    #[test]
    fn slot_index_ordering_and_offset() {
        let a = SlotIndex::new(3);
        let b = a.offset_by(2);
        assert_eq!(b.value(), 5);
        assert!(a < b);
        assert_eq!(SlotIndex::new(u64::MAX).offset_by(1).value(), u64::MAX);
    }

    #[test]
    fn slot_index_display() {
        assert_eq!(SlotIndex::new(17).to_string(), "17");
    }
}
