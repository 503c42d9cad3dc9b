//! State snapshots
//!
//! Two snapshot shapes cover the two views of a target: the semantic
//! config view (named fields) and the raw view (a contiguous run of
//! storage words). Both are plain data, stamped with the target and the
//! point they were captured at.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tug_identity::{Address, BlockPoint, SlotIndex, Word};

use crate::archive::{FieldValue, SnapshotError, StateArchive};

/// Values of a chosen set of semantic config fields at one point
///
/// Field order is capture order and is preserved through serde, so
/// reports derived from the same field list line up run to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// The target the snapshot describes
    pub target: Address,
    /// The point the values were read at
    pub point: BlockPoint,
    /// Field name to value, in capture order
    pub fields: IndexMap<String, FieldValue>,
}

impl ConfigSnapshot {
    /// Capture the named fields of `target` at `point`
    ///
    /// A field the target does not have reads as [`FieldValue::Absent`]
    /// and is captured like any other value.
    ///
    /// # Errors
    /// [`SnapshotError::TargetNotFound`] if `target` does not exist at
    /// `point`.
    pub fn capture<A: StateArchive>(
        archive: &A,
        target: Address,
        fields: &[&str],
        point: BlockPoint,
    ) -> Result<Self, SnapshotError> {
        let mut captured = IndexMap::with_capacity(fields.len());
        for &field in fields {
            let value = archive.config_value(target, field, point)?;
            captured.insert(field.to_owned(), value);
        }
        tracing::debug!(
            "Captured {} config fields of {} at {}",
            captured.len(),
            target.short(),
            point
        );
        Ok(Self {
            target,
            point,
            fields: captured,
        })
    }

    /// The captured value of `field`, if it was part of the capture set
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Number of captured fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields were captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A contiguous run of raw storage words at one point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStorageSnapshot {
    /// The target the snapshot describes
    pub target: Address,
    /// The point the words were read at
    pub point: BlockPoint,
    /// First slot of the run
    pub offset: SlotIndex,
    /// The words, one per slot starting at `offset`
    pub words: Vec<Word>,
}

impl RawStorageSnapshot {
    /// Capture `slot_count` words of `target` starting at `offset`
    ///
    /// Slots never written read as the zero word.
    ///
    /// # Errors
    /// [`SnapshotError::TargetNotFound`] if `target` does not exist at
    /// `point`.
    pub fn capture<A: StateArchive>(
        archive: &A,
        target: Address,
        slot_count: u64,
        offset: SlotIndex,
        point: BlockPoint,
    ) -> Result<Self, SnapshotError> {
        let mut words = Vec::with_capacity(usize::try_from(slot_count).unwrap_or_default());
        for i in 0..slot_count {
            let word = archive.storage_word(target, offset.offset_by(i), point)?;
            words.push(word);
        }
        tracing::debug!(
            "Captured {} storage words of {} at {} starting from slot {}",
            words.len(),
            target.short(),
            point,
            offset
        );
        Ok(Self {
            target,
            point,
            offset,
            words,
        })
    }

    /// The word at the absolute `slot`, if it lies within this run
    #[must_use]
    pub fn word_at(&self, slot: SlotIndex) -> Option<Word> {
        let relative = slot.value().checked_sub(self.offset.value())?;
        let index = usize::try_from(relative).ok()?;
        self.words.get(index).copied()
    }

    /// Iterate over `(slot, word)` pairs in slot order
    pub fn slots(&self) -> impl Iterator<Item = (SlotIndex, Word)> + '_ {
        self.words
            .iter()
            .enumerate()
            .map(|(i, &word)| (self.offset.offset_by(i as u64), word))
    }

    /// Number of captured slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether no slots were captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Minimal fixed archive for snapshot tests
    struct FixedArchive {
        target: Address,
        fields: BTreeMap<&'static str, FieldValue>,
        storage: BTreeMap<u64, Word>,
    }

    impl StateArchive for FixedArchive {
        fn config_value(
            &self,
            target: Address,
            field: &str,
            point: BlockPoint,
        ) -> Result<FieldValue, SnapshotError> {
            if target != self.target {
                return Err(SnapshotError::TargetNotFound { target, point });
            }
            Ok(self
                .fields
                .get(field)
                .cloned()
                .unwrap_or(FieldValue::Absent))
        }

        fn storage_word(
            &self,
            target: Address,
            slot: SlotIndex,
            point: BlockPoint,
        ) -> Result<Word, SnapshotError> {
            if target != self.target {
                return Err(SnapshotError::TargetNotFound { target, point });
            }
            Ok(self
                .storage
                .get(&slot.value())
                .copied()
                .unwrap_or_else(Word::zero))
        }
    }

    fn archive() -> FixedArchive {
        let mut fields = BTreeMap::new();
        fields.insert("name", FieldValue::Text("Staked Token".into()));
        fields.insert("decimals", FieldValue::Uint(18));

        let mut storage = BTreeMap::new();
        storage.insert(3, Word::from_u64(77));

        FixedArchive {
            target: Address::derive("target"),
            fields,
            storage,
        }
    }

    #[test]
    fn config_capture_preserves_order() {
        let archive = archive();
        let snap = ConfigSnapshot::capture(
            &archive,
            archive.target,
            &["decimals", "name"],
            BlockPoint::new(1),
        )
        .unwrap();

        let names: Vec<&str> = snap.fields.keys().map(String::as_str).collect();
        assert_eq!(names, ["decimals", "name"]);
        assert_eq!(snap.get("decimals"), Some(&FieldValue::Uint(18)));
        assert_eq!(snap.len(), 2);
    }

    #[test]
    fn missing_field_captures_as_absent() {
        let archive = archive();
        let snap = ConfigSnapshot::capture(
            &archive,
            archive.target,
            &["newFangledField"],
            BlockPoint::new(1),
        )
        .unwrap();
        assert_eq!(snap.get("newFangledField"), Some(&FieldValue::Absent));
    }

    #[test]
    fn unknown_target_fails_capture() {
        let archive = archive();
        let ghost = Address::derive("ghost");
        let err =
            ConfigSnapshot::capture(&archive, ghost, &["name"], BlockPoint::new(1)).unwrap_err();
        assert_eq!(
            err,
            SnapshotError::TargetNotFound {
                target: ghost,
                point: BlockPoint::new(1)
            }
        );
    }

    #[test]
    fn storage_capture_reads_contiguous_run() {
        let archive = archive();
        let snap = RawStorageSnapshot::capture(
            &archive,
            archive.target,
            5,
            SlotIndex::new(0),
            BlockPoint::new(1),
        )
        .unwrap();

        assert_eq!(snap.len(), 5);
        assert_eq!(snap.word_at(SlotIndex::new(3)), Some(Word::from_u64(77)));
        assert_eq!(snap.word_at(SlotIndex::new(0)), Some(Word::zero()));
        assert_eq!(snap.word_at(SlotIndex::new(5)), None);
    }

    #[test]
    fn storage_capture_honors_offset() {
        let archive = archive();
        let snap = RawStorageSnapshot::capture(
            &archive,
            archive.target,
            2,
            SlotIndex::new(3),
            BlockPoint::new(1),
        )
        .unwrap();

        assert_eq!(snap.word_at(SlotIndex::new(3)), Some(Word::from_u64(77)));
        assert_eq!(snap.word_at(SlotIndex::new(4)), Some(Word::zero()));
        // slots below the offset are not part of the run
        assert_eq!(snap.word_at(SlotIndex::new(2)), None);

        let collected: Vec<u64> = snap.slots().map(|(slot, _)| slot.value()).collect();
        assert_eq!(collected, [3, 4]);
    }

    #[test]
    fn snapshot_serde_round_trip() {
        let archive = archive();
        let snap = ConfigSnapshot::capture(
            &archive,
            archive.target,
            &["name", "decimals"],
            BlockPoint::new(9),
        )
        .unwrap();

        let json = serde_json::to_string(&snap).unwrap();
        let decoded: ConfigSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, decoded);
    }
}
