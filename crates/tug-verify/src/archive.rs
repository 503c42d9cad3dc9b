//! Historical state access
//!
//! Snapshots are captured through [`StateArchive`], the read-only view
//! of a ledger's history. For a fixed point the answers are immutable:
//! capturing the same state twice yields identical snapshots.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tug_identity::{Address, BlockPoint, SlotIndex, Word};

/// A semantic configuration value read from a target
///
/// `Absent` is an ordinary value, not an error: a field that does not
/// exist at some point (say, before the upgrade that introduces it)
/// reads as `Absent` and participates in diffs like any other value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// The field does not exist at this point
    Absent,
    /// Boolean flag
    Flag(bool),
    /// Unsigned numeric value
    Uint(u128),
    /// Text value
    Text(String),
    /// Address-typed value
    Address(Address),
    /// Uninterpreted 32-byte value
    Word(Word),
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "<absent>"),
            Self::Flag(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Address(v) => write!(f, "{v}"),
            Self::Word(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<u128> for FieldValue {
    fn from(v: u128) -> Self {
        Self::Uint(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::Uint(u128::from(v))
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Address> for FieldValue {
    fn from(v: Address) -> Self {
        Self::Address(v)
    }
}

impl From<Word> for FieldValue {
    fn from(v: Word) -> Self {
        Self::Word(v)
    }
}

/// Errors raised while capturing snapshots
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// The target does not exist at the requested point
    #[error("target {target} not found at {point}")]
    TargetNotFound {
        /// The unknown target
        target: Address,
        /// The point that was queried
        point: BlockPoint,
    },
}

/// Read-only access to historical target state
///
/// Implementations answer for any point they retain. Answers for a
/// fixed `(target, point)` never change; a slot that was never written
/// reads as the zero word, and a config field the target does not have
/// reads as [`FieldValue::Absent`].
pub trait StateArchive {
    /// The value of the named config field of `target` at `point`
    ///
    /// # Errors
    /// [`SnapshotError::TargetNotFound`] if `target` does not exist at
    /// `point`.
    fn config_value(
        &self,
        target: Address,
        field: &str,
        point: BlockPoint,
    ) -> Result<FieldValue, SnapshotError>;

    /// The raw word at `slot` of `target` at `point`
    ///
    /// # Errors
    /// [`SnapshotError::TargetNotFound`] if `target` does not exist at
    /// `point`.
    fn storage_word(
        &self,
        target: Address,
        slot: SlotIndex,
        point: BlockPoint,
    ) -> Result<Word, SnapshotError>;
}

impl<T: StateArchive + ?Sized> StateArchive for &T {
    fn config_value(
        &self,
        target: Address,
        field: &str,
        point: BlockPoint,
    ) -> Result<FieldValue, SnapshotError> {
        (**self).config_value(target, field, point)
    }

    fn storage_word(
        &self,
        target: Address,
        slot: SlotIndex,
        point: BlockPoint,
    ) -> Result<Word, SnapshotError> {
        (**self).storage_word(target, slot, point)
    }
}

impl<T: StateArchive + ?Sized> StateArchive for Arc<T> {
    fn config_value(
        &self,
        target: Address,
        field: &str,
        point: BlockPoint,
    ) -> Result<FieldValue, SnapshotError> {
        (**self).config_value(target, field, point)
    }

    fn storage_word(
        &self,
        target: Address,
        slot: SlotIndex,
        point: BlockPoint,
    ) -> Result<Word, SnapshotError> {
        (**self).storage_word(target, slot, point)
    }
}
