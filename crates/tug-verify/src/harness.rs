//! The verification harness
//!
//! [`UpgradeVerifier`] drives the before/after discipline end to end:
//! capture a baseline at one point, let the upgrade land, then audit a
//! later point against an explicit [`ExpectedChanges`] declaration. The
//! harness only reads from the archive; it never touches the upgrade
//! path.

use serde::{Deserialize, Serialize};
use tug_identity::{Address, BlockPoint, SlotIndex};

use crate::archive::{SnapshotError, StateArchive};
use crate::diff::{diff_config, diff_storage, DiffReport};
use crate::snapshot::{ConfigSnapshot, RawStorageSnapshot};

/// What an upgrade is declared to change
///
/// Everything not named here must be identical before and after. The
/// declaration is always explicit; nothing is inferred from the upgrade
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedChanges {
    /// Config fields expected to change
    pub config_fields: Vec<String>,
    /// Storage slots the migration is expected to rewrite
    pub migrated_slots: Vec<SlotIndex>,
}

impl ExpectedChanges {
    /// Declare that nothing is expected to change
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Also expect the named config field to change
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.config_fields.push(field.into());
        self
    }

    /// Also expect the slot to be rewritten by the migration
    #[must_use]
    pub fn with_slot(mut self, slot: SlotIndex) -> Self {
        self.migrated_slots.push(slot);
        self
    }
}

/// The before-state of a target, captured in one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeBaseline {
    /// Semantic config fields at the baseline point
    pub config: ConfigSnapshot,
    /// Raw storage run at the baseline point
    pub storage: RawStorageSnapshot,
}

impl UpgradeBaseline {
    /// The point the baseline was captured at
    #[must_use]
    pub fn point(&self) -> BlockPoint {
        self.config.point
    }
}

/// Before/after audit driver for one target
///
/// Configured once with the field list and slot range to watch, then
/// reused for any number of baseline/audit pairs against the same
/// archive.
pub struct UpgradeVerifier<'a, A> {
    archive: &'a A,
    target: Address,
    fields: Vec<String>,
    slot_count: u64,
    offset: SlotIndex,
}

impl<'a, A: StateArchive> UpgradeVerifier<'a, A> {
    /// Create a verifier for `target` with no fields or slots watched
    #[must_use]
    pub fn new(archive: &'a A, target: Address) -> Self {
        Self {
            archive,
            target,
            fields: Vec::new(),
            slot_count: 0,
            offset: SlotIndex::new(0),
        }
    }

    /// Watch the named config fields
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Watch `slot_count` storage slots starting at `offset`
    #[must_use]
    pub fn with_slot_range(mut self, slot_count: u64, offset: SlotIndex) -> Self {
        self.slot_count = slot_count;
        self.offset = offset;
        self
    }

    /// The target under audit
    #[inline]
    #[must_use]
    pub fn target(&self) -> Address {
        self.target
    }

    /// Capture the watched state at `point`
    ///
    /// # Errors
    /// [`SnapshotError::TargetNotFound`] if the target does not exist
    /// at `point`.
    pub fn baseline(&self, point: BlockPoint) -> Result<UpgradeBaseline, SnapshotError> {
        let fields: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        let config = ConfigSnapshot::capture(self.archive, self.target, &fields, point)?;
        let storage = RawStorageSnapshot::capture(
            self.archive,
            self.target,
            self.slot_count,
            self.offset,
            point,
        )?;
        tracing::info!(
            "Captured baseline for {} at {}: {} fields, {} slots",
            self.target.short(),
            point,
            config.len(),
            storage.len()
        );
        Ok(UpgradeBaseline { config, storage })
    }

    /// Audit the state at `point` against `baseline` and `expected`
    ///
    /// Captures the same fields and slot range at `point`, runs both
    /// diffs, and returns the merged report with config deviations
    /// first. Every deviation found is also logged.
    ///
    /// # Errors
    /// [`SnapshotError::TargetNotFound`] if the target does not exist
    /// at `point`.
    pub fn audit(
        &self,
        baseline: &UpgradeBaseline,
        point: BlockPoint,
        expected: &ExpectedChanges,
    ) -> Result<DiffReport, SnapshotError> {
        let fields: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        let config = ConfigSnapshot::capture(self.archive, self.target, &fields, point)?;
        let storage = RawStorageSnapshot::capture(
            self.archive,
            self.target,
            self.slot_count,
            self.offset,
            point,
        )?;

        let report = diff_config(&baseline.config, &config, &expected.config_fields)
            .merge(diff_storage(&baseline.storage, &storage, &expected.migrated_slots));

        if report.is_clean() {
            tracing::info!(
                "Audit of {} at {} vs {} is clean",
                self.target.short(),
                point,
                baseline.point()
            );
        } else {
            for entry in report.entries() {
                tracing::warn!(
                    "Deviation at {}: {} -> {} ({})",
                    entry.location,
                    entry.expected,
                    entry.actual,
                    entry.classification
                );
            }
        }
        Ok(report)
    }
}
