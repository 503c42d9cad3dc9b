//! The diff engine
//!
//! [`diff_config`] and [`diff_storage`] are pure comparisons: two
//! snapshots and an explicit declaration of what was supposed to change.
//! Both walk the full union of locations and classify every deviation.
//! Nothing is inferred from the upgrade itself; silence about a location
//! means it must not change.

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use tug_identity::SlotIndex;

use crate::archive::FieldValue;
use crate::snapshot::{ConfigSnapshot, RawStorageSnapshot};

/// Where a deviation was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// A semantic config field
    Field(String),
    /// A raw storage slot
    Slot(SlotIndex),
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "field {name}"),
            Self::Slot(slot) => write!(f, "slot {slot}"),
        }
    }
}

/// How a deviation violates the declared expectations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffClass {
    /// The location changed but was not declared as expected to change
    UnexpectedChange,
    /// The location was declared as expected to change but did not
    MissingExpectedChange,
}

impl Display for DiffClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChange => write!(f, "unexpected change"),
            Self::MissingExpectedChange => write!(f, "missing expected change"),
        }
    }
}

/// One deviation: a location with its before and after values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Where the deviation was found
    pub location: Location,
    /// The value before the upgrade
    pub expected: FieldValue,
    /// The value after the upgrade
    pub actual: FieldValue,
    /// Which expectation the deviation violates
    pub classification: DiffClass,
}

/// The complete result of a snapshot comparison
///
/// An empty report means the upgrade matched its declaration exactly.
/// Entries appear in location order: config fields in snapshot order,
/// storage slots ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    entries: Vec<DiffEntry>,
}

impl DiffReport {
    /// An empty (clean) report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a report from collected entries
    #[must_use]
    pub fn from_entries(entries: Vec<DiffEntry>) -> Self {
        Self { entries }
    }

    /// Whether no deviations were found
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of deviations
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The deviations, in location order
    #[must_use]
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// Concatenate two reports, preserving order
    #[must_use]
    pub fn merge(mut self, other: DiffReport) -> Self {
        self.entries.extend(other.entries);
        self
    }
}

impl Display for DiffReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "clean: no deviations");
        }

        let rows: Vec<[String; 4]> = self
            .entries
            .iter()
            .map(|e| {
                [
                    e.location.to_string(),
                    e.expected.to_string(),
                    e.actual.to_string(),
                    e.classification.to_string(),
                ]
            })
            .collect();

        let header = ["location", "expected", "actual", "class"];
        let mut widths = header.map(str::len);
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.len());
            }
        }

        writeln!(f, "{} deviations", self.entries.len())?;
        writeln!(
            f,
            "{:<w0$}  {:<w1$}  {:<w2$}  {}",
            header[0],
            header[1],
            header[2],
            header[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        )?;
        for row in &rows {
            writeln!(
                f,
                "{:<w0$}  {:<w1$}  {:<w2$}  {}",
                row[0],
                row[1],
                row[2],
                row[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
            )?;
        }
        Ok(())
    }
}

/// Compare two config snapshots against a declared change set
///
/// Walks every field present in either snapshot, in before-snapshot
/// order with after-only fields appended. A field missing on one side
/// participates as [`FieldValue::Absent`]. A changed field not named in
/// `expected_changed` is an [`DiffClass::UnexpectedChange`]; a named
/// field that did not change is a [`DiffClass::MissingExpectedChange`].
#[must_use]
pub fn diff_config<S: AsRef<str>>(
    before: &ConfigSnapshot,
    after: &ConfigSnapshot,
    expected_changed: &[S],
) -> DiffReport {
    let mut names: Vec<&str> = before.fields.keys().map(String::as_str).collect();
    for name in after.fields.keys() {
        if !before.fields.contains_key(name) {
            names.push(name);
        }
    }

    let mut entries = Vec::new();
    for name in names {
        let expected = before.fields.get(name).unwrap_or(&FieldValue::Absent);
        let actual = after.fields.get(name).unwrap_or(&FieldValue::Absent);
        let changed = expected != actual;
        let declared = expected_changed.iter().any(|s| s.as_ref() == name);

        let classification = match (changed, declared) {
            (true, false) => DiffClass::UnexpectedChange,
            (false, true) => DiffClass::MissingExpectedChange,
            _ => continue,
        };
        entries.push(DiffEntry {
            location: Location::Field(name.to_owned()),
            expected: expected.clone(),
            actual: actual.clone(),
            classification,
        });
    }
    DiffReport::from_entries(entries)
}

/// Compare two raw storage snapshots against a declared migrated set
///
/// Walks every slot covered by either run, ascending. A slot outside
/// one run participates as [`FieldValue::Absent`]. A changed slot not
/// named in `migrated_slots` is an [`DiffClass::UnexpectedChange`]; a
/// named slot that did not change is a
/// [`DiffClass::MissingExpectedChange`].
#[must_use]
pub fn diff_storage(
    before: &RawStorageSnapshot,
    after: &RawStorageSnapshot,
    migrated_slots: &[SlotIndex],
) -> DiffReport {
    let mut covered = BTreeSet::new();
    covered.extend(before.slots().map(|(slot, _)| slot.value()));
    covered.extend(after.slots().map(|(slot, _)| slot.value()));

    let mut entries = Vec::new();
    for raw in covered {
        let slot = SlotIndex::new(raw);
        let expected = before
            .word_at(slot)
            .map_or(FieldValue::Absent, FieldValue::Word);
        let actual = after
            .word_at(slot)
            .map_or(FieldValue::Absent, FieldValue::Word);
        let changed = expected != actual;
        let declared = migrated_slots.contains(&slot);

        let classification = match (changed, declared) {
            (true, false) => DiffClass::UnexpectedChange,
            (false, true) => DiffClass::MissingExpectedChange,
            _ => continue,
        };
        entries.push(DiffEntry {
            location: Location::Slot(slot),
            expected,
            actual,
            classification,
        });
    }
    DiffReport::from_entries(entries)
}
