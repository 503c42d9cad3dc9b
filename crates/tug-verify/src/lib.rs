//! Upgrade-safety verification
//!
//! An upgrade is judged by comparing the target's observable state
//! before and after: semantic configuration fields and raw storage
//! words are captured as snapshots at historical points, then diffed
//! against an explicit list of expected changes. Every deviation is
//! reported; the diff never stops at the first finding.
//!
//! Verification runs out of band. Nothing here mutates a target or
//! participates in the upgrade itself.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tug_verify::prelude::*;
//!
//! let verifier = UpgradeVerifier::new(&archive, proxy)
//!     .with_fields(["name", "decimals", "rewardsDistributor"])
//!     .with_slot_range(265, SlotIndex::new(0));
//!
//! let baseline = verifier.baseline(before_point)?;
//! let expected = ExpectedChanges::none().with_field("rewardsDistributor");
//! let report = verifier.audit(&baseline, after_point, &expected)?;
//! assert!(report.is_clean(), "{report}");
//! ```

// Core modules
pub mod archive;
pub mod diff;
pub mod harness;
pub mod snapshot;

// Re-exports
pub use archive::{FieldValue, SnapshotError, StateArchive};
pub use diff::{diff_config, diff_storage, DiffClass, DiffEntry, DiffReport, Location};
pub use harness::{ExpectedChanges, UpgradeBaseline, UpgradeVerifier};
pub use snapshot::{ConfigSnapshot, RawStorageSnapshot};

/// Common imports for downstream crates and tests
pub mod prelude {
    pub use crate::archive::{FieldValue, SnapshotError, StateArchive};
    pub use crate::diff::{diff_config, diff_storage, DiffClass, DiffEntry, DiffReport, Location};
    pub use crate::harness::{ExpectedChanges, UpgradeBaseline, UpgradeVerifier};
    pub use crate::snapshot::{ConfigSnapshot, RawStorageSnapshot};
    pub use tug_identity::{Address, BlockPoint, SlotIndex, Word};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
