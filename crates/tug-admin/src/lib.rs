//! Timelocked upgrade governance for mutable-implementation proxies
//!
//! Every upgrade runs through a two-phase lifecycle: a governor proposes a
//! new implementation for a proxy, the proposal sits through a mandatory
//! delay, and only then can it be accepted. Acceptance runs the optional
//! migration, swaps the proxy's implementation pointer, and clears the
//! request as one atomic unit. Cancellation withdraws a proposal at any
//! phase without touching the binding.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tug_admin::prelude::*;
//!
//! let admin = DelayedAdmin::new(
//!     GovernanceConfig::default(),
//!     MemoryLedger::new(),
//!     Governor::new(governor_addr),
//!     SystemClock,
//!     NoopExecutor,
//! );
//!
//! let id = admin.propose(governor_addr, proxy, new_impl, MigrationData::empty())?;
//! // ... one week later ...
//! let binding = admin.accept(governor_addr, proxy)?;
//! ```

// Core modules
pub mod admin;
pub mod authority;
pub mod binding;
pub mod clock;
pub mod config;
pub mod error;
pub mod migration;
pub mod state;
pub mod store;
pub mod types;

// Re-exports
pub use admin::DelayedAdmin;
pub use binding::ProxyBinding;
pub use config::{GovernanceConfig, DEFAULT_UPGRADE_DELAY_SECS};
pub use error::AdminError;
pub use migration::MigrationError;
pub use state::RequestPhase;
pub use types::{MigrationData, UpgradeRequest};

/// Common imports for downstream crates and tests
pub mod prelude {
    pub use crate::admin::DelayedAdmin;
    pub use crate::authority::{AuthorityPolicy, Governor};
    pub use crate::binding::ProxyBinding;
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::config::GovernanceConfig;
    pub use crate::error::AdminError;
    pub use crate::migration::{MigrationError, MigrationExecutor, NoopExecutor};
    pub use crate::state::RequestPhase;
    pub use crate::store::{LedgerStore, MemoryLedger};
    pub use crate::types::{MigrationData, UpgradeRequest};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
