//! TUG identity and value primitives
//!
//! Strongly-typed building blocks shared by the governance core and the
//! verification harness.
//!
//! # Core Concepts
//!
//! - [`Address`]: 20-byte stable identity of proxies, implementations, and callers
//! - [`Word`]: 32-byte raw storage word read from a target's persistent state
//! - [`SlotIndex`]: positional index of a storage slot
//! - [`Timestamp`] / [`BlockPoint`]: ledger time and finalized history points
//! - [`RequestId`]: unique, sortable identifier minted per upgrade request
//!
//! # Example
//!
//! ```rust,ignore
//! use tug_identity::{Address, SlotIndex, Word};
//!
//! let proxy: Address = "0x4fb30c5a3ac8e85bc32785518633303c4590752d".parse()?;
//! let slot = SlotIndex::new(51);
//! let value = Word::from_u64(604_800);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod address;
mod id;
mod time;
mod word;

// Re-exports
pub use address::{Address, AddressError};
pub use id::RequestId;
pub use time::{BlockPoint, Timestamp};
pub use word::{SlotIndex, Word, WordError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
