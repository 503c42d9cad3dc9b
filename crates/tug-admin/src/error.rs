//! Governance error taxonomy
//!
//! Every refusal the registry can issue is a distinct variant carrying the
//! identities involved, so callers can branch on the cause rather than
//! parse messages. [`AdminError::TooEarly`] is the only retryable class.

use tug_identity::Address;

use crate::migration::MigrationError;

/// Errors returned by governance operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    /// Caller is not authorized to drive governance transitions
    #[error("caller {caller} is not authorized")]
    Unauthorized {
        /// The rejected caller
        caller: Address,
    },

    /// A request is already pending for this proxy
    #[error("proxy {proxy} already has a pending upgrade request")]
    DuplicatePending {
        /// The proxy with the existing request
        proxy: Address,
    },

    /// No request exists for this proxy
    #[error("proxy {proxy} has no pending upgrade request")]
    NoPendingRequest {
        /// The proxy that was queried
        proxy: Address,
    },

    /// The mandatory delay has not yet elapsed
    #[error("upgrade for proxy {proxy} is not yet acceptable, {remaining_secs}s remaining")]
    TooEarly {
        /// The proxy whose request is still pending
        proxy: Address,
        /// Seconds until the request becomes acceptable
        remaining_secs: u64,
    },

    /// The migration step failed; nothing was mutated
    #[error("migration failed for proxy {proxy}")]
    MigrationFailed {
        /// The proxy whose upgrade was being applied
        proxy: Address,
        /// The executor's failure
        #[source]
        source: MigrationError,
    },

    /// The named target is not bound in the ledger
    #[error("target {target} is not registered")]
    TargetNotFound {
        /// The unknown target
        target: Address,
    },

    /// The proposed implementation is already active behind the proxy
    #[error("implementation {implementation} is already active for proxy {proxy}")]
    NoOpUpgrade {
        /// The proxy being upgraded
        proxy: Address,
        /// The already-active implementation
        implementation: Address,
    },

    /// The zero address was supplied where a real identity is required
    #[error("zero address supplied for {role}")]
    ZeroAddress {
        /// Which parameter was zero
        role: &'static str,
    },
}

impl AdminError {
    /// Whether the same call can succeed later without any state change
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TooEarly { .. })
    }
}
