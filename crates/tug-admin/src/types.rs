//! Request and migration payload types

use serde::{Deserialize, Serialize};
use tug_identity::{Address, RequestId, Timestamp};

/// Opaque migration payload attached to an upgrade request
///
/// The registry never inspects the bytes; they are handed verbatim to the
/// [`MigrationExecutor`](crate::migration::MigrationExecutor) at accept
/// time. An empty payload means no migration step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MigrationData(Vec<u8>);

impl MigrationData {
    /// Wrap a migration payload
    #[inline]
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The empty payload: accept performs no migration step
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Whether there is no migration step
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw payload bytes
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<u8>> for MigrationData {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for MigrationData {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// A stored upgrade proposal
///
/// Immutable once stored. Changing any parameter of a pending upgrade
/// means cancelling and re-proposing, which restarts the delay and mints
/// a fresh [`RequestId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRequest {
    /// Unique identity of this proposal
    pub id: RequestId,
    /// The proxy whose implementation is to change
    pub proxy: Address,
    /// The implementation the proxy will point at after acceptance
    pub implementation: Address,
    /// Opaque migration payload run before the pointer swap
    pub migration: MigrationData,
    /// When the proposal was stored; the delay is measured from here
    pub proposed_at: Timestamp,
}

impl UpgradeRequest {
    /// Create a request with a freshly minted id
    #[must_use]
    pub fn new(
        proxy: Address,
        implementation: Address,
        migration: MigrationData,
        proposed_at: Timestamp,
    ) -> Self {
        Self {
            id: RequestId::new(),
            proxy,
            implementation,
            migration,
            proposed_at,
        }
    }
}
