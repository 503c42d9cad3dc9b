//! Governance configuration

use serde::{Deserialize, Serialize};

/// Default mandatory delay between proposal and acceptance: one week
pub const DEFAULT_UPGRADE_DELAY_SECS: u64 = 604_800;

/// Deployment parameters of the upgrade registry
///
/// The delay is configuration, not a constant baked into comparisons:
/// deployments with different risk profiles run different delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Seconds a request must age before it can be accepted
    pub upgrade_delay_secs: u64,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            upgrade_delay_secs: DEFAULT_UPGRADE_DELAY_SECS,
        }
    }
}

impl GovernanceConfig {
    /// Create a config with the default one-week delay
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mandatory upgrade delay
    #[must_use]
    pub fn with_upgrade_delay(mut self, secs: u64) -> Self {
        self.upgrade_delay_secs = secs;
        self
    }
}
