//! Proxy-to-implementation bindings

use serde::{Deserialize, Serialize};
use tug_identity::Address;

/// The live binding between a proxy and the code it executes
///
/// The only mutation path for `implementation` and `version` is a
/// successful accept in the registry. Everything else reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyBinding {
    /// The stable identity callers interact with
    pub proxy: Address,
    /// The implementation currently executing behind the proxy
    pub implementation: Address,
    /// The authority that governs upgrades of this proxy
    pub admin: Address,
    /// Monotonic upgrade counter, bumped by each successful accept
    pub version: u64,
}

impl ProxyBinding {
    /// Create a fresh binding at version zero
    #[must_use]
    pub const fn new(proxy: Address, implementation: Address, admin: Address) -> Self {
        Self {
            proxy,
            implementation,
            admin,
            version: 0,
        }
    }

    /// The binding after a successful pointer swap
    #[must_use]
    pub const fn repointed(&self, implementation: Address) -> Self {
        Self {
            proxy: self.proxy,
            implementation,
            admin: self.admin,
            version: self.version.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repointed_swaps_pointer_and_bumps_version() {
        let proxy = Address::derive("proxy");
        let v1 = Address::derive("impl-v1");
        let v2 = Address::derive("impl-v2");
        let admin = Address::derive("admin");

        let binding = ProxyBinding::new(proxy, v1, admin);
        assert_eq!(binding.version, 0);

        let upgraded = binding.repointed(v2);
        assert_eq!(upgraded.implementation, v2);
        assert_eq!(upgraded.version, 1);
        assert_eq!(upgraded.proxy, proxy);
        assert_eq!(upgraded.admin, admin);

        // original untouched
        assert_eq!(binding.implementation, v1);
        assert_eq!(binding.version, 0);
    }

    #[test]
    fn binding_serde_round_trip() {
        let binding = ProxyBinding::new(
            Address::derive("proxy"),
            Address::derive("impl"),
            Address::derive("admin"),
        );
        let json = serde_json::to_string(&binding).unwrap();
        let decoded: ProxyBinding = serde_json::from_str(&json).unwrap();
        assert_eq!(binding, decoded);
    }
}
