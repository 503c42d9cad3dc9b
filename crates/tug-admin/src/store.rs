//! Request and binding persistence
//!
//! The registry sees storage through [`LedgerStore`]: keyed access to
//! pending requests and proxy bindings with read-after-write consistency.
//! The single-pending invariant is enforced by the registry's
//! check-then-insert sequence; transitions for one proxy are serialized
//! by the deployment, so the store only has to be keyed and consistent.

use std::sync::Arc;

use dashmap::DashMap;
use tug_identity::Address;

use crate::binding::ProxyBinding;
use crate::types::UpgradeRequest;

/// Keyed persistence for requests and bindings
pub trait LedgerStore: Send + Sync {
    /// The pending request for `proxy`, if any
    fn pending_request(&self, proxy: Address) -> Option<UpgradeRequest>;

    /// Store `request` under its proxy, replacing any previous entry
    fn insert_request(&self, request: UpgradeRequest);

    /// Remove and return the pending request for `proxy`
    fn remove_request(&self, proxy: Address) -> Option<UpgradeRequest>;

    /// The binding for `proxy`, if the proxy is registered
    fn binding(&self, proxy: Address) -> Option<ProxyBinding>;

    /// Store `binding` under its proxy, replacing any previous entry
    fn put_binding(&self, binding: ProxyBinding);
}

impl<T: LedgerStore + ?Sized> LedgerStore for &T {
    fn pending_request(&self, proxy: Address) -> Option<UpgradeRequest> {
        (**self).pending_request(proxy)
    }

    fn insert_request(&self, request: UpgradeRequest) {
        (**self).insert_request(request);
    }

    fn remove_request(&self, proxy: Address) -> Option<UpgradeRequest> {
        (**self).remove_request(proxy)
    }

    fn binding(&self, proxy: Address) -> Option<ProxyBinding> {
        (**self).binding(proxy)
    }

    fn put_binding(&self, binding: ProxyBinding) {
        (**self).put_binding(binding);
    }
}

impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn pending_request(&self, proxy: Address) -> Option<UpgradeRequest> {
        (**self).pending_request(proxy)
    }

    fn insert_request(&self, request: UpgradeRequest) {
        (**self).insert_request(request);
    }

    fn remove_request(&self, proxy: Address) -> Option<UpgradeRequest> {
        (**self).remove_request(proxy)
    }

    fn binding(&self, proxy: Address) -> Option<ProxyBinding> {
        (**self).binding(proxy)
    }

    fn put_binding(&self, binding: ProxyBinding) {
        (**self).put_binding(binding);
    }
}

/// In-memory ledger over per-key concurrent maps
#[derive(Debug, Default)]
pub struct MemoryLedger {
    requests: DashMap<Address, UpgradeRequest>,
    bindings: DashMap<Address, ProxyBinding>,
}

impl MemoryLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending requests across all proxies
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.requests.len()
    }

    /// Number of registered bindings
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}

impl LedgerStore for MemoryLedger {
    fn pending_request(&self, proxy: Address) -> Option<UpgradeRequest> {
        self.requests.get(&proxy).map(|r| r.value().clone())
    }

    fn insert_request(&self, request: UpgradeRequest) {
        self.requests.insert(request.proxy, request);
    }

    fn remove_request(&self, proxy: Address) -> Option<UpgradeRequest> {
        self.requests.remove(&proxy).map(|(_, request)| request)
    }

    fn binding(&self, proxy: Address) -> Option<ProxyBinding> {
        self.bindings.get(&proxy).map(|b| *b.value())
    }

    fn put_binding(&self, binding: ProxyBinding) {
        self.bindings.insert(binding.proxy, binding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MigrationData;
    use tug_identity::Timestamp;

    fn request_for(proxy: Address) -> UpgradeRequest {
        UpgradeRequest::new(
            proxy,
            Address::derive("impl"),
            MigrationData::empty(),
            Timestamp::from_secs(1),
        )
    }

    #[test]
    fn read_after_write() {
        let ledger = MemoryLedger::new();
        let proxy = Address::derive("proxy");

        assert!(ledger.pending_request(proxy).is_none());
        let request = request_for(proxy);
        ledger.insert_request(request.clone());
        assert_eq!(ledger.pending_request(proxy), Some(request));
        assert_eq!(ledger.pending_count(), 1);
    }

    #[test]
    fn remove_returns_the_request() {
        let ledger = MemoryLedger::new();
        let proxy = Address::derive("proxy");
        let request = request_for(proxy);

        ledger.insert_request(request.clone());
        assert_eq!(ledger.remove_request(proxy), Some(request));
        assert!(ledger.pending_request(proxy).is_none());
        assert!(ledger.remove_request(proxy).is_none());
    }

    #[test]
    fn bindings_are_keyed_by_proxy() {
        let ledger = MemoryLedger::new();
        let a = Address::derive("proxy-a");
        let b = Address::derive("proxy-b");

        ledger.put_binding(ProxyBinding::new(
            a,
            Address::derive("impl-a"),
            Address::derive("admin"),
        ));
        ledger.put_binding(ProxyBinding::new(
            b,
            Address::derive("impl-b"),
            Address::derive("admin"),
        ));

        assert_eq!(ledger.binding_count(), 2);
        assert_eq!(
            ledger.binding(a).map(|x| x.implementation),
            Some(Address::derive("impl-a"))
        );
        assert_eq!(
            ledger.binding(b).map(|x| x.implementation),
            Some(Address::derive("impl-b"))
        );
    }

    #[test]
    fn requests_for_different_proxies_are_independent() {
        let ledger = MemoryLedger::new();
        let a = Address::derive("proxy-a");
        let b = Address::derive("proxy-b");

        ledger.insert_request(request_for(a));
        ledger.insert_request(request_for(b));

        assert_eq!(ledger.pending_count(), 2);
        ledger.remove_request(a);
        assert!(ledger.pending_request(a).is_none());
        assert!(ledger.pending_request(b).is_some());
    }
}
