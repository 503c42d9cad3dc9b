//! Caller authorization
//!
//! One injected policy decides who may drive governance transitions.
//! The registry consults it identically for propose, cancel, and accept;
//! there are no per-operation authorization variants.

use std::sync::Arc;

use tug_identity::Address;

/// Decides whether a caller may drive governance transitions
pub trait AuthorityPolicy: Send + Sync {
    /// Whether `caller` is authorized
    fn is_authorized(&self, caller: Address) -> bool;
}

impl<T: AuthorityPolicy + ?Sized> AuthorityPolicy for &T {
    fn is_authorized(&self, caller: Address) -> bool {
        (**self).is_authorized(caller)
    }
}

impl<T: AuthorityPolicy + ?Sized> AuthorityPolicy for Arc<T> {
    fn is_authorized(&self, caller: Address) -> bool {
        (**self).is_authorized(caller)
    }
}

/// The single-governor policy: exactly one address is authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Governor(Address);

impl Governor {
    /// Create a policy that authorizes only `governor`
    #[must_use]
    pub const fn new(governor: Address) -> Self {
        Self(governor)
    }

    /// The governing address
    #[inline]
    #[must_use]
    pub const fn address(&self) -> Address {
        self.0
    }
}

impl AuthorityPolicy for Governor {
    fn is_authorized(&self, caller: Address) -> bool {
        caller == self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn governor_authorizes_only_itself() {
        let governor = Address::derive("governor");
        let stranger = Address::derive("stranger");
        let policy = Governor::new(governor);

        assert!(policy.is_authorized(governor));
        assert!(!policy.is_authorized(stranger));
        assert_eq!(policy.address(), governor);
    }

    #[test]
    fn references_and_arcs_delegate() {
        let governor = Address::derive("governor");
        let policy = Governor::new(governor);

        assert!((&policy).is_authorized(governor));
        assert!(Arc::new(policy).is_authorized(governor));
    }
}
