//! The upgrade registry
//!
//! [`DelayedAdmin`] owns the propose/cancel/accept lifecycle over an
//! injected store, authority policy, clock, and migration executor.
//! Transitions are synchronous and per-proxy serialized by the
//! deployment; every call reads the clock at most once.

use tug_identity::{Address, RequestId};

use crate::authority::AuthorityPolicy;
use crate::binding::ProxyBinding;
use crate::clock::Clock;
use crate::config::GovernanceConfig;
use crate::error::AdminError;
use crate::migration::MigrationExecutor;
use crate::state::{self, RequestPhase};
use crate::store::LedgerStore;
use crate::types::{MigrationData, UpgradeRequest};

/// The timelocked upgrade registry
///
/// Generic over its collaborators so deployments and tests compose their
/// own storage, authorization, time source, and migration execution.
pub struct DelayedAdmin<S, A, C, X> {
    config: GovernanceConfig,
    store: S,
    authority: A,
    clock: C,
    executor: X,
}

impl<S, A, C, X> DelayedAdmin<S, A, C, X>
where
    S: LedgerStore,
    A: AuthorityPolicy,
    C: Clock,
    X: MigrationExecutor,
{
    /// Assemble a registry from its collaborators
    pub fn new(config: GovernanceConfig, store: S, authority: A, clock: C, executor: X) -> Self {
        Self {
            config,
            store,
            authority,
            clock,
            executor,
        }
    }

    /// The active governance configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> GovernanceConfig {
        self.config
    }

    /// Propose upgrading `proxy` to `implementation`
    ///
    /// Stores a request stamped with the current time and returns its
    /// fresh id. The request must then age through the configured delay
    /// before [`accept`](Self::accept) will apply it.
    ///
    /// # Errors
    /// `Unauthorized`, `ZeroAddress`, `TargetNotFound` for an unknown
    /// proxy, `DuplicatePending` if a request is already stored, or
    /// `NoOpUpgrade` if `implementation` is already active.
    pub fn propose(
        &self,
        caller: Address,
        proxy: Address,
        implementation: Address,
        migration: MigrationData,
    ) -> Result<RequestId, AdminError> {
        self.authorize(caller)?;
        if proxy.is_zero() {
            return Err(AdminError::ZeroAddress { role: "proxy" });
        }
        if implementation.is_zero() {
            return Err(AdminError::ZeroAddress {
                role: "implementation",
            });
        }

        let binding = self
            .store
            .binding(proxy)
            .ok_or(AdminError::TargetNotFound { target: proxy })?;

        if self.store.pending_request(proxy).is_some() {
            tracing::warn!(
                "Rejected proposal for proxy {}: a request is already pending",
                proxy.short()
            );
            return Err(AdminError::DuplicatePending { proxy });
        }
        if binding.implementation == implementation {
            tracing::warn!(
                "Rejected proposal for proxy {}: implementation {} already active",
                proxy.short(),
                implementation.short()
            );
            return Err(AdminError::NoOpUpgrade {
                proxy,
                implementation,
            });
        }

        let request = UpgradeRequest::new(proxy, implementation, migration, self.clock.now());
        let id = request.id;
        self.store.insert_request(request);
        tracing::info!(
            "Stored upgrade request {} for proxy {} -> implementation {}",
            id,
            proxy.short(),
            implementation.short()
        );
        Ok(id)
    }

    /// Withdraw the pending request for `proxy`
    ///
    /// Valid in any phase. The binding is untouched; the removed request
    /// is returned for audit logging.
    ///
    /// # Errors
    /// `Unauthorized` or `NoPendingRequest`.
    pub fn cancel(&self, caller: Address, proxy: Address) -> Result<UpgradeRequest, AdminError> {
        self.authorize(caller)?;

        let request = self
            .store
            .remove_request(proxy)
            .ok_or(AdminError::NoPendingRequest { proxy })?;
        tracing::info!(
            "Cancelled upgrade request {} for proxy {}",
            request.id,
            proxy.short()
        );
        Ok(request)
    }

    /// Apply the pending request for `proxy`
    ///
    /// Requires the request to have aged through the delay. Runs the
    /// migration (when the payload is non-empty) strictly before the
    /// pointer swap, then repoints the binding and clears the request as
    /// one unit. Returns the upgraded binding.
    ///
    /// # Errors
    /// `Unauthorized`, `NoPendingRequest`, `TooEarly` with the remaining
    /// wait, `TargetNotFound` if the binding vanished, or
    /// `MigrationFailed`. After `MigrationFailed` the request is still
    /// stored and the binding unchanged, so the accept can be retried.
    pub fn accept(&self, caller: Address, proxy: Address) -> Result<ProxyBinding, AdminError> {
        self.authorize(caller)?;

        let request = self
            .store
            .pending_request(proxy)
            .ok_or(AdminError::NoPendingRequest { proxy })?;

        let now = self.clock.now();
        if !state::ready(&request, now, self.config.upgrade_delay_secs) {
            let remaining_secs =
                state::remaining_delay(&request, now, self.config.upgrade_delay_secs);
            tracing::warn!(
                "Refused early accept for proxy {}: {}s remaining",
                proxy.short(),
                remaining_secs
            );
            return Err(AdminError::TooEarly {
                proxy,
                remaining_secs,
            });
        }

        let binding = self
            .store
            .binding(proxy)
            .ok_or(AdminError::TargetNotFound { target: proxy })?;

        if !request.migration.is_empty() {
            if let Err(source) = self.executor.execute(proxy, &request.migration) {
                tracing::warn!(
                    "Migration failed for proxy {}, request {} stays pending: {}",
                    proxy.short(),
                    request.id,
                    source
                );
                return Err(AdminError::MigrationFailed { proxy, source });
            }
        }

        let upgraded = binding.repointed(request.implementation);
        self.store.put_binding(upgraded);
        self.store.remove_request(proxy);
        tracing::info!(
            "Accepted upgrade request {}: proxy {} now at implementation {} (version {})",
            request.id,
            proxy.short(),
            upgraded.implementation.short(),
            upgraded.version
        );
        Ok(upgraded)
    }

    /// The pending request for `proxy`, if any
    #[must_use]
    pub fn pending_request(&self, proxy: Address) -> Option<UpgradeRequest> {
        self.store.pending_request(proxy)
    }

    /// The binding for `proxy`, if registered
    #[must_use]
    pub fn binding(&self, proxy: Address) -> Option<ProxyBinding> {
        self.store.binding(proxy)
    }

    /// The implementation currently active behind `proxy`
    #[must_use]
    pub fn implementation_of(&self, proxy: Address) -> Option<Address> {
        self.store.binding(proxy).map(|b| b.implementation)
    }

    /// The computed phase of the pending request for `proxy`
    #[must_use]
    pub fn request_phase(&self, proxy: Address) -> Option<RequestPhase> {
        let request = self.store.pending_request(proxy)?;
        let now = self.clock.now();
        let phase = state::phase(&request, now, self.config.upgrade_delay_secs);
        tracing::debug!(
            "Request {} for proxy {} is {:?} at {}",
            request.id,
            proxy.short(),
            phase,
            now
        );
        Some(phase)
    }

    /// Seconds until the pending request for `proxy` becomes acceptable
    #[must_use]
    pub fn remaining_delay(&self, proxy: Address) -> Option<u64> {
        let request = self.store.pending_request(proxy)?;
        Some(state::remaining_delay(
            &request,
            self.clock.now(),
            self.config.upgrade_delay_secs,
        ))
    }

    fn authorize(&self, caller: Address) -> Result<(), AdminError> {
        if self.authority.is_authorized(caller) {
            Ok(())
        } else {
            tracing::warn!("Rejected call from unauthorized caller {}", caller.short());
            Err(AdminError::Unauthorized { caller })
        }
    }
}
