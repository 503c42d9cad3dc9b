//! Testing utilities for the TUG workspace
//!
//! Shared fakes (manual clock, allow-list authority, scripted migration
//! executor), a ledger simulator with point archival, and fixtures.

#![allow(missing_docs)]

mod fakes;
mod sim;

pub use fakes::{ManualClock, ScriptedExecutor, StaticAuthority};
pub use sim::TargetSim;

use std::sync::Arc;

use tug_admin::{DelayedAdmin, GovernanceConfig, ProxyBinding};
use tug_identity::Address;

/// The registry wiring used by workspace integration tests
pub type SimAdmin =
    DelayedAdmin<Arc<TargetSim>, StaticAuthority, Arc<ManualClock>, Arc<ScriptedExecutor>>;

/// A fully wired registry over a simulated ledger
pub struct UpgradeRig {
    pub sim: Arc<TargetSim>,
    pub clock: Arc<ManualClock>,
    pub executor: Arc<ScriptedExecutor>,
    pub admin: SimAdmin,
    pub governor: Address,
    pub proxy: Address,
    pub current_impl: Address,
}

pub fn test_governor() -> Address {
    Address::derive("test:governor")
}

pub fn test_proxy() -> Address {
    Address::derive("test:proxy")
}

pub fn test_implementation(tag: &str) -> Address {
    Address::derive(&format!("test:impl:{tag}"))
}

/// Wire a simulator, manual clock, scripted executor, and registry
/// around one pre-registered proxy
pub fn setup_upgrade_rig(delay_secs: u64) -> UpgradeRig {
    let governor = test_governor();
    let proxy = test_proxy();
    let current_impl = test_implementation("v1");

    let sim = Arc::new(TargetSim::new());
    sim.register_binding(ProxyBinding::new(proxy, current_impl, governor));

    let clock = Arc::new(ManualClock::at(1_700_000_000));
    let executor = Arc::new(ScriptedExecutor::new(Arc::clone(&sim)));

    let admin = DelayedAdmin::new(
        GovernanceConfig::new().with_upgrade_delay(delay_secs),
        Arc::clone(&sim),
        StaticAuthority::allowing(governor),
        Arc::clone(&clock),
        Arc::clone(&executor),
    );

    UpgradeRig {
        sim,
        clock,
        executor,
        admin,
        governor,
        proxy,
        current_impl,
    }
}

/// Install a tracing subscriber honoring `RUST_LOG`, once per process
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
