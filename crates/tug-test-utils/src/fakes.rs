//! Deterministic stand-ins for the registry's collaborators

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tug_admin::authority::AuthorityPolicy;
use tug_admin::clock::Clock;
use tug_admin::migration::{MigrationError, MigrationExecutor};
use tug_admin::types::MigrationData;
use tug_identity::{Address, SlotIndex, Timestamp, Word};
use tug_verify::FieldValue;

use crate::sim::TargetSim;

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(secs: u64) -> Self {
        Self(AtomicU64::new(secs))
    }

    pub fn set(&self, secs: u64) {
        self.0.store(secs, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.0.load(Ordering::SeqCst))
    }
}

/// Allow-list authority policy
#[derive(Debug, Clone, Default)]
pub struct StaticAuthority(Vec<Address>);

impl StaticAuthority {
    pub fn new(allowed: impl IntoIterator<Item = Address>) -> Self {
        Self(allowed.into_iter().collect())
    }

    pub fn allowing(address: Address) -> Self {
        Self(vec![address])
    }
}

impl AuthorityPolicy for StaticAuthority {
    fn is_authorized(&self, caller: Address) -> bool {
        self.0.contains(&caller)
    }
}

/// Staged effects a successful migration applies to the simulator
#[derive(Debug, Default)]
struct StagedEffects {
    fields: Vec<(String, FieldValue)>,
    words: Vec<(SlotIndex, Word)>,
}

/// Migration executor with scripted outcomes and staged writes
///
/// By default every migration succeeds and does nothing. Tests can
/// queue failures per proxy and stage field/slot writes that a
/// successful migration applies to the simulator. Failures consume
/// nothing: staged writes stay staged for the retry.
pub struct ScriptedExecutor {
    sim: Arc<TargetSim>,
    failures: Mutex<HashMap<Address, VecDeque<MigrationError>>>,
    staged: Mutex<HashMap<Address, StagedEffects>>,
    executions: Mutex<Vec<(Address, MigrationData)>>,
}

impl ScriptedExecutor {
    pub fn new(sim: Arc<TargetSim>) -> Self {
        Self {
            sim,
            failures: Mutex::new(HashMap::new()),
            staged: Mutex::new(HashMap::new()),
            executions: Mutex::new(Vec::new()),
        }
    }

    /// Queue a failure for the next migration of `proxy`
    pub fn fail_next(&self, proxy: Address, error: MigrationError) {
        self.failures.lock().entry(proxy).or_default().push_back(error);
    }

    /// Stage a config field write applied by the next successful migration
    pub fn stage_field(&self, proxy: Address, field: &str, value: FieldValue) {
        self.staged
            .lock()
            .entry(proxy)
            .or_default()
            .fields
            .push((field.to_owned(), value));
    }

    /// Stage a storage write applied by the next successful migration
    pub fn stage_write(&self, proxy: Address, slot: SlotIndex, word: Word) {
        self.staged
            .lock()
            .entry(proxy)
            .or_default()
            .words
            .push((slot, word));
    }

    /// Every migration attempt seen, in call order
    pub fn executions(&self) -> Vec<(Address, MigrationData)> {
        self.executions.lock().clone()
    }

    pub fn execution_count(&self) -> usize {
        self.executions.lock().len()
    }
}

impl MigrationExecutor for ScriptedExecutor {
    fn execute(&self, proxy: Address, data: &MigrationData) -> Result<(), MigrationError> {
        self.executions.lock().push((proxy, data.clone()));

        if let Some(error) = self
            .failures
            .lock()
            .get_mut(&proxy)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }

        if let Some(effects) = self.staged.lock().remove(&proxy) {
            for (field, value) in effects.fields {
                self.sim.set_field(proxy, &field, value);
            }
            for (slot, word) in effects.words {
                self.sim.write_slot(proxy, slot, word);
            }
        }
        Ok(())
    }
}
