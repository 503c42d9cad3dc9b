//! In-memory ledger simulation with point archival

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use parking_lot::Mutex;
use tug_admin::binding::ProxyBinding;
use tug_admin::store::LedgerStore;
use tug_admin::types::UpgradeRequest;
use tug_identity::{Address, BlockPoint, SlotIndex, Word};
use tug_verify::{FieldValue, SnapshotError, StateArchive};

/// Everything observable about one simulated target
#[derive(Debug, Clone, Default)]
struct TargetState {
    binding: Option<ProxyBinding>,
    fields: IndexMap<String, FieldValue>,
    storage: BTreeMap<u64, Word>,
}

impl TargetState {
    fn config_value(&self, field: &str) -> FieldValue {
        match field {
            // reserved fields derived from the binding
            "implementation" => self
                .binding
                .map_or(FieldValue::Absent, |b| FieldValue::Address(b.implementation)),
            "version" => self
                .binding
                .map_or(FieldValue::Absent, |b| FieldValue::Uint(u128::from(b.version))),
            _ => self.fields.get(field).cloned().unwrap_or(FieldValue::Absent),
        }
    }

    fn storage_word(&self, slot: SlotIndex) -> Word {
        self.storage
            .get(&slot.value())
            .copied()
            .unwrap_or_else(Word::zero)
    }
}

/// Simulated ledger: live mutable targets plus immutable point archives
///
/// Acts as both the registry's store ([`LedgerStore`]) and the
/// verifier's history ([`StateArchive`]). [`record_point`] freezes a
/// copy of every live target under the next [`BlockPoint`]; later
/// mutations never disturb recorded points. The config fields
/// `implementation` and `version` are reserved and always reflect the
/// target's binding, so pointer swaps show up in config snapshots.
///
/// [`record_point`]: TargetSim::record_point
#[derive(Debug, Default)]
pub struct TargetSim {
    live: Mutex<HashMap<Address, TargetState>>,
    requests: Mutex<HashMap<Address, UpgradeRequest>>,
    archive: Mutex<BTreeMap<BlockPoint, HashMap<Address, TargetState>>>,
}

impl TargetSim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `target` exists, with empty state if new
    pub fn create_target(&self, target: Address) {
        self.live.lock().entry(target).or_default();
    }

    /// Install a binding, creating the target if needed
    pub fn register_binding(&self, binding: ProxyBinding) {
        self.live.lock().entry(binding.proxy).or_default().binding = Some(binding);
    }

    /// Write a live config field, creating the target if needed
    pub fn set_field(&self, target: Address, field: &str, value: FieldValue) {
        self.live
            .lock()
            .entry(target)
            .or_default()
            .fields
            .insert(field.to_owned(), value);
    }

    /// Write a live storage slot, creating the target if needed
    pub fn write_slot(&self, target: Address, slot: SlotIndex, word: Word) {
        self.live
            .lock()
            .entry(target)
            .or_default()
            .storage
            .insert(slot.value(), word);
    }

    /// Freeze the live state of every target under the next point
    pub fn record_point(&self) -> BlockPoint {
        let frozen = self.live.lock().clone();
        let mut archive = self.archive.lock();
        let point = archive
            .last_key_value()
            .map_or(BlockPoint::new(1), |(last, _)| last.next());
        archive.insert(point, frozen);
        point
    }

    /// Live value of a config field (reserved fields included)
    pub fn current_field(&self, target: Address, field: &str) -> FieldValue {
        self.live
            .lock()
            .get(&target)
            .map_or(FieldValue::Absent, |state| state.config_value(field))
    }

    /// Live value of a storage slot
    pub fn current_word(&self, target: Address, slot: SlotIndex) -> Word {
        self.live
            .lock()
            .get(&target)
            .map_or_else(Word::zero, |state| state.storage_word(slot))
    }
}

impl LedgerStore for TargetSim {
    fn pending_request(&self, proxy: Address) -> Option<UpgradeRequest> {
        self.requests.lock().get(&proxy).cloned()
    }

    fn insert_request(&self, request: UpgradeRequest) {
        self.requests.lock().insert(request.proxy, request);
    }

    fn remove_request(&self, proxy: Address) -> Option<UpgradeRequest> {
        self.requests.lock().remove(&proxy)
    }

    fn binding(&self, proxy: Address) -> Option<ProxyBinding> {
        self.live.lock().get(&proxy).and_then(|state| state.binding)
    }

    fn put_binding(&self, binding: ProxyBinding) {
        self.register_binding(binding);
    }
}

impl StateArchive for TargetSim {
    fn config_value(
        &self,
        target: Address,
        field: &str,
        point: BlockPoint,
    ) -> Result<FieldValue, SnapshotError> {
        let archive = self.archive.lock();
        let state = archive
            .get(&point)
            .and_then(|targets| targets.get(&target))
            .ok_or(SnapshotError::TargetNotFound { target, point })?;
        Ok(state.config_value(field))
    }

    fn storage_word(
        &self,
        target: Address,
        slot: SlotIndex,
        point: BlockPoint,
    ) -> Result<Word, SnapshotError> {
        let archive = self.archive.lock();
        let state = archive
            .get(&point)
            .and_then(|targets| targets.get(&target))
            .ok_or(SnapshotError::TargetNotFound { target, point })?;
        Ok(state.storage_word(slot))
    }
}
