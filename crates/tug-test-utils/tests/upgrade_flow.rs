//! End-to-end flow: govern an upgrade through the registry, then audit
//! it with the verification harness, the way a release is checked
//! against a fork of the real ledger.

use tug_admin::{AdminError, MigrationData, DEFAULT_UPGRADE_DELAY_SECS};
use tug_identity::{Address, SlotIndex, Word};
use tug_test_utils::{init_tracing, setup_upgrade_rig, test_implementation};
use tug_verify::{DiffClass, ExpectedChanges, FieldValue, Location, UpgradeVerifier};

const WEEK: u64 = DEFAULT_UPGRADE_DELAY_SECS;
const SWEEP_SLOTS: u64 = 265;

/// The config surface watched across every upgrade of the staked token
const WATCHED_FIELDS: [&str; 6] = [
    "name",
    "symbol",
    "decimals",
    "rewardsDistributor",
    "implementation",
    "version",
];

fn seed_token_state(rig: &tug_test_utils::UpgradeRig) {
    rig.sim
        .set_field(rig.proxy, "name", FieldValue::Text("Staked Token BPT".into()));
    rig.sim
        .set_field(rig.proxy, "symbol", FieldValue::Text("stkBPT".into()));
    rig.sim.set_field(rig.proxy, "decimals", FieldValue::Uint(18));
    rig.sim.set_field(
        rig.proxy,
        "rewardsDistributor",
        FieldValue::Address(Address::derive("flow:distributor:old")),
    );
    for slot in [0u64, 3, 42, 107, 264] {
        rig.sim
            .write_slot(rig.proxy, SlotIndex::new(slot), Word::from_u64(slot * 10 + 1));
    }
}

#[test]
fn test_full_upgrade_with_migration_audits_clean() {
    init_tracing();
    let rig = setup_upgrade_rig(WEEK);
    seed_token_state(&rig);

    // the migration rotates the distributor and rewrites one slot
    let new_distributor = Address::derive("flow:distributor:new");
    rig.executor.stage_field(
        rig.proxy,
        "rewardsDistributor",
        FieldValue::Address(new_distributor),
    );
    rig.executor
        .stage_write(rig.proxy, SlotIndex::new(42), Word::from_u64(0));

    let before = rig.sim.record_point();

    rig.admin
        .propose(
            rig.governor,
            rig.proxy,
            test_implementation("v2"),
            MigrationData::new(vec![0x01]),
        )
        .unwrap();
    rig.clock.advance_secs(WEEK);
    rig.admin.accept(rig.governor, rig.proxy).unwrap();

    let after = rig.sim.record_point();

    let verifier = UpgradeVerifier::new(rig.sim.as_ref(), rig.proxy)
        .with_fields(WATCHED_FIELDS)
        .with_slot_range(SWEEP_SLOTS, SlotIndex::new(0));
    let baseline = verifier.baseline(before).unwrap();

    let declared = ExpectedChanges::none()
        .with_field("rewardsDistributor")
        .with_field("implementation")
        .with_field("version")
        .with_slot(SlotIndex::new(42));
    let report = verifier.audit(&baseline, after, &declared).unwrap();
    assert!(report.is_clean(), "{report}");
}

#[test]
fn test_undeclared_audit_catches_exactly_the_upgrade_effects() {
    let rig = setup_upgrade_rig(WEEK);
    seed_token_state(&rig);

    let before = rig.sim.record_point();

    rig.admin
        .propose(
            rig.governor,
            rig.proxy,
            test_implementation("v2"),
            MigrationData::empty(),
        )
        .unwrap();
    rig.clock.advance_secs(WEEK);
    rig.admin.accept(rig.governor, rig.proxy).unwrap();

    let after = rig.sim.record_point();

    let verifier = UpgradeVerifier::new(rig.sim.as_ref(), rig.proxy)
        .with_fields(WATCHED_FIELDS)
        .with_slot_range(SWEEP_SLOTS, SlotIndex::new(0));
    let baseline = verifier.baseline(before).unwrap();
    let report = verifier
        .audit(&baseline, after, &ExpectedChanges::none())
        .unwrap();

    // only the pointer swap is visible: implementation and version
    let locations: Vec<Location> = report
        .entries()
        .iter()
        .map(|e| e.location.clone())
        .collect();
    assert_eq!(
        locations,
        [
            Location::Field("implementation".into()),
            Location::Field("version".into()),
        ]
    );
    assert!(report
        .entries()
        .iter()
        .all(|e| e.classification == DiffClass::UnexpectedChange));

    let version_entry = &report.entries()[1];
    assert_eq!(version_entry.expected, FieldValue::Uint(0));
    assert_eq!(version_entry.actual, FieldValue::Uint(1));
}

#[test]
fn test_pointer_only_upgrade_leaves_storage_sweep_clean() {
    let rig = setup_upgrade_rig(WEEK);
    seed_token_state(&rig);

    let before = rig.sim.record_point();

    rig.admin
        .propose(
            rig.governor,
            rig.proxy,
            test_implementation("v2"),
            MigrationData::empty(),
        )
        .unwrap();
    rig.clock.advance_secs(WEEK);
    rig.admin.accept(rig.governor, rig.proxy).unwrap();

    let after = rig.sim.record_point();

    // the raw 265-slot sweep alone, nothing declared
    let verifier = UpgradeVerifier::new(rig.sim.as_ref(), rig.proxy)
        .with_slot_range(SWEEP_SLOTS, SlotIndex::new(0));
    let baseline = verifier.baseline(before).unwrap();
    let report = verifier
        .audit(&baseline, after, &ExpectedChanges::none())
        .unwrap();
    assert!(report.is_clean(), "{report}");
}

#[test]
fn test_refused_transitions_leave_no_observable_trace() {
    let rig = setup_upgrade_rig(WEEK);
    seed_token_state(&rig);

    let before = rig.sim.record_point();

    rig.admin
        .propose(
            rig.governor,
            rig.proxy,
            test_implementation("v2"),
            MigrationData::empty(),
        )
        .unwrap();

    // early accept, stranger calls, duplicate proposal: all refused
    assert!(matches!(
        rig.admin.accept(rig.governor, rig.proxy),
        Err(AdminError::TooEarly { .. })
    ));
    let stranger = Address::derive("flow:stranger");
    assert!(rig.admin.cancel(stranger, rig.proxy).is_err());
    assert!(rig
        .admin
        .propose(
            rig.governor,
            rig.proxy,
            test_implementation("v3"),
            MigrationData::empty()
        )
        .is_err());

    let after = rig.sim.record_point();

    let verifier = UpgradeVerifier::new(rig.sim.as_ref(), rig.proxy)
        .with_fields(WATCHED_FIELDS)
        .with_slot_range(SWEEP_SLOTS, SlotIndex::new(0));
    let baseline = verifier.baseline(before).unwrap();
    let report = verifier
        .audit(&baseline, after, &ExpectedChanges::none())
        .unwrap();
    assert!(report.is_clean(), "{report}");
}
