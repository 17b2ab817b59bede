//! Integration test: batch submission through the reward controller.
//!
//! Exercises the update path end to end:
//! 1. Sign records with two enrolled keys (operator and third-party feed)
//! 2. Frame them into a delimited batch and submit it
//! 3. Verify duplicate submissions are no-ops (no reward, no event)
//! 4. Verify monotonic `(height, timestamp)` acceptance
//! 5. Verify a corrupted record only drops itself from a mixed batch
//! 6. Verify delimiter bytes inside record values never split a record
//! 7. Verify length-prefixed framing selected from config
//!
//! Uses gauge-codec (record, batch), gauge-crypto (ed25519) and
//! gauge-core (controller) without any I/O.

use gauge_codec::batch::{join_delimited, Framing, DELIMITER};
use gauge_core::{ControllerConfig, ControllerError, ReceiptOutcome, RewardController};
use gauge_integration_tests::{
    controller, feed_key, init_tracing, operator_key, owner, signed_record, updater, PAIR, PAIR_SCALE, T0,
};
use gauge_ledger::values::{ValueLedger, ValueStore};
use gauge_types::{PairKey, U256, BASE_FEE_TYPE, DEFAULT_TIP_TYPE};

const E15: u128 = 1_000_000_000_000_000;

#[test]
fn test_duplicate_submission_is_idempotent() {
    init_tracing();
    let mut controller = controller(true).expect("controller");
    let record = signed_record(&feed_key(), PAIR, 100, T0, 2 * E15, E15).expect("sign");

    let first = controller.update_oracle(&record, updater(1)).expect("first");
    assert!(first.receipts[0].is_applied());
    assert_eq!(first.events.len(), 1);
    assert!(first.credited > U256::ZERO);
    let balance = controller.rewards(&updater(1));
    let stored = controller.get(PAIR, BASE_FEE_TYPE).expect("stored");

    let second = controller.update_oracle(&record, updater(1)).expect("second");
    assert_eq!(second.receipts[0].outcome, ReceiptOutcome::Unchanged);
    assert_eq!(second.receipts[0].rewards(), (U256::ZERO, U256::ZERO));
    assert!(second.events.is_empty());
    assert_eq!(second.credited, U256::ZERO);
    assert_eq!(controller.rewards(&updater(1)), balance);
    assert_eq!(controller.get(PAIR, BASE_FEE_TYPE).expect("stored"), stored);

    // The same record twice inside one batch behaves the same way.
    let next = signed_record(&feed_key(), PAIR, 101, T0 + 1000, 2 * E15, E15).expect("sign");
    let report = controller
        .update_many(&join_delimited(&[&next, &next]), updater(1))
        .expect("batch");
    assert!(report.receipts[0].is_applied());
    assert_eq!(report.receipts[1].outcome, ReceiptOutcome::Unchanged);
    assert_eq!(report.events.len(), 1);
}

#[test]
fn test_monotonic_acceptance_in_ledger() {
    let mut ledger = ValueLedger::new();
    let v = |n: u128| U256::new(n);

    assert!(ledger.apply(PAIR, BASE_FEE_TYPE, v(1), 10, 1000).is_applied());
    // Same (height, timestamp), older timestamp, lower height: all stale.
    for (height, ts) in [(10, 1000), (10, 999), (9, 5000)] {
        assert!(!ledger.apply(PAIR, BASE_FEE_TYPE, v(2), height, ts).is_applied());
        assert_eq!(ledger.get(PAIR, BASE_FEE_TYPE).expect("stored").value, v(1));
    }
    // Same height with a later timestamp, then a higher height with an older one.
    assert!(ledger.apply(PAIR, BASE_FEE_TYPE, v(3), 10, 1001).is_applied());
    assert!(ledger.apply(PAIR, BASE_FEE_TYPE, v(4), 11, 0).is_applied());
    let stored = ledger.get(PAIR, BASE_FEE_TYPE).expect("stored");
    assert_eq!((stored.value, stored.height, stored.timestamp), (v(4), 11, 0));
}

#[test]
fn test_older_record_leaves_value_unchanged() {
    init_tracing();
    let mut controller = controller(true).expect("controller");
    let newer = signed_record(&operator_key(), PAIR, 200, T0, 5 * E15, E15).expect("sign");
    let older = signed_record(&feed_key(), PAIR, 199, T0 + 60_000, 9 * E15, E15).expect("sign");

    controller.update_oracle(&newer, updater(1)).expect("newer");
    let report = controller.update_oracle(&older, updater(2)).expect("older");
    assert_eq!(report.receipts[0].outcome, ReceiptOutcome::Unchanged);
    assert_eq!(report.receipts[0].signer, Some(feed_key().address()));
    assert_eq!(
        controller.get(PAIR, BASE_FEE_TYPE).expect("stored").value,
        U256::new(5 * E15)
    );
    assert_eq!(controller.rewards(&updater(2)), U256::ZERO);
    assert_eq!(controller.n_updaters(), 1);
}

#[test]
fn test_mixed_batch_partial_failure() {
    init_tracing();
    let mut controller = controller(true).expect("controller");
    let other_pair = PairKey::new(2, 10);
    controller
        .set_scale(&owner(), other_pair.system_id, other_pair.chain_id, U256::new(20_000))
        .expect("scale");

    let good = signed_record(&feed_key(), PAIR, 100, T0, 2 * E15, E15).expect("sign");
    let mut corrupted = signed_record(&feed_key(), other_pair, 100, T0, 2 * E15, E15).expect("sign");
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0x01;

    let report = controller
        .update_many(&join_delimited(&[&corrupted, &good]), updater(3))
        .expect("batch");

    assert_eq!(report.receipts.len(), 2);
    assert!(matches!(
        &report.receipts[0].outcome,
        ReceiptOutcome::Rejected { reason } if reason.contains("signature")
    ));
    assert_eq!(report.receipts[0].pair, Some(other_pair));
    assert!(report.receipts[1].is_applied());
    assert_eq!(report.events.len(), 1);
    assert_eq!(report.events[0].pair(), PAIR);

    let (time, deviation) = report.receipts[1].rewards();
    assert_eq!(controller.rewards(&updater(3)), time + deviation);
    assert!(controller.get(other_pair, BASE_FEE_TYPE).is_err());
    assert_eq!(
        controller.get(PAIR, DEFAULT_TIP_TYPE).expect("tip").value,
        U256::new(E15)
    );
}

#[test]
fn test_delimiter_bytes_inside_record() {
    init_tracing();
    let mut controller = controller(true).expect("controller");
    // Every value byte is ASCII '0', so each record carries delimiter-like runs.
    let zeros = u128::from_be_bytes([b'0'; 16]);
    let a = signed_record(&feed_key(), PAIR, 1, T0, zeros, zeros).expect("sign");
    let b = signed_record(&feed_key(), PAIR, 2, T0 + 1, zeros, zeros).expect("sign");
    assert!(a.windows(16).any(|w| w == &DELIMITER[..16]));

    let report = controller
        .update_many(&join_delimited(&[&a, &b]), updater(4))
        .expect("batch");
    assert!(report.receipts.iter().all(|r| r.is_applied()));
    let stored = controller.get(PAIR, BASE_FEE_TYPE).expect("stored");
    assert_eq!(stored.height, 2);
    assert_eq!(stored.value, U256::new(zeros));
}

#[test]
fn test_malformed_tail_rejects_only_tail() {
    init_tracing();
    let mut controller = controller(true).expect("controller");
    let good = signed_record(&operator_key(), PAIR, 7, T0, E15, E15).expect("sign");
    let mut batch = good.clone();
    batch.extend_from_slice(&DELIMITER);
    batch.extend_from_slice(&[0u8; 10]);

    let report = controller.update_many(&batch, updater(5)).expect("batch");
    assert_eq!(report.receipts.len(), 2);
    assert!(report.receipts[0].is_applied());
    assert!(matches!(
        &report.receipts[1].outcome,
        ReceiptOutcome::Rejected { reason } if reason.contains("malformed batch")
    ));
    assert_eq!(report.receipts[1].pair, None);
}

#[test]
fn test_empty_batch_is_error() {
    let mut controller = controller(true).expect("controller");
    let err = controller.update_many(&[], updater(1)).expect_err("empty");
    assert!(matches!(err, ControllerError::Codec(_)));
}

#[test]
fn test_length_prefixed_framing_from_config() {
    init_tracing();
    let config = ControllerConfig::from_toml_str(
        r#"
        [codec]
        framing = "length_prefixed"

        [rewards]
        rewards_on = true

        [[scales]]
        system_id = 2
        chain_id = 1
        scale = "3e15"
        "#,
    )
    .expect("config");
    let mut controller = RewardController::from_config(&config, owner()).expect("controller");
    controller
        .enroll_signer(&owner(), feed_key().verifying_key)
        .expect("enroll");
    assert_eq!(controller.framing(), Framing::LengthPrefixed);
    assert_eq!(controller.get_scale(PAIR.system_id, PAIR.chain_id), U256::new(PAIR_SCALE));

    let a = signed_record(&feed_key(), PAIR, 1, T0, E15, E15).expect("sign");
    let b = signed_record(&feed_key(), PAIR, 2, T0 + 500, 2 * E15, E15).expect("sign");
    let batch = Framing::LengthPrefixed.join(&[a, b]).expect("join");

    let report = controller.update_many(&batch, updater(6)).expect("batch");
    assert_eq!(report.events.len(), 2);
    assert_eq!(controller.get(PAIR, BASE_FEE_TYPE).expect("stored").height, 2);
}
