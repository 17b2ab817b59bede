//! Integration test crate for the gauge workspace.
//!
//! Holds the fixtures shared by the end-to-end flows in `tests/`: a
//! log subscriber, deterministic signer keys and record builders.
//!
//! Run all integration tests with log output:
//! ```sh
//! cargo test -p gauge-integration-tests -- --nocapture
//! ```

use gauge_codec::record::Record;
use gauge_core::RewardController;
use gauge_crypto::ed25519::KeyPair;
use gauge_types::{Address, PairKey, TypedObservation, BASE_FEE_TYPE, DEFAULT_TIP_TYPE, U256};

/// Reference pair used throughout the flows.
pub const PAIR: PairKey = PairKey::new(2, 1);

/// Scale registered for [`PAIR`].
pub const PAIR_SCALE: u128 = 3_000_000_000_000_000;

/// A millisecond timestamp to start clocks from.
pub const T0: u64 = 1_700_000_000_000;

/// Install a `fmt` subscriber honouring `RUST_LOG`, defaulting to info for
/// the gauge crates. Safe to call from every test.
pub fn init_tracing() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["gauge_core=info", "gauge_ledger=info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// The authority that owns test controllers.
pub fn owner() -> Address {
    Address::from_bytes([0xa0; 32])
}

/// An updater identity derived from `n`.
pub fn updater(n: u8) -> Address {
    Address::from_bytes([n; 32])
}

/// Operator signing key.
pub fn operator_key() -> KeyPair {
    KeyPair::from_bytes(&[0x11; 32])
}

/// Third-party feed signing key.
pub fn feed_key() -> KeyPair {
    KeyPair::from_bytes(&[0x22; 32])
}

/// Build and sign a record for `pair` with base fee and tip channels.
pub fn signed_record(
    key: &KeyPair,
    pair: PairKey,
    height: u64,
    timestamp: u64,
    base_fee: u128,
    tip: u128,
) -> gauge_codec::Result<Vec<u8>> {
    Record::new(
        pair.system_id,
        pair.chain_id,
        height,
        timestamp,
        vec![
            TypedObservation::new(BASE_FEE_TYPE, U256::new(base_fee)),
            TypedObservation::new(199, U256::new(base_fee / 2)),
            TypedObservation::new(DEFAULT_TIP_TYPE, U256::new(tip)),
        ],
    )
    .sign(&key.signing_key)
}

/// Default controller with both keys enrolled and [`PAIR`] scaled.
pub fn controller(rewards_on: bool) -> gauge_core::Result<RewardController> {
    let mut controller = RewardController::with_defaults(owner())?;
    controller.enroll_signer(&owner(), operator_key().verifying_key)?;
    controller.enroll_signer(&owner(), feed_key().verifying_key)?;
    controller.set_scale(&owner(), PAIR.system_id, PAIR.chain_id, U256::new(PAIR_SCALE))?;
    if rewards_on {
        controller.turn_rewards_on(&owner())?;
    }
    Ok(controller)
}
