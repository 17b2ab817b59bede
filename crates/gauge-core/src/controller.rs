//! Reward controller: batch update orchestration and the parameter surface.
//!
//! A submission runs in two steps over one shared computation:
//!
//! 1. [`RewardController::plan`] splits the batch, authenticates each
//!    record against the signer set and applies its channels to a staged
//!    view of the value ledger. It returns the receipts, events and ledger
//!    writes the batch would produce without touching controller state.
//! 2. [`RewardController::commit`] applies a plan: credits the submitter,
//!    writes the staged values and bumps the state revision. A plan built
//!    against an older revision is refused with
//!    [`ControllerError::StalePlan`].
//!
//! [`RewardController::update_many`] is `plan` followed by `commit`.
//!
//! ## Per-record failures
//!
//! Framing, parse, signature and scale failures reject only the record
//! they occur in; the rest of the batch proceeds. A frozen controller
//! refuses the whole batch before any work is done.
//!
//! ## Reward inputs
//!
//! For a record whose base fee or tip channel is newer than the stored
//! value:
//!
//! - elapsed: `(timestamp - previous_timestamp) * 1e15` WAD seconds, where
//!   `previous_timestamp` is the latest stored timestamp among the
//!   channels being replaced; `U256::MAX` for a pair's first update
//! - deviation: `|after - before|` of `base_fee + tip`, normalized by the
//!   pair's scale and capped at `max_deviation`

use gauge_codec::batch::{Frame, Framing};
use gauge_codec::record::{self, SignedRecord};
use gauge_control::ema::IntervalEma;
use gauge_control::pi::{self, BoundParam, ControlGains, FeedbackUpdate, GainParam, PiController};
use gauge_control::GroupId;
use gauge_crypto::ed25519::VerifyingKey;
use gauge_crypto::signers::SignerSet;
use gauge_ledger::accounts::RewardBook;
use gauge_ledger::values::{SlotKey, StagedValues, ValueLedger, ValueStore};
use gauge_rewards::curve::{RewardCurve, RewardParam, RewardParams};
use gauge_rewards::scales::{ScaleEntry, ScaleRegistry};
use gauge_types::fixed::abs_diff;
use gauge_types::{Address, ArithmeticError, PairKey, StoredValue, I256, U256};
use serde::{Deserialize, Serialize};

use crate::access::AccessControl;
use crate::config::ControllerConfig;
use crate::events::OracleUpdated;
use crate::lifecycle::Lifecycle;
use crate::{ControllerError, Result};

/// Milliseconds to WAD seconds.
const MS_TO_WAD_SECONDS: U256 = U256::new(1_000_000_000_000_000);

/// What happened to one record of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptOutcome {
    /// At least one channel was newer and was written.
    Applied,
    /// Authentic, but nothing newer than what is stored.
    Unchanged,
    /// Dropped before reaching the ledger.
    Rejected {
        /// Rendered cause.
        reason: String,
    },
}

/// Per-record result of a batch, in batch order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardReceipt {
    /// Position of the record in the batch.
    pub index: usize,
    /// Pair the record describes, when it could be parsed.
    pub pair: Option<PairKey>,
    /// Enrolled signer that produced the record, when authentic.
    pub signer: Option<Address>,
    /// Applied, unchanged or rejected.
    pub outcome: ReceiptOutcome,
    /// Zero unless applied with rewards on.
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub time_reward: U256,
    /// Zero unless applied with rewards on.
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub deviation_reward: U256,
}

impl RewardReceipt {
    fn rejected(index: usize, pair: Option<PairKey>, error: &ControllerError) -> Self {
        tracing::warn!(index, pair = ?pair, error = %error, "record rejected");
        Self {
            index,
            pair,
            signer: None,
            outcome: ReceiptOutcome::Rejected {
                reason: error.to_string(),
            },
            time_reward: U256::ZERO,
            deviation_reward: U256::ZERO,
        }
    }

    /// Whether the record's channels were written.
    pub fn is_applied(&self) -> bool {
        self.outcome == ReceiptOutcome::Applied
    }

    /// `(time_reward, deviation_reward)`.
    pub fn rewards(&self) -> (U256, U256) {
        (self.time_reward, self.deviation_reward)
    }
}

/// Effects of a batch, computed against one state revision.
#[derive(Clone, Debug)]
pub struct Plan {
    revision: u64,
    submitter: Address,
    receipts: Vec<RewardReceipt>,
    events: Vec<OracleUpdated>,
    writes: Vec<(SlotKey, StoredValue)>,
    credit: U256,
}

impl Plan {
    /// Revision the plan was computed against.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Account the plan credits.
    pub fn submitter(&self) -> Address {
        self.submitter
    }

    /// Per-record receipts, in batch order.
    pub fn receipts(&self) -> &[RewardReceipt] {
        &self.receipts
    }

    /// Events for applied records.
    pub fn events(&self) -> &[OracleUpdated] {
        &self.events
    }

    /// Total reward the submitter would be credited.
    pub fn credit(&self) -> U256 {
        self.credit
    }

    /// Number of ledger slots the plan writes.
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }
}

/// Result of a committed plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitReport {
    pub receipts: Vec<RewardReceipt>,
    pub events: Vec<OracleUpdated>,
    /// Amount credited to the submitter.
    pub credited: U256,
}

/// Result of planning one authentic record.
struct PlannedRecord {
    signer: Address,
    rewards: Option<(U256, U256)>,
}

/// The oracle update and reward controller.
#[derive(Debug)]
pub struct RewardController {
    access: AccessControl,
    lifecycle: Lifecycle,
    signers: SignerSet,
    values: ValueLedger,
    pi: PiController,
    ema: IntervalEma,
    curve: RewardCurve,
    scales: ScaleRegistry,
    book: RewardBook,
    framing: Framing,
    base_fee_type: u16,
    tip_type: u16,
    revision: u64,
}

impl RewardController {
    /// Build a controller from configuration, with `owner` as the only
    /// authority and an empty signer set.
    pub fn from_config(config: &ControllerConfig, owner: Address) -> Result<Self> {
        config.validate()?;
        let control = &config.control;
        let pi = PiController::new(
            control.gains(),
            control.output_upper_bound,
            control.output_lower_bound,
        )?;
        let ema = IntervalEma::new(control.default_window_size)?;
        let curve = RewardCurve::new(config.rewards.params())?;
        let mut scales = ScaleRegistry::new();
        scales.set_scales(&config.scales)?;

        tracing::info!(
            owner = %owner,
            rewards_on = config.rewards.rewards_on,
            framing = ?config.codec.framing,
            scales = scales.len(),
            "reward controller created"
        );
        Ok(Self {
            access: AccessControl::new(owner),
            lifecycle: Lifecycle::new(config.rewards.rewards_on),
            signers: SignerSet::new(),
            values: ValueLedger::new(),
            pi,
            ema,
            curve,
            scales,
            book: RewardBook::new(),
            framing: config.codec.framing,
            base_fee_type: config.rewards.base_fee_type,
            tip_type: config.rewards.tip_type,
            revision: 0,
        })
    }

    /// Controller with the reference parameters.
    pub fn with_defaults(owner: Address) -> Result<Self> {
        Self::from_config(&ControllerConfig::default(), owner)
    }

    // Batch updates

    /// Compute the effects of a batch without changing state.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::SystemFrozen`] while frozen
    /// - [`ControllerError::Codec`] for an empty batch
    /// - [`ControllerError::Arithmetic`] if the total credit overflows
    pub fn plan(&self, batch: &[u8], submitter: Address) -> Result<Plan> {
        self.lifecycle.ensure_live()?;
        let frames = self.framing.split(batch)?;
        self.plan_frames(frames, submitter)
    }

    /// [`RewardController::plan`] for a single unframed record.
    pub fn plan_record(&self, record: &[u8], submitter: Address) -> Result<Plan> {
        self.lifecycle.ensure_live()?;
        self.plan_frames(vec![Ok(record)], submitter)
    }

    /// Apply a plan.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::SystemFrozen`] while frozen
    /// - [`ControllerError::StalePlan`] if state changed since planning
    /// - [`ControllerError::Ledger`] if the credit overflows; nothing is written
    pub fn commit(&mut self, plan: Plan) -> Result<CommitReport> {
        self.lifecycle.ensure_live()?;
        if plan.revision != self.revision {
            return Err(ControllerError::StalePlan {
                planned: plan.revision,
                current: self.revision,
            });
        }

        let any_applied = plan.receipts.iter().any(RewardReceipt::is_applied);
        let credited = if any_applied && !self.lifecycle.rewards_off() {
            let credit = self.book.credit(plan.submitter, plan.credit)?;
            tracing::info!(
                updater = %plan.submitter,
                amount = %plan.credit,
                balance = %credit.balance,
                "reward credited"
            );
            plan.credit
        } else {
            U256::ZERO
        };

        let changed = !plan.writes.is_empty();
        self.values.commit_writes(plan.writes);
        if changed {
            self.touch();
        }

        for event in &plan.events {
            tracing::info!(
                pair = %event.pair(),
                height = event.height,
                timestamp = event.timestamp,
                time_reward = %event.time_reward,
                deviation_reward = %event.deviation_reward,
                "oracle updated"
            );
        }
        Ok(CommitReport {
            receipts: plan.receipts,
            events: plan.events,
            credited,
        })
    }

    /// Plan and commit a batch from `submitter`.
    pub fn update_many(&mut self, batch: &[u8], submitter: Address) -> Result<CommitReport> {
        let plan = self.plan(batch, submitter)?;
        self.commit(plan)
    }

    /// Plan and commit one unframed record from `submitter`.
    pub fn update_oracle(&mut self, record: &[u8], submitter: Address) -> Result<CommitReport> {
        let plan = self.plan_record(record, submitter)?;
        self.commit(plan)
    }

    fn plan_frames(&self, frames: Vec<Frame<'_>>, submitter: Address) -> Result<Plan> {
        let mut staged = self.values.stage();
        let mut receipts = Vec::with_capacity(frames.len());
        let mut events = Vec::new();
        let mut credit = U256::ZERO;

        for (index, frame) in frames.into_iter().enumerate() {
            let signed = match frame.and_then(record::parse) {
                Ok(signed) => signed,
                Err(e) => {
                    receipts.push(RewardReceipt::rejected(index, None, &e.into()));
                    continue;
                }
            };
            let pair = signed.record.pair();

            let planned = match self.plan_signed(&mut staged, &signed) {
                Ok(planned) => planned,
                Err(e) => {
                    receipts.push(RewardReceipt::rejected(index, Some(pair), &e));
                    continue;
                }
            };

            let (outcome, (time_reward, deviation_reward)) = match planned.rewards {
                Some(rewards) => (ReceiptOutcome::Applied, rewards),
                None => (ReceiptOutcome::Unchanged, (U256::ZERO, U256::ZERO)),
            };
            if outcome == ReceiptOutcome::Applied {
                credit = credit
                    .checked_add(time_reward)
                    .and_then(|c| c.checked_add(deviation_reward))
                    .ok_or(ArithmeticError::Overflow("batch credit"))?;
                events.push(OracleUpdated {
                    system_id: pair.system_id,
                    chain_id: pair.chain_id,
                    height: signed.record.height,
                    timestamp: signed.record.timestamp,
                    updater: submitter,
                    time_reward,
                    deviation_reward,
                });
            }
            receipts.push(RewardReceipt {
                index,
                pair: Some(pair),
                signer: Some(planned.signer),
                outcome,
                time_reward,
                deviation_reward,
            });
        }

        Ok(Plan {
            revision: self.revision,
            submitter,
            receipts,
            events,
            writes: staged.into_writes(),
            credit,
        })
    }

    /// Authenticate one record and stage its newer channels.
    ///
    /// Rewards are computed before anything is staged, so a record that
    /// fails here leaves the staged view untouched.
    fn plan_signed(&self, staged: &mut StagedValues<'_>, signed: &SignedRecord) -> Result<PlannedRecord> {
        let signer = self.signers.recover(&signed.body, &signed.signature)?;
        let record = &signed.record;
        let pair = record.pair();

        let mut before = U256::ZERO;
        let mut after = U256::ZERO;
        let mut previous_ts: Option<u64> = None;
        let mut updates = Vec::with_capacity(2);

        for type_code in [self.base_fee_type, self.tip_type] {
            let stored = staged.slot(pair, type_code);
            let stored_value = stored.map_or(U256::ZERO, |s| s.value);
            before = checked_sum(before, stored_value)?;

            match record.decode(type_code) {
                Ok(reading)
                    if stored.map_or(true, |s| s.is_superseded_by(reading.height, reading.timestamp)) =>
                {
                    after = checked_sum(after, reading.value)?;
                    previous_ts = previous_ts.max(stored.map(|s| s.timestamp));
                    updates.push((type_code, reading));
                }
                Ok(_) => after = checked_sum(after, stored_value)?,
                Err(e) => {
                    tracing::debug!(pair = %pair, error = %e, "channel missing from record");
                    after = checked_sum(after, stored_value)?;
                }
            }
        }

        if updates.is_empty() {
            tracing::debug!(pair = %pair, height = record.height, timestamp = record.timestamp, "record not newer");
            return Ok(PlannedRecord {
                signer,
                rewards: None,
            });
        }

        let rewards = if self.lifecycle.rewards_off() {
            (U256::ZERO, U256::ZERO)
        } else {
            let elapsed = match previous_ts {
                Some(prev) => U256::new(u128::from(record.timestamp.saturating_sub(prev))) * MS_TO_WAD_SECONDS,
                None => U256::MAX,
            };
            let deviation = self.scales.deviation(
                pair,
                abs_diff(before, after),
                self.curve.params().max_deviation,
            )?;
            self.curve.calc_reward(elapsed, deviation)?
        };

        for (type_code, reading) in updates {
            let outcome = staged.apply(pair, type_code, reading.value, reading.height, reading.timestamp);
            debug_assert!(outcome.is_applied(), "channel {type_code} checked newer but not applied");
        }
        Ok(PlannedRecord {
            signer,
            rewards: Some(rewards),
        })
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // Access, lifecycle and signers

    /// Whether `address` may call mutators.
    pub fn is_authority(&self, address: &Address) -> bool {
        self.access.is_authority(address)
    }

    /// Grant authority to `address`. Returns `false` if it already had it.
    pub fn add_authority(&mut self, caller: &Address, address: Address) -> Result<bool> {
        let added = self.access.add(caller, address)?;
        self.touch();
        Ok(added)
    }

    /// Revoke authority from `address`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::LastAuthority`] if it is the only authority left.
    pub fn remove_authority(&mut self, caller: &Address, address: &Address) -> Result<bool> {
        let removed = self.access.remove(caller, address)?;
        self.touch();
        Ok(removed)
    }

    /// Refuse batches until [`RewardController::unfreeze`].
    pub fn freeze(&mut self, caller: &Address) -> Result<()> {
        self.access.require(caller)?;
        self.lifecycle.freeze();
        self.touch();
        Ok(())
    }

    /// Accept batches again.
    pub fn unfreeze(&mut self, caller: &Address) -> Result<()> {
        self.access.require(caller)?;
        self.lifecycle.unfreeze();
        self.touch();
        Ok(())
    }

    /// Flip the reward latch on. There is no way back.
    pub fn turn_rewards_on(&mut self, caller: &Address) -> Result<()> {
        self.access.require(caller)?;
        self.lifecycle.turn_rewards_on()?;
        self.touch();
        Ok(())
    }

    /// Whether batches are refused.
    pub fn frozen(&self) -> bool {
        self.lifecycle.frozen()
    }

    /// Whether the reward latch is still off.
    pub fn rewards_off(&self) -> bool {
        self.lifecycle.rewards_off()
    }

    /// Enroll a record signer. Returns `false` if already enrolled.
    pub fn enroll_signer(&mut self, caller: &Address, key: VerifyingKey) -> Result<bool> {
        self.access.require(caller)?;
        let enrolled = self.signers.enroll(key);
        self.touch();
        Ok(enrolled)
    }

    /// Revoke a record signer. Returns `false` if it was not enrolled.
    pub fn revoke_signer(&mut self, caller: &Address, signer: &Address) -> Result<bool> {
        self.access.require(caller)?;
        let revoked = self.signers.revoke(signer);
        self.touch();
        Ok(revoked)
    }

    /// Whether `address` is an enrolled record signer.
    pub fn is_signer(&self, address: &Address) -> bool {
        self.signers.contains(address)
    }

    // Parameters

    /// Set `kp`, `ki` or `co_bias`.
    pub fn modify_parameters_control_output(&mut self, caller: &Address, name: &str, value: I256) -> Result<()> {
        self.access.require(caller)?;
        let param: GainParam = name.parse()?;
        self.pi.set_gain(param, value);
        self.touch();
        Ok(())
    }

    /// Set `output_upper_bound` or `output_lower_bound`.
    pub fn modify_parameters_int(&mut self, caller: &Address, name: &str, value: I256) -> Result<()> {
        self.access.require(caller)?;
        let param: BoundParam = name.parse()?;
        self.pi.set_bound(param, value)?;
        self.touch();
        Ok(())
    }

    /// Set a reward law parameter such as `target_time_since`,
    /// `min_reward` or `max_reward`.
    pub fn modify_parameters_uint(&mut self, caller: &Address, name: &str, value: U256) -> Result<()> {
        self.access.require(caller)?;
        let param: RewardParam = name.parse()?;
        self.curve.set(param, value)?;
        self.touch();
        Ok(())
    }

    /// Current gains.
    pub fn control_output(&self) -> ControlGains {
        self.pi.gains()
    }

    /// Upper clamp of the control output.
    pub fn output_upper_bound(&self) -> I256 {
        self.pi.output_upper_bound()
    }

    /// Lower clamp of the control output.
    pub fn output_lower_bound(&self) -> I256 {
        self.pi.output_lower_bound()
    }

    /// Full reward law parameter set.
    pub fn reward_params(&self) -> &RewardParams {
        self.curve.params()
    }

    /// Desired interval between updates, in WAD seconds.
    pub fn target_time_since(&self) -> U256 {
        self.curve.target_time_since()
    }

    /// Reward at the bottom of both domains.
    pub fn min_reward(&self) -> U256 {
        self.curve.min_reward()
    }

    /// Reward at the top of both domains.
    pub fn max_reward(&self) -> U256 {
        self.curve.max_reward()
    }

    /// Observation type of the base fee channel.
    pub fn base_fee_type(&self) -> u16 {
        self.base_fee_type
    }

    /// Observation type of the tip channel.
    pub fn tip_type(&self) -> u16 {
        self.tip_type
    }

    /// Batch framing used by [`RewardController::plan`].
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Counter bumped by every state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // Scales

    /// Set the deviation scale of one pair.
    ///
    /// # Errors
    ///
    /// [`ControllerError::Reward`] (`ZeroScale`) if `scale` is zero.
    pub fn set_scale(&mut self, caller: &Address, system_id: u8, chain_id: u64, scale: U256) -> Result<()> {
        self.access.require(caller)?;
        self.scales.set_scale(system_id, chain_id, scale)?;
        self.touch();
        Ok(())
    }

    /// Set several scales. Either all entries are written or none.
    pub fn set_scales(&mut self, caller: &Address, entries: &[ScaleEntry]) -> Result<()> {
        self.access.require(caller)?;
        self.scales.set_scales(entries)?;
        self.touch();
        Ok(())
    }

    /// Scale of a pair; zero if never set.
    pub fn get_scale(&self, system_id: u8, chain_id: u64) -> U256 {
        self.scales.get_scale(system_id, chain_id)
    }

    /// Capped deviation of `abs_delta` for a pair.
    pub fn deviation(&self, pair: PairKey, abs_delta: U256) -> Result<U256> {
        Ok(self
            .scales
            .deviation(pair, abs_delta, self.curve.params().max_deviation)?)
    }

    /// [`RewardController::deviation`] addressed by packed `scid`.
    pub fn deviation_by_scid(&self, scid: u128, abs_delta: U256) -> Result<U256> {
        Ok(self
            .scales
            .deviation_by_scid(scid, abs_delta, self.curve.params().max_deviation)?)
    }

    // Reward law

    /// Time term for `elapsed` WAD seconds.
    pub fn calc_time_reward(&self, elapsed: U256) -> Result<U256> {
        Ok(self.curve.time_reward(elapsed)?)
    }

    /// Deviation term for a WAD `deviation`.
    pub fn calc_deviation_reward(&self, deviation: U256) -> Result<U256> {
        Ok(self.curve.deviation_reward(deviation)?)
    }

    /// `(time_reward, deviation_reward)`.
    pub fn calc_reward(&self, elapsed: U256, deviation: U256) -> Result<(U256, U256)> {
        Ok(self.curve.calc_reward(elapsed, deviation)?)
    }

    /// `min_reward / 2`.
    pub fn min_time_reward(&self) -> U256 {
        self.curve.min_time_reward()
    }

    /// `max_reward / 2`.
    pub fn max_time_reward(&self) -> U256 {
        self.curve.max_time_reward()
    }

    /// `min_reward / 2`.
    pub fn min_deviation_reward(&self) -> U256 {
        self.curve.min_deviation_reward()
    }

    /// `max_reward / 2`.
    pub fn max_deviation_reward(&self) -> U256 {
        self.curve.max_deviation_reward()
    }

    // Control loops

    /// Feed an error into a control group at clock reading `now`.
    pub fn update_feedback(
        &mut self,
        caller: &Address,
        group_id: GroupId,
        error: I256,
        now: u64,
    ) -> Result<FeedbackUpdate> {
        self.access.require(caller)?;
        let update = self.pi.update_feedback(group_id, error, now)?;
        self.touch();
        Ok(update)
    }

    /// Fold an observed update interval into a group's EMA.
    pub fn update_interval_ema(&mut self, caller: &Address, group_id: GroupId, interval: U256) -> Result<U256> {
        self.access.require(caller)?;
        let ema = self.ema.update(group_id, interval)?;
        self.touch();
        Ok(ema)
    }

    /// Current interval EMA of a group; zero before the first sample.
    pub fn interval_ema(&self, group_id: GroupId) -> U256 {
        self.ema.get(group_id)
    }

    /// Bounded output a group would produce for `error`. Pure.
    pub fn next_output(&self, group_id: GroupId, error: I256) -> Result<I256> {
        Ok(self.pi.next_output(group_id, error)?)
    }

    /// `(new_integral, new_area)` a group would have after `error`. Pure.
    pub fn next_error_integral(&self, group_id: GroupId, error: I256) -> Result<(I256, I256)> {
        Ok(self.pi.next_error_integral(group_id, error)?)
    }

    /// Unbounded output for an error and integral.
    pub fn raw_output(&self, error: I256, integral: I256) -> Result<I256> {
        Ok(self.pi.raw_output(error, integral)?)
    }

    /// RAY relative error of `observed` against `reference`.
    pub fn error(&self, observed: U256, reference: U256) -> Result<I256> {
        Ok(pi::error(observed, reference)?)
    }

    /// WAD relative deviation of `measured` from `target`.
    pub fn tracking_error(&self, target: U256, measured: U256) -> Result<I256> {
        Ok(pi::tracking_error(target, measured)?)
    }

    /// Accumulated error integral of a group.
    pub fn error_integral(&self, group_id: GroupId) -> I256 {
        self.pi.error_integral(group_id)
    }

    /// Bounded output of a group's last update.
    pub fn last_output(&self, group_id: GroupId) -> I256 {
        self.pi.last_output(group_id)
    }

    /// Clock reading of a group's last update; zero if never updated.
    pub fn last_update_time(&self, group_id: GroupId) -> u64 {
        self.pi.last_update_time(group_id)
    }

    // Queries

    /// Stored value of a channel.
    ///
    /// # Errors
    ///
    /// [`ControllerError::Ledger`] (`NotFound`) if never written.
    pub fn get(&self, pair: PairKey, type_code: u16) -> Result<StoredValue> {
        Ok(self.values.get(pair, type_code)?)
    }

    /// Accumulated reward of an address.
    pub fn rewards(&self, address: &Address) -> U256 {
        self.book.balance(address)
    }

    /// Sum of all credited rewards.
    pub fn total_rewards(&self) -> U256 {
        self.book.total()
    }

    /// Number of distinct credited updaters.
    pub fn n_updaters(&self) -> usize {
        self.book.n_updaters()
    }

    /// A page of `(updater, reward)` in first-credit order.
    pub fn updaters_chunk(&self, offset: usize, count: usize) -> Vec<(Address, U256)> {
        self.book.updaters_chunk(offset, count)
    }
}

fn checked_sum(a: U256, b: U256) -> Result<U256> {
    Ok(a.checked_add(b)
        .ok_or(ArithmeticError::Overflow("combined price"))?)
}
