//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the campaign.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key        | Type       | Description                  |
//! |------------|------------|------------------------------|
//! | `Campaign` | `Campaign` | The single campaign record   |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key              | Type      | Description                            |
//! |------------------|-----------|----------------------------------------|
//! | `Donor(address)` | `u32`     | Position of the donor, for membership  |
//! | `DonorAt(index)` | `Address` | Donor at a position, for traversal     |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! A donation writes one entry in each family. The refund sweep walks
//! `DonorAt(0..donated_count)`, which is donation order.
//!
//! ## Settlement horizon
//!
//! Writes made while a campaign is funding also extend the TTL until
//! `valid_until` plus [`SETTLEMENT_WINDOW`], capped at the network maximum.
//! Nothing the Return sweep reads can be archived before then, even when no
//! request touches the contract for most of the funding period.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::Campaign;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;

const LEDGER_SECONDS: u64 = 5;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// How long after the deadline campaign state stays live for settlement.
pub(crate) const SETTLEMENT_WINDOW: u32 = 30 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// The campaign record (Instance).
    Campaign,
    /// Donation position keyed by donor (Persistent).
    Donor(Address),
    /// Donor keyed by donation position (Persistent).
    DonorAt(u32),
}

// ── TTL Helpers ──────────────────────────────────────────────────────

/// Ledgers from now until `valid_until + SETTLEMENT_WINDOW`, never below
/// `floor` and never above the network's maximum TTL.
fn ttl_until_settled(env: &Env, valid_until: u64, floor: u32) -> u32 {
    let seconds_left = valid_until.saturating_sub(env.ledger().timestamp());
    let ledgers_left = u32::try_from(seconds_left.div_ceil(LEDGER_SECONDS)).unwrap_or(u32::MAX);
    ledgers_left
        .saturating_add(SETTLEMENT_WINDOW)
        .max(floor)
        .min(env.storage().max_ttl())
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Load the campaign record.
/// The constructor always writes it, so a missing record is a host bug.
pub fn load_campaign(env: &Env) -> Campaign {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Campaign)
        .expect("campaign not deployed")
}

pub fn save_campaign(env: &Env, campaign: &Campaign) {
    env.storage().instance().set(&DataKey::Campaign, campaign);
    if campaign.initialized && !campaign.ended {
        let extend_to = ttl_until_settled(env, campaign.valid_until, INSTANCE_BUMP_AMOUNT);
        env.storage().instance().extend_ttl(extend_to, extend_to);
    } else {
        bump_instance(env);
    }
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// O(1) membership test on the donor set.
pub fn has_donated(env: &Env, donor: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Donor(donor.clone()))
}

/// Record `donor` at `position`, live until the campaign can be settled.
/// Callers pass the pre-increment `donated_count`, so positions are dense
/// from zero.
pub fn add_donor(env: &Env, donor: &Address, position: u32, valid_until: u64) {
    let by_donor = DataKey::Donor(donor.clone());
    let by_position = DataKey::DonorAt(position);
    let extend_to = ttl_until_settled(env, valid_until, PERSISTENT_BUMP_AMOUNT);

    let persistent = env.storage().persistent();
    persistent.set(&by_donor, &position);
    persistent.set(&by_position, donor);
    persistent.extend_ttl(&by_donor, extend_to, extend_to);
    persistent.extend_ttl(&by_position, extend_to, extend_to);
}

/// Donor recorded at `position`.
pub fn donor_at(env: &Env, position: u32) -> Address {
    let key = DataKey::DonorAt(position);
    let donor: Address = env
        .storage()
        .persistent()
        .get(&key)
        .expect("donor position out of range");
    bump_persistent(env, &key);
    donor
}

/// All donors in donation order.
pub fn load_donors(env: &Env, count: u32) -> Vec<Address> {
    let mut donors = Vec::new(env);
    for position in 0..count {
        donors.push_back(donor_at(env, position));
    }
    donors
}
