//! # Assurer Contract
//!
//! An escrow-backed crowdfunding campaign. The author posts a goal and a
//! collateral guarantee, a bounded pool of donors each contribute an equal
//! share, and the funds are released deterministically depending on whether
//! the pool filled up before the deadline.
//!
//! | Phase        | Entry Point(s)                                   |
//! |--------------|--------------------------------------------------|
//! | Deployment   | `__constructor(author, token)`                   |
//! | Setup        | [`Assurer::initialize`]                          |
//! | Funding      | [`Assurer::donate`]                              |
//! | Settlement   | [`Assurer::claim`], [`Assurer::return_funds`]    |
//! | Generic      | [`Assurer::submit`] (any [`Request`])            |
//! | Queries      | `get_funding_data`, `is_active`, `get_balance`, `get_campaign`, `has_donated` |
//!
//! ## Architecture
//!
//! Every state-mutating entry point funnels into [`dispatch`], which loads the
//! campaign, checks authorization, delegates to [`validation`], [`ledger`] or
//! [`settlement`], and persists the campaign only on success. Storage access
//! is fully delegated to [`storage`].

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env};

pub mod config;
mod dispatch;
mod events;
mod ledger;
mod settlement;
mod storage;
mod types;
mod validation;

#[cfg(test)]
mod test_init;
#[cfg(test)]
mod test_settlement;
#[cfg(test)]
mod test_setup;

pub use events::{
    CampaignClaimed, CampaignInitialized, CampaignReturned, DonationReceived, DonationRefunded,
};
pub use types::{Campaign, FundingData, InitParams, Request};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    Unauthorized          = 100,
    SmallFundingAmount    = 101,
    SmallGuaranteeAmount  = 102,
    BigGuaranteeAmount    = 103,
    ManyParticipants      = 104,
    BigFundingPeriod      = 105,
    SmallDonateAmount     = 106,
    NotEnoughCoins        = 107,
    NotEnoughDonate       = 108,
    NotActive             = 109,
    AlreadyDonated        = 110,
    Underfunded           = 111,
    StillActive           = 112,
    NoDonators            = 113,
    FundingEnded          = 114,
    AlreadyInitialized    = 115,
    NoParticipants        = 116,
    NotInitialized        = 117,
    FullyFunded           = 118,
}

#[contract]
pub struct Assurer;

#[contractimpl]
impl Assurer {
    // ─────────────────────────────────────────────────────────
    // Deployment
    // ─────────────────────────────────────────────────────────

    /// Fix the author, the escrow token and the creation time.
    ///
    /// The campaign starts uninitialized; the author configures it with
    /// [`Assurer::initialize`].
    pub fn __constructor(env: Env, author: Address, token: Address) {
        let campaign = Campaign::new(author, token, env.ledger().timestamp());
        storage::save_campaign(&env, &campaign);
    }

    // ─────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────

    /// Submit any request through the dispatcher.
    ///
    /// `caller` is required for Initialize, Donate and Claim and ignored for
    /// Return. `value` is the amount the caller authorizes the contract to
    /// pull; only the escrowed share of it is taken.
    pub fn submit(
        env: Env,
        caller: Option<Address>,
        value: i128,
        request: Request,
    ) -> Result<(), Error> {
        dispatch::dispatch(&env, caller, value, request)
    }

    /// Configure the campaign. Author only, once.
    ///
    /// Pulls `guarantee_amount + INIT_FEE` from the author; `value` must also
    /// cover `INIT_RESERVE`.
    pub fn initialize(
        env: Env,
        caller: Address,
        goal: i128,
        guarantee_amount: i128,
        participants_count: u32,
        valid_until: u64,
        value: i128,
    ) -> Result<(), Error> {
        let params = InitParams {
            goal,
            guarantee_amount,
            participants_count,
            valid_until,
        };
        dispatch::dispatch(&env, Some(caller), value, Request::Initialize(params))
    }

    /// Donate one share. Pulls `donate_amount + DONATE_FEE` from `donor`.
    pub fn donate(env: Env, donor: Address, value: i128) -> Result<(), Error> {
        dispatch::dispatch(&env, Some(donor), value, Request::Donate)
    }

    /// Collect the whole balance of a fully funded campaign. Author only.
    /// Pulls `CLAIM_FEE` from the author first, so the payout includes it.
    pub fn claim(env: Env, caller: Address, value: i128) -> Result<(), Error> {
        dispatch::dispatch(&env, Some(caller), value, Request::Claim)
    }

    /// Refund the next batch of donors of an expired, underfunded campaign.
    /// The last batch pays the author and ends the campaign. Anyone may call.
    pub fn return_funds(env: Env) -> Result<(), Error> {
        dispatch::dispatch(&env, None, 0, Request::Return)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_funding_data(env: Env) -> FundingData {
        let campaign = storage::load_campaign(&env);
        let donors = if campaign.donated_count == 0 {
            None
        } else {
            Some(storage::load_donors(&env, campaign.donated_count))
        };
        FundingData {
            goal: campaign.goal,
            donate_amount: campaign.donate_amount,
            guarantee_amount: campaign.guarantee_amount,
            participants_count: campaign.participants_count,
            donated_count: campaign.donated_count,
            valid_until: campaign.valid_until,
            donors,
        }
    }

    /// `true` while the campaign accepts donations.
    pub fn is_active(env: Env) -> bool {
        storage::load_campaign(&env).is_active(env.ledger().timestamp())
    }

    /// Escrowed balance, as reported by the token contract.
    pub fn get_balance(env: Env) -> i128 {
        let campaign = storage::load_campaign(&env);
        token::Client::new(&env, &campaign.token).balance(&env.current_contract_address())
    }

    pub fn get_campaign(env: Env) -> Campaign {
        storage::load_campaign(&env)
    }

    pub fn has_donated(env: Env, address: Address) -> bool {
        storage::has_donated(&env, &address)
    }
}
