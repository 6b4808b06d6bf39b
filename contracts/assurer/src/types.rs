//! # Types
//!
//! Data structures shared by the campaign modules.
//!
//! ## Campaign lifecycle
//!
//! A deployed contract holds exactly one [`Campaign`]. It is threaded through
//! every request handler: loaded at entry, mutated in memory, and persisted
//! only when the handler succeeds.
//!
//! ```text
//! Created ──(Initialize)──► Funding ──(Claim)──► Ended
//!                              └─────(Return)────►┘
//! ```
//!
//! `Created` is `initialized == false`; `Funding` is `initialized && !ended`;
//! `Ended` is `ended == true` and accepts no further state-mutating request.
//! A Return sweep spanning several requests stays in `Funding` (past its
//! deadline) with `refunded_count` advancing until the last batch ends it.

use soroban_sdk::{contracttype, Address, Vec};

use crate::config::{CLAIM_OP, DONATE_OP, INIT_OP, RETURN_OP};

/// Persisted campaign record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Fixed at deployment. Owns Initialize and Claim.
    pub author: Address,
    /// SEP-41 token the campaign escrows.
    pub token: Address,
    /// Ledger timestamp at deployment.
    pub created_time: u64,
    pub initialized: bool,
    /// Amount the donor pool must raise. Excludes the guarantee.
    pub goal: i128,
    /// Author collateral escrowed alongside the donations.
    pub guarantee_amount: i128,
    /// Capacity of the donor pool.
    pub participants_count: u32,
    /// `goal / participants_count`, computed once on Initialize.
    pub donate_amount: i128,
    /// Deadline timestamp. Donations are accepted strictly before it.
    pub valid_until: u64,
    /// Number of accepted donations.
    pub donated_count: u32,
    /// Donors already refunded by Return, in donation order.
    pub refunded_count: u32,
    /// Set once by a successful Claim or Return.
    pub ended: bool,
}

impl Campaign {
    /// A freshly deployed, not yet initialized campaign.
    pub fn new(author: Address, token: Address, created_time: u64) -> Self {
        Campaign {
            author,
            token,
            created_time,
            initialized: false,
            goal: 0,
            guarantee_amount: 0,
            participants_count: 0,
            donate_amount: 0,
            valid_until: 0,
            donated_count: 0,
            refunded_count: 0,
            ended: false,
        }
    }

    /// Whether the campaign accepts donations at `now`.
    pub fn is_active(&self, now: u64) -> bool {
        self.initialized
            && !self.ended
            && now < self.valid_until
            && self.donated_count < self.participants_count
    }

    pub fn is_fully_funded(&self) -> bool {
        self.initialized && self.donated_count == self.participants_count
    }
}

/// Author-supplied campaign terms carried by an Initialize request.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitParams {
    pub goal: i128,
    pub guarantee_amount: i128,
    pub participants_count: u32,
    pub valid_until: u64,
}

/// The closed set of requests the campaign understands.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Request {
    /// Configure the campaign. Author only, once.
    Initialize(InitParams),
    /// Contribute one fixed share.
    Donate,
    /// Collect everything once fully funded. Author only.
    Claim,
    /// Refund the next batch of donors after the deadline of an
    /// underfunded campaign; the last batch ends the campaign.
    Return,
}

impl Request {
    /// Wire opcode of this request kind.
    pub fn opcode(&self) -> u32 {
        match self {
            Request::Initialize(_) => INIT_OP,
            Request::Donate => DONATE_OP,
            Request::Claim => CLAIM_OP,
            Request::Return => RETURN_OP,
        }
    }
}

/// Read-only snapshot returned by `get_funding_data`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingData {
    pub goal: i128,
    pub donate_amount: i128,
    pub guarantee_amount: i128,
    pub participants_count: u32,
    pub donated_count: u32,
    pub valid_until: u64,
    /// Donors in donation order, or `None` while nobody has donated.
    pub donors: Option<Vec<Address>>,
}
