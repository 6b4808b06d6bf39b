//! # Events
//!
//! Contract events published by the campaign. Topics are short symbols so the
//! off-chain indexer can classify them without decoding the payload.
//!
//! | Topic                  | Data                   |
//! |------------------------|------------------------|
//! | `("init",)`            | [`CampaignInitialized`] |
//! | `("donated", donor)`   | [`DonationReceived`]    |
//! | `("claimed",)`         | [`CampaignClaimed`]     |
//! | `("refunded", donor)`  | [`DonationRefunded`]    |
//! | `("returned",)`        | [`CampaignReturned`]    |

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignInitialized {
    pub author: Address,
    pub goal: i128,
    pub guarantee_amount: i128,
    pub participants_count: u32,
    pub donate_amount: i128,
    pub valid_until: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub donor: Address,
    pub amount: i128,
    pub donated_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignClaimed {
    pub author: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationRefunded {
    pub donor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignReturned {
    pub author: Address,
    pub refunded_count: u32,
    /// Paid to the author after the refunds: guarantee plus retained fees.
    pub remainder: i128,
}

pub fn publish_initialized(env: &Env, event: CampaignInitialized) {
    env.events().publish((symbol_short!("init"),), event);
}

pub fn publish_donation(env: &Env, event: DonationReceived) {
    env.events()
        .publish((symbol_short!("donated"), event.donor.clone()), event);
}

pub fn publish_claimed(env: &Env, event: CampaignClaimed) {
    env.events().publish((symbol_short!("claimed"),), event);
}

pub fn publish_refund(env: &Env, event: DonationRefunded) {
    env.events()
        .publish((symbol_short!("refunded"), event.donor.clone()), event);
}

pub fn publish_returned(env: &Env, event: CampaignReturned) {
    env.events().publish((symbol_short!("returned"),), event);
}
