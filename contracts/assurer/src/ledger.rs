//! # Donation ledger
//!
//! Accepts donations while the campaign is active. Each identity may donate
//! once, and every donation is exactly `donate_amount`; the `DONATE_FEE` on
//! top of it stays in the contract as reserve and is swept to the author at
//! settlement.
//!
//! There is no explicit "fully funded" event: completion is observable as
//! `donated_count == participants_count`, which turns `is_active` false.

use soroban_sdk::{log, token, Address, Env};

use crate::config::DONATE_FEE;
use crate::events::{self, DonationReceived};
use crate::storage;
use crate::types::Campaign;
use crate::Error;

/// Amount a donation pulls from the donor.
pub fn donation_charge(campaign: &Campaign) -> i128 {
    campaign.donate_amount.saturating_add(DONATE_FEE)
}

/// Record a donation from `donor` carrying `value`.
///
/// Checks, in order: `NotActive`, `AlreadyDonated`, `NotEnoughDonate`.
/// On success the charge is pulled from the donor and `donated_count`
/// is incremented in `campaign`; persisting it is the caller's job.
pub fn donate(env: &Env, campaign: &mut Campaign, donor: &Address, value: i128) -> Result<(), Error> {
    if !campaign.is_active(env.ledger().timestamp()) {
        return Err(Error::NotActive);
    }
    if storage::has_donated(env, donor) {
        return Err(Error::AlreadyDonated);
    }
    let charge = donation_charge(campaign);
    if value < charge {
        return Err(Error::NotEnoughDonate);
    }

    token::Client::new(env, &campaign.token).transfer(
        donor,
        &env.current_contract_address(),
        &charge,
    );

    storage::add_donor(env, donor, campaign.donated_count, campaign.valid_until);
    campaign.donated_count += 1;
    log!(
        env,
        "donation accepted",
        campaign.donated_count,
        campaign.participants_count
    );

    events::publish_donation(
        env,
        DonationReceived {
            donor: donor.clone(),
            amount: campaign.donate_amount,
            donated_count: campaign.donated_count,
        },
    );
    Ok(())
}
