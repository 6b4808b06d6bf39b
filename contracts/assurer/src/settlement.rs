//! # Settlement
//!
//! The two terminal paths of a campaign. Exactly one of them can succeed,
//! after which `ended` is set and both reject with `FundingEnded`.
//!
//! * **Claim**: the campaign is fully funded; the author pays the
//!   `CLAIM_FEE` and collects the whole escrowed balance in one transfer.
//! * **Return**: the deadline passed with the pool short of capacity; every
//!   donor gets `donate_amount` back and the author receives what remains
//!   (guarantee plus retained fees).
//!
//! A Return request refunds at most [`REFUND_BATCH`] donors, resuming at
//! `refunded_count`. The request that refunds the last donor pays the
//! remainder and ends the campaign. Until then the campaign is past its
//! deadline, so it is inactive and Claim still fails with `Underfunded`.

use soroban_sdk::{log, token, Address, Env};

use crate::config::{CLAIM_FEE, REFUND_BATCH};
use crate::events::{self, CampaignClaimed, CampaignReturned, DonationRefunded};
use crate::storage;
use crate::types::Campaign;
use crate::Error;

/// Take the service fee from `author` and pay the full balance back to
/// them. Caller authorization is the dispatcher's job.
///
/// Checks, in order: `FundingEnded`, `NotInitialized`, `Underfunded`,
/// `NotEnoughCoins`.
pub fn claim(
    env: &Env,
    campaign: &mut Campaign,
    author: &Address,
    value: i128,
) -> Result<(), Error> {
    if campaign.ended {
        return Err(Error::FundingEnded);
    }
    if !campaign.initialized {
        return Err(Error::NotInitialized);
    }
    if !campaign.is_fully_funded() {
        return Err(Error::Underfunded);
    }
    if value < CLAIM_FEE {
        return Err(Error::NotEnoughCoins);
    }

    let token = token::Client::new(env, &campaign.token);
    let contract = env.current_contract_address();
    token.transfer(author, &contract, &CLAIM_FEE);

    let amount = token.balance(&contract);
    token.transfer(&contract, author, &amount);
    campaign.ended = true;

    events::publish_claimed(
        env,
        CampaignClaimed {
            author: author.clone(),
            amount,
        },
    );
    Ok(())
}

/// Refund the next batch of donors; the batch that completes the sweep
/// pays the remainder to the author. Anyone may trigger it.
///
/// Checks, in order: `FundingEnded`, `NotInitialized`, `StillActive`,
/// `FullyFunded`, `NoDonators`.
pub fn return_funds(env: &Env, campaign: &mut Campaign) -> Result<(), Error> {
    if campaign.ended {
        return Err(Error::FundingEnded);
    }
    if !campaign.initialized {
        return Err(Error::NotInitialized);
    }
    if env.ledger().timestamp() < campaign.valid_until {
        return Err(Error::StillActive);
    }
    if campaign.is_fully_funded() {
        return Err(Error::FullyFunded);
    }
    if campaign.donated_count == 0 {
        return Err(Error::NoDonators);
    }

    let token = token::Client::new(env, &campaign.token);
    let contract = env.current_contract_address();

    let from = campaign.refunded_count;
    let to = from
        .saturating_add(REFUND_BATCH)
        .min(campaign.donated_count);
    for position in from..to {
        let donor = storage::donor_at(env, position);
        token.transfer(&contract, &donor, &campaign.donate_amount);
        events::publish_refund(
            env,
            DonationRefunded {
                donor,
                amount: campaign.donate_amount,
            },
        );
    }
    campaign.refunded_count = to;
    log!(env, "refunded", to, campaign.donated_count);

    if campaign.refunded_count < campaign.donated_count {
        return Ok(());
    }

    let remainder = token.balance(&contract);
    if remainder > 0 {
        token.transfer(&contract, &campaign.author, &remainder);
    }
    campaign.ended = true;

    events::publish_returned(
        env,
        CampaignReturned {
            author: campaign.author.clone(),
            refunded_count: campaign.donated_count,
            remainder,
        },
    );
    Ok(())
}
