//! # Dispatch
//!
//! Routes a [`Request`] to its handler and owns the load/persist cycle of the
//! campaign record. This is also the single authorization boundary: the two
//! privileged requests (Initialize, Claim) are compared against the stored
//! author here and nowhere else.
//!
//! A handler either returns `Ok` with the campaign mutated in memory, which is
//! then saved, or an `Error`, in which case nothing is saved and the host
//! discards any side effects of the invocation.

use soroban_sdk::{log, token, Address, Env};

use crate::config::INIT_FEE;
use crate::events::{self, CampaignInitialized};
use crate::ledger;
use crate::settlement;
use crate::storage;
use crate::types::{Campaign, InitParams, Request};
use crate::validation;
use crate::Error;

pub fn dispatch(
    env: &Env,
    caller: Option<Address>,
    value: i128,
    request: Request,
) -> Result<(), Error> {
    let mut campaign = storage::load_campaign(env);
    log!(env, "dispatch", request.opcode());

    match request {
        Request::Initialize(params) => {
            let author = require_author(&campaign, caller)?;
            initialize(env, &mut campaign, &author, &params, value)?;
        }
        Request::Donate => {
            let donor = caller.ok_or(Error::Unauthorized)?;
            donor.require_auth();
            ledger::donate(env, &mut campaign, &donor, value)?;
        }
        Request::Claim => {
            let author = require_author(&campaign, caller)?;
            settlement::claim(env, &mut campaign, &author, value)?;
        }
        // Return is a trigger; whoever submits it pays nothing and gains nothing.
        Request::Return => {
            settlement::return_funds(env, &mut campaign)?;
        }
    }

    storage::save_campaign(env, &campaign);
    Ok(())
}

fn require_author(campaign: &Campaign, caller: Option<Address>) -> Result<Address, Error> {
    let caller = caller.ok_or(Error::Unauthorized)?;
    caller.require_auth();
    if caller != campaign.author {
        return Err(Error::Unauthorized);
    }
    Ok(caller)
}

fn initialize(
    env: &Env,
    campaign: &mut Campaign,
    author: &Address,
    params: &InitParams,
    value: i128,
) -> Result<(), Error> {
    let donate_amount = validation::validate_init(campaign, params, value)?;

    let escrowed = params.guarantee_amount.saturating_add(INIT_FEE);
    token::Client::new(env, &campaign.token).transfer(
        author,
        &env.current_contract_address(),
        &escrowed,
    );

    campaign.goal = params.goal;
    campaign.guarantee_amount = params.guarantee_amount;
    campaign.participants_count = params.participants_count;
    campaign.valid_until = params.valid_until;
    campaign.donate_amount = donate_amount;
    campaign.donated_count = 0;
    campaign.ended = false;
    campaign.initialized = true;

    events::publish_initialized(
        env,
        CampaignInitialized {
            author: author.clone(),
            goal: campaign.goal,
            guarantee_amount: campaign.guarantee_amount,
            participants_count: campaign.participants_count,
            donate_amount,
            valid_until: campaign.valid_until,
        },
    );
    Ok(())
}
