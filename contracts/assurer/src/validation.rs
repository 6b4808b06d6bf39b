//! # Validation
//!
//! Pure predicate checks applied to an Initialize request.
//!
//! The checks run in a fixed order and the first failure is reported, so a
//! request violating several bounds always yields the same error:
//!
//! 1. `AlreadyInitialized`
//! 2. `SmallFundingAmount`: `goal < MIN_GOAL`
//! 3. `SmallGuaranteeAmount`: `guarantee < MIN_GUARANTEE`
//! 4. `BigGuaranteeAmount`: `guarantee > goal * MAX_GUARANTEE_PERCENT / 100`
//! 5. `NoParticipants`: `participants_count == 0`
//! 6. `ManyParticipants`: `participants_count > MAX_PARTICIPANTS`
//! 7. `BigFundingPeriod`: `valid_until - created_time > MAX_FUNDING_PERIOD`
//! 8. `SmallDonateAmount`: `goal / participants_count < MIN_DONATE`
//! 9. `NotEnoughCoins`: `value < guarantee + INIT_FEE + INIT_RESERVE`
//!
//! Caller authorization is checked by the dispatcher before any of these.

use crate::config::{
    INIT_FEE, INIT_RESERVE, MAX_FUNDING_PERIOD, MAX_GUARANTEE_PERCENT, MAX_PARTICIPANTS,
    MIN_DONATE, MIN_GOAL, MIN_GUARANTEE,
};
use crate::types::{Campaign, InitParams};
use crate::Error;

/// Validate `params` against `campaign` and the attached `value`.
///
/// Returns the derived donate amount on success.
pub fn validate_init(campaign: &Campaign, params: &InitParams, value: i128) -> Result<i128, Error> {
    if campaign.initialized {
        return Err(Error::AlreadyInitialized);
    }
    if params.goal < MIN_GOAL {
        return Err(Error::SmallFundingAmount);
    }
    if params.guarantee_amount < MIN_GUARANTEE {
        return Err(Error::SmallGuaranteeAmount);
    }
    if exceeds_guarantee_ratio(params.goal, params.guarantee_amount) {
        return Err(Error::BigGuaranteeAmount);
    }
    if params.participants_count == 0 {
        return Err(Error::NoParticipants);
    }
    if params.participants_count > MAX_PARTICIPANTS {
        return Err(Error::ManyParticipants);
    }
    if funding_period(campaign.created_time, params.valid_until) > MAX_FUNDING_PERIOD {
        return Err(Error::BigFundingPeriod);
    }

    let donate_amount = params.goal / i128::from(params.participants_count);
    if donate_amount < MIN_DONATE {
        return Err(Error::SmallDonateAmount);
    }
    if value < required_init_value(params.guarantee_amount) {
        return Err(Error::NotEnoughCoins);
    }

    Ok(donate_amount)
}

/// Minimum attachment an Initialize request must carry.
pub fn required_init_value(guarantee_amount: i128) -> i128 {
    guarantee_amount
        .saturating_add(INIT_FEE)
        .saturating_add(INIT_RESERVE)
}

// `guarantee * 100 > goal * pct`, kept in integers so 25.0% is exact.
fn exceeds_guarantee_ratio(goal: i128, guarantee_amount: i128) -> bool {
    guarantee_amount.saturating_mul(100) > goal.saturating_mul(MAX_GUARANTEE_PERCENT)
}

// A deadline before creation is a zero-length period.
fn funding_period(created_time: u64, valid_until: u64) -> u64 {
    valid_until.saturating_sub(created_time)
}
