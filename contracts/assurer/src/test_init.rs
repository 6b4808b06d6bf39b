extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::config::{INIT_FEE, SECONDS_PER_DAY, UNIT};
use crate::invariants::assert_all_campaign_invariants;
use crate::test_setup::{
    setup, setup_initialized, DONATE_AMOUNT, GOAL, GUARANTEE, INIT_VALUE, ONE_HOUR, PARTICIPANTS,
    START,
};
use crate::{Error, InitParams, Request};

fn try_init(
    s: &crate::test_setup::Setup,
    caller: &Address,
    goal: i128,
    guarantee_amount: i128,
    participants_count: u32,
    valid_until: u64,
    value: i128,
) -> Result<(), Error> {
    match s.client.try_initialize(
        caller,
        &goal,
        &guarantee_amount,
        &participants_count,
        &valid_until,
        &value,
    ) {
        Ok(_) => Ok(()),
        Err(Ok(e)) => Err(e),
        Err(Err(e)) => panic!("unexpected invoke error: {:?}", e),
    }
}

#[test]
fn test_deploy_starts_uninitialized() {
    let s = setup();
    let campaign = s.client.get_campaign();

    assert_eq!(campaign.author, s.author);
    assert_eq!(campaign.token, s.token.address);
    assert_eq!(campaign.created_time, START);
    assert!(!campaign.initialized);
    assert!(!campaign.ended);
    assert!(!s.client.is_active());
    assert_eq!(s.client.get_balance(), 0);
}

#[test]
fn test_init_errors_in_check_order() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    let deadline = START + ONE_HOUR;

    assert_eq!(
        try_init(&s, &s.author, 49 * UNIT, 20 * UNIT, 10, deadline, 21 * UNIT),
        Err(Error::SmallFundingAmount)
    );
    // Authorization is checked before any term.
    assert_eq!(
        try_init(&s, &stranger, 49 * UNIT, 20 * UNIT, 10, deadline, 21 * UNIT),
        Err(Error::Unauthorized)
    );
    assert_eq!(
        try_init(&s, &s.author, 100 * UNIT, 5 * UNIT - 1, 10, deadline, 21 * UNIT),
        Err(Error::SmallGuaranteeAmount)
    );
    assert_eq!(
        try_init(&s, &s.author, 100 * UNIT, 26 * UNIT, 10, deadline, 21 * UNIT),
        Err(Error::BigGuaranteeAmount)
    );
    assert_eq!(
        try_init(&s, &s.author, 100 * UNIT, 20 * UNIT, 0, deadline, 21 * UNIT),
        Err(Error::NoParticipants)
    );
    assert_eq!(
        try_init(&s, &s.author, 600 * UNIT, 50 * UNIT, 501, deadline, 51 * UNIT),
        Err(Error::ManyParticipants)
    );
    assert_eq!(
        try_init(&s, &s.author, 100 * UNIT, 25 * UNIT, 10, START + 31 * SECONDS_PER_DAY, 21 * UNIT),
        Err(Error::BigFundingPeriod)
    );
    assert_eq!(
        try_init(&s, &s.author, 100 * UNIT, 25 * UNIT, 101, deadline, 21 * UNIT),
        Err(Error::SmallDonateAmount)
    );
    assert_eq!(
        try_init(&s, &s.author, 100 * UNIT, 25 * UNIT, 100, deadline, 30 * UNIT - 1),
        Err(Error::NotEnoughCoins)
    );

    // No failed attempt left a trace.
    assert!(!s.client.get_campaign().initialized);
    assert_eq!(s.client.get_balance(), 0);
    assert_eq!(s.balance(&s.author), 1_000 * UNIT);
}

#[test]
fn test_init_escrows_guarantee_and_fee() {
    let s = setup_initialized();

    assert_eq!(s.client.get_balance(), GUARANTEE + INIT_FEE);
    assert_eq!(s.balance(&s.author), 1_000 * UNIT - GUARANTEE - INIT_FEE);
}

#[test]
fn test_funding_data_after_init() {
    let s = setup_initialized();
    let data = s.client.get_funding_data();

    assert_eq!(data.goal, GOAL);
    assert_eq!(data.donate_amount, DONATE_AMOUNT);
    assert_eq!(data.guarantee_amount, GUARANTEE);
    assert_eq!(data.participants_count, PARTICIPANTS);
    assert_eq!(data.donated_count, 0);
    assert_eq!(data.valid_until, START + ONE_HOUR);
    assert_eq!(data.donors, None);

    assert_all_campaign_invariants(&s.client.get_campaign(), &data, s.env.ledger().timestamp());
}

#[test]
fn test_active_until_deadline() {
    let s = setup_initialized();
    assert!(s.client.is_active());

    s.set_time(START + ONE_HOUR - 1);
    assert!(s.client.is_active());

    s.set_time(START + ONE_HOUR);
    assert!(!s.client.is_active());
}

#[test]
fn test_second_init_rejected() {
    let s = setup_initialized();
    let before = s.client.get_campaign();

    let result = try_init(&s, &s.author, 200 * UNIT, 10 * UNIT, 20, START + ONE_HOUR, INIT_VALUE);
    assert_eq!(result, Err(Error::AlreadyInitialized));
    assert_eq!(s.client.get_campaign(), before);
    assert_eq!(s.client.get_balance(), GUARANTEE + INIT_FEE);
}

#[test]
fn test_init_through_submit() {
    let s = setup();
    let params = InitParams {
        goal: GOAL,
        guarantee_amount: GUARANTEE,
        participants_count: PARTICIPANTS,
        valid_until: START + ONE_HOUR,
    };

    let result = s
        .client
        .try_submit(&None, &INIT_VALUE, &Request::Initialize(params.clone()));
    assert_eq!(result, Err(Ok(Error::Unauthorized)));

    s.client
        .submit(&Some(s.author.clone()), &INIT_VALUE, &Request::Initialize(params));
    let campaign = s.client.get_campaign();
    assert!(campaign.initialized);
    assert_eq!(campaign.donate_amount, DONATE_AMOUNT);
}
