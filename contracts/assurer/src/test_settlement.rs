extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::config::{CLAIM_FEE, DONATE_FEE, INIT_FEE, MAX_PARTICIPANTS, REFUND_BATCH, UNIT};
use crate::invariants::{assert_active_predicate, assert_refunds_bounded, assert_settled};
use crate::test_setup::{
    setup, setup_initialized, DONATE_AMOUNT, GUARANTEE, ONE_HOUR, PARTICIPANTS, START,
};
use crate::{Error, Request};

const AUTHOR_START: i128 = 1_000 * UNIT;

/// Share of a 1_000-unit goal among 100 participants.
const LARGE_SHARE: i128 = 10 * UNIT;

// ── Claim ───────────────────────────────────────────────────────────

#[test]
fn test_claim_pays_author_everything() {
    let s = setup_initialized();
    s.donate_many(PARTICIPANTS);
    let escrowed = s.client.get_balance();
    assert_eq!(
        escrowed,
        GUARANTEE + INIT_FEE + (DONATE_AMOUNT + DONATE_FEE) * i128::from(PARTICIPANTS)
    );

    s.claim();

    // The fee goes in and comes straight back out with the balance.
    assert_eq!(s.client.get_balance(), 0);
    assert_eq!(s.balance(&s.author), AUTHOR_START - GUARANTEE - INIT_FEE + escrowed);
    assert_settled(&s.client.get_campaign(), s.client.get_balance());
}

#[test]
fn test_claim_errors() {
    let s = setup_initialized();
    let donors = s.donate_many(PARTICIPANTS - 1);

    assert_eq!(s.client.try_claim(&s.author, &CLAIM_FEE), Err(Ok(Error::Underfunded)));
    assert_eq!(s.client.try_claim(&donors[0], &CLAIM_FEE), Err(Ok(Error::Unauthorized)));

    s.donate(&s.funded_donor());

    // Before the deadline the deadline check comes first.
    assert_eq!(s.client.try_return_funds(), Err(Ok(Error::StillActive)));
    // After it, a fully funded campaign still cannot be returned.
    s.set_time(START + 2 * ONE_HOUR);
    assert_eq!(s.client.try_return_funds(), Err(Ok(Error::FullyFunded)));

    assert_eq!(s.client.try_claim(&donors[0], &CLAIM_FEE), Err(Ok(Error::Unauthorized)));
    s.claim();
    assert_eq!(s.client.get_balance(), 0);
}

#[test]
fn test_claim_requires_fee() {
    let s = setup_initialized();
    s.donate_many(PARTICIPANTS);
    let escrowed = s.client.get_balance();

    assert_eq!(
        s.client.try_claim(&s.author, &(CLAIM_FEE - 1)),
        Err(Ok(Error::NotEnoughCoins))
    );
    assert_eq!(s.client.try_claim(&s.author, &0), Err(Ok(Error::NotEnoughCoins)));
    assert!(!s.client.get_campaign().ended);
    assert_eq!(s.client.get_balance(), escrowed);

    // A surplus is not pulled.
    s.client.claim(&s.author, &(CLAIM_FEE * 10));
    assert_eq!(s.balance(&s.author), AUTHOR_START - GUARANTEE - INIT_FEE + escrowed);
}

#[test]
fn test_claim_before_init() {
    let s = setup();
    assert_eq!(s.client.try_claim(&s.author, &CLAIM_FEE), Err(Ok(Error::NotInitialized)));

    let stranger = Address::generate(&s.env);
    assert_eq!(s.client.try_claim(&stranger, &CLAIM_FEE), Err(Ok(Error::Unauthorized)));
}

#[test]
fn test_claim_through_submit_requires_caller() {
    let s = setup_initialized();
    s.donate_many(PARTICIPANTS);

    let result = s.client.try_submit(&None, &CLAIM_FEE, &Request::Claim);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));

    s.client.submit(&Some(s.author.clone()), &CLAIM_FEE, &Request::Claim);
    assert!(s.client.get_campaign().ended);
}

// ── Return ──────────────────────────────────────────────────────────

#[test]
fn test_return_refunds_donors_and_author() {
    let s = setup_initialized();

    assert_eq!(s.client.try_return_funds(), Err(Ok(Error::StillActive)));

    let donors = s.donate_many(5);
    assert_eq!(s.client.try_return_funds(), Err(Ok(Error::StillActive)));

    s.set_time(START + ONE_HOUR);
    assert_active_predicate(&s.client.get_campaign(), START + ONE_HOUR, s.client.is_active());
    // Five donors fit in one batch.
    s.client.return_funds();

    for donor in donors.iter() {
        // Funded with 100, paid amount + fee, refunded the amount.
        assert_eq!(s.balance(donor), 100 * UNIT - DONATE_FEE);
    }
    let remainder = GUARANTEE + INIT_FEE + DONATE_FEE * 5;
    assert_eq!(
        s.balance(&s.author),
        AUTHOR_START - GUARANTEE - INIT_FEE + remainder
    );
    assert_eq!(s.client.get_balance(), 0);
    assert_settled(&s.client.get_campaign(), s.client.get_balance());
}

#[test]
fn test_return_without_donors() {
    let s = setup_initialized();
    s.set_time(START + ONE_HOUR);

    assert_eq!(s.client.try_return_funds(), Err(Ok(Error::NoDonators)));
    assert!(!s.client.get_campaign().ended);
    assert_eq!(s.client.get_balance(), GUARANTEE + INIT_FEE);
}

#[test]
fn test_return_before_init() {
    let s = setup();
    assert_eq!(s.client.try_return_funds(), Err(Ok(Error::NotInitialized)));
}

#[test]
fn test_return_through_submit_ignores_caller() {
    let s = setup_initialized();
    s.donate_many(3);
    s.set_time(START + ONE_HOUR);

    let bystander = Address::generate(&s.env);
    s.client.submit(&Some(bystander.clone()), &0, &Request::Return);

    assert_eq!(s.balance(&bystander), 0);
    assert_eq!(s.client.get_balance(), 0);
}

#[test]
fn test_return_resumes_in_batches() {
    let s = setup();
    s.init(1_000 * UNIT, 100 * UNIT, 100, START + ONE_HOUR, 150 * UNIT);
    let donors = s.donate_many(REFUND_BATCH * 2 + 3);
    s.set_time(START + ONE_HOUR);
    let held = s.client.get_balance();

    s.client.return_funds();

    let campaign = s.client.get_campaign();
    assert_eq!(campaign.refunded_count, REFUND_BATCH);
    assert!(!campaign.ended);
    assert_refunds_bounded(&campaign, START + ONE_HOUR);
    assert_eq!(
        s.client.get_balance(),
        held - LARGE_SHARE * i128::from(REFUND_BATCH)
    );
    for (position, donor) in donors.iter().enumerate() {
        let refunded = position < REFUND_BATCH as usize;
        let expected = if refunded {
            100 * UNIT - DONATE_FEE
        } else {
            100 * UNIT - DONATE_FEE - LARGE_SHARE
        };
        assert_eq!(s.balance(donor), expected);
    }

    // Mid-sweep the campaign stays closed to everything but Return.
    assert!(!s.client.is_active());
    assert_eq!(s.client.try_claim(&s.author, &CLAIM_FEE), Err(Ok(Error::Underfunded)));
    assert_eq!(
        s.client.try_donate(&s.funded_donor(), &(50 * UNIT)),
        Err(Ok(Error::NotActive))
    );

    assert_eq!(s.return_all(), 2);
    let campaign = s.client.get_campaign();
    assert_eq!(campaign.refunded_count, campaign.donated_count);
    assert_settled(&campaign, s.client.get_balance());
    for donor in donors.iter() {
        assert_eq!(s.balance(donor), 100 * UNIT - DONATE_FEE);
    }
}

#[test]
fn test_return_refunds_full_capacity_minus_one() {
    let s = setup();
    s.init(
        1_000 * UNIT,
        100 * UNIT,
        MAX_PARTICIPANTS,
        START + ONE_HOUR,
        150 * UNIT,
    );
    let donors = s.donate_many(MAX_PARTICIPANTS - 1);
    s.set_time(START + ONE_HOUR);

    let requests = s.return_all();

    assert_eq!(requests, (MAX_PARTICIPANTS - 1).div_ceil(REFUND_BATCH));
    for donor in donors.iter() {
        assert_eq!(s.balance(donor), 100 * UNIT - DONATE_FEE);
    }
    assert_settled(&s.client.get_campaign(), s.client.get_balance());
    assert_eq!(s.client.try_return_funds(), Err(Ok(Error::FundingEnded)));
}

// ── Terminal state ──────────────────────────────────────────────────

#[test]
fn test_settlement_only_once_after_claim() {
    let s = setup_initialized();
    s.donate_many(PARTICIPANTS);
    s.claim();

    assert_eq!(s.client.try_claim(&s.author, &CLAIM_FEE), Err(Ok(Error::FundingEnded)));
    assert_eq!(s.client.try_return_funds(), Err(Ok(Error::FundingEnded)));
    s.set_time(START + ONE_HOUR);
    assert_eq!(s.client.try_return_funds(), Err(Ok(Error::FundingEnded)));
    assert!(!s.client.is_active());
}

#[test]
fn test_settlement_only_once_after_return() {
    let s = setup_initialized();
    s.donate_many(2);
    s.set_time(START + ONE_HOUR);
    s.client.return_funds();

    assert_eq!(s.client.try_return_funds(), Err(Ok(Error::FundingEnded)));
    assert_eq!(s.client.try_claim(&s.author, &CLAIM_FEE), Err(Ok(Error::FundingEnded)));

    let late = s.funded_donor();
    assert_eq!(
        s.client.try_donate(&late, &(50 * UNIT)),
        Err(Ok(Error::NotActive))
    );
}
