//! # Config
//!
//! Campaign thresholds, fees and request opcodes.
//!
//! Amounts are expressed in the smallest unit of the escrow token. Stellar
//! assets use 7 decimals, so one whole coin is [`UNIT`] = 10^7 stroops.
//!
//! | Constant                | Value      | Checked by      |
//! |-------------------------|------------|-----------------|
//! | `MIN_GOAL`              | 50 coins   | Initialize      |
//! | `MIN_GUARANTEE`         | 5 coins    | Initialize      |
//! | `MAX_GUARANTEE_PERCENT` | 25 %       | Initialize      |
//! | `MAX_PARTICIPANTS`      | 500        | Initialize      |
//! | `MAX_FUNDING_PERIOD`    | 30 days    | Initialize      |
//! | `MIN_DONATE`            | 1 coin     | Initialize      |
//! | `INIT_FEE`              | 4 coins    | Initialize      |
//! | `INIT_RESERVE`          | 1 coin     | Initialize      |
//! | `DONATE_FEE`            | 0.02 coins | Donate          |
//! | `CLAIM_FEE`             | 1 coin     | Claim           |
//!
//! `MAX_PARTICIPANTS` bounds the refund sweep in `return_funds`, which runs
//! in chunks of [`REFUND_BATCH`] donors per request.

/// One whole coin of a 7-decimal token.
pub const UNIT: i128 = 10_000_000;

pub const SECONDS_PER_DAY: u64 = 86_400;

// ── Initialization bounds ────────────────────────────────────────────

/// Smallest goal a campaign may set.
pub const MIN_GOAL: i128 = 50 * UNIT;

/// Smallest collateral the author must escrow.
pub const MIN_GUARANTEE: i128 = 5 * UNIT;

/// Upper bound of the guarantee, as a percentage of the goal.
pub const MAX_GUARANTEE_PERCENT: i128 = 25;

/// Capacity cap of the donor pool.
pub const MAX_PARTICIPANTS: u32 = 500;

/// Longest allowed distance between creation and `valid_until`, in seconds.
pub const MAX_FUNDING_PERIOD: u64 = 30 * SECONDS_PER_DAY;

/// Smallest per-participant share (`goal / participants_count`).
pub const MIN_DONATE: i128 = UNIT;

// ── Fees ─────────────────────────────────────────────────────────────

/// Retained by the contract on Initialize as storage/rent reserve.
pub const INIT_FEE: i128 = 4 * UNIT;

/// Headroom the Initialize attachment must carry on top of the guarantee and
/// `INIT_FEE`. Not retained.
pub const INIT_RESERVE: i128 = UNIT;

/// Retained by the contract on every donation, on top of the donate amount.
pub const DONATE_FEE: i128 = UNIT / 50;

/// Service fee a Claim must carry. Paid out to the author with the balance.
pub const CLAIM_FEE: i128 = UNIT;

// ── Settlement ───────────────────────────────────────────────────────

/// Donors refunded by one Return request. Each refund reads two ledger
/// entries and writes one, so a batch stays within a transaction's
/// footprint and CPU limits.
pub const REFUND_BATCH: u32 = 16;

// ── Request opcodes ──────────────────────────────────────────────────

pub const INIT_OP: u32 = 0x0000_0000;
pub const DONATE_OP: u32 = 0x6e89_546a;
pub const CLAIM_OP: u32 = 0x6d7a_e559;
pub const RETURN_OP: u32 = 0x85d3_2319;
