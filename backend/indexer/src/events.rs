//! Canonical event types emitted by the Assurer campaign contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/assurer/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the Assurer contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The author configured the campaign (`init` topic).
    CampaignInitialized,
    /// A donor contributed one share (`donated` topic).
    DonationReceived,
    /// The author collected a fully funded campaign (`claimed` topic).
    CampaignClaimed,
    /// A donor was refunded during Return (`refunded` topic).
    DonationRefunded,
    /// Return finished and the author received the remainder (`returned` topic).
    CampaignReturned,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "init" => Self::CampaignInitialized,
            "donated" => Self::DonationReceived,
            "claimed" => Self::CampaignClaimed,
            "refunded" => Self::DonationRefunded,
            "returned" => Self::CampaignReturned,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignInitialized => "campaign_initialized",
            Self::DonationReceived => "donation_received",
            Self::CampaignClaimed => "campaign_claimed",
            Self::DonationRefunded => "donation_refunded",
            Self::CampaignReturned => "campaign_returned",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`].
    pub fn from_stored(value: &str) -> Self {
        match value {
            "campaign_initialized" => Self::CampaignInitialized,
            "donation_received" => Self::DonationReceived,
            "campaign_claimed" => Self::CampaignClaimed,
            "donation_refunded" => Self::DonationRefunded,
            "campaign_returned" => Self::CampaignReturned,
            _ => Self::Unknown,
        }
    }
}

/// A fully decoded campaign event, ready to be stored in the database.
///
/// `actor` is the donor for donation and refund events and the author for
/// the others. `amount` is the goal for `init`, the share for donations and
/// refunds, the payout for `claimed` and the author's remainder for
/// `returned`. Amounts are kept as decimal strings because they are `i128`
/// on-chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignEvent {
    /// The RPC's event id, unique per emitted event.
    pub event_id: String,
    pub event_type: String,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Where the campaign stands according to the indexed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Deployed, no `init` seen yet.
    Created,
    Funding,
    Claimed,
    Returned,
}

/// Aggregate view over every indexed event of the campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSummary {
    pub status: CampaignStatus,
    pub goal: Option<String>,
    pub donations: u32,
    pub refunds: u32,
    pub total_donated: String,
    pub total_refunded: String,
    /// Paid to the author by Claim or Return.
    pub author_payout: Option<String>,
}

impl CampaignSummary {
    /// Fold stored events (in ledger order) into a summary. Records with an
    /// unparsable amount still count but add nothing to the totals.
    pub fn from_records(records: &[EventRecord]) -> Self {
        let mut status = CampaignStatus::Created;
        let mut goal = None;
        let mut donations = 0u32;
        let mut refunds = 0u32;
        let mut total_donated: i128 = 0;
        let mut total_refunded: i128 = 0;
        let mut author_payout = None;

        for record in records {
            let amount = record
                .amount
                .as_deref()
                .and_then(|a| a.parse::<i128>().ok());

            match EventKind::from_stored(&record.event_type) {
                EventKind::CampaignInitialized => {
                    status = CampaignStatus::Funding;
                    goal = record.amount.clone();
                }
                EventKind::DonationReceived => {
                    donations += 1;
                    total_donated += amount.unwrap_or(0);
                }
                EventKind::DonationRefunded => {
                    refunds += 1;
                    total_refunded += amount.unwrap_or(0);
                }
                EventKind::CampaignClaimed => {
                    status = CampaignStatus::Claimed;
                    author_payout = record.amount.clone();
                }
                EventKind::CampaignReturned => {
                    status = CampaignStatus::Returned;
                    author_payout = record.amount.clone();
                }
                EventKind::Unknown => {}
            }
        }

        CampaignSummary {
            status,
            goal,
            donations,
            refunds,
            total_donated: total_donated.to_string(),
            total_refunded: total_refunded.to_string(),
            author_payout,
        }
    }
}
