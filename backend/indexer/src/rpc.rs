//! Soroban RPC client: polls `getEvents` and decodes Assurer campaign events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//! * `-32600` (invalid request) and `-32601` (method not found) are never
//!   retried.
//!
//! ## Decoding
//!
//! Requests ask for `xdrFormat: "json"`, so topics and data arrive as
//! `topicJson`/`valueJson` in the stellar-xdr JSON shape
//! (`{"symbol":"donated"}`, `{"address":"G..."}`, `{"i128":"100"}`,
//! `{"map":[{"key":..,"val":..}]}`). [`plain_scval`] flattens that into plain
//! JSON before fields are read. The base64 `topic`/`value` strings are a
//! fallback that only yields the event kind.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{CampaignEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// XDR discriminant of `ScVal::Symbol`.
const SCV_SYMBOL: u32 = 15;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    fn is_hard(&self) -> bool {
        self.code == -32600 || self.code == -32601
    }
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Unique per event; the storage dedupe key.
    pub id: Option<String>,
    /// Topic list as base64 XDR (or legacy JSON strings).
    #[serde(default)]
    pub topic: Vec<String>,
    /// Event data as base64 XDR (or legacy JSON).
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "topicJson")]
    pub topic_json: Option<Vec<Value>>,
    #[serde(rename = "valueJson")]
    pub value_json: Option<Value>,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Back-off
// ─────────────────────────────────────────────────────────

/// Doubling retry delay, capped at [`MAX_BACKOFF_SECS`].
#[derive(Debug)]
struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Self {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    /// Current delay; the following call returns twice as much.
    fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_secs(self.secs);
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
        delay
    }
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` is the ledger sequence to scan from (inclusive).
/// * `cursor` is an optional opaque pagination cursor from a previous response.
/// * `limit` caps the number of events returned.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = Backoff::new();

    loop {
        let params = build_params(contract_id, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        let resp = match response {
            Ok(resp) => resp,
            Err(e) => {
                let delay = backoff.next_delay();
                warn!("RPC request failed (will retry in {delay:?}): {e}");
                tokio::time::sleep(delay).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let delay = backoff.next_delay();
            warn!("Rate-limited by RPC (will retry in {delay:?})");
            tokio::time::sleep(delay).await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if err.is_hard() {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            let delay = backoff.next_delay();
            warn!(
                "RPC soft error (will retry in {delay:?}): {} {}",
                err.code, err.message
            );
            tokio::time::sleep(delay).await;
            continue;
        }

        let result = body
            .result
            .ok_or_else(|| IndexerError::EventParse("Empty result from getEvents".to_string()))?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok((result.events, result.cursor, result.latest_ledger));
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`CampaignEvent`] structs.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<CampaignEvent> {
    raw.iter()
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<CampaignEvent> {
    let Some(event_id) = raw.id.clone() else {
        debug!("Skipping event without id at ledger {:?}", raw.ledger);
        return None;
    };
    let symbol = match &raw.topic_json {
        Some(topics) => topics.first().map(plain_scval)?.as_str()?.to_string(),
        None => extract_symbol(raw.topic.first()?),
    };
    let kind = EventKind::from_topic(&symbol);

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let (actor, amount) = match &raw.value_json {
        Some(value) => decode_data(&plain_scval(value), kind),
        None => decode_data(&raw.value, kind),
    };
    // `donated` and `refunded` carry the donor as a second topic.
    let actor = actor.or_else(|| match &raw.topic_json {
        Some(topics) => topics.get(1).and_then(scval_address),
        None => raw.topic.get(1).and_then(|t| extract_address(t)),
    });

    Some(CampaignEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        actor,
        amount,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.as_deref().and_then(normalize_tx_hash),
    })
}

/// Pull the actor and amount out of the event data for each kind.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::CampaignInitialized => (
            extract_field(value, &["author"]),
            extract_field(value, &["goal"]),
        ),
        EventKind::DonationReceived | EventKind::DonationRefunded => (
            extract_field(value, &["donor"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::CampaignClaimed => (
            extract_field(value, &["author"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::CampaignReturned => (
            extract_field(value, &["author"]),
            extract_field(value, &["remainder"]),
        ),
        EventKind::Unknown => (None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        let found = match value.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(nested) => nested.get("value").and_then(scalar_to_string),
            None => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Flatten a stellar-xdr JSON `ScVal` into plain JSON: symbols, strings and
/// addresses become strings, 128-bit integers become decimal strings, maps
/// become objects keyed by their (symbol) keys. Anything not in that shape
/// is returned unchanged.
fn plain_scval(v: &Value) -> Value {
    let Some(obj) = v.as_object().filter(|o| o.len() == 1) else {
        return v.clone();
    };
    let Some((tag, inner)) = obj.iter().next() else {
        return v.clone();
    };
    match tag.as_str() {
        "symbol" | "string" | "address" | "bool" | "u32" | "i32" | "u64" | "i64" => {
            inner.clone()
        }
        "i128" | "u128" => int128_to_string(inner, tag == "i128")
            .map(Value::String)
            .unwrap_or_else(|| v.clone()),
        "vec" => match inner.as_array() {
            Some(items) => Value::Array(items.iter().map(plain_scval).collect()),
            None => Value::Null,
        },
        "map" => match inner.as_array() {
            Some(entries) => Value::Object(
                entries
                    .iter()
                    .filter_map(|entry| {
                        let key = match plain_scval(entry.get("key")?) {
                            Value::String(s) => s,
                            other => other.to_string(),
                        };
                        Some((key, plain_scval(entry.get("val")?)))
                    })
                    .collect(),
            ),
            None => Value::Null,
        },
        _ => v.clone(),
    }
}

/// A 128-bit integer is either a decimal string or `{"hi":..,"lo":..}` parts.
fn int128_to_string(v: &Value, signed: bool) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(parts) => {
            let hi = parts.get("hi")?;
            let lo = parts.get("lo")?.as_u64()?;
            if signed {
                let hi = hi.as_i64()?;
                Some(((i128::from(hi) << 64) | i128::from(lo)).to_string())
            } else {
                let hi = hi.as_u64()?;
                Some(((u128::from(hi) << 64) | u128::from(lo)).to_string())
            }
        }
        _ => None,
    }
}

/// The strkey of an `{"address": ...}` topic.
fn scval_address(v: &Value) -> Option<String> {
    v.get("address").and_then(|a| a.as_str()).map(String::from)
}

/// Extract a Soroban Symbol from a topic entry.
///
/// The RPC may return `{"type":"symbol","value":"donated"}`, a base64 XDR
/// `ScVal`, or just the raw string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    if let Some(symbol) = decode_xdr_symbol(raw) {
        return symbol;
    }
    raw.to_string()
}

/// Decode a base64 XDR `ScVal` holding a symbol: a big-endian discriminant,
/// a big-endian length, then the bytes padded to four.
fn decode_xdr_symbol(raw: &str) -> Option<String> {
    let bytes = STANDARD.decode(raw.trim()).ok()?;
    if bytes.len() < 8 {
        return None;
    }
    let discriminant = u32::from_be_bytes(bytes[0..4].try_into().ok()?);
    if discriminant != SCV_SYMBOL {
        return None;
    }
    let len = u32::from_be_bytes(bytes[4..8].try_into().ok()?) as usize;
    let body = bytes.get(8..8 + len)?;
    String::from_utf8(body.to_vec()).ok()
}

/// Address topics only decode from the JSON form.
fn extract_address(raw: &str) -> Option<String> {
    let v = serde_json::from_str::<Value>(raw).ok()?;
    match v.get("type").and_then(|t| t.as_str()) {
        Some("address") => v.get("value").and_then(|x| x.as_str()).map(String::from),
        _ => None,
    }
}

/// Canonical lowercase form of a 32-byte transaction hash, `None` if the
/// string is not one.
fn normalize_tx_hash(raw: &str) -> Option<String> {
    let bytes = hex::decode(raw.trim()).ok()?;
    if bytes.len() != 32 {
        return None;
    }
    Some(hex::encode(bytes))
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
