//! Response parser for the courier tracking payload
//!
//! The endpoint's JSON is only loosely structured:
//! `{"status": 1, "result": {"<voucher>": {"result": [{status,date,time,place}, ...]}}}`.
//! Only fundamentally malformed bytes are a hard error ([`Error::Format`]).
//! Content anomalies degrade silently: a non-success status flag, a missing
//! voucher key, or a non-array result all yield an empty event list, and any
//! missing per-event field becomes the literal "N/A".

use crate::error::Result;
use crate::types::{NOT_AVAILABLE, TrackingEvent, Voucher};
use serde::Deserialize;
use serde_json::Value;

/// The endpoint signals "data available" with this top-level status value
const STATUS_SUCCESS: i64 = 1;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Top-level payload shape; leaves stay loose since the endpoint does not
/// honor a strict schema for them
#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
}

/// Parse the raw endpoint response into normalized tracking events
///
/// Strips a UTF-8 byte-order mark if present (the endpoint emits one
/// inconsistently), then decodes the JSON payload. Returns one
/// [`TrackingEvent`] per raw record under `result[<voucher>].result`, in
/// source order, each tagged with the requested voucher.
///
/// Never fails on payload content; the only error is [`Error::Format`] for
/// bytes that are not valid JSON.
///
/// [`Error::Format`]: crate::error::Error::Format
pub fn parse_tracking_response(bytes: &[u8], voucher: &Voucher) -> Result<Vec<TrackingEvent>> {
    let bytes = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    let payload: RawPayload = serde_json::from_slice(bytes)?;

    if payload.status.as_ref().and_then(Value::as_i64) != Some(STATUS_SUCCESS) {
        return Ok(Vec::new());
    }

    let records = payload
        .result
        .as_ref()
        .and_then(|result| result.get(voucher.as_str()))
        .and_then(|entry| entry.get("result"))
        .and_then(Value::as_array);

    let Some(records) = records else {
        return Ok(Vec::new());
    };

    Ok(records
        .iter()
        .map(|record| TrackingEvent {
            voucher: voucher.clone(),
            status: field_or_na(record, "status"),
            date: field_or_na(record, "date"),
            time: field_or_na(record, "time"),
            location: field_or_na(record, "place"),
        })
        .collect())
}

/// Extract one event field as a string, substituting "N/A" when absent
///
/// Non-string scalars (the endpoint occasionally emits bare numbers) are
/// rendered through their JSON representation rather than dropped.
fn field_or_na(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => NOT_AVAILABLE.to_string(),
        Some(other) => other.to_string(),
    }
}
