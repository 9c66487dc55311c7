//! Summarizer: latest status per voucher and status frequency tables
//!
//! The endpoint gives no ordering guarantee, so chronology is reconstructed
//! from each event's date and time strings, parsed day-first. An event whose
//! date cannot be parsed sorts before every parsable one, so a corrupt date
//! never makes an event masquerade as the latest; when a voucher has only
//! unparsable dates, ties resolve to the last event in input order.

use crate::types::{LatestStatusRow, StatusCount, Summary, TrackingEvent};
use chrono::NaiveDateTime;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// Timestamp format candidates, day-first forms before ISO
///
/// The endpoint has emitted both `14/01/2025 10:10` and `2025-01-14 10:10`
/// shaped values over time.
const TIMESTAMP_FORMATS: [&str; 6] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Reconstruct a sortable timestamp from an event's date and time strings
///
/// Returns `None` when no candidate format matches; `None` sorts before every
/// valid timestamp.
pub fn derive_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let combined = format!("{} {}", date.trim(), time.trim());
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())
}

/// Derive the latest-status and status-counts tables from a run's events
///
/// Per voucher, the event with the greatest derived timestamp wins; ties
/// (including fully unparsable groups) go to the later event in input order.
/// The latest table is sorted by voucher ascending. Counts are tallied over
/// latest rows only and ordered frequency descending, then status ascending,
/// so repeated calls over the same input yield identical tables.
///
/// An empty input yields two empty tables.
pub fn summarize(events: &[TrackingEvent]) -> Summary {
    // (timestamp, input index) — Option<NaiveDateTime> orders None first,
    // and the index makes the last input win on equal timestamps
    let mut latest_per_voucher: BTreeMap<&crate::types::Voucher, (Option<NaiveDateTime>, usize)> =
        BTreeMap::new();

    for (idx, event) in events.iter().enumerate() {
        let key = (derive_timestamp(&event.date, &event.time), idx);
        latest_per_voucher
            .entry(&event.voucher)
            .and_modify(|best| {
                if key >= *best {
                    *best = key;
                }
            })
            .or_insert(key);
    }

    let latest: Vec<LatestStatusRow> = latest_per_voucher
        .into_values()
        .map(|(_, idx)| {
            let event = &events[idx];
            LatestStatusRow {
                voucher: event.voucher.clone(),
                status: event.status.clone(),
                date: event.date.clone(),
                time: event.time.clone(),
                location: event.location.clone(),
            }
        })
        .collect();

    let mut tally: HashMap<&str, u64> = HashMap::new();
    for row in &latest {
        *tally.entry(row.status.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<StatusCount> = tally
        .into_iter()
        .map(|(status, vouchers)| StatusCount {
            status: status.to_string(),
            vouchers,
        })
        .collect();
    counts.sort_by(|a, b| {
        Reverse(a.vouchers)
            .cmp(&Reverse(b.vouchers))
            .then_with(|| a.status.cmp(&b.status))
    });

    Summary { latest, counts }
}
