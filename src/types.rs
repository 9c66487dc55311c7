//! Core types for elta-tracker

use serde::{Deserialize, Serialize};

/// Sentinel substituted for any event field absent from the endpoint payload
pub const NOT_AVAILABLE: &str = "N/A";

/// A shipment tracking identifier
///
/// Opaque to the tracker: vouchers are matched and grouped by exact string
/// equality, never interpreted.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Voucher(pub String);

impl Voucher {
    /// Create a new Voucher
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Voucher {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Voucher {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Voucher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One normalized status update for a voucher
///
/// Produced by the response parser from one raw endpoint record. Date, time
/// and location are kept as the endpoint's original strings; chronology is
/// reconstructed later by the summarizer. Any field missing in the source
/// payload holds [`NOT_AVAILABLE`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// The voucher this event belongs to
    pub voucher: Voucher,
    /// Status text as reported by the courier
    pub status: String,
    /// Event date string as reported (typically day-first)
    pub date: String,
    /// Event time string as reported
    pub time: String,
    /// Location text as reported
    pub location: String,
}

/// Aggregate counters for a completed batch run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Number of vouchers attempted
    pub vouchers: usize,
    /// Number of tracking events captured across all vouchers
    pub events: usize,
    /// Number of vouchers whose retrieval or parsing failed
    pub failed: usize,
}

/// Outcome of one batch run: all captured events plus the failure set
///
/// Built incrementally by the batch runner, finalized once every voucher has
/// been attempted exactly once. A voucher can fail transport yet contribute
/// zero events; failure membership and event presence are independent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunResult {
    /// All tracking events, in voucher input order then endpoint record order
    pub events: Vec<TrackingEvent>,
    /// Vouchers whose fetch or parse raised an error, in input order
    pub failed: Vec<Voucher>,
    /// Aggregate counters
    pub totals: RunTotals,
}

impl RunResult {
    /// True when no voucher failed; drives the process exit code
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The single most recent tracking event for one voucher
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestStatusRow {
    /// The voucher
    pub voucher: Voucher,
    /// Status of the chronologically last event
    pub status: String,
    /// Date string of that event
    pub date: String,
    /// Time string of that event
    pub time: String,
    /// Location of that event
    pub location: String,
}

/// Frequency of one status value across latest-status rows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// The status text
    pub status: String,
    /// Number of vouchers whose latest event carries this status
    pub vouchers: u64,
}

/// The two derived tables produced by the summarizer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// One row per voucher with at least one event, sorted by voucher ascending
    pub latest: Vec<LatestStatusRow>,
    /// Status frequency across latest rows, frequency descending then status ascending
    pub counts: Vec<StatusCount>,
}
