//! # elta-tracker
//!
//! Batch tracker for ELTA Courier shipment vouchers.
//!
//! Polls the courier's web tracking endpoint once per voucher (sequentially,
//! with a configurable politeness delay), normalizes the returned tracking
//! events, derives the latest status per voucher plus aggregate status counts,
//! and writes CSV tables and an optional markdown digest.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - the CLI binary is a thin shell over [`run_tracking`]
//! - **Per-voucher isolation** - one voucher's failure never aborts the batch
//! - **Tolerant parsing** - content anomalies degrade to empty or "N/A",
//!   never to errors; only malformed bytes and transport failures count as
//!   failed vouchers
//!
//! ## Quick Start
//!
//! ```no_run
//! use elta_tracker::{Config, InputConfig, run_tracking};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         input: InputConfig {
//!             inline_vouchers: Some("NF123456789GR,NF987654321GR".to_string()),
//!             ..Default::default()
//!         },
//!         ..Default::default()
//!     };
//!
//!     let report = run_tracking(&config).await?;
//!     std::process::exit(report.exit_code());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Transport client for the courier endpoint
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Response payload parsing
pub mod parser;
/// Report writers (CSV tables, markdown digest)
pub mod report;
/// Retry logic with exponential backoff
pub mod retry;
/// Sequential batch polling
pub mod runner;
/// Latest-status and status-count derivation
pub mod summary;
/// Core types
pub mod types;
/// Voucher list loading
pub mod vouchers;

// Re-export commonly used types
pub use client::TrackingClient;
pub use config::{Config, EndpointConfig, InputConfig, OutputConfig, PacingConfig, RetryConfig};
pub use error::{Error, Result};
pub use parser::parse_tracking_response;
pub use runner::run_batch;
pub use summary::summarize;
pub use types::{
    LatestStatusRow, RunResult, RunTotals, StatusCount, Summary, TrackingEvent, Voucher,
};
pub use vouchers::load_vouchers;

/// Everything a completed run produced: raw outcome plus derived tables
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Accumulated events, failed vouchers and totals
    pub result: RunResult,
    /// Latest-status and status-counts tables
    pub summary: Summary,
}

impl RunReport {
    /// Process exit signal: 0 when no voucher failed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.result.is_success() { 0 } else { 1 }
    }
}

/// Run the full tracking pipeline: load vouchers, poll the endpoint, derive
/// the summary tables, write the configured reports
///
/// An empty voucher list short-circuits with a warning and an empty report; no
/// output files are written in that case. Report-writing failures are fatal
/// (they mean total loss of the work product), while per-voucher failures are
/// recorded in the report and only affect [`RunReport::exit_code`].
pub async fn run_tracking(config: &Config) -> Result<RunReport> {
    let vouchers = load_vouchers(&config.input)?;
    if vouchers.is_empty() {
        tracing::warn!("No vouchers found to process");
        return Ok(RunReport {
            result: RunResult::default(),
            summary: Summary::default(),
        });
    }

    let client = TrackingClient::new(config)?;
    let result = run_batch(&client, &vouchers, &config.pacing).await;
    let summary = summarize(&result.events);
    report::write_reports(&result, &summary, &config.output)?;

    if !result.failed.is_empty() {
        let failed: Vec<&str> = result.failed.iter().map(|v| v.as_str()).collect();
        tracing::warn!(failed = %failed.join(", "), "Failed vouchers");
    }
    tracing::info!(
        vouchers = result.totals.vouchers,
        events = result.totals.events,
        failed = result.totals.failed,
        "Done"
    );

    Ok(RunReport { result, summary })
}
