//! Report writers: CSV tables and the markdown digest
//!
//! Three sibling CSV files (all events, latest status per voucher, status
//! counts) plus an optional human-readable markdown digest. Write failures
//! abort the run — by the time reports are written they are the entire work
//! product.

use crate::config::OutputConfig;
use crate::error::{Error, Result};
use crate::types::{RunResult, Summary};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const EVENT_HEADERS: [&str; 5] = ["Voucher", "Status", "Date", "Time", "Location"];
const COUNT_HEADERS: [&str; 2] = ["Status", "Vouchers"];

/// Write all configured reports for a completed run
///
/// Produces the events CSV at the configured path, latest-status and
/// status-counts CSVs as `<stem>_latest_status.csv` /
/// `<stem>_status_counts.csv` siblings, and the markdown digest when enabled.
/// Parent directories are created as needed.
pub fn write_reports(result: &RunResult, summary: &Summary, output: &OutputConfig) -> Result<()> {
    let events_path = &output.output_file;
    if events_path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
        != Some("csv")
    {
        return Err(Error::config(
            format!(
                "unsupported output file '{}': use a .csv path",
                events_path.display()
            ),
            "output_file",
        ));
    }
    if let Some(parent) = events_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(events_path, render_events_csv(result))?;
    tracing::info!(
        rows = result.events.len(),
        path = %events_path.display(),
        "Saved events"
    );

    let latest_path = sibling_path(events_path, "latest_status");
    std::fs::write(&latest_path, render_latest_csv(summary))?;
    tracing::info!(path = %latest_path.display(), "Saved latest status");

    let counts_path = sibling_path(events_path, "status_counts");
    std::fs::write(&counts_path, render_counts_csv(summary))?;
    tracing::info!(path = %counts_path.display(), "Saved status counts");

    if let Some(markdown_path) = &output.summary_markdown {
        if let Some(parent) = markdown_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let generated_at = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        std::fs::write(
            markdown_path,
            render_markdown_summary(result, summary, &generated_at),
        )?;
        tracing::info!(path = %markdown_path.display(), "Saved markdown summary");
    }

    Ok(())
}

/// `<dir>/<stem>_<suffix>.csv` next to the events file
fn sibling_path(events_path: &Path, suffix: &str) -> PathBuf {
    let stem = events_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("tracking_results");
    events_path.with_file_name(format!("{stem}_{suffix}.csv"))
}

fn render_events_csv(result: &RunResult) -> String {
    let mut out = csv_row(&EVENT_HEADERS);
    for event in &result.events {
        out.push_str(&csv_row(&[
            event.voucher.as_str(),
            &event.status,
            &event.date,
            &event.time,
            &event.location,
        ]));
    }
    out
}

fn render_latest_csv(summary: &Summary) -> String {
    let mut out = csv_row(&EVENT_HEADERS);
    for row in &summary.latest {
        out.push_str(&csv_row(&[
            row.voucher.as_str(),
            &row.status,
            &row.date,
            &row.time,
            &row.location,
        ]));
    }
    out
}

fn render_counts_csv(summary: &Summary) -> String {
    let mut out = csv_row(&COUNT_HEADERS);
    for count in &summary.counts {
        out.push_str(&csv_row(&[&count.status, &count.vouchers.to_string()]));
    }
    out
}

/// One CSV line with RFC 4180 quoting for cells containing `,`, `"` or newlines
fn csv_row(cells: &[&str]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
            line.push('"');
            line.push_str(&cell.replace('"', "\"\""));
            line.push('"');
        } else {
            line.push_str(cell);
        }
    }
    line.push('\n');
    line
}

/// Render the markdown digest: generation timestamp, totals, failed list, and
/// the two summary tables
pub fn render_markdown_summary(result: &RunResult, summary: &Summary, generated_at: &str) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# ELTA Tracking Daily Summary");
    let _ = writeln!(md);
    let _ = writeln!(md, "- Generated at: {generated_at}");
    let _ = writeln!(md, "- Vouchers processed: {}", result.totals.vouchers);
    let _ = writeln!(md, "- Tracking events captured: {}", result.totals.events);
    let _ = writeln!(md, "- Failed vouchers: {}", result.totals.failed);
    if !result.failed.is_empty() {
        let failed: Vec<&str> = result.failed.iter().map(|v| v.as_str()).collect();
        let _ = writeln!(md, "- Failed list: {}", failed.join(", "));
    }

    let _ = writeln!(md);
    let _ = writeln!(md, "## Latest Status Counts");
    let _ = writeln!(md);
    if summary.counts.is_empty() {
        let _ = writeln!(md, "No status counts available.");
    } else {
        let _ = writeln!(md, "| Status | Vouchers |");
        let _ = writeln!(md, "|---|---:|");
        for count in &summary.counts {
            let _ = writeln!(md, "| {} | {} |", count.status, count.vouchers);
        }
    }

    let _ = writeln!(md);
    let _ = writeln!(md, "## Latest Status Per Voucher");
    let _ = writeln!(md);
    if summary.latest.is_empty() {
        let _ = writeln!(md, "No events available.");
    } else {
        let _ = writeln!(md, "| Voucher | Status | Date | Time | Location |");
        let _ = writeln!(md, "|---|---|---|---|---|");
        for row in &summary.latest {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} |",
                row.voucher, row.status, row.date, row.time, row.location
            );
        }
    }

    md
}
