//! Voucher list loading
//!
//! Vouchers come from an inline comma-separated list, a file, or both, merged
//! in that order. Supported files: `.csv` with a header row and a named
//! voucher column, or `.txt` with one voucher per line. Whitespace is trimmed,
//! empties dropped, and the merged list de-duplicated keeping first-seen
//! order.

use crate::config::InputConfig;
use crate::error::{Error, Result};
use crate::types::Voucher;
use std::collections::HashSet;
use std::path::Path;

/// Load, merge and de-duplicate the voucher list for a run
///
/// Inline vouchers come first, then file-sourced ones. A duplicate keeps its
/// first occurrence and position. Unsupported file extensions and a missing
/// CSV column are configuration errors; `.xlsx` is not supported.
pub fn load_vouchers(input: &InputConfig) -> Result<Vec<Voucher>> {
    let mut raw: Vec<String> = Vec::new();

    if let Some(inline) = &input.inline_vouchers {
        raw.extend(
            inline
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from),
        );
    }

    if let Some(path) = &input.input_file {
        raw.extend(load_from_file(path, &input.input_column)?);
    }

    let mut seen = HashSet::new();
    let vouchers = raw
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .map(Voucher::from)
        .collect();
    Ok(vouchers)
}

fn load_from_file(path: &Path, column: &str) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::config(
            format!("input file not found: {}", path.display()),
            "input_file",
        ));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_from_csv(path, column),
        "txt" => {
            let text = std::fs::read_to_string(path)?;
            Ok(text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect())
        }
        _ => Err(Error::config(
            format!(
                "unsupported input file '{}': use .csv or .txt",
                path.display()
            ),
            "input_file",
        )),
    }
}

/// Read one named column from a headered CSV file
///
/// Plain comma splitting; quoted cells are not supported (voucher IDs never
/// contain commas).
fn load_from_csv(path: &Path, column: &str) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    let mut lines = text.lines();

    let header = lines.next().unwrap_or_default();
    let column_index = header
        .split(',')
        .map(str::trim)
        .position(|name| name == column)
        .ok_or_else(|| {
            Error::config(
                format!("column '{}' not found in {}", column, path.display()),
                "input_column",
            )
        })?;

    Ok(lines
        .filter_map(|line| line.split(',').nth(column_index))
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(String::from)
        .collect())
}
