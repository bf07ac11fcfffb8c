//! Export Module
//!
//! Saves the analysis shown on the results screen.
//!
//! - `e` / `:export csv` writes the transactions as CSV
//! - `:export json` writes the whole analysis as JSON
//! - Files land in the data dir under `exports/`

mod csv_export;
mod json_export;

pub use csv_export::write_transactions;
pub use json_export::write_analysis;

use crate::core::{Action, AppState, ExportFormat, NotifyLevel};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the export directory path, creating it if needed
fn get_export_dir() -> std::io::Result<PathBuf> {
    let export_dir = crate::config::export_dir()
        .unwrap_or_else(|| PathBuf::from(".smart-wallet").join("exports"));
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S-%3f");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Path in `dir` for a new export. Never points at an existing file; a
/// numeric suffix is added when the timestamped name is taken.
fn unique_export_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    let path = dir.join(generate_filename(prefix, extension));
    if !path.exists() {
        return path;
    }
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| prefix.to_string());
    (1u32..)
        .map(|n| dir.join(format!("{}-{}.{}", stem, n, extension)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}

/// Export the last successful analysis into the default export directory
pub fn export_analysis(state: &AppState, format: ExportFormat) -> Action {
    match get_export_dir() {
        Ok(dir) => export_analysis_to(&dir, state, format),
        Err(e) => Action::Notify(
            format!("Failed to create export directory: {}", e),
            NotifyLevel::Error,
        ),
    }
}

/// Export the last successful analysis into `dir`
pub fn export_analysis_to(dir: &Path, state: &AppState, format: ExportFormat) -> Action {
    let (Some(analysis), Some(address)) = (state.last_result(), state.analyzed_address()) else {
        return Action::Notify("No analysis to export".to_string(), NotifyLevel::Warn);
    };

    // Addresses are filename-safe; fall back to a fixed prefix otherwise
    let prefix = if address.chars().all(|c| c.is_ascii_alphanumeric()) {
        format!("wallet-{}", address.to_lowercase())
    } else {
        "wallet".to_string()
    };

    match format {
        ExportFormat::Csv => {
            if analysis.transactions.is_empty() {
                return Action::Notify(
                    "No transactions to export".to_string(),
                    NotifyLevel::Warn,
                );
            }
            let path = unique_export_path(dir, &prefix, "csv");
            match csv_export::write_transactions(&path, &analysis.transactions) {
                Ok(count) => Action::Notify(
                    format!("Exported {} txs to {}", count, path.display()),
                    NotifyLevel::Info,
                ),
                Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
            }
        }
        ExportFormat::Json => {
            let path = unique_export_path(dir, &prefix, "json");
            match json_export::write_analysis(&path, address, analysis) {
                Ok(count) => Action::Notify(
                    format!("Exported analysis ({} txs) to {}", count, path.display()),
                    NotifyLevel::Info,
                ),
                Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
            }
        }
    }
}
