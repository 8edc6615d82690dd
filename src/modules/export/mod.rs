//! Export Module
//!
//! Writes the contract list as currently filtered to a timestamped CSV
//! under the data directory's exports/ folder.

mod csv_export;

use std::fs;
use std::path::PathBuf;

use chrono::Local;

use crate::core::{Action, Chain, NotifyLevel};

/// One row of the contract table, flattened for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub name: String,
    pub contract_type: String,
    pub chain: Chain,
    pub address: String,
    pub route: String,
}

/// Get the export directory path, creating it if needed
fn get_export_dir() -> std::io::Result<PathBuf> {
    let export_dir = crate::config::export_dir()
        .unwrap_or_else(|| PathBuf::from(".scry").join("exports"));
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Export the visible contract rows.
pub fn export_contracts(records: &[ExportRecord]) -> Action {
    if records.is_empty() {
        return Action::Notify("No contracts to export".to_string(), NotifyLevel::Warn);
    }

    let export_dir = match get_export_dir() {
        Ok(dir) => dir,
        Err(e) => {
            return Action::Notify(
                format!("Failed to create export directory: {}", e),
                NotifyLevel::Error,
            )
        }
    };

    let filename = generate_filename("contracts", "csv");
    let path = export_dir.join(&filename);

    match csv_export::write_contracts(&path, records) {
        Ok(count) => Action::Notify(
            format!("Exported {} contracts to {}", count, path.display()),
            NotifyLevel::Info,
        ),
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}
