// src/export/mod.rs

pub mod csv;
mod failure;
mod fs_utils;
pub mod json;
pub mod logic;
pub(crate) mod range;

pub use failure::{ExportErrorKind, ExportFailure, MSG_UNAVAILABLE};
pub use logic::{AttendanceExporter, ExportOutput};

pub(crate) use fs_utils::{ensure_writable, write_output};

use crate::ui::messages::success;
use clap::ValueEnum;
use serde::Serialize;
use std::path::Path;

/// Shared completion message for every writer.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}
