// src/export/failure.rs

use crate::errors::AppError;
use serde::Serialize;
use std::fmt;
use tracing::error;

pub const MSG_UNAVAILABLE: &str = "Failed to export attendance. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportErrorKind {
    /// Roster or attendance log could not be read.
    DataUnavailable,
    /// The requested span is over the configured day limit.
    RangeTooLarge,
    /// A date was malformed, or the range runs backwards.
    InvalidDate,
}

impl fmt::Display for ExportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportErrorKind::DataUnavailable => "data_unavailable",
            ExportErrorKind::RangeTooLarge => "range_too_large",
            ExportErrorKind::InvalidDate => "invalid_date",
        })
    }
}

/// What an export caller gets back on failure: a kind to branch on and a
/// message that can be shown as is. Storage details never leak into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ExportFailure {
    pub kind: ExportErrorKind,
    pub message: String,
}

impl ExportFailure {
    pub fn new(kind: ExportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<AppError> for ExportFailure {
    fn from(e: AppError) -> Self {
        match e {
            AppError::InvalidDate(msg) => ExportFailure::new(ExportErrorKind::InvalidDate, msg),
            AppError::RangeTooLarge { limit, days, .. } => ExportFailure::new(
                ExportErrorKind::RangeTooLarge,
                format!(
                    "Date range cannot exceed {limit} days (requested {days} days). Please choose a shorter range."
                ),
            ),
            other => {
                // full detail goes to the diagnostics, not to the user
                error!(error = %other, "attendance export failed");
                ExportFailure::new(ExportErrorKind::DataUnavailable, MSG_UNAVAILABLE)
            }
        }
    }
}
