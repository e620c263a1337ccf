// src/export/logic.rs

use crate::config::Config;
use crate::core::report::{self, AttendanceReport};
use crate::core::sources::{LogStore, RosterService};
use crate::errors::AppResult;
use crate::export::range::checked_bounds;
use crate::export::{ExportFailure, ExportFormat, csv, json};
use crate::models::student::is_all_sections;
use crate::utils::date::{check_label_format, dates_between, label_formatter, to_storage};
use crate::utils::path::sanitize_file_component;
use chrono::NaiveDate;
use tracing::{debug, info};

pub const DEFAULT_MAX_DAYS: i64 = 31;
pub const DEFAULT_LABEL_FORMAT: &str = "%d/%m/%Y";

/// A finished export, ready to be shown or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutput {
    pub format: ExportFormat,
    pub text: String,
    pub suggested_file_name: String,
    pub students: usize,
    pub days: usize,
}

/// Entry point of the export pipeline.
///
/// Validates the requested dates, reads roster and log once, builds the grid
/// and renders it. Every failure comes back as an [`ExportFailure`]; nothing
/// partial is ever returned.
pub struct AttendanceExporter<'a, R: ?Sized, L: ?Sized> {
    roster: &'a R,
    log: &'a L,
    max_days: i64,
    label_format: String,
}

impl<'a, R, L> AttendanceExporter<'a, R, L>
where
    R: RosterService + ?Sized,
    L: LogStore + ?Sized,
{
    pub fn new(roster: &'a R, log: &'a L) -> Self {
        Self {
            roster,
            log,
            max_days: DEFAULT_MAX_DAYS,
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
        }
    }

    pub fn from_config(roster: &'a R, log: &'a L, cfg: &Config) -> Self {
        Self::new(roster, log)
            .with_max_days(cfg.max_export_days)
            .with_label_format(&cfg.date_label_format)
    }

    pub fn with_max_days(mut self, max_days: i64) -> Self {
        self.max_days = max_days;
        self
    }

    pub fn with_label_format(mut self, fmt: &str) -> Self {
        self.label_format = fmt.to_string();
        self
    }

    pub fn export_single_date(
        &self,
        date: &str,
        section: Option<&str>,
    ) -> Result<ExportOutput, ExportFailure> {
        self.export(date, date, section, ExportFormat::Csv)
    }

    pub fn export_date_range(
        &self,
        start: &str,
        end: &str,
        section: Option<&str>,
    ) -> Result<ExportOutput, ExportFailure> {
        self.export(start, end, section, ExportFormat::Csv)
    }

    pub fn export(
        &self,
        start: &str,
        end: &str,
        section: Option<&str>,
        format: ExportFormat,
    ) -> Result<ExportOutput, ExportFailure> {
        Ok(self.try_export(start, end, section, format)?)
    }

    /// Validated grid for `[start, end]`, without rendering.
    pub fn report(
        &self,
        start: &str,
        end: &str,
        section: Option<&str>,
    ) -> Result<AttendanceReport, ExportFailure> {
        Ok(self.try_report(start, end, section)?.2)
    }

    fn try_report(
        &self,
        start: &str,
        end: &str,
        section: Option<&str>,
    ) -> AppResult<(NaiveDate, NaiveDate, AttendanceReport)> {
        // nothing is fetched before the bounds are known to be valid
        let (s, e) = checked_bounds(start, end, self.max_days)?;
        let dates = dates_between(s, e);
        debug!(start = %s, end = %e, days = dates.len(), "export bounds accepted");

        let report = report::build_from_sources(self.roster, self.log, &dates, section)?;
        Ok((s, e, report))
    }

    fn try_export(
        &self,
        start: &str,
        end: &str,
        section: Option<&str>,
        format: ExportFormat,
    ) -> AppResult<ExportOutput> {
        if format == ExportFormat::Csv {
            check_label_format(&self.label_format)?;
        }
        let (s, e, report) = self.try_report(start, end, section)?;

        let text = match format {
            ExportFormat::Csv => csv::render(&report, label_formatter(&self.label_format))?,
            ExportFormat::Json => json::render(&report)?,
        };

        info!(
            students = report.rows.len(),
            days = report.dates.len(),
            format = format.as_str(),
            "attendance export rendered"
        );

        Ok(ExportOutput {
            format,
            text,
            suggested_file_name: suggested_file_name(s, e, section, format),
            students: report.rows.len(),
            days: report.dates.len(),
        })
    }
}

/// `attendance_2024-01-19.csv`, `attendance_2024-01-01_to_2024-01-31_XI_A.csv`, ...
pub fn suggested_file_name(
    start: NaiveDate,
    end: NaiveDate,
    section: Option<&str>,
    format: ExportFormat,
) -> String {
    let mut name = format!("attendance_{}", to_storage(&start));
    if end != start {
        name.push_str(&format!("_to_{}", to_storage(&end)));
    }
    if let Some(sec) = section
        && !is_all_sections(sec)
    {
        name.push('_');
        name.push_str(&sanitize_file_component(sec));
    }
    name.push('.');
    name.push_str(format.as_str());
    name
}
