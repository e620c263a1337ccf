use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write;

pub const STORAGE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Strict `YYYY-MM-DD` parsing.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, STORAGE_FORMAT).ok()
}

pub fn to_storage(d: &NaiveDate) -> String {
    d.format(STORAGE_FORMAT).to_string()
}

/// Number of calendar days in `[start, end]`, counting both ends.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Every calendar date from `start` to `end`, both included.
/// Empty when `start > end`.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Formatter producing column labels such as `19/01/2024`.
///
/// Patterns chrono cannot apply to a bare date (time or zone fields) come
/// back as `AppError::Export` rather than a panic.
pub fn label_formatter(fmt: &str) -> impl Fn(&NaiveDate) -> AppResult<String> + '_ {
    move |d| {
        let mut out = String::new();
        write!(out, "{}", d.format(fmt))
            .map_err(|_| AppError::Export(format!("cannot format a date with '{fmt}'")))?;
        Ok(out)
    }
}

/// Rejects label patterns that do not parse or cannot render a date.
pub fn check_label_format(fmt: &str) -> AppResult<()> {
    if fmt.trim().is_empty() {
        return Err(AppError::Export("date label format is empty".into()));
    }
    if StrftimeItems::new(fmt).any(|i| matches!(i, Item::Error)) {
        return Err(AppError::Export(format!(
            "'{fmt}' is not a valid strftime pattern"
        )));
    }
    let sample = NaiveDate::from_ymd_opt(2024, 1, 19)
        .ok_or_else(|| AppError::Export("invalid sample date".into()))?;
    label_formatter(fmt)(&sample).map(|_| ())
}
