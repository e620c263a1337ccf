// src/export/range.rs

use crate::errors::{AppError, AppResult};
use crate::utils::date::{inclusive_days, parse_date, to_storage};
use chrono::{Datelike, NaiveDate};

fn invalid(what: &str, value: &str) -> AppError {
    AppError::InvalidDate(format!(
        "Invalid {what} '{value}'. Use the YYYY-MM-DD format."
    ))
}

/// Parse one `YYYY-MM-DD` bound.
pub(crate) fn parse_bound(what: &str, value: &str) -> AppResult<NaiveDate> {
    parse_date(value).ok_or_else(|| invalid(what, value))
}

/// Validate a `[start, end]` request before anything is fetched.
///
/// - both bounds must be real calendar dates
/// - `start <= end`
/// - at most `limit` days, both ends counted
pub(crate) fn checked_bounds(start: &str, end: &str, limit: i64) -> AppResult<(NaiveDate, NaiveDate)> {
    let s = parse_bound("start date", start)?;
    let e = parse_bound("end date", end)?;

    if s > e {
        return Err(AppError::InvalidDate(format!(
            "Start date {} is after end date {}.",
            to_storage(&s),
            to_storage(&e)
        )));
    }

    let days = inclusive_days(s, e);
    if days > limit {
        return Err(AppError::RangeTooLarge {
            start: to_storage(&s),
            end: to_storage(&e),
            days,
            limit,
        });
    }

    Ok((s, e))
}

/// Parse --range.
///
/// Accepts:
/// - YYYY-MM-DD
/// - YYYY-MM (whole month)
/// - YYYY-MM-DD:YYYY-MM-DD
///
/// Returns the bounds as storage strings; size limits are checked later by
/// [`checked_bounds`].
pub(crate) fn parse_range(r: &str) -> AppResult<(String, String)> {
    let r = r.trim();

    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let start = parse_bound("start date", start_raw)?;
        let end = parse_bound("end date", end_raw)?;
        return Ok((to_storage(&start), to_storage(&end)));
    }

    match r.len() {
        // YYYY-MM-DD
        10 => {
            let d = parse_bound("date", r)?;
            Ok((to_storage(&d), to_storage(&d)))
        }
        // YYYY-MM
        7 => {
            let first = parse_date(&format!("{r}-01")).ok_or_else(|| invalid("month", r))?;
            let last = last_day_of_month(first).ok_or_else(|| invalid("month", r))?;
            Ok((to_storage(&first), to_storage(&last)))
        }
        _ => Err(AppError::InvalidDate(format!(
            "Unsupported range '{r}'. Use YYYY-MM-DD, YYYY-MM or YYYY-MM-DD:YYYY-MM-DD."
        ))),
    }
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()
}
