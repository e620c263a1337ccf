//! Attendance grid: one row per projected student, one column per requested date.

use crate::core::resolver;
use crate::core::roster::{self, RosterRow};
use crate::core::sources::{LogStore, RosterService};
use crate::errors::{AppError, AppResult};
use crate::models::log_entry::AttendanceLogEntry;
use crate::models::student::Student;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub student: Student,
    pub roll_number: usize,
    /// Same length and order as `AttendanceReport::dates`.
    pub statuses: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttendanceReport {
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<ReportRow>,
}

impl AttendanceReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Assemble the grid from an already projected roster.
///
/// Dates keep the caller's order, duplicates included. Entries for students
/// outside `roster` are ignored.
pub fn build_for_roster(
    roster: &[RosterRow],
    entries: &[AttendanceLogEntry],
    dates: &[NaiveDate],
) -> AttendanceReport {
    let wanted_ids: HashSet<i64> = roster.iter().map(|r| r.student.id).collect();
    let wanted_dates: HashSet<NaiveDate> = dates.iter().copied().collect();

    // (student, day) → entries in received order
    let mut grouped: HashMap<(i64, NaiveDate), Vec<AttendanceLogEntry>> = HashMap::new();
    for e in entries {
        if wanted_ids.contains(&e.student_id) && wanted_dates.contains(&e.date) {
            grouped
                .entry((e.student_id, e.date))
                .or_default()
                .push(e.clone());
        }
    }

    let rows = roster
        .iter()
        .map(|r| ReportRow {
            student: r.student.clone(),
            roll_number: r.roll_number,
            statuses: dates
                .iter()
                .map(|d| {
                    grouped
                        .get(&(r.student.id, *d))
                        .is_some_and(|day| resolver::resolve(r.student.id, *d, day))
                })
                .collect(),
        })
        .collect();

    AttendanceReport {
        dates: dates.to_vec(),
        rows,
    }
}

/// Project the roster once, then resolve every `(student, date)` cell.
pub fn build(
    students: &[Student],
    entries: &[AttendanceLogEntry],
    dates: &[NaiveDate],
    section: Option<&str>,
) -> AttendanceReport {
    let roster = roster::project(students, section);
    build_for_roster(&roster, entries, dates)
}

/// Same as [`build`], reading roster and log from their sources.
///
/// Any source failure aborts with `DataUnavailable`; no partial report is
/// ever returned.
pub fn build_from_sources<R, L>(
    roster_source: &R,
    log_source: &L,
    dates: &[NaiveDate],
    section: Option<&str>,
) -> AppResult<AttendanceReport>
where
    R: RosterService + ?Sized,
    L: LogStore + ?Sized,
{
    let students = roster_source.list_students().map_err(unavailable)?;

    let entries = match (dates.iter().min(), dates.iter().max()) {
        (Some(start), Some(end)) => log_source
            .query_by_date_range(*start, *end)
            .map_err(unavailable)?,
        _ => Vec::new(),
    };

    debug!(
        students = students.len(),
        entries = entries.len(),
        dates = dates.len(),
        "building attendance report"
    );

    Ok(build(&students, &entries, dates, section))
}

fn unavailable(e: AppError) -> AppError {
    match e {
        AppError::DataUnavailable(_) => e,
        other => {
            warn!(error = %other, "attendance source failed");
            AppError::DataUnavailable(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sources::MemorySource;
    use crate::models::status::AttendanceStatus::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn students() -> Vec<Student> {
        vec![
            Student::new(2, "Bob", "1002", ["A"]),
            Student::new(1, "Alice", "1001", ["A", "B"]),
        ]
    }

    #[test]
    fn rows_follow_roster_and_columns_follow_dates() {
        let entries = vec![
            AttendanceLogEntry::new(1, d("2024-01-19"), 100, Present),
            AttendanceLogEntry::new(2, d("2024-01-20"), 100, Activity),
        ];
        let dates = [d("2024-01-20"), d("2024-01-19")];
        let report = build(&students(), &entries, &dates, None);

        assert_eq!(report.dates, dates);
        assert_eq!(report.rows[0].student.name, "Alice");
        assert_eq!(report.rows[0].statuses, [false, true]);
        assert_eq!(report.rows[1].student.name, "Bob");
        assert_eq!(report.rows[1].statuses, [true, false]);
    }

    #[test]
    fn empty_dates_give_rows_without_columns() {
        let report = build(&students(), &[], &[], None);
        assert_eq!(report.rows.len(), 2);
        assert!(report.rows.iter().all(|r| r.statuses.is_empty()));
    }

    #[test]
    fn duplicate_dates_emit_independent_columns() {
        let entries = vec![AttendanceLogEntry::new(1, d("2024-01-19"), 1, Present)];
        let dates = [d("2024-01-19"), d("2024-01-19")];
        let report = build(&students(), &entries, &dates, Some("B"));
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].statuses, [true, true]);
    }

    #[test]
    fn entries_outside_the_section_are_ignored() {
        let entries = vec![AttendanceLogEntry::new(2, d("2024-01-19"), 1, Present)];
        let report = build(&students(), &entries, &[d("2024-01-19")], Some("B"));
        assert!(report.rows.iter().all(|r| r.student.id == 1));
        assert_eq!(report.rows[0].statuses, [false]);
    }

    struct Down;

    impl LogStore for Down {
        fn query_by_date_range(
            &self,
            _: NaiveDate,
            _: NaiveDate,
        ) -> AppResult<Vec<AttendanceLogEntry>> {
            Err(AppError::Other("connection refused".into()))
        }
    }

    #[test]
    fn unavailable_log_fails_whole_report() {
        let roster = MemorySource::new(students(), vec![]);
        let err = build_from_sources(&roster, &Down, &[d("2024-01-19")], None).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }
}
