//! Per-day Present/Absent resolution.

use crate::models::log_entry::AttendanceLogEntry;
use chrono::NaiveDate;

/// Pick the entry that decides the day: highest `timestamp`, and on an
/// exact tie the one appearing last.
pub fn latest_entry<'a, I>(entries: I) -> Option<&'a AttendanceLogEntry>
where
    I: IntoIterator<Item = &'a AttendanceLogEntry>,
{
    entries
        .into_iter()
        .reduce(|best, e| if e.timestamp >= best.timestamp { e } else { best })
}

/// Resolve one `(student, date)` pair: `true` means present.
///
/// `entries` are expected in the order they were received; entries for other
/// students or other dates are ignored. No entry means absent: every student
/// starts the day absent until marked otherwise.
pub fn resolve(student_id: i64, date: NaiveDate, entries: &[AttendanceLogEntry]) -> bool {
    latest_entry(
        entries
            .iter()
            .filter(|e| e.student_id == student_id && e.date == date),
    )
    .is_some_and(AttendanceLogEntry::counts_as_present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::AttendanceStatus::{self, *};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 19).unwrap()
    }

    fn entry(ts: i64, status: AttendanceStatus) -> AttendanceLogEntry {
        AttendanceLogEntry::new(1, day(), ts, status)
    }

    fn check(entries: &[AttendanceLogEntry]) -> bool {
        resolve(1, day(), entries)
    }

    #[test]
    fn no_entries_is_absent() {
        assert!(!check(&[]));
    }

    #[test]
    fn latest_timestamp_wins_regardless_of_order() {
        let forward = vec![entry(100, Present), entry(200, Absent)];
        let reversed = vec![entry(200, Absent), entry(100, Present)];
        assert!(!check(&forward));
        assert!(!check(&reversed));

        let back_in = vec![entry(300, Washroom), entry(100, Absent), entry(200, Absent)];
        assert!(check(&back_in));
    }

    #[test]
    fn non_absent_statuses_count_as_present() {
        for s in [Present, Washroom, Activity, Bunking] {
            assert!(check(&[entry(1, Absent), entry(2, s)]), "{:?}", s);
        }
    }

    #[test]
    fn equal_timestamps_last_received_wins() {
        assert!(check(&[entry(50, Absent), entry(50, Present)]));
        assert!(!check(&[entry(50, Present), entry(50, Absent)]));
    }

    #[test]
    fn other_students_and_days_are_ignored() {
        let other_student = AttendanceLogEntry::new(2, day(), 900, Present);
        let other_day = AttendanceLogEntry::new(1, day().succ_opt().unwrap(), 900, Present);
        assert!(!check(&[entry(100, Absent), other_student, other_day]));
    }

    #[test]
    fn unreadable_status_is_absent() {
        let mut broken = entry(500, Present);
        broken.status = None;
        assert!(!check(&[entry(100, Present), broken]));
    }
}
