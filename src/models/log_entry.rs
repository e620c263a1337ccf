use super::status::AttendanceStatus;
use chrono::{Local, NaiveDate};
use serde::Serialize;

/// One status change, as stored in the append-only attendance log.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttendanceLogEntry {
    pub student_id: i64, // ⇔ attendance_log.student_id
    pub date: NaiveDate, // ⇔ attendance_log.date (TEXT "YYYY-MM-DD")
    pub timestamp: i64,  // ⇔ attendance_log.timestamp (ms since epoch)
    /// `None` when the stored value is not a known status.
    pub status: Option<AttendanceStatus>,
}

impl AttendanceLogEntry {
    pub fn new(
        student_id: i64,
        date: NaiveDate,
        timestamp: i64,
        status: AttendanceStatus,
    ) -> Self {
        Self {
            student_id,
            date,
            timestamp,
            status: Some(status),
        }
    }

    /// Build an entry for a status change happening right now.
    /// The attendance day is the local calendar date of the change.
    pub fn now(student_id: i64, status: AttendanceStatus) -> Self {
        let now = Local::now();
        Self::new(student_id, now.date_naive(), now.timestamp_millis(), status)
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// An entry with an unreadable status resolves to absent.
    pub fn counts_as_present(&self) -> bool {
        self.status.is_some_and(|s| s.counts_as_present())
    }
}
