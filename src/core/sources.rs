//! Read-only data sources consumed by the export pipeline.

use crate::errors::AppResult;
use crate::models::log_entry::AttendanceLogEntry;
use crate::models::student::Student;
use chrono::NaiveDate;

/// Current student roster.
pub trait RosterService {
    fn list_students(&self) -> AppResult<Vec<Student>>;
}

/// Append-only attendance log.
pub trait LogStore {
    /// Entries whose attendance day lies in `[start, end]`, in the order they
    /// were recorded. May include students outside any section filter.
    fn query_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<AttendanceLogEntry>>;
}

/// In-memory sources, handy for tests and for callers that already hold the data.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    pub students: Vec<Student>,
    pub entries: Vec<AttendanceLogEntry>,
}

impl MemorySource {
    pub fn new(students: Vec<Student>, entries: Vec<AttendanceLogEntry>) -> Self {
        Self { students, entries }
    }
}

impl RosterService for MemorySource {
    fn list_students(&self) -> AppResult<Vec<Student>> {
        Ok(self.students.clone())
    }
}

impl LogStore for MemorySource {
    fn query_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<AttendanceLogEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect())
    }
}
