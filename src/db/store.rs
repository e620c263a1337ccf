//! SQLite-backed roster and attendance log.

use crate::core::sources::{LogStore, RosterService};
use crate::db::pool::DbPool;
use crate::db::queries::{load_entries_between, load_students};
use crate::errors::AppResult;
use crate::models::log_entry::AttendanceLogEntry;
use crate::models::student::Student;
use chrono::NaiveDate;

impl RosterService for DbPool {
    fn list_students(&self) -> AppResult<Vec<Student>> {
        load_students(&self.conn)
    }
}

impl LogStore for DbPool {
    fn query_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<AttendanceLogEntry>> {
        load_entries_between(&self.conn, &start, &end)
    }
}
