use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{find_student, insert_log_entry};
use crate::errors::{AppError, AppResult};
use crate::models::log_entry::AttendanceLogEntry;
use crate::models::status::AttendanceStatus;
use chrono::NaiveDate;
use tracing::debug;

/// Business logic for the `mark` command.
///
/// Always appends: earlier entries for the same day stay in the log and the
/// latest one decides the exported status.
pub struct MarkLogic;

impl MarkLogic {
    pub fn apply(
        pool: &mut DbPool,
        student_id: i64,
        status: &str,
        date: Option<NaiveDate>,
        at_ms: Option<i64>,
    ) -> AppResult<AttendanceLogEntry> {
        let status = AttendanceStatus::from_input(status).ok_or_else(|| {
            AppError::InvalidStatus(format!(
                "'{}'. Use one of: {}",
                status.trim(),
                AttendanceStatus::ALL
                    .iter()
                    .map(|s| s.to_db_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        let student =
            find_student(&pool.conn, student_id)?.ok_or(AppError::StudentNotFound(student_id))?;

        let mut entry = AttendanceLogEntry::now(student.id, status);
        if let Some(d) = date {
            entry.date = d;
        }
        if let Some(ts) = at_ms {
            entry.timestamp = ts;
        }

        let tx = pool.conn.transaction()?;
        let row_id = insert_log_entry(&tx, &entry)?;
        audit(
            &tx,
            "mark",
            &format!("{}@{}", student.id, entry.date_str()),
            &format!("{} marked {}", student.name, status.to_db_str()),
        )?;
        tx.commit()?;

        debug!(row_id, student = student.id, date = %entry.date, "attendance entry appended");
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::queries::{insert_student, load_entries_between};
    use crate::models::student::Student;

    fn pool() -> (DbPool, i64) {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        let id = insert_student(&pool.conn, &Student::new(0, "Asha", "1001", ["A"])).unwrap();
        (pool, id)
    }

    #[test]
    fn entries_are_appended_never_replaced() {
        let (mut pool, id) = pool();
        let day = NaiveDate::from_ymd_opt(2024, 1, 19).unwrap();

        MarkLogic::apply(&mut pool, id, "present", Some(day), Some(100)).unwrap();
        MarkLogic::apply(&mut pool, id, " Absent ", Some(day), Some(200)).unwrap();

        let entries = load_entries_between(&pool.conn, &day, &day).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].status, Some(AttendanceStatus::Absent));
    }

    #[test]
    fn rejects_unknown_status_and_student() {
        let (mut pool, id) = pool();
        assert!(matches!(
            MarkLogic::apply(&mut pool, id, "sleeping", None, None),
            Err(AppError::InvalidStatus(_))
        ));
        assert!(matches!(
            MarkLogic::apply(&mut pool, 999, "present", None, None),
            Err(AppError::StudentNotFound(999))
        ));
    }
}
