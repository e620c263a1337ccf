use crate::errors::{AppError, AppResult};
use crate::models::log_entry::AttendanceLogEntry;
use crate::models::status::AttendanceStatus;
use crate::models::student::{SectionMemberships, Student};
use crate::utils::date::{STORAGE_FORMAT, to_storage};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use std::collections::HashMap;

// ---------------------------
// Students
// ---------------------------

/// Insert a student with its memberships. `student.id <= 0` lets SQLite pick the id.
pub fn insert_student(conn: &Connection, student: &Student) -> AppResult<i64> {
    let id: Option<i64> = (student.id > 0).then_some(student.id);

    conn.execute(
        "INSERT INTO students (id, name, admission_number, photo_url, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            student.name,
            student.admission_number,
            student.photo_url,
            Local::now().to_rfc3339(),
        ],
    )?;
    let new_id = conn.last_insert_rowid();

    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO student_sections (student_id, section) VALUES (?1, ?2)",
    )?;
    for section in student.sections.iter() {
        stmt.execute(params![new_id, section])?;
    }

    Ok(new_id)
}

pub fn admission_number_exists(conn: &Connection, admission_number: &str) -> AppResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM students WHERE admission_number = ?1",
            [admission_number.trim()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// `student_id → sections` from the membership table.
fn load_memberships(conn: &Connection) -> Result<HashMap<i64, Vec<String>>> {
    let mut stmt =
        conn.prepare("SELECT student_id, section FROM student_sections ORDER BY student_id")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;

    let mut out: HashMap<i64, Vec<String>> = HashMap::new();
    for r in rows {
        let (id, section) = r?;
        out.entry(id).or_default().push(section);
    }
    Ok(out)
}

fn map_student(row: &Row, memberships: &HashMap<i64, Vec<String>>) -> Result<Student> {
    let id: i64 = row.get("id")?;
    let legacy: Option<String> = row.get("section")?;
    let sections = memberships.get(&id).map(Vec::as_slice).unwrap_or(&[]);

    Ok(Student {
        id,
        name: row.get("name")?,
        admission_number: row.get("admission_number")?,
        sections: SectionMemberships::from_parts(sections, legacy.as_deref()),
        photo_url: row.get("photo_url")?,
    })
}

/// Whole roster, ordered by id.
pub fn load_students(conn: &Connection) -> AppResult<Vec<Student>> {
    let memberships = load_memberships(conn)?;

    let mut stmt = conn.prepare(
        "SELECT id, name, admission_number, section, photo_url
         FROM students
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| map_student(row, &memberships))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_student(conn: &Connection, id: i64) -> AppResult<Option<Student>> {
    let mut stmt = conn.prepare("SELECT section FROM student_sections WHERE student_id = ?1")?;
    let sections = stmt
        .query_map([id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>>>()?;
    let memberships = HashMap::from([(id, sections)]);

    let student = conn
        .query_row(
            "SELECT id, name, admission_number, section, photo_url
             FROM students
             WHERE id = ?1",
            [id],
            |row| map_student(row, &memberships),
        )
        .optional()?;
    Ok(student)
}

// ---------------------------
// Attendance log
// ---------------------------

pub fn insert_log_entry(conn: &Connection, entry: &AttendanceLogEntry) -> AppResult<i64> {
    let status = entry
        .status
        .ok_or_else(|| AppError::InvalidStatus("missing status".into()))?;

    conn.execute(
        "INSERT INTO attendance_log (student_id, date, timestamp, status, source, created_at)
         VALUES (?1, ?2, ?3, ?4, 'cli', ?5)",
        params![
            entry.student_id,
            entry.date_str(),
            entry.timestamp,
            status.to_db_str(),
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Unknown status strings are kept as `None` (treated as absent) instead of
/// failing the whole query.
pub fn map_entry(row: &Row) -> Result<AttendanceLogEntry> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, STORAGE_FORMAT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let status: Option<String> = row.get("status")?;

    Ok(AttendanceLogEntry {
        student_id: row.get("student_id")?,
        date,
        timestamp: row.get("timestamp")?,
        status: status.as_deref().and_then(AttendanceStatus::from_db_str),
    })
}

/// Entries with `start <= date <= end`, in recording order
/// (timestamp, then insertion id for identical timestamps).
pub fn load_entries_between(
    conn: &Connection,
    start: &NaiveDate,
    end: &NaiveDate,
) -> AppResult<Vec<AttendanceLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT student_id, date, timestamp, status
         FROM attendance_log
         WHERE date BETWEEN ?1 AND ?2
         ORDER BY date ASC, timestamp ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![to_storage(start), to_storage(end)], map_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    #[test]
    fn students_merge_legacy_and_new_sections() {
        let conn = conn();
        let id = insert_student(&conn, &Student::new(0, "Asha", "1001", ["XI B"])).unwrap();
        conn.execute(
            "UPDATE students SET section = 'XI A' WHERE id = ?1",
            [id],
        )
        .unwrap();

        let s = find_student(&conn, id).unwrap().unwrap();
        assert_eq!(s.sections.joined(","), "XI A,XI B");
        assert!(admission_number_exists(&conn, "1001").unwrap());
        assert!(!admission_number_exists(&conn, "9999").unwrap());
    }

    #[test]
    fn find_student_reads_only_its_own_sections() {
        let conn = conn();
        insert_student(&conn, &Student::new(3, "Ravi", "1003", ["C"])).unwrap();
        let id = insert_student(&conn, &Student::new(5, "Zoya", "1005", ["A", "B"])).unwrap();

        let s = find_student(&conn, id).unwrap().unwrap();
        assert_eq!(s.name, "Zoya");
        assert_eq!(s.sections.joined(","), "A,B");
        assert!(find_student(&conn, 4).unwrap().is_none());
    }

    #[test]
    fn entries_are_bounded_and_unknown_status_is_kept() {
        let conn = conn();
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 19).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        insert_log_entry(&conn, &AttendanceLogEntry::new(1, d1, 200, AttendanceStatus::Present))
            .unwrap();
        insert_log_entry(&conn, &AttendanceLogEntry::new(1, d2, 100, AttendanceStatus::Absent))
            .unwrap();
        conn.execute(
            "INSERT INTO attendance_log (student_id, date, timestamp, status, created_at)
             VALUES (1, '2024-01-19', 300, 'teleported', 'x')",
            [],
        )
        .unwrap();

        let only_first = load_entries_between(&conn, &d1, &d1).unwrap();
        assert_eq!(only_first.len(), 2);
        assert_eq!(only_first[0].status, Some(AttendanceStatus::Present));
        assert_eq!(only_first[1].status, None);

        assert_eq!(load_entries_between(&conn, &d1, &d2).unwrap().len(), 3);
    }
}
