use crate::ui::messages::{success, warning};
use rusqlite::{Connection, Error, OptionalExtension, Result};
use tracing::info;

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        rusqlite::params![chrono::Local::now().to_rfc3339(), version, message],
    )?;
    Ok(())
}

/// Roster and attendance tables.
///
/// `students.section` is the legacy single-section column; memberships now
/// live in `student_sections`. The old column is still read and merged.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            name             TEXT NOT NULL,
            admission_number TEXT NOT NULL UNIQUE,
            section          TEXT DEFAULT NULL,
            photo_url        TEXT NOT NULL DEFAULT '',
            created_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS student_sections (
            student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
            section    TEXT NOT NULL,
            PRIMARY KEY (student_id, section)
        );

        CREATE TABLE IF NOT EXISTS attendance_log (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id  INTEGER NOT NULL,
            date        TEXT NOT NULL,
            timestamp   INTEGER NOT NULL,
            status      TEXT NOT NULL,
            source      TEXT NOT NULL DEFAULT 'cli',
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_date_ts ON attendance_log(date, timestamp);
        CREATE INDEX IF NOT EXISTS idx_attendance_student ON attendance_log(student_id, date);
        CREATE INDEX IF NOT EXISTS idx_student_sections_section ON student_sections(section);
        "#,
    )?;
    Ok(())
}

/// Older rosters were created without `photo_url`.
fn migrate_add_photo_url(conn: &Connection) -> Result<()> {
    if has_column(conn, "students", "photo_url")? {
        return Ok(());
    }

    conn.execute(
        "ALTER TABLE students ADD COLUMN photo_url TEXT NOT NULL DEFAULT ''",
        [],
    )
    .map_err(|e| {
        Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some(format!("Failed to add 'photo_url' column: {}", e)),
        )
    })?;

    success("Added 'photo_url' column to students table.");
    Ok(())
}

/// Copy legacy single-section values into `student_sections`.
fn migrate_legacy_sections(conn: &Connection) -> Result<()> {
    let version = "20250701_0002_student_sections";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    let copied = conn.execute(
        "INSERT OR IGNORE INTO student_sections (student_id, section)
         SELECT id, TRIM(section) FROM students
         WHERE section IS NOT NULL AND TRIM(section) <> ''",
        [],
    )?;

    mark_applied(
        conn,
        version,
        &format!("Copied {copied} legacy section value(s) into student_sections"),
    )?;

    if copied > 0 {
        warning(format!(
            "Migrated {} student(s) from the single-section format.",
            copied
        ));
    }
    info!(version, copied, "migration applied");

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Called by db::initialize::init_db() and `db --migrate`.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Tables created by an older release lack some columns
    let had_students = table_exists(conn, "students")?;

    // 3) Create whatever is missing
    create_schema(conn)?;

    if had_students {
        migrate_add_photo_url(conn)?;
    }

    // 4) Legacy single-section memberships
    migrate_legacy_sections(conn)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent_and_copy_legacy_sections() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                admission_number TEXT NOT NULL UNIQUE,
                section TEXT DEFAULT NULL,
                created_at TEXT NOT NULL
             );
             INSERT INTO students (name, admission_number, section, created_at)
             VALUES ('Asha', '1001', 'XI A', 'x'), ('Ravi', '1002', NULL, 'x');",
        )
        .unwrap();

        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM student_sections", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);
        assert!(has_column(&conn, "students", "photo_url").unwrap());

        let applied: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(applied, 1);
    }
}
