use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROSTER
    //
    let students: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
    let sections: i64 = pool.conn.query_row(
        "SELECT COUNT(DISTINCT section) FROM student_sections",
        [],
        |row| row.get(0),
    )?;
    println!(
        "{}• Students:{} {}{}{} in {} section(s)",
        CYAN, RESET, GREEN, students, RESET, sections
    );

    //
    // 3) ATTENDANCE LOG
    //
    let entries: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM attendance_log", [], |row| row.get(0))?;
    println!(
        "{}• Status changes:{} {}{}{}",
        CYAN, RESET, GREEN, entries, RESET
    );

    let (first, last): (Option<String>, Option<String>) = pool
        .conn
        .query_row(
            "SELECT MIN(date), MAX(date) FROM attendance_log",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .unwrap_or((None, None));

    let placeholder = || format!("{GREY}--{RESET}");
    println!("{}• Attendance days:{}", CYAN, RESET);
    println!("    from: {}", first.unwrap_or_else(placeholder));
    println!("    to:   {}", last.unwrap_or_else(placeholder));

    println!();
    Ok(())
}
