// src/export/csv.rs

use crate::core::report::AttendanceReport;
use crate::core::summary::{SectionSummary, SummaryTotals};
use crate::errors::{AppError, AppResult};
use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use chrono::NaiveDate;

pub const HEADER_NAME: &str = "Student Name";
pub const HEADER_ROLL: &str = "Roll Number";

fn mark(present: bool) -> &'static str {
    if present { "P" } else { "A" }
}

fn into_text(bytes: Vec<u8>) -> AppResult<String> {
    String::from_utf8(bytes).map_err(|e| AppError::Export(format!("CSV is not valid UTF-8: {e}")))
}

/// Attendance grid as CSV.
///
/// Every field is quoted, embedded quotes are doubled and each record ends
/// with `\n`:
///
/// ```text
/// "Student Name","Roll Number","19/01/2024"
/// "Alice","1","P"
/// ```
pub fn render<F>(report: &AttendanceReport, label: F) -> AppResult<String>
where
    F: Fn(&NaiveDate) -> AppResult<String>,
{
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = vec![HEADER_NAME.to_string(), HEADER_ROLL.to_string()];
    for date in &report.dates {
        header.push(label(date)?);
    }
    wtr.write_record(&header)?;

    for row in &report.rows {
        let mut record = Vec::with_capacity(row.statuses.len() + 2);
        record.push(row.student.name.clone());
        record.push(row.roll_number.to_string());
        record.extend(row.statuses.iter().map(|p| mark(*p).to_string()));
        wtr.write_record(&record)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))?;
    into_text(bytes)
}

/// Section summary as CSV (minimal quoting), totals excluded.
pub fn render_summary(sections: &[SectionSummary]) -> AppResult<String> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record([
        "Section",
        "Total_Strength",
        "Present",
        "Absent",
        "Attendance_Rate",
        "Absentees",
    ])?;

    for s in sections {
        wtr.write_record([
            s.section.clone(),
            s.total_strength().to_string(),
            s.present.len().to_string(),
            s.absent.len().to_string(),
            s.attendance_rate(),
            s.absentees(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))?;
    into_text(bytes)
}

/// One-line recap printed under the summary table.
pub fn totals_line(t: &SummaryTotals) -> String {
    format!(
        "Total: {} students, {} present, {} absent ({})",
        t.students,
        t.present,
        t.absent,
        t.attendance_rate()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::build;
    use crate::core::summary::summarize;
    use crate::models::log_entry::AttendanceLogEntry;
    use crate::models::status::AttendanceStatus::*;
    use crate::models::student::Student;
    use crate::utils::date::label_formatter;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn renders_quoted_grid() {
        let students = vec![
            Student::new(2, "Bob", "1002", ["A"]),
            Student::new(1, "Alice", "1001", ["A"]),
        ];
        let entries = vec![
            AttendanceLogEntry::new(1, d("2024-01-19"), 100, Present),
            AttendanceLogEntry::new(1, d("2024-01-19"), 200, Washroom),
        ];
        let report = build(&students, &entries, &[d("2024-01-19")], None);

        let csv = render(&report, label_formatter("%d/%m/%Y")).unwrap();
        assert_eq!(
            csv,
            "\"Student Name\",\"Roll Number\",\"19/01/2024\"\n\
             \"Alice\",\"1\",\"P\"\n\
             \"Bob\",\"2\",\"A\"\n"
        );
    }

    #[test]
    fn doubles_embedded_quotes() {
        let students = vec![Student::new(1, "Anna \"Nan\" Roy", "7", ["A"])];
        let report = build(&students, &[], &[d("2024-01-19")], None);

        let csv = render(&report, label_formatter("%d/%m/%Y")).unwrap();
        assert!(csv.contains("\"Anna \"\"Nan\"\" Roy\",\"1\",\"A\""));
    }

    #[test]
    fn empty_roster_is_header_only() {
        let report = build(&[], &[], &[d("2024-01-19"), d("2024-01-20")], Some("Z"));
        let csv = render(&report, label_formatter("%d/%m/%Y")).unwrap();
        assert_eq!(
            csv,
            "\"Student Name\",\"Roll Number\",\"19/01/2024\",\"20/01/2024\"\n"
        );
    }

    #[test]
    fn summary_quotes_only_when_needed() {
        let students = vec![
            Student::new(1, "Asha", "1", ["XI A"]),
            Student::new(2, "Ravi", "2", ["XI A"]),
            Student::new(3, "Zoya", "3", ["XI A"]),
        ];
        let entries = vec![AttendanceLogEntry::new(1, d("2024-01-19"), 1, Present)];
        let report = build(&students, &entries, &[d("2024-01-19")], None);

        let csv = render_summary(&summarize(&report, 0)).unwrap();
        assert_eq!(
            csv,
            "Section,Total_Strength,Present,Absent,Attendance_Rate,Absentees\n\
             XI A,3,1,2,33.3%,\"Ravi, Zoya\"\n"
        );
    }
}
