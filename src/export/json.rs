// src/export/json.rs

use crate::core::report::AttendanceReport;
use crate::errors::AppResult;
use crate::utils::date::to_storage;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    admission_number: &'a str,
    roll_number: usize,
    statuses: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    dates: Vec<String>,
    rows: Vec<JsonRow<'a>>,
}

/// Pretty JSON view of the grid; dates stay in `YYYY-MM-DD`.
pub fn render(report: &AttendanceReport) -> AppResult<String> {
    let doc = JsonReport {
        dates: report.dates.iter().map(to_storage).collect(),
        rows: report
            .rows
            .iter()
            .map(|r| JsonRow {
                name: &r.student.name,
                admission_number: &r.student.admission_number,
                roll_number: r.roll_number,
                statuses: r
                    .statuses
                    .iter()
                    .map(|p| if *p { "P" } else { "A" })
                    .collect(),
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&doc)?)
}
