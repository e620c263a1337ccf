//! Per-section head count for one attendance day.

use crate::core::report::AttendanceReport;
use crate::models::student::UNKNOWN_SECTION;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub section: String,
    pub present: Vec<String>,
    pub absent: Vec<String>,
}

impl SectionSummary {
    pub fn total_strength(&self) -> usize {
        self.present.len() + self.absent.len()
    }

    /// "87.5%", or "0.0%" for an empty section.
    pub fn attendance_rate(&self) -> String {
        rate(self.present.len(), self.total_strength())
    }

    /// Sorted, comma separated; "None" when nobody is missing.
    pub fn absentees(&self) -> String {
        if self.absent.is_empty() {
            return "None".to_string();
        }
        let mut names = self.absent.clone();
        names.sort();
        names.join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTotals {
    pub students: usize,
    pub present: usize,
    pub absent: usize,
}

impl SummaryTotals {
    pub fn attendance_rate(&self) -> String {
        rate(self.present, self.students)
    }
}

fn rate(present: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", present as f64 * 100.0 / total as f64)
}

/// Group the `column`-th day of `report` by section.
///
/// A student counts once in every section they belong to; students without
/// any membership are grouped under "Unknown Section". Sections come back
/// sorted by name.
pub fn summarize(report: &AttendanceReport, column: usize) -> Vec<SectionSummary> {
    let mut by_section: BTreeMap<String, SectionSummary> = BTreeMap::new();

    for row in &report.rows {
        let present = row.statuses.get(column).copied().unwrap_or(false);

        let sections: Vec<&str> = if row.student.sections.is_empty() {
            vec![UNKNOWN_SECTION]
        } else {
            row.student.sections.iter().collect()
        };

        for section in sections {
            let entry = by_section
                .entry(section.to_string())
                .or_insert_with(|| SectionSummary {
                    section: section.to_string(),
                    ..Default::default()
                });
            if present {
                entry.present.push(row.student.name.clone());
            } else {
                entry.absent.push(row.student.name.clone());
            }
        }
    }

    by_section.into_values().collect()
}

pub fn totals(sections: &[SectionSummary]) -> SummaryTotals {
    sections.iter().fold(SummaryTotals::default(), |mut t, s| {
        t.students += s.total_strength();
        t.present += s.present.len();
        t.absent += s.absent.len();
        t
    })
}
