//! Section filtering, alphabetical ordering and roll-number assignment.

use crate::models::student::Student;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterRow {
    pub student: Student,
    /// 1-based, valid only for the export it was computed for.
    pub roll_number: usize,
}

/// Name ordering used for roll numbers.
///
/// Case-insensitive first so "alice" sits next to "Alice", then the exact
/// name, then the id so that the outcome never depends on input order.
/// This is not a locale collation: after lowercasing, names compare by code
/// point, so accented names ("Émile") sort after every unaccented ASCII one.
pub fn compare_names(a: &Student, b: &Student) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Filter `students` by `section` (None / "All" keeps everyone), sort them by
/// name and number them from 1.
pub fn project(students: &[Student], section: Option<&str>) -> Vec<RosterRow> {
    let mut selected: Vec<&Student> = students.iter().filter(|s| s.in_section(section)).collect();
    selected.sort_by(|a, b| compare_names(a, b));

    selected
        .into_iter()
        .enumerate()
        .map(|(i, s)| RosterRow {
            student: s.clone(),
            roll_number: i + 1,
        })
        .collect()
}
