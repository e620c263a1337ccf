use crate::core::roster::{self, RosterRow};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{admission_number_exists, insert_student, load_students};
use crate::errors::{AppError, AppResult};
use crate::models::student::{SectionMemberships, Student};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const DEFAULT_SECTION: &str = "default";

const REQUIRED_COLUMNS: [&str; 3] = ["name", "admission_number", "section"];

/// Outcome of a bulk import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    admission_number: String,
    #[serde(default)]
    section: String,
    #[serde(default)]
    photo_url: String,
}

#[derive(Debug, Deserialize)]
struct RosterDocument {
    students: BTreeMap<String, RosterRecord>,
}

#[derive(Debug, Deserialize)]
struct RosterRecord {
    #[serde(default)]
    name: String,
    #[serde(default, alias = "admissionNumber")]
    admission_number: String,
    #[serde(default)]
    sections: SectionMemberships,
    #[serde(default)]
    section: Option<String>,
    #[serde(default, alias = "photoUrl")]
    photo_url: String,
}

/// Roster administration: `student add | list | import`.
pub struct StudentLogic;

impl StudentLogic {
    pub fn add(
        pool: &mut DbPool,
        name: &str,
        admission_number: &str,
        sections: &[String],
    ) -> AppResult<Student> {
        if name.trim().is_empty() {
            return Err(AppError::Other("Student name cannot be empty".into()));
        }
        if admission_number.trim().is_empty() {
            return Err(AppError::Other("Admission number cannot be empty".into()));
        }
        if admission_number_exists(&pool.conn, admission_number)? {
            return Err(AppError::Other(format!(
                "Admission number '{}' is already taken",
                admission_number.trim()
            )));
        }

        let mut student = if sections.iter().all(|s| s.trim().is_empty()) {
            Student::new(0, name, admission_number, [DEFAULT_SECTION])
        } else {
            Student::new(0, name, admission_number, sections)
        };

        let tx = pool.conn.transaction()?;
        student.id = insert_student(&tx, &student)?;
        audit(
            &tx,
            "student_add",
            &student.admission_number,
            &format!("{} ({})", student.name, student.sections.joined(", ")),
        )?;
        tx.commit()?;

        Ok(student)
    }

    /// Filtered roster with roll numbers, as exports will number it.
    pub fn list(pool: &DbPool, section: Option<&str>) -> AppResult<Vec<RosterRow>> {
        let students = load_students(&pool.conn)?;
        Ok(roster::project(&students, section))
    }

    /// Import a roster file; `.json` is read as a roster document, anything
    /// else as CSV.
    pub fn import(pool: &mut DbPool, file: &Path) -> AppResult<ImportSummary> {
        let is_json = file
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let candidates = if is_json {
            read_json(file)?
        } else {
            read_csv(file)?
        };

        let tx = pool.conn.transaction()?;
        let mut summary = ImportSummary::default();

        for cand in candidates {
            let student = match cand {
                Some(s) => s,
                None => {
                    summary.skipped += 1;
                    continue;
                }
            };

            if admission_number_exists(&tx, &student.admission_number)? {
                warn!(admission = %student.admission_number, "duplicate admission number skipped");
                summary.skipped += 1;
                continue;
            }
            // keep the document id unless it is already in use
            let student = if student.id > 0 && id_taken(&tx, student.id)? {
                Student { id: 0, ..student }
            } else {
                student
            };

            insert_student(&tx, &student)?;
            summary.imported += 1;
        }

        audit(
            &tx,
            "student_import",
            &file.to_string_lossy(),
            &format!(
                "Imported {} student(s), skipped {}",
                summary.imported, summary.skipped
            ),
        )?;
        tx.commit()?;

        Ok(summary)
    }
}

fn id_taken(conn: &rusqlite::Connection, id: i64) -> AppResult<bool> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM students WHERE id = ?1", [id], |r| {
        r.get(0)
    })?;
    Ok(n > 0)
}

/// Rows lacking a name or admission number come back as `None`.
fn read_csv(file: &Path) -> AppResult<Vec<Option<Student>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(file)?;

    let headers = rdr.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Other(format!(
            "CSV must contain columns: {} (missing: {})",
            REQUIRED_COLUMNS.join(", "),
            missing.join(", ")
        )));
    }

    let mut out = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        let row = row?;
        if row.name.is_empty() || row.admission_number.is_empty() {
            out.push(None);
            continue;
        }
        let mut student = Student::new(
            0,
            &row.name,
            &row.admission_number,
            row.section.split(';').map(str::trim).filter(|s| !s.is_empty()),
        );
        student.photo_url = row.photo_url;
        out.push(Some(student));
    }
    Ok(out)
}

fn read_json(file: &Path) -> AppResult<Vec<Option<Student>>> {
    let content = fs::read_to_string(file)?;
    let doc: RosterDocument = serde_json::from_str(&content)?;

    Ok(doc
        .students
        .into_iter()
        .map(|(key, rec)| {
            if rec.name.trim().is_empty() || rec.admission_number.trim().is_empty() {
                return None;
            }
            let id = key.trim().parse::<i64>().ok().filter(|id| *id > 0).unwrap_or(0);
            let mut sections = rec.sections;
            if let Some(legacy) = rec.section.as_deref() {
                sections.insert(legacy);
            }
            let mut student = Student::new(id, &rec.name, &rec.admission_number, sections.iter());
            student.photo_url = rec.photo_url.trim().to_string();
            Some(student)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use std::env;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        pool
    }

    fn write_tmp(name: &str, body: &str) -> std::path::PathBuf {
        let path = env::temp_dir().join(format!("stutra_{}_{}", std::process::id(), name));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn add_defaults_section_and_rejects_duplicates() {
        let mut pool = pool();
        let s = StudentLogic::add(&mut pool, "Asha", "1001", &[]).unwrap();
        assert!(s.sections.contains(DEFAULT_SECTION));
        assert!(StudentLogic::add(&mut pool, "Other", "1001", &[]).is_err());
    }

    #[test]
    fn list_numbers_by_name() {
        let mut pool = pool();
        StudentLogic::add(&mut pool, "Zoya", "1", &["A".to_string()]).unwrap();
        StudentLogic::add(&mut pool, "asha", "2", &["A".to_string(), "B".to_string()]).unwrap();
        StudentLogic::add(&mut pool, "Ravi", "3", &["B".to_string()]).unwrap();

        let a = StudentLogic::list(&pool, Some("A")).unwrap();
        let names: Vec<(&str, usize)> = a
            .iter()
            .map(|r| (r.student.name.as_str(), r.roll_number))
            .collect();
        assert_eq!(names, [("asha", 1), ("Zoya", 2)]);
        assert_eq!(StudentLogic::list(&pool, None).unwrap().len(), 3);
    }

    #[test]
    fn csv_import_splits_sections_and_skips_blanks() {
        let mut pool = pool();
        let path = write_tmp(
            "roster.csv",
            "name,admission_number,section,photo_url\n\
             Asha,1001,XI A;XI B,\n\
             ,1002,XI A,\n\
             Ravi,1003,XI A,http://x/ravi.png\n\
             Dup,1001,XI A,\n",
        );

        let summary = StudentLogic::import(&mut pool, &path).unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 2 });

        let b = StudentLogic::list(&pool, Some("XI B")).unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].student.name, "Asha");
        fs::remove_file(path).ok();
    }

    #[test]
    fn csv_import_requires_columns() {
        let mut pool = pool();
        let path = write_tmp("bad.csv", "name,section\nAsha,A\n");
        assert!(StudentLogic::import(&mut pool, &path).is_err());
        fs::remove_file(path).ok();
    }

    #[test]
    fn json_import_accepts_both_section_shapes() {
        let mut pool = pool();
        let path = write_tmp(
            "roster.json",
            r#"{ "students": {
                "7": { "name": "Asha", "admissionNumber": "1001", "sections": ["A", "B"] },
                "x": { "name": "Ravi", "admission_number": "1002", "section": "C", "photoUrl": "p.png" },
                "9": { "name": "", "admissionNumber": "1003" }
            } }"#,
        );

        let summary = StudentLogic::import(&mut pool, &path).unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 1 });

        let all = StudentLogic::list(&pool, None).unwrap();
        let asha = &all[0].student;
        assert_eq!(asha.id, 7);
        assert_eq!(asha.sections.joined(","), "A,B");
        assert_eq!(all[1].student.sections.joined(","), "C");
        assert_eq!(all[1].student.photo_url, "p.png");
        fs::remove_file(path).ok();
    }
}
