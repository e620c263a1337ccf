use crate::cli::parser::{Commands, StudentAction};
use crate::config::Config;
use crate::core::student::StudentLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Student { action } = cmd else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        StudentAction::Add {
            name,
            admission,
            sections,
        } => {
            let s = StudentLogic::add(&mut pool, name, admission, sections)?;
            success(format!(
                "Added student #{}: {} [{}]",
                s.id,
                s.name,
                s.sections.joined(", ")
            ));
        }

        StudentAction::List { section } => {
            let rows = StudentLogic::list(&pool, section.as_deref())?;
            if rows.is_empty() {
                info("No students found.");
                return Ok(());
            }

            let mut table = Table::new(["Roll", "Id", "Name", "Admission", "Sections"]);
            for r in &rows {
                table.add_row(vec![
                    r.roll_number.to_string(),
                    r.student.id.to_string(),
                    r.student.name.clone(),
                    r.student.admission_number.clone(),
                    r.student.sections.joined(", "),
                ]);
            }
            println!("{}", table.render());
        }

        StudentAction::Import { file } => {
            let summary = StudentLogic::import(&mut pool, &expand_tilde(file))?;
            success(format!("Imported {} student(s).", summary.imported));
            if summary.skipped > 0 {
                warning(format!(
                    "Skipped {} row(s): missing name/admission number or duplicates.",
                    summary.skipped
                ));
            }
        }
    }

    Ok(())
}
