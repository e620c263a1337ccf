use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::summary::{summarize, totals};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::csv::{render_summary, totals_line};
use crate::export::{AttendanceExporter, ensure_writable, notify_export_success, write_output};
use crate::ui::messages::info;
use crate::utils::colors::{RESET, color_for_rate};
use crate::utils::date::{today, to_storage};
use crate::utils::path::expand_tilde;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary {
        date,
        section,
        file,
        force,
    } = cmd
    {
        let day = date.clone().unwrap_or_else(|| to_storage(&today()));
        let section = section.as_deref().or(Some(cfg.default_section.as_str()));

        let pool = DbPool::new(&cfg.database)?;
        let report = AttendanceExporter::from_config(&pool, &pool, cfg).report(&day, &day, section)?;

        if report.is_empty() {
            info(format!("No students to summarize for {day}."));
            return Ok(());
        }
        let sections = summarize(&report, 0);

        let mut table = Table::new([
            "Section",
            "Total_Strength",
            "Present",
            "Absent",
            "Attendance_Rate",
            "Absentees",
        ]);
        for s in &sections {
            table.add_row(vec![
                s.section.clone(),
                s.total_strength().to_string(),
                s.present.len().to_string(),
                s.absent.len().to_string(),
                s.attendance_rate(),
                s.absentees(),
            ]);
        }

        println!("📋 Attendance summary for {day}\n");
        println!("{}", table.render());

        let t = totals(&sections);
        println!(
            "\n{}{}{}",
            color_for_rate(t.present, t.students),
            totals_line(&t),
            RESET
        );

        if let Some(f) = file {
            let path = expand_tilde(f);
            ensure_writable(&path, *force)?;
            write_output(&path, &render_summary(&sections)?)?;
            notify_export_success("Summary CSV", &path);
        }

        audit(
            &pool.conn,
            "summary",
            &day,
            &format!("{} section(s), {}", sections.len(), t.attendance_rate()),
        )?;
    }
    Ok(())
}
