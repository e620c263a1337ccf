use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::mark::MarkLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::date::parse_date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Mark {
        student_id,
        status,
        date,
        at,
    } = cmd
    {
        let day = match date {
            Some(d) => Some(parse_date(d).ok_or_else(|| {
                AppError::InvalidDate(format!("'{d}'. Use the YYYY-MM-DD format."))
            })?),
            None => None,
        };

        let mut pool = DbPool::new(&cfg.database)?;
        let entry = MarkLogic::apply(&mut pool, *student_id, status, day, *at)?;

        let status = entry.status.map(|s| s.to_db_str()).unwrap_or("unknown");
        success(format!(
            "Student #{} marked {} on {}",
            entry.student_id,
            status,
            entry.date_str()
        ));
    }
    Ok(())
}
