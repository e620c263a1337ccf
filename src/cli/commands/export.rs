use crate::cli::parser::{Commands, PeriodArgs};
use crate::config::Config;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::range::parse_range;
use crate::export::{
    AttendanceExporter, ExportFailure, ensure_writable, notify_export_success, write_output,
};
use crate::ui::messages::warning;
use crate::utils::path::expand_tilde;

/// `--date`, `--from/--to` or `--range` → raw `(start, end)`.
/// Bounds are checked by the exporter itself.
pub(crate) fn resolve_period(p: &PeriodArgs) -> AppResult<(String, String)> {
    if let Some(d) = &p.date {
        return Ok((d.clone(), d.clone()));
    }
    if let (Some(from), Some(to)) = (&p.from, &p.to) {
        return Ok((from.clone(), to.clone()));
    }
    if let Some(r) = &p.range {
        return parse_range(r).map_err(|e| AppError::from(ExportFailure::from(e)));
    }
    Err(AppError::from(ExportFailure::from(AppError::InvalidDate(
        "Specify --date, --from/--to or --range".into(),
    ))))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        period,
        section,
        format,
        file,
        stdout,
        force,
    } = cmd
    {
        let (start, end) = resolve_period(period)?;
        let section = section.as_deref().or(Some(cfg.default_section.as_str()));

        let pool = DbPool::new(&cfg.database)?;
        let exporter = AttendanceExporter::from_config(&pool, &pool, cfg);

        let out = match exporter.export(&start, &end, section, *format) {
            Ok(out) => out,
            Err(failure) => {
                if let Err(e) = audit(
                    &pool.conn,
                    "export",
                    &format!("{start}:{end}"),
                    &format!("Export failed ({})", failure.kind),
                ) {
                    warning(format!("Failed to write internal log: {e}"));
                }
                return Err(failure.into());
            }
        };

        if *stdout {
            print!("{}", out.text);
            return Ok(());
        }

        let path = match file {
            Some(f) => expand_tilde(f),
            None => cfg.export_dir().join(&out.suggested_file_name),
        };

        ensure_writable(&path, *force)?;
        write_output(&path, &out.text)?;

        audit(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!(
                "{} student(s) x {} day(s), {}",
                out.students,
                out.days,
                format.as_str()
            ),
        )?;

        notify_export_success(format.label(), &path);
    }
    Ok(())
}
