use crate::errors::{AppError, AppResult};
use crate::utils::date::check_label_format;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_section")]
    pub default_section: String,
    #[serde(default = "default_max_export_days")]
    pub max_export_days: i64,
    #[serde(default = "default_date_label_format")]
    pub date_label_format: String,
    #[serde(default)]
    pub export_dir: String,
}

fn default_section() -> String {
    crate::models::student::ALL_SECTIONS.to_string()
}
fn default_max_export_days() -> i64 {
    31
}
fn default_date_label_format() -> String {
    "%d/%m/%Y".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            default_section: default_section(),
            max_export_days: default_max_export_days(),
            date_label_format: default_date_label_format(),
            export_dir: String::new(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("stutra")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".stutra")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("stutra.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("stutra.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.max_export_days < 1 {
            return Err(AppError::Config(format!(
                "max_export_days must be at least 1 (found {})",
                self.max_export_days
            )));
        }
        check_label_format(&self.date_label_format).map_err(|e| match e {
            AppError::Export(msg) => AppError::Config(format!("date_label_format: {msg}")),
            other => other,
        })?;
        Ok(())
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Directory where exports land when no explicit file is given.
    pub fn export_dir(&self) -> PathBuf {
        if self.export_dir.trim().is_empty() {
            PathBuf::from(".")
        } else {
            crate::utils::path::expand_tilde(&self.export_dir)
        }
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        // Write config file
        if !is_test {
            let config = Self::with_database(db_path.clone());
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path).map_err(|e| {
                io::Error::new(e.kind(), format!("{}: {}", db_path.display(), e))
            })?;
        }

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.default_section, "All");
        assert_eq!(cfg.max_export_days, 31);
        assert_eq!(cfg.date_label_format, "%d/%m/%Y");
        assert_eq!(cfg.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn zero_day_limit_is_rejected() {
        let mut cfg = Config::default();
        cfg.max_export_days = 0;
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn broken_label_format_is_rejected() {
        let mut cfg = Config::default();
        cfg.date_label_format = "%d/%Q".into();
        assert!(cfg.validate().is_err());
        cfg.date_label_format = "%d/%m/%Y %H:%M".into();
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
        cfg.date_label_format = "%Y-%m-%d".into();
        assert!(cfg.validate().is_ok());
    }
}
