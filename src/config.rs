//! Host configuration, loaded from an optional TOML file.
//!
//! ```toml
//! [storage]
//! path = "/srv/missions/ceradonMissionProject.json"
//!
//! [logging]
//! filter = "mission_architect_lib=debug,info"
//! directory = "/var/log/mission-architect"
//! ```
//!
//! Every key is optional. A missing file yields [`Config::default`].

use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::project::STORAGE_KEY;

/// Directory name used under the platform config/data directories.
pub const APP_DIR: &str = "mission-architect";

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// `[storage]`: where the single project slot lives.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Storage slot file. Defaults to [`default_storage_path`].
    pub path: Option<PathBuf>,
}

/// `[logging]`: tracing filter and log file directory.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Log directory. Defaults to [`default_data_dir`].
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    pub fn storage_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(default_storage_path)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.logging.directory.clone().unwrap_or_else(default_data_dir)
    }
}

/// `<data_local_dir>/mission-architect`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_default().join(APP_DIR)
}

/// `<config_dir>/mission-architect/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join(APP_DIR)
        .join("config.toml")
}

/// `<data_local_dir>/mission-architect/ceradonMissionProject.json`.
pub fn default_storage_path() -> PathBuf {
    default_data_dir().join(format!("{STORAGE_KEY}.json"))
}

/// Parse and validate a TOML configuration document.
pub fn parse(toml_str: &str) -> Result<Config, AppError> {
    let cfg: Config = toml::from_str(toml_str).map_err(|e| AppError::Config(e.to_string()))?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &Config) -> Result<(), AppError> {
    if cfg.logging.filter.trim().is_empty() {
        return Err(AppError::Config(
            "logging.filter must not be empty".to_string(),
        ));
    }
    if cfg
        .storage
        .path
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        return Err(AppError::Config(
            "storage.path must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Load the configuration at `path`; a missing file yields the defaults.
pub fn load(path: &Path) -> Result<Config, AppError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(AppError::Config(format!(
            "cannot read {}: {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = parse("").expect("empty config is valid");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.logging.filter, "info");
        assert!(cfg.storage_path().ends_with("mission-architect/ceradonMissionProject.json"));
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = parse(
            r#"
            [storage]
            path = "/tmp/slot.json"

            [logging]
            filter = "debug"
            directory = "/tmp/logs"
            "#,
        )
        .expect("valid config");
        assert_eq!(cfg.storage_path(), PathBuf::from("/tmp/slot.json"));
        assert_eq!(cfg.log_dir(), PathBuf::from("/tmp/logs"));
        assert_eq!(cfg.logging.filter, "debug");
    }

    #[test]
    fn invalid_toml_returns_config_error() {
        assert!(matches!(parse("this is not valid toml ::::"), Err(AppError::Config(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(parse("[storage]\nbucket = 1\n"), Err(AppError::Config(_))));
    }

    #[test]
    fn empty_filter_fails_validation() {
        let err = parse("[logging]\nfilter = \"  \"\n").expect_err("empty filter");
        assert!(err.to_string().contains("logging.filter"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load(&dir.path().join("absent.toml")).expect("missing file is fine");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn config_file_is_read_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nfilter = \"warn\"\n").expect("write config");
        assert_eq!(load(&path).expect("load").logging.filter, "warn");
    }
}
