//! Application configuration stored as `config.toml` in the app config dir.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::inventory::{FieldMapping, FieldSpec};

/// Missing fields fall back to defaults, so an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    /// Column names probed on supply records for the stock levels.
    pub inventory: FieldMapping,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// File name inside the app data dir.
    pub file: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            file: "backoffice.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

fn is_column_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_field(label: &str, spec: &FieldSpec) -> Result<(), ConfigError> {
    if !is_column_name(&spec.default) {
        return Err(ConfigError::Invalid(format!(
            "inventory.{label}.default must be a column name, got {:?}",
            spec.default
        )));
    }
    if let Some(bad) = spec.candidates.iter().find(|c| !is_column_name(c)) {
        return Err(ConfigError::Invalid(format!(
            "inventory.{label}.candidates contains invalid column name {:?}",
            bad
        )));
    }
    Ok(())
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.file.trim().is_empty() {
            return Err(ConfigError::Invalid("database.file must not be empty".to_string()));
        }
        validate_field("stock", &self.inventory.stock)?;
        validate_field("minimum", &self.inventory.minimum)?;
        validate_field("cost", &self.inventory.cost)?;
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AppConfig::default()`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        let cfg = AppConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let cfg: AppConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &AppConfig) -> Result<(), ConfigError> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg)?;
    buf.push('\n');

    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, buf).map_err(io_err)?;
    fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}
