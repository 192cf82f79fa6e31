//! Configuration loading for memopad.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// File name of the memo database when no explicit path is configured.
pub const DEFAULT_DATABASE_FILE: &str = "memo_db.db";

/// Get the memopad home directory (~/.memopad).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".memopad"))
}

/// Get the settings file path.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("settings.json"))
}

/// Load settings from ~/.memopad/settings.json
pub fn load_settings() -> Result<Settings> {
    load_settings_from(&get_settings_path()?)
}

/// Load settings from an explicit file.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Settings file not found at {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&content)?;

    validate_settings(&settings)?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Load settings, falling back to defaults only when no settings file exists.
///
/// A file that exists but does not parse or validate is an error: silently
/// using defaults would point the store at a different database.
pub fn load_settings_or_default() -> Result<Settings> {
    load_settings_or_default_from(&get_settings_path()?)
}

/// Like [`load_settings_or_default`], for an explicit file.
pub fn load_settings_or_default_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        tracing::debug!("No settings at {}, using defaults", path.display());
        return Ok(Settings::default());
    }
    load_settings_from(path)
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.database.file_name.trim().is_empty() {
        return Err(Error::Config(
            "database.file_name must not be empty".to_string(),
        ));
    }
    if settings.web.port == 0 {
        return Err(Error::Config("web.port must be non-zero".to_string()));
    }
    Ok(())
}

/// Database configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    /// Explicit database file; wins over `file_name`.
    pub path: Option<PathBuf>,
    #[serde(default = "default_database_file")]
    pub file_name: String,
}

fn default_database_file() -> String {
    DEFAULT_DATABASE_FILE.to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            file_name: default_database_file(),
        }
    }
}

/// Web API configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

fn default_web_host() -> String {
    "127.0.0.1".to_string()
}

fn default_web_port() -> u16 {
    3333
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

/// memopad settings.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub web: WebConfig,
}

impl Settings {
    /// Resolve the database file: CLI override, then `database.path`, then
    /// `<home>/<file_name>`.
    pub fn database_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }
        Ok(get_home_dir()?.join(&self.database.file_name))
    }
}
