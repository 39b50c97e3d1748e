//! CLI configuration.
//!
//! # Responsibility
//! - Load the optional TOML config file.
//! - Merge command-line overrides on top of file values and defaults.
//!
//! # Invariants
//! - Flags win over the file; the file wins over built-in defaults.
//! - File logging is only enabled when a log directory is configured.
//! - A thumbnail box with a zero side is rejected at load time.

use anyhow::{Context, Result};
use lendshelf_core::{default_log_level, LogSettings, ThumbnailBounds};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "lendshelf.toml";
pub const DEFAULT_DATABASE_FILE: &str = "lendshelf.sqlite3";

/// On-disk config shape; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub thumbnail: Option<ThumbnailBounds>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Effective configuration used by commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub logging: Option<LogSettings>,
    pub thumbnail: ThumbnailBounds,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config file")
    }

    /// Reads `explicit` when given, else `lendshelf.toml` if present.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        Self::parse(&text).with_context(|| format!("in config `{}`", path.display()))
    }
}

impl AppConfig {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let database_path = overrides
            .database_path
            .or(file.database_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE));

        let level = overrides
            .log_level
            .or(file.log_level)
            .unwrap_or_else(|| default_log_level().to_string());

        let logging = match overrides.log_dir.or(file.log_dir) {
            Some(dir) => Some(LogSettings {
                level,
                log_dir: absolutize(dir)?,
                echo_warnings: true,
            }),
            None => None,
        };

        let thumbnail = file
            .thumbnail
            .unwrap_or_default()
            .validate()
            .context("invalid [thumbnail] section")?;

        Ok(Self {
            database_path,
            logging,
            thumbnail,
        })
    }
}

fn absolutize(dir: PathBuf) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir);
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(dir))
}
