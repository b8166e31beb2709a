use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".playground-inventory";
/// Optional settings file read from the data directory.
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// User-tunable settings. Every field has a default, so a missing file or a
/// file that only sets one key both work.
///
/// ```toml
/// database_file = "playground.db"
/// report_dir = "/home/me/Documents/playground-reports"
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite file name, relative to the data directory unless absolute.
    pub database_file: PathBuf,
    /// Where exported PDF reports land. Defaults to `<data dir>/reports`.
    pub report_dir: Option<PathBuf>,
    /// `tracing` filter directive for the log file.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_file: PathBuf::from("playground.db"),
            report_dir: None,
            log_level: "info".to_string(),
        }
    }
}

/// Settings resolved against a concrete data directory.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub settings: Settings,
}

impl AppConfig {
    /// Resolve the data directory inside the user's home and read
    /// `settings.toml` from it when present.
    pub fn load() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Self::load_from(base_dirs.home_dir().join(DATA_DIR_NAME))
    }

    pub fn load_from(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).context("failed to create data directory")?;

        let path = data_dir.join(SETTINGS_FILE_NAME);
        let settings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            debug!(?path, "settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self { data_dir, settings })
    }

    pub fn database_path(&self) -> PathBuf {
        resolve(&self.data_dir, &self.settings.database_file)
    }

    pub fn report_dir(&self) -> PathBuf {
        match &self.settings.report_dir {
            Some(dir) => resolve(&self.data_dir, dir),
            None => self.data_dir.join("reports"),
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
