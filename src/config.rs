//! # Configuration Module
//!
//! Resolves where moodmix reads its catalog and writes its state.
//!
//! ## Data Storage
//!
//! History, saved playlists, reports and charts live in one data directory.
//! Unless overridden with `--data-dir` / `MOODMIX_DATA_DIR`, that is the
//! platform-standard location:
//! - Linux: `~/.local/share/moodmix/`
//! - macOS: `~/Library/Application Support/moodmix/`
//! - Windows: `%APPDATA%\moodmix\`
//!
//! The catalog is read from `--catalog` / `MOODMIX_CATALOG`, defaulting to
//! `songs.csv` in the working directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the application subdirectory inside the platform data directory.
pub const APP_DIR: &str = "moodmix";

/// Default catalog file, relative to the working directory.
pub const DEFAULT_CATALOG: &str = "songs.csv";

/// File name of the listening history inside the data directory.
pub const HISTORY_FILE: &str = "playlist_history.csv";

/// Returns the platform-appropriate data directory for moodmix, creating it
/// if needed.
///
/// # Errors
///
/// Fails if the system data directory cannot be determined or the
/// `moodmix` subdirectory cannot be created.
///
/// # Examples
///
/// ```no_run
/// use moodmix::config::get_data_dir;
///
/// let data_dir = get_data_dir()?;
/// println!("History lives in {}", data_dir.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Pass --data-dir or set MOODMIX_DATA_DIR."
        )
    })?;

    let app_dir = data_dir.join(APP_DIR);
    ensure_dir(&app_dir)?;
    Ok(app_dir)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| {
        format!(
            "Failed to create moodmix data directory at {}. Please check file permissions.",
            dir.display()
        )
    })
}

/// Resolved paths and switches for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// CSV catalog of songs.
    pub catalog_path: PathBuf,
    /// Directory for history, playlists, reports and charts.
    pub data_dir: PathBuf,
    /// Append-only listening history.
    pub history_path: PathBuf,
    /// Whether each recommendation writes a text report.
    pub write_reports: bool,
}

impl RuntimeConfig {
    /// Resolve the configuration. `data_dir` falls back to [`get_data_dir`].
    ///
    /// The data directory is created if it does not exist.
    pub fn new(catalog_path: PathBuf, data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => {
                ensure_dir(&dir)?;
                dir
            }
            None => get_data_dir()?,
        };
        Ok(Self::with_paths(catalog_path, data_dir))
    }

    /// Configuration with explicit paths. Nothing is created on disk.
    #[must_use]
    pub fn with_paths(catalog_path: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            catalog_path,
            history_path: data_dir.join(HISTORY_FILE),
            data_dir,
            write_reports: true,
        }
    }

    #[must_use]
    pub fn without_reports(mut self) -> Self {
        self.write_reports = false;
        self
    }

    /// Where a saved playlist goes. Relative names land in the data directory,
    /// and a missing `.csv` extension is added.
    #[must_use]
    pub fn playlist_path(&self, name: &str) -> PathBuf {
        let name = if name.to_lowercase().ends_with(".csv") {
            name.to_string()
        } else {
            format!("{name}.csv")
        };
        self.data_dir.join(name)
    }

    /// Where a chart file with `file_name` goes.
    #[must_use]
    pub fn chart_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_data_dir_structure() {
        let dir = get_data_dir().expect("Should get valid data dir");
        assert!(dir.is_absolute());
        assert!(dir.is_dir());
        assert_eq!(dir.file_name().unwrap(), APP_DIR);
    }

    #[test]
    fn test_explicit_data_dir_is_created() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("state");
        let config =
            RuntimeConfig::new(PathBuf::from("songs.csv"), Some(data_dir.clone())).unwrap();

        assert!(data_dir.is_dir());
        assert_eq!(config.history_path, data_dir.join(HISTORY_FILE));
        assert!(config.write_reports);
    }

    #[test]
    fn test_playlist_path_adds_extension() {
        let config = RuntimeConfig::with_paths(PathBuf::from("songs.csv"), PathBuf::from("/data"));
        assert_eq!(config.playlist_path("road_trip"), PathBuf::from("/data/road_trip.csv"));
        assert_eq!(config.playlist_path("mix.CSV"), PathBuf::from("/data/mix.CSV"));
        assert_eq!(config.chart_path("a.svg"), PathBuf::from("/data/a.svg"));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = RuntimeConfig::with_paths(PathBuf::from("songs.csv"), PathBuf::from("/data"))
            .without_reports();
        let json = config.to_json().unwrap();
        let parsed: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
        assert!(!parsed.write_reports);
    }
}
