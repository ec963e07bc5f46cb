//! Scan defaults loaded from an optional JSON settings file.
//!
//! The file lives in the XDG config directory unless a path is given
//! explicitly. Every field is optional; anything missing keeps its built-in
//! default. Command-line flags override whatever the file says.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the settings file inside the config directory.
const SETTINGS_FILE: &str = "settings.json";

/// Default scan parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// First port of the range.
    pub start_port: u32,
    /// Last port of the range.
    pub end_port: u32,
    /// Maximum concurrent workers.
    pub threads: usize,
    /// Connect timeout in milliseconds.
    pub timeout_ms: u64,
    /// Probe starts per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Draw a progress bar while scanning.
    pub progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_port: 1,
            end_port: 1024,
            threads: 100,
            timeout_ms: 1000,
            rate_limit: 0,
            progress: true,
        }
    }
}

impl Settings {
    /// Default settings file location (`~/.config/portsweep/settings.json`
    /// on Linux), if a home directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "portsweep").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Load settings from `path`, or from the default location.
    ///
    /// An explicitly given file must exist. A missing default file just
    /// yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.start_port, 1);
        assert_eq!(settings.end_port, 1024);
        assert_eq!(settings.threads, 100);
        assert_eq!(settings.timeout_ms, 1000);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "threads": 16, "timeout_ms": 250 }}"#).unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.threads, 16);
        assert_eq!(settings.timeout_ms, 250);
        assert_eq!(settings.end_port, 1024);
        assert!(settings.progress);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "threads = 16").unwrap();

        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat { .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }
}
