//! CLI configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/hostscope/hostscope.toml`
//! - Windows: `%APPDATA%/hostscope/hostscope.toml`
//!
//! A missing file at the default location means defaults; nothing is
//! written back.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Upper bound for each external command, in seconds.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    /// Path whose filesystem is reported by `disk_usage`.
    #[serde(default = "default_disk_path")]
    pub disk_path: PathBuf,

    /// Pretty-print the JSON report.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_command_timeout() -> u64 {
    5
}

fn default_disk_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout(),
            disk_path: default_disk_path(),
            pretty: default_true(),
        }
    }
}

impl Config {
    /// Loads `explicit` if given (it must exist), otherwise the default
    /// location if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = config_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parsing {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs.max(1))
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("hostscope").join("hostscope.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("hostscope")
            .join("hostscope.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.command_timeout_secs, 5);
        assert_eq!(config.disk_path, PathBuf::from("."));
        assert!(config.pretty);
    }

    #[test]
    fn config_partial_toml() {
        let config: Config = toml::from_str("pretty = false").unwrap();
        assert!(!config.pretty);
        assert_eq!(config.command_timeout_secs, 5);
        assert_eq!(config.disk_path, PathBuf::from("."));
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hostscope.toml");
        std::fs::write(&path, "command_timeout_secs = 2\ndisk_path = \"/home\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.command_timeout(), Duration::from_secs(2));
        assert_eq!(config.disk_path, PathBuf::from("/home"));
        assert!(config.pretty);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hostscope.toml");
        std::fs::write(&path, "pretty = \"sometimes\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn zero_timeout_is_raised_to_one_second() {
        let config = Config {
            command_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.command_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn config_path_not_empty() {
        assert!(config_path().to_string_lossy().contains("hostscope"));
    }
}
