//! Runtime configuration loaded from `sidekick.toml`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::detector::{DEFAULT_CONTEXT_LINES, DEFAULT_MIN_CONFIDENCE};
use crate::validation::{validate_confidence, validate_context_lines, validate_retention_days};

/// Environment variable overriding [`SidekickConfig::storage_dir`].
pub const HOME_ENV: &str = "SIDEKICK_HOME";

pub const CONFIG_FILE_NAME: &str = "sidekick.toml";

pub const DEFAULT_RETENTION_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidekickConfig {
    /// Root of pattern and history storage
    pub storage_dir: PathBuf,
    pub min_confidence: f64,
    pub context_lines: usize,
    pub retention_days: u32,
    /// Read persisted patterns on startup
    pub auto_load_patterns: bool,
    pub log_level: String,
}

impl Default for SidekickConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            context_lines: DEFAULT_CONTEXT_LINES,
            retention_days: DEFAULT_RETENTION_DAYS,
            auto_load_patterns: true,
            log_level: "info".to_string(),
        }
    }
}

/// `<data dir>/sidekick`, or `<tmp>/ssk-sessions` when no data dir exists.
pub fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("sidekick"))
        .unwrap_or_else(|| std::env::temp_dir().join("ssk-sessions"))
}

/// Config file in the platform config directory, if one exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sidekick").join(CONFIG_FILE_NAME))
}

impl SidekickConfig {
    /// Load from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: SidekickConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply environment overrides.
    pub fn resolve(mut self) -> Self {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            self.storage_dir = PathBuf::from(home);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_confidence(self.min_confidence).context("Invalid min_confidence")?;
        validate_retention_days(self.retention_days).context("Invalid retention_days")?;
        validate_context_lines(self.context_lines).context("Invalid context_lines")?;
        if self.storage_dir.as_os_str().is_empty() {
            bail!("storage_dir cannot be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SidekickConfig::default();
        assert_eq!(config.min_confidence, 0.70);
        assert_eq!(config.context_lines, 3);
        assert_eq!(config.retention_days, 7);
        assert!(config.auto_load_patterns);
        assert_eq!(config.log_level, "info");
        assert!(
            config.storage_dir.ends_with("sidekick")
                || config.storage_dir.ends_with("ssk-sessions")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = SidekickConfig::load(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, SidekickConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "min_confidence = 0.85\nretention_days = 30\nstorage_dir = \"/srv/sidekick\"\n",
        )
        .unwrap();

        let config = SidekickConfig::load(&path).unwrap();
        assert_eq!(config.min_confidence, 0.85);
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.storage_dir, PathBuf::from("/srv/sidekick"));
        assert_eq!(config.context_lines, 3);
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "min_confidence = [").unwrap();

        let err = SidekickConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = SidekickConfig {
            min_confidence: 1.5,
            ..SidekickConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SidekickConfig {
            retention_days: 0,
            ..SidekickConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SidekickConfig {
            context_lines: 11,
            ..SidekickConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_home_env_overrides_storage_dir() {
        std::env::set_var(HOME_ENV, "/var/lib/sidekick-test");
        let config = SidekickConfig::default().resolve();
        std::env::remove_var(HOME_ENV);

        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/sidekick-test"));
    }

    #[test]
    #[serial]
    fn test_empty_home_env_is_ignored() {
        std::env::set_var(HOME_ENV, "");
        let config = SidekickConfig::default().resolve();
        std::env::remove_var(HOME_ENV);

        assert_eq!(config.storage_dir, default_storage_dir());
    }
}
