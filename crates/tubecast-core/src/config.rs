//! Tubecast configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TubecastError};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TubecastConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
}

impl TubecastConfig {
    /// Load config from the default path (~/.tubecast/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TubecastError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| TubecastError::Config(format!("Failed to parse config: {e}")))?;
        tracing::debug!("📄 Loaded config from {}", path.display());
        Ok(config)
    }

    /// Render as TOML. The token is written as-is.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| TubecastError::Config(format!("Failed to serialize config: {e}")))
    }

    /// Write to `path`, creating parent directories. An existing file is only
    /// replaced when `overwrite` is set; returns whether the file was written.
    pub fn save_to(&self, path: &Path, overwrite: bool) -> Result<bool> {
        if path.exists() && !overwrite {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        tracing::debug!("💾 Wrote config to {}", path.display());
        Ok(true)
    }

    /// Apply `TUBECAST_TOKEN` / `TUBECAST_BACKEND_URL` on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = std::env::var("TUBECAST_TOKEN")
            && !token.is_empty()
        {
            self.backend.token = token;
        }
        if let Ok(url) = std::env::var("TUBECAST_BACKEND_URL")
            && !url.is_empty()
        {
            self.backend.base_url = url;
        }
        self
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Tubecast home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tubecast")
    }
}

/// Backend (send endpoint + plan lookup) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer credential. Usually supplied through `TUBECAST_TOKEN`.
    #[serde(default)]
    pub token: String,
    /// Upper bound for a single send attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String { "http://127.0.0.1:5000".into() }
fn default_timeout_secs() -> u64 { 30 }

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Send scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Interval used when auto mode is engaged without an explicit value.
    #[serde(default = "default_interval_secs")]
    pub default_interval_secs: u64,
    #[serde(default = "default_repeat_count")]
    pub default_repeat_count: u32,
    /// How many attempt records the history keeps.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_interval_secs() -> u64 { 60 }
fn default_repeat_count() -> u32 { 1 }
fn default_history_limit() -> usize { 100 }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_interval_secs: default_interval_secs(),
            default_repeat_count: default_repeat_count(),
            history_limit: default_history_limit(),
        }
    }
}

/// Message guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GuardConfig {
    /// Extra forbidden terms, added on top of the built-in list.
    #[serde(default)]
    pub extra_terms: Vec<String>,
}

/// Template store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default = "default_templates_dir")]
    pub dir: String,
}

fn default_templates_dir() -> String { "~/.tubecast/templates".into() }

impl TemplatesConfig {
    /// Template directory with `~` expanded.
    pub fn resolved_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.dir).to_string())
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self { dir: default_templates_dir() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TubecastConfig::default();
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.scheduler.default_interval_secs, 60);
        assert_eq!(config.scheduler.history_limit, 100);
        assert!(config.guard.extra_terms.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TubecastConfig = toml::from_str(
            r#"
            [backend]
            base_url = "https://bot.example.com"

            [guard]
            extra_terms = ["spam total"]
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "https://bot.example.com");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.guard.extra_terms, vec!["spam total".to_string()]);
        assert_eq!(config.scheduler.default_repeat_count, 1);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join("tubecast-test-config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[scheduler]\ndefault_interval_secs = 15\n").unwrap();

        let config = TubecastConfig::load_from(&path).unwrap();
        assert_eq!(config.scheduler.default_interval_secs, 15);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_to_then_load() {
        let dir = std::env::temp_dir().join("tubecast-test-config-save");
        std::fs::remove_dir_all(&dir).ok();
        let path = dir.join("nested").join("config.toml");

        let mut config = TubecastConfig::default();
        config.backend.base_url = "https://bot.example.com".into();
        config.guard.extra_terms = vec!["follow back".into()];
        assert!(config.save_to(&path, false).unwrap());

        let loaded = TubecastConfig::load_from(&path).unwrap();
        assert_eq!(loaded.backend.base_url, "https://bot.example.com");
        assert_eq!(loaded.guard.extra_terms, vec!["follow back".to_string()]);
        assert_eq!(loaded.scheduler.default_interval_secs, 60);

        // Existing file is kept unless overwrite is requested.
        assert!(!TubecastConfig::default().save_to(&path, false).unwrap());
        let kept = TubecastConfig::load_from(&path).unwrap();
        assert_eq!(kept.backend.base_url, "https://bot.example.com");

        assert!(TubecastConfig::default().save_to(&path, true).unwrap());
        let replaced = TubecastConfig::load_from(&path).unwrap();
        assert_eq!(replaced.backend.base_url, "http://127.0.0.1:5000");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_bad_file() {
        let dir = std::env::temp_dir().join("tubecast-test-config-bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[scheduler\n").unwrap();

        let err = TubecastConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, TubecastError::Config(_)));
        std::fs::remove_dir_all(&dir).ok();
    }
}
