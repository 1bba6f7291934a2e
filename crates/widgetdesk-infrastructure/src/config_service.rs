//! Configuration service implementation.
//!
//! Loads [`DeskConfig`] from `~/.config/widgetdesk/config.toml` and applies
//! environment overrides on top. Priority: environment > file > defaults.

use crate::paths::DeskPaths;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use widgetdesk_core::config::DeskConfig;
use widgetdesk_core::error::Result;

pub const ENV_API_URL: &str = "WIDGETDESK_API_URL";
pub const ENV_API_TOKEN: &str = "WIDGETDESK_API_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "WIDGETDESK_TIMEOUT_SECS";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration service that loads and caches the console configuration.
#[derive(Clone)]
pub struct ConfigService {
    /// `None` means the platform config file
    path: Option<PathBuf>,
    env: EnvLookup,
    config: Arc<RwLock<Option<DeskConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the platform config file and process environment.
    pub fn new() -> Self {
        Self {
            path: None,
            env: Arc::new(|key| std::env::var(key).ok()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Reads the config from `path` instead of the platform location.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Replaces the environment lookup (used by tests).
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    /// Gets the configuration, loading it on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn get_config(&self) -> Result<DeskConfig> {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Writes `config` to the config file and refreshes the cache.
    ///
    /// Environment overrides are not persisted; the next read re-applies them.
    pub fn save_config(&self, config: &DeskConfig) -> Result<()> {
        let path = self.config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(config)?)?;
        tracing::info!("[ConfigService] Saved config to {}", path.display());
        self.invalidate_cache();
        Ok(())
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => DeskPaths::config_file(),
        }
    }

    fn load(&self) -> Result<DeskConfig> {
        let path = self.config_path()?;
        let mut config = read_config_file(&path)?;
        self.apply_env_overrides(&mut config);
        Ok(config)
    }

    fn apply_env_overrides(&self, config: &mut DeskConfig) {
        if let Some(url) = (self.env)(ENV_API_URL) {
            config.api.base_url = url;
        }
        if let Some(token) = (self.env)(ENV_API_TOKEN) {
            config.api.token = Some(token);
        }
        if let Some(raw) = (self.env)(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.api.timeout_secs = secs,
                _ => tracing::warn!(
                    "[ConfigService] Ignoring invalid {}='{}'",
                    ENV_TIMEOUT_SECS,
                    raw
                ),
            }
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn read_config_file(path: &Path) -> Result<DeskConfig> {
    if !path.exists() {
        tracing::debug!(
            "[ConfigService] No config at {}, using defaults",
            path.display()
        );
        return Ok(DeskConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;
    use widgetdesk_core::config::DEFAULT_API_URL;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new()
            .with_path(dir.path().join("config.toml"))
            .with_env(no_env);

        let config = service.get_config().unwrap();
        assert_eq!(config, DeskConfig::default());
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://file.example/api\"\ntimeout_secs = 10\n",
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://env.example/api"),
            (ENV_API_TOKEN, "tok"),
        ]
        .into_iter()
        .collect();
        let service = ConfigService::new()
            .with_path(&path)
            .with_env(move |key| env.get(key).map(|v| v.to_string()));

        let config = service.get_config().unwrap();
        assert_eq!(config.api.base_url, "https://env.example/api");
        assert_eq!(config.api.token.as_deref(), Some("tok"));
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn test_invalid_timeout_env_is_ignored() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new()
            .with_path(dir.path().join("config.toml"))
            .with_env(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()));

        assert_eq!(service.get_config().unwrap().api.timeout_secs, 30);
    }

    #[test]
    fn test_cache_until_invalidated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let service = ConfigService::new().with_path(&path).with_env(no_env);
        assert_eq!(service.get_config().unwrap().editor.history_depth, 50);

        std::fs::write(&path, "[editor]\nhistory_depth = 5\n").unwrap();
        assert_eq!(service.get_config().unwrap().editor.history_depth, 50);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().editor.history_depth, 5);
    }

    #[test]
    fn test_save_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let service = ConfigService::new().with_path(&path).with_env(no_env);

        let mut config = DeskConfig::default();
        config.api.base_url = "https://saved.example/api".to_string();
        service.save_config(&config).unwrap();

        assert!(path.exists());
        assert_eq!(service.get_config().unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbroken").unwrap();
        let service = ConfigService::new().with_path(&path).with_env(no_env);

        assert!(service.get_config().is_err());
    }
}
