use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, CONFIG_FILE_NAME, DEFAULT_API_BASE_URL, DEFAULT_LOGIN_PATH, ENV_PREFIX,
    HTTP_REQUEST_TIMEOUT_SECS, LOCAL_CONFIG_DIR, UI_REFRESH_INTERVAL_MS,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Local persistence configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Path of the login endpoint (`/usuarios/autenticar` or `/auth/login`)
    pub login_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

/// Local persistence configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `session.toml` (defaults to the platform data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UIConfig {
    /// Color theme (dark or light)
    pub theme: String,
    /// Event poll interval in milliseconds
    pub tick_ms: u64,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            tick_ms: UI_REFRESH_INTERVAL_MS,
        }
    }
}

/// Load configuration from multiple sources
///
/// Defaults, then the global file, then `.shelter/config.toml`, then
/// `SHELTER_*` variables (`SHELTER_API__BASE_URL` sets `api.base_url`).
/// An explicit `path` replaces both files.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("Config file {} does not exist", path.display());
        }
        figment = figment.merge(Toml::file(path));
    } else {
        let global_config = get_config_dir()?.join(CONFIG_FILE_NAME);
        let local_config = PathBuf::from(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME);

        if global_config.exists() {
            figment = figment.merge(Toml::file(&global_config));
        }
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment.extract().context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        Ok(proj_dirs.config_dir().to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join(APP_NAME))
    }
}

/// Directory where the session file lives
pub fn get_data_dir(storage: &StorageConfig) -> Result<PathBuf> {
    if let Some(dir) = &storage.data_dir {
        return Ok(dir.clone());
    }
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        Ok(proj_dirs.data_dir().to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".local").join("share").join(APP_NAME))
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<PathBuf> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join(CONFIG_FILE_NAME)
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(path)
}

/// Create a default configuration file if it doesn't exist
///
/// Returns the path and whether it was newly written.
pub fn init_config() -> Result<(PathBuf, bool)> {
    let config_file = get_config_dir()?.join(CONFIG_FILE_NAME);

    if config_file.exists() {
        return Ok((config_file, false));
    }

    let path = save_config(&Config::default(), Some(config_file))?;
    Ok((path, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://shelter.example/api\"\ntimeout_secs = 5\nlogin_path = \"/auth/login\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.api.base_url, "https://shelter.example/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.login_path, "/auth/login");
        assert_eq!(config.ui, UIConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().join("data"));
        config.ui.theme = "light".to_string();

        let path = save_config(&config, Some(dir.path().join("nested/config.toml"))).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_data_dir_override() {
        let storage = StorageConfig {
            data_dir: Some(PathBuf::from("/tmp/shelter-data")),
        };
        assert_eq!(get_data_dir(&storage).unwrap(), PathBuf::from("/tmp/shelter-data"));
    }
}
