use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

pub const DATA_ROOT_ENV: &str = "INVOICE_COMPOSER_DATA_ROOT";
pub const STORE_FILE_ENV: &str = "INVOICE_COMPOSER_STORE_FILE";

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the stored document and exports. `~` is expanded.
    pub data_root: String,
    /// Store file name, relative to the data root
    pub store_file: String,
    /// Export directory, relative to the data root
    pub output_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_root: "~/Documents/Invoices".to_string(),
            store_file: "invoice-store.json".to_string(),
            output_dir: "output".to_string(),
        }
    }
}

impl Settings {
    /// Load with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    pub(crate) fn load_with(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        let path = config_path.unwrap_or_else(default_config_path);
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            settings = toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "loaded settings");
        }

        if let Some(root) = env(DATA_ROOT_ENV).filter(|v| !v.is_empty()) {
            settings.data_root = root;
        }
        if let Some(file) = env(STORE_FILE_ENV).filter(|v| !v.is_empty()) {
            settings.store_file = file;
        }

        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str).map_err(write_err)
    }

    pub fn data_root(&self) -> PathBuf {
        PathBuf::from(expand_home_dir(&self.data_root))
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_root().join(&self.store_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.data_root().join(&self.output_dir)
    }
}

/// Platform config dir, e.g. `~/.config/invoice-composer/settings.toml`.
pub fn default_config_path() -> PathBuf {
    ProjectDirs::from("com", "invoice-composer", "invoice-composer")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from("settings.toml"))
}

pub fn expand_home_dir(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return format!("{}{}", home, rest);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.store_file, "invoice-store.json");
        assert_eq!(settings.output_dir, "output");
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let settings =
            Settings::load_with(Some(temp_dir.path().join("missing.toml")), no_env).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        let mut file = fs::File::create(&config_path).unwrap();
        writeln!(file, "data_root = \"/srv/invoices\"").unwrap();

        let settings = Settings::load_with(Some(config_path), no_env).unwrap();
        assert_eq!(settings.data_root, "/srv/invoices");
        assert_eq!(settings.store_file, "invoice-store.json");
        assert_eq!(
            settings.store_path(),
            PathBuf::from("/srv/invoices/invoice-store.json")
        );
        assert_eq!(settings.output_path(), PathBuf::from("/srv/invoices/output"));
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "data_root = \"/from/file\"\n").unwrap();

        let env = |key: &str| match key {
            DATA_ROOT_ENV => Some("/from/env".to_string()),
            STORE_FILE_ENV => Some("other.json".to_string()),
            _ => None,
        };
        let settings = Settings::load_with(Some(config_path), env).unwrap();
        assert_eq!(settings.data_root, "/from/env");
        assert_eq!(settings.store_file, "other.json");
    }

    #[test]
    fn test_invalid_toml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "data_root = [").unwrap();

        let err = Settings::load_with(Some(config_path), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("settings.toml");
        let settings = Settings {
            data_root: "/tmp/docs".to_string(),
            ..Settings::default()
        };
        settings.save(&config_path).unwrap();
        assert_eq!(Settings::load_with(Some(config_path), no_env).unwrap(), settings);
    }

    #[test]
    fn test_expand_home_dir() {
        assert_eq!(expand_home_dir("/abs/path"), "/abs/path");
        let expanded = expand_home_dir("~/Documents");
        assert!(expanded.ends_with("/Documents"));
        assert!(!expanded.starts_with('~') || BaseDirs::new().is_none());
    }
}
