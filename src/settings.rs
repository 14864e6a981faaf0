use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::utils;
use crate::version::MANIFEST_URL;
use crate::{Error, Result};

fn default_username() -> String {
    "Player".to_string()
}

fn default_manifest_url() -> String {
    MANIFEST_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "utils::default_install_dir")]
    pub install_dir: PathBuf,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_manifest_url")]
    pub manifest_url: String,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// External installer program that performs installs and builds launch
/// commands. Invoked as `program args... <operation> ...`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    pub program: Option<PathBuf>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_to_file")]
    pub file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_to_file(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            install_dir: utils::default_install_dir(),
            username: default_username(),
            manifest_url: default_manifest_url(),
            backend: BackendSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

pub struct SettingsManager {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Loads settings, writing the defaults first when the file is missing.
    pub fn new(settings_path: PathBuf) -> Result<Self> {
        let mut manager = Self {
            settings: Settings::default(),
            settings_path,
        };

        manager.load()?;
        manager.validate()?;
        Ok(manager)
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| Error::Settings(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&self.settings_path, content)?;
        log::info!("Settings saved to {:?}", self.settings_path);
        Ok(())
    }

    pub fn load(&mut self) -> Result<()> {
        if !self.settings_path.exists() {
            self.settings = Settings::default();
            return self.save();
        }

        let content = std::fs::read_to_string(&self.settings_path)?;

        self.settings = toml::from_str(&content)
            .map_err(|e| Error::Settings(format!("Failed to parse settings: {}", e)))?;

        log::debug!("Settings loaded from {:?}", self.settings_path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.settings.install_dir.is_absolute() {
            return Err(Error::Settings(
                "Install directory must be an absolute path".to_string(),
            ));
        }

        if self.settings.username.trim().is_empty() {
            return Err(Error::Settings("Username cannot be empty".to_string()));
        }

        url::Url::parse(&self.settings.manifest_url)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::scratch_dir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = scratch_dir("settings-defaults");
        let path = dir.join("settings.toml");

        let manager = SettingsManager::new(path.clone()).unwrap();

        assert!(path.exists());
        assert_eq!(manager.path(), path.as_path());
        assert_eq!(manager.get(), &Settings::default());
        assert_eq!(manager.get().username, "Player");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = scratch_dir("settings-partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        let content = concat!(
            "username = \"Steve\"\n\n",
            "[backend]\nprogram = \"/opt/installer\"\nargs = [\"--quiet\"]\n",
        );
        std::fs::write(&path, content).unwrap();

        let manager = SettingsManager::new(path).unwrap();
        let settings = manager.get();

        assert_eq!(settings.username, "Steve");
        assert_eq!(settings.backend.program, Some(PathBuf::from("/opt/installer")));
        assert_eq!(settings.backend.args, vec!["--quiet"]);
        assert_eq!(settings.manifest_url, MANIFEST_URL);
        assert_eq!(settings.logging.level, "info");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn relative_install_dir_is_rejected() {
        let dir = scratch_dir("settings-relative");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "install_dir = \"games\"\n").unwrap();

        assert!(matches!(SettingsManager::new(path), Err(Error::Settings(_))));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn bad_manifest_url_is_rejected() {
        let dir = scratch_dir("settings-url");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "manifest_url = \"not a url\"\n").unwrap();

        assert!(matches!(SettingsManager::new(path), Err(Error::Url(_))));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn malformed_toml_is_a_settings_error() {
        let dir = scratch_dir("settings-malformed");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "username = \n").unwrap();

        assert!(matches!(SettingsManager::new(path), Err(Error::Settings(_))));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
