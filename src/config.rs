use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "launcher_config.json";

/// Persisted launcher state. Only `launch_version` is interpreted; any other
/// keys found in the file are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LauncherConfig {
    pub fn with_launch_version(version: impl Into<String>) -> Self {
        Self {
            launch_version: Some(version.into()),
            extra: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.launch_version.is_none() && self.extra.is_empty()
    }
}

/// Outcome of reading the config file, before it is collapsed into a
/// (possibly empty) `LauncherConfig`.
#[derive(Debug, PartialEq)]
pub enum ConfigLoad {
    Loaded(LauncherConfig),
    Absent,
    Unreadable(String),
    Corrupt(String),
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(install_dir: &Path) -> Self {
        Self {
            path: install_dir.join(CONFIG_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> ConfigLoad {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ConfigLoad::Absent,
            Err(e) => return ConfigLoad::Unreadable(e.to_string()),
        };

        match serde_json::from_str(&content) {
            Ok(config) => ConfigLoad::Loaded(config),
            Err(e) => ConfigLoad::Corrupt(e.to_string()),
        }
    }

    /// Never fails: anything other than a well-formed file yields an empty config.
    pub fn load(&self) -> LauncherConfig {
        match self.read() {
            ConfigLoad::Loaded(config) => {
                log::debug!("Config loaded from {:?}", self.path);
                config
            }
            ConfigLoad::Absent => {
                log::debug!("No config at {:?}", self.path);
                LauncherConfig::default()
            }
            ConfigLoad::Unreadable(e) => {
                log::warn!("Config at {:?} could not be read: {}", self.path, e);
                LauncherConfig::default()
            }
            ConfigLoad::Corrupt(e) => {
                log::warn!("Config at {:?} is corrupt, ignoring: {}", self.path, e);
                LauncherConfig::default()
            }
        }
    }

    /// Overwrites the file with the full mapping. The parent directory must
    /// already exist.
    pub fn save(&self, config: &LauncherConfig) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        config
            .serialize(&mut serializer)
            .map_err(|e| Error::ConfigIo(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&self.path, buf)
            .map_err(|e| Error::ConfigIo(format!("{}: {}", self.path.display(), e)))?;

        log::info!("Config saved to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::scratch_dir;
    use tokio_test::{assert_err, assert_ok};

    fn store_in_fresh_dir(label: &str) -> (PathBuf, ConfigStore) {
        let dir = scratch_dir(label);
        std::fs::create_dir_all(&dir).unwrap();
        let store = ConfigStore::new(&dir);
        (dir, store)
    }

    #[test]
    fn save_then_load_returns_same_config() {
        let (dir, store) = store_in_fresh_dir("config-roundtrip");
        let config = LauncherConfig::with_launch_version("1.20.1");

        assert_ok!(store.save(&config));
        assert_eq!(store.load(), config);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let (dir, store) = store_in_fresh_dir("config-extra");
        let mut config = LauncherConfig::with_launch_version("23w31a");
        config.extra.insert("window".to_string(), serde_json::json!({ "width": 800 }));

        store.save(&config).unwrap();
        assert_eq!(store.load(), config);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn save_writes_four_space_indented_json() {
        let (dir, store) = store_in_fresh_dir("config-format");
        store.save(&LauncherConfig::with_launch_version("1.20.1")).unwrap();

        let written = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(written, "{\n    \"launch_version\": \"1.20.1\"\n}");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn save_overwrites_instead_of_merging() {
        let (dir, store) = store_in_fresh_dir("config-overwrite");
        let mut first = LauncherConfig::with_launch_version("1.19.4");
        first.extra.insert("stale".to_string(), Value::Bool(true));
        store.save(&first).unwrap();

        let second = LauncherConfig::with_launch_version("1.20.1");
        store.save(&second).unwrap();

        assert_eq!(store.load(), second);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_file_is_absent_and_loads_empty() {
        let dir = scratch_dir("config-missing");
        let store = ConfigStore::new(&dir);

        assert_eq!(store.read(), ConfigLoad::Absent);
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_file_is_reported_and_loads_empty() {
        let (dir, store) = store_in_fresh_dir("config-corrupt");
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.read(), ConfigLoad::Corrupt(_)));
        assert!(store.load().is_empty());

        std::fs::write(store.path(), "[\"1.20.1\"]").unwrap();
        assert!(matches!(store.read(), ConfigLoad::Corrupt(_)));
        assert!(store.load().is_empty());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn directory_in_place_of_file_is_unreadable() {
        let (dir, store) = store_in_fresh_dir("config-unreadable");
        std::fs::create_dir_all(store.path()).unwrap();

        assert!(matches!(store.read(), ConfigLoad::Unreadable(_)));
        assert!(store.load().is_empty());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn save_does_not_create_missing_install_dir() {
        let dir = scratch_dir("config-nodir");
        let store = ConfigStore::new(&dir);

        let err = assert_err!(store.save(&LauncherConfig::with_launch_version("1.20.1")));
        assert!(matches!(err, Error::ConfigIo(_)));
        assert!(!dir.exists());
    }
}
