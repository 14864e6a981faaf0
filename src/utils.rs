use std::path::{Path, PathBuf};
use crate::Result;

pub const APP_NAME: &str = "offline-launcher";
const INSTALL_DIR_NAME: &str = ".minecraft_launcher";

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

pub fn get_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("settings.toml")
}

/// Per-user root holding installed versions and `launcher_config.json`.
pub fn default_install_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(INSTALL_DIR_NAME)
}

#[cfg(test)]
pub(crate) fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}-{}-{}", APP_NAME, label, uuid::Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_exists_creates_nested_directories() {
        let root = scratch_dir("utils");
        let nested = root.join("a").join("b");

        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir_exists(&nested).unwrap();

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn default_install_dir_is_hidden_folder() {
        let dir = default_install_dir();
        assert_eq!(dir.file_name().unwrap(), INSTALL_DIR_NAME);
    }
}
