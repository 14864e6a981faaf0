use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

pub const VERSIONS_DIR: &str = "versions";
pub const MANIFEST_URL: &str = "https://launchermeta.mojang.com/mc/game/version_manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Release,
    Snapshot,
    #[serde(other)]
    Other,
}

impl VersionType {
    pub fn is_installable(&self) -> bool {
        matches!(self, VersionType::Release | VersionType::Snapshot)
    }
}

/// Remote catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: VersionType,
}

impl VersionDescriptor {
    pub fn new(id: impl Into<String>, version_type: VersionType) -> Self {
        Self {
            id: id.into(),
            version_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledVersion {
    pub id: String,
}

impl InstalledVersion {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionManifest {
    pub latest: Latest,
    pub versions: Vec<VersionDescriptor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Latest {
    pub release: String,
    pub snapshot: String,
}

/// Keeps releases and snapshots, in catalog order.
pub fn installable_ids(catalog: &[VersionDescriptor]) -> Vec<String> {
    catalog
        .iter()
        .filter(|v| v.version_type.is_installable())
        .map(|v| v.id.clone())
        .collect()
}

pub fn version_dir(install_dir: &Path, version_id: &str) -> PathBuf {
    install_dir.join(VERSIONS_DIR).join(version_id)
}

/// The client jar whose absence means the version needs reinstalling.
pub fn version_jar_path(install_dir: &Path, version_id: &str) -> PathBuf {
    version_dir(install_dir, version_id).join(format!("{}.jar", version_id))
}

pub fn version_json_path(install_dir: &Path, version_id: &str) -> PathBuf {
    version_dir(install_dir, version_id).join(format!("{}.json", version_id))
}
