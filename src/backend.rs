use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use reqwest::Client;
use tokio::fs;
use tokio::process::Command;

use crate::service::{GameInstallService, LaunchCommand, LaunchOptions};
use crate::settings::Settings;
use crate::version::{self, InstalledVersion, VersionDescriptor, VersionManifest, VERSIONS_DIR};
use crate::{Error, Result};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Installer program invoked as `program args... <operation> ...`.
#[derive(Debug, Clone)]
pub struct InstallerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl InstallerCommand {
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, mut cmd: Command) -> Result<Vec<u8>> {
        log::debug!("Running installer: {:?}", cmd);
        let output = cmd
            .output()
            .await
            .map_err(|e| {
                Error::Backend(format!("Failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            return Err(Error::Backend(if detail.is_empty() {
                format!("{} exited with {}", self.program.display(), output.status)
            } else {
                detail.to_string()
            }));
        }

        Ok(output.stdout)
    }
}

/// Catalog from the version manifest, installed versions from the
/// `versions` directory, install and command synthesis from the external
/// installer.
pub struct ManifestBackend {
    client: Client,
    manifest_url: String,
    installer: Option<InstallerCommand>,
}

impl ManifestBackend {
    pub fn new(manifest_url: String, installer: Option<InstallerCommand>) -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("offline-launcher/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            manifest_url,
            installer,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let installer = settings.backend.program.clone().map(|program| InstallerCommand {
            program,
            args: settings.backend.args.clone(),
        });
        if installer.is_none() {
            log::warn!("No installer backend configured; install and launch will fail");
        }
        Self::new(settings.manifest_url.clone(), installer)
    }

    fn installer(&self) -> Result<&InstallerCommand> {
        self.installer.as_ref().ok_or_else(|| {
            Error::Backend(
                "No installer program configured (set backend.program in settings)".to_string(),
            )
        })
    }
}

#[async_trait]
impl GameInstallService for ManifestBackend {
    async fn list_remote_versions(&self) -> Result<Vec<VersionDescriptor>> {
        let manifest: VersionManifest = self
            .client
            .get(&self.manifest_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        log::debug!(
            "Manifest: {} versions, latest release {}",
            manifest.versions.len(),
            manifest.latest.release
        );
        Ok(manifest.versions)
    }

    async fn list_installed_versions(&self, dir: &Path) -> Result<Vec<InstalledVersion>> {
        scan_installed(dir).await
    }

    async fn install(&self, version_id: &str, dir: &Path) -> Result<()> {
        let installer = self.installer()?;
        let mut cmd = installer.command();
        cmd.arg("install").arg(version_id).arg(dir);

        log::info!("Installing {} into {}", version_id, dir.display());
        installer.run(cmd).await?;
        Ok(())
    }

    async fn build_launch_command(
        &self,
        version_id: &str,
        dir: &Path,
        options: &LaunchOptions,
    ) -> Result<LaunchCommand> {
        let installer = self.installer()?;
        let mut cmd = installer.command();
        cmd.arg("command")
            .arg(version_id)
            .arg(dir)
            .arg("--username")
            .arg(&options.username)
            .arg("--uuid")
            .arg(&options.uuid)
            .arg("--token")
            .arg(&options.token)
            .arg("--game-dir")
            .arg(&options.game_directory);

        let stdout = installer.run(cmd).await?;
        parse_command_output(&stdout)
    }
}

/// Installer output is a JSON array: executable first, then its arguments.
pub fn parse_command_output(stdout: &[u8]) -> Result<LaunchCommand> {
    let argv: Vec<String> = serde_json::from_slice(stdout)
        .map_err(|e| Error::Launch(format!("Installer returned an invalid command: {}", e)))?;
    LaunchCommand::from_argv(argv)
}

/// A version is installed when `versions/<id>/<id>.json` exists. Newest
/// metadata first, so a fresh install sorts to the front.
pub async fn scan_installed(dir: &Path) -> Result<Vec<InstalledVersion>> {
    let versions_dir = dir.join(VERSIONS_DIR);
    if !versions_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut found: Vec<(SystemTime, String)> = Vec::new();
    let mut entries = fs::read_dir(&versions_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let Some(id) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };

        let metadata_path = version::version_json_path(dir, &id);
        match fs::metadata(&metadata_path).await {
            Ok(meta) if meta.is_file() => {
                let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                found.push((modified, id));
            }
            _ => log::debug!("Skipping {:?}: no version metadata", entry.path()),
        }
    }

    found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    Ok(found.into_iter().map(|(_, id)| InstalledVersion::new(id)).collect())
}
