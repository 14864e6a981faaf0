use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::identity::LaunchIdentity;
use crate::version::{InstalledVersion, VersionDescriptor};
use crate::{Error, Result};

/// Options handed to launch-command synthesis. `token` stays empty: launches
/// are offline-mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOptions {
    pub username: String,
    pub uuid: String,
    pub token: String,
    pub game_directory: PathBuf,
}

impl LaunchOptions {
    pub fn offline(identity: &LaunchIdentity, game_directory: &Path) -> Self {
        Self {
            username: identity.username.clone(),
            uuid: identity.player_id.to_string(),
            token: String::new(),
            game_directory: game_directory.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    pub fn from_argv(argv: Vec<String>) -> Result<Self> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::Launch("Launch command is empty".to_string()))?;

        Ok(Self {
            program,
            args: argv.collect(),
        })
    }
}

/// Everything the launcher needs from the game installer: catalog, local
/// scan, installation and launch-command synthesis. Calls may block on
/// network or disk for a long time.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GameInstallService: Send + Sync {
    async fn list_remote_versions(&self) -> Result<Vec<VersionDescriptor>>;

    async fn list_installed_versions(&self, dir: &Path) -> Result<Vec<InstalledVersion>>;

    async fn install(&self, version_id: &str, dir: &Path) -> Result<()>;

    async fn build_launch_command(
        &self,
        version_id: &str,
        dir: &Path,
        options: &LaunchOptions,
    ) -> Result<LaunchCommand>;
}

#[cfg_attr(test, automock)]
pub trait ProcessSpawner: Send + Sync {
    /// Starts the command and returns its pid without waiting on it.
    fn spawn(&self, command: &LaunchCommand) -> Result<u32>;
}

pub struct TokioSpawner;

impl ProcessSpawner for TokioSpawner {
    fn spawn(&self, command: &LaunchCommand) -> Result<u32> {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        log::info!("Spawning game process: {:?}", cmd);

        let child = cmd
            .spawn()
            .map_err(|e| Error::Launch(format!("Failed to start {}: {}", command.program, e)))?;

        // Dropping the handle detaches the process; tokio reaps it on exit.
        Ok(child.id().unwrap_or_default())
    }
}
