use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{ConfigStore, LauncherConfig};
use crate::event::{EventSink, Notice, UiEvent};
use crate::identity::LaunchIdentity;
use crate::service::{GameInstallService, LaunchOptions, ProcessSpawner};
use crate::utils;
use crate::version::{self, InstalledVersion};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub version: Option<String>,
    pub username: String,
}

/// Sequences discovery, install and launch against the installer service.
/// Every method reports through the event sink and never touches UI state.
#[derive(Clone)]
pub struct Orchestrator {
    service: Arc<dyn GameInstallService>,
    spawner: Arc<dyn ProcessSpawner>,
    store: ConfigStore,
    install_dir: PathBuf,
    events: EventSink,
}

impl Orchestrator {
    pub fn new(
        service: Arc<dyn GameInstallService>,
        spawner: Arc<dyn ProcessSpawner>,
        install_dir: PathBuf,
        events: EventSink,
    ) -> Self {
        Self {
            service,
            spawner,
            store: ConfigStore::new(&install_dir),
            install_dir,
            events,
        }
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn events(&self) -> &EventSink {
        &self.events
    }

    /// Publishes releases and snapshots as install targets. A failure leaves
    /// the previous selection alone.
    pub async fn refresh_remote_catalog(&self) -> Result<Vec<String>> {
        let catalog = self
            .service
            .list_remote_versions()
            .await
            .map_err(|e| Error::CatalogFetch(e.to_string()));

        match catalog {
            Ok(catalog) => {
                let ids = version::installable_ids(&catalog);
                log::info!("Catalog lists {} installable versions", ids.len());
                self.events.emit(UiEvent::Catalog(ids.clone()));
                Ok(ids)
            }
            Err(e) => {
                self.events.status(format!("Error loading available versions: {}", e));
                Err(e)
            }
        }
    }

    pub async fn refresh_installed_versions(&self) -> Result<Vec<InstalledVersion>> {
        let installed = self
            .service
            .list_installed_versions(&self.install_dir)
            .await
            .map_err(|e| Error::Scan(e.to_string()));

        match installed {
            Ok(installed) => {
                let ids: Vec<String> = installed.iter().map(|v| v.id.clone()).collect();
                let empty = ids.is_empty();
                self.events.emit(UiEvent::Installed(ids));
                if empty {
                    self.events.status("No versions installed. Click Install.");
                } else {
                    self.events.status("Ready to play!");
                }
                Ok(installed)
            }
            Err(e) => {
                self.events.emit(UiEvent::LaunchUnavailable);
                self.events.status(format!("Error loading versions: {}", e));
                Err(e)
            }
        }
    }

    /// Startup check: scan when the install directory exists, then restore
    /// the saved launch version if it is still installed.
    pub async fn check_initial_state(&self) {
        if !self.install_dir.exists() {
            self.events.status("Game directory not found. Click Install.");
            return;
        }

        let installed = match self.refresh_installed_versions().await {
            Ok(installed) => installed,
            Err(_) => return,
        };

        let config = self.store.load();
        if let Some(saved) = config.launch_version {
            if installed.iter().any(|v| v.id == saved) {
                self.events.emit(UiEvent::SelectLaunch(saved.clone()));
                self.events.status(format!("Loaded saved launch version: {}", saved));
            } else {
                log::info!("Saved launch version {} is no longer installed", saved);
            }
        }
    }

    pub async fn startup(&self) {
        let _ = self.refresh_remote_catalog().await;
        self.check_initial_state().await;
    }

    pub async fn refresh(&self) {
        let _ = self.refresh_remote_catalog().await;
        let _ = self.refresh_installed_versions().await;
        self.events.status("Versions refreshed");
    }

    /// Install flow. Returns the version recorded as the new launch default,
    /// if the post-install scan found any.
    pub async fn install(&self, request: InstallRequest) -> Result<Option<String>> {
        self.events.status("Setting up...");

        let outcome = self.run_install(request).await;
        match &outcome {
            Ok(Some(installed)) => {
                self.events
                    .status(format!("Installation complete! Default set to {}", installed));
            }
            Ok(None) => {}
            Err(e) => self.report_failure("Installation failed", e),
        }
        outcome
    }

    async fn run_install(&self, request: InstallRequest) -> Result<Option<String>> {
        utils::ensure_dir_exists(&self.install_dir)?;

        let version = request
            .version
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingSelection("installation"))?;

        self.events.status(format!("Installing {}...", version));
        self.service
            .install(&version, &self.install_dir)
            .await
            .map_err(|e| Error::Install(e.to_string()))?;

        let installed = self.refresh_installed_versions().await?;
        let Some(first) = installed.into_iter().next() else {
            return Ok(None);
        };

        self.events.emit(UiEvent::SelectLaunch(first.id.clone()));
        self.persist_launch_version(&first.id);
        Ok(Some(first.id))
    }

    /// Launch flow. Returns the pid of the detached game process.
    pub async fn launch(&self, request: LaunchRequest) -> Result<u32> {
        let outcome = self.run_launch(request).await;
        if let Err(e) = &outcome {
            self.report_failure("Launch failed", e);
        }
        outcome
    }

    async fn run_launch(&self, request: LaunchRequest) -> Result<u32> {
        let version = request
            .version
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingSelection("launch"))?;
        let identity = LaunchIdentity::offline(&request.username);

        let jar = version::version_jar_path(&self.install_dir, &version);
        if !jar.exists() {
            log::warn!("{} is missing, reinstalling {}", jar.display(), version);
            self.events.status(format!("JAR missing, reinstalling {}...", version));
            self.service
                .install(&version, &self.install_dir)
                .await
                .map_err(|e| Error::Install(e.to_string()))?;
        }

        let options = LaunchOptions::offline(&identity, &self.install_dir);
        let command = self
            .service
            .build_launch_command(&version, &self.install_dir, &options)
            .await
            .map_err(|e| Error::Launch(e.to_string()))?;

        self.events.status(format!("Launching ({})...", version));
        let pid = self.spawner.spawn(&command).map_err(|e| match e {
            Error::Launch(_) => e,
            other => Error::Launch(other.to_string()),
        })?;
        log::info!("Game process {} started for {} as {}", pid, version, identity.username);

        self.events.status(format!("Game started! ({})", version));
        self.persist_launch_version(&version);
        Ok(pid)
    }

    fn persist_launch_version(&self, version: &str) {
        if let Err(e) = self.store.save(&LauncherConfig::with_launch_version(version)) {
            log::error!("Failed to save config: {}", e);
            self.events.status(format!("Failed to save config: {}", e));
        }
    }

    fn report_failure(&self, what: &str, error: &Error) {
        let message = format!("{}: {}", what, error);
        log::error!("{}", message);
        self.events.emit(UiEvent::Notice(Notice::error(message.clone())));
        self.events.status(message);
    }
}
