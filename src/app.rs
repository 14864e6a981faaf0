use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::event::{Notice, TaskKind, UiEvent};
use crate::orchestrator::{InstallRequest, LaunchRequest, Orchestrator};
use crate::state::AppState;
use crate::task::{SlotBusy, TaskSlots};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Username,
    InstallVersion,
    LaunchVersion,
    InstallButton,
    LaunchButton,
    RefreshButton,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Username,
        Focus::InstallVersion,
        Focus::LaunchVersion,
        Focus::InstallButton,
        Focus::LaunchButton,
        Focus::RefreshButton,
    ];

    fn step(self, delta: isize) -> Focus {
        let len = Self::ORDER.len() as isize;
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ORDER[(index + delta).rem_euclid(len) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// Launch pressed before anything was installed.
    NotInstalled,
    Busy(TaskKind),
}

impl From<SlotBusy> for ActionError {
    fn from(busy: SlotBusy) -> Self {
        ActionError::Busy(busy.0)
    }
}

/// Interface-thread side of the launcher: owns the state, drains task
/// events and turns user actions into background tasks.
pub struct App {
    pub state: AppState,
    pub focus: Focus,
    pub should_quit: bool,
    pub tick: u64,
    orchestrator: Orchestrator,
    events: UnboundedReceiver<UiEvent>,
    tasks: TaskSlots,
    runtime: Handle,
}

impl App {
    pub fn new(
        orchestrator: Orchestrator,
        events: UnboundedReceiver<UiEvent>,
        username: String,
        runtime: Handle,
    ) -> Self {
        Self {
            state: AppState::new(username),
            focus: Focus::Username,
            should_quit: false,
            tick: 0,
            orchestrator,
            events,
            tasks: TaskSlots::new(),
            runtime,
        }
    }

    /// Loads the catalog and restores the previous session in the background.
    pub fn start(&mut self) {
        let orchestrator = self.orchestrator.clone();
        let started = self.start_task(TaskKind::Refresh, async move {
            orchestrator.startup().await;
        });
        if let Err(e) = started {
            log::warn!("Startup scan not started: {:?}", e);
        }
    }

    pub fn install(&mut self) -> Result<(), ActionError> {
        let request = InstallRequest {
            version: self.state.selected_install.clone(),
        };
        let orchestrator = self.orchestrator.clone();
        self.start_task(TaskKind::Install, async move {
            let _ = orchestrator.install(request).await;
        })
    }

    pub fn launch(&mut self) -> Result<(), ActionError> {
        if !self.state.ready {
            self.state.notice = Some(Notice::error("Please install the game first"));
            return Err(ActionError::NotInstalled);
        }

        let request = LaunchRequest {
            version: self.state.selected_launch.clone(),
            username: self.state.username.clone(),
        };
        let orchestrator = self.orchestrator.clone();
        self.start_task(TaskKind::Launch, async move {
            let _ = orchestrator.launch(request).await;
        })
    }

    pub fn refresh(&mut self) -> Result<(), ActionError> {
        let orchestrator = self.orchestrator.clone();
        self.start_task(TaskKind::Refresh, async move {
            orchestrator.refresh().await;
        })
    }

    fn start_task<F>(&mut self, kind: TaskKind, future: F) -> Result<(), ActionError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let events = self.orchestrator.events().clone();
        match self.tasks.try_start(&self.runtime, kind, events, future) {
            Ok(()) => {
                // `TaskStarted` is already queued; disable the control now.
                self.pump_events();
                Ok(())
            }
            Err(busy) => {
                self.state.set_status(format!("{} already in progress", kind));
                Err(busy.into())
            }
        }
    }

    /// Applies every event published since the last frame.
    pub fn pump_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.state.apply(event);
        }
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.pump_events();
    }

    pub fn activate(&mut self) {
        let result = match self.focus {
            Focus::InstallButton => self.install(),
            Focus::LaunchButton => self.launch(),
            Focus::RefreshButton => self.refresh(),
            Focus::InstallVersion | Focus::LaunchVersion | Focus::Username => {
                self.next_focus();
                Ok(())
            }
        };
        if let Err(e) = result {
            log::debug!("Action rejected: {:?}", e);
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.step(1);
    }

    pub fn previous_focus(&mut self) {
        self.focus = self.focus.step(-1);
    }

    pub fn cycle_selection(&mut self, step: isize) {
        match self.focus {
            Focus::InstallVersion => self.state.cycle_install(step),
            Focus::LaunchVersion => self.state.cycle_launch(step),
            _ => {}
        }
    }

    pub fn input_char(&mut self, c: char) {
        if self.focus == Focus::Username && !c.is_control() {
            self.state.username.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.focus == Focus::Username {
            self.state.username.pop();
        }
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.state.notice.take().is_some()
    }

    pub fn shutdown(&mut self) {
        self.tasks.cancel_all();
        self.should_quit = true;
    }

    #[cfg(test)]
    async fn settle(&mut self) {
        self.tasks.join_all().await;
        self.pump_events();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigStore, LauncherConfig};
    use crate::event::channel;
    use crate::service::{LaunchCommand, MockGameInstallService, MockProcessSpawner};
    use crate::utils::scratch_dir;
    use crate::version::{self, InstalledVersion, VersionDescriptor, VersionType};
    use std::path::Path;
    use std::sync::Arc;

    fn app_with(service: MockGameInstallService, spawner: MockProcessSpawner, dir: &Path) -> App {
        let (sink, rx) = channel();
        let orchestrator =
            Orchestrator::new(Arc::new(service), Arc::new(spawner), dir.to_path_buf(), sink);
        App::new(orchestrator, rx, "Player".to_string(), Handle::current())
    }

    #[tokio::test]
    async fn launch_is_refused_when_nothing_is_installed() {
        let dir = scratch_dir("app-gate");
        std::fs::create_dir_all(&dir).unwrap();
        let store = ConfigStore::new(&dir);
        store.save(&LauncherConfig::with_launch_version("1.19.4")).unwrap();

        let mut service = MockGameInstallService::new();
        service
            .expect_list_remote_versions()
            .returning(|| Ok(vec![VersionDescriptor::new("1.20.1", VersionType::Release)]));
        service.expect_list_installed_versions().returning(|_| Ok(vec![]));
        service.expect_build_launch_command().never();
        let mut spawner = MockProcessSpawner::new();
        spawner.expect_spawn().never();
        let mut app = app_with(service, spawner, &dir);

        app.start();
        app.settle().await;
        assert!(!app.state.launch_enabled());

        assert_eq!(app.launch(), Err(ActionError::NotInstalled));
        assert!(!app.tasks.is_running(TaskKind::Launch));
        assert!(!app.state.launching);
        assert_eq!(
            app.state.notice.as_ref().map(|n| n.message.as_str()),
            Some("Please install the game first")
        );
        assert_eq!(store.load().launch_version.as_deref(), Some("1.19.4"));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn install_then_launch_end_to_end() {
        let dir = scratch_dir("app-e2e");
        let installed_dir = dir.clone();

        let mut service = MockGameInstallService::new();
        service
            .expect_list_remote_versions()
            .returning(|| Ok(vec![VersionDescriptor::new("1.20.1", VersionType::Release)]));
        service.expect_install().times(1).returning(move |id, d| {
            let jar = version::version_jar_path(d, id);
            std::fs::create_dir_all(jar.parent().unwrap()).unwrap();
            std::fs::write(jar, b"jar").unwrap();
            Ok(())
        });
        service.expect_list_installed_versions().returning(move |_| {
            if version::version_jar_path(&installed_dir, "1.20.1").exists() {
                Ok(vec![InstalledVersion::new("1.20.1")])
            } else {
                Ok(vec![])
            }
        });
        service.expect_build_launch_command().times(1).returning(|_, _, _| {
            Ok(LaunchCommand {
                program: "java".to_string(),
                args: vec![],
            })
        });
        let mut spawner = MockProcessSpawner::new();
        spawner.expect_spawn().times(1).returning(|_| Ok(77));
        let mut app = app_with(service, spawner, &dir);

        app.start();
        app.settle().await;
        assert_eq!(app.state.selected_install.as_deref(), Some("1.20.1"));
        assert_eq!(app.state.status, "Game directory not found. Click Install.");

        app.install().unwrap();
        assert!(!app.state.install_enabled());
        app.settle().await;
        assert!(app.state.install_enabled());
        assert!(app.state.launch_enabled());
        assert_eq!(app.state.selected_launch.as_deref(), Some("1.20.1"));

        app.launch().unwrap();
        app.settle().await;
        assert_eq!(app.state.status, "Game started! (1.20.1)");
        assert!(app.state.launch_enabled());
        assert!(!app.state.in_progress());
        assert_eq!(
            ConfigStore::new(&dir).load().launch_version.as_deref(),
            Some("1.20.1")
        );

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn duplicate_install_trigger_is_rejected() {
        let dir = scratch_dir("app-busy");
        let mut service = MockGameInstallService::new();
        service.expect_install().returning(|_, _| Ok(()));
        service.expect_list_installed_versions().returning(|_| Ok(vec![]));
        let mut app = app_with(service, MockProcessSpawner::new(), &dir);
        app.state.selected_install = Some("1.20.1".to_string());

        app.install().unwrap();
        assert!(app.state.installing);
        assert!(app.tasks.is_running(TaskKind::Install));
        assert_eq!(app.install(), Err(ActionError::Busy(TaskKind::Install)));
        assert_eq!(app.state.status, "Installation already in progress");

        app.settle().await;
        assert!(app.state.install_enabled());
        assert!(!app.tasks.is_running(TaskKind::Install));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn focus_and_username_editing() {
        let dir = scratch_dir("app-focus");
        let mut app = app_with(MockGameInstallService::new(), MockProcessSpawner::new(), &dir);

        app.backspace();
        app.input_char('X');
        assert_eq!(app.state.username, "PlayeX");

        app.previous_focus();
        assert_eq!(app.focus, Focus::RefreshButton);
        app.next_focus();
        app.next_focus();
        assert_eq!(app.focus, Focus::InstallVersion);
        app.input_char('Y');
        assert_eq!(app.state.username, "PlayeX");
    }
}
