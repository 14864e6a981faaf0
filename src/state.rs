use std::collections::VecDeque;
use chrono::{DateTime, Local};
use crate::event::{Notice, TaskKind, UiEvent};

const STATUS_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub timestamp: DateTime<Local>,
    pub text: String,
}

impl StatusEntry {
    pub fn format(&self) -> String {
        format!("{} {}", self.timestamp.format("%H:%M:%S"), self.text)
    }
}

/// Session state owned by the interface thread.
#[derive(Debug, Clone)]
pub struct AppState {
    pub username: String,
    pub install_versions: Vec<String>,
    pub selected_install: Option<String>,
    pub launch_versions: Vec<String>,
    pub selected_launch: Option<String>,
    /// Last scan found installed content.
    pub ready: bool,
    pub installing: bool,
    pub launching: bool,
    pub refreshing: bool,
    pub status: String,
    pub history: VecDeque<StatusEntry>,
    pub notice: Option<Notice>,
}

impl AppState {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            install_versions: Vec::new(),
            selected_install: None,
            launch_versions: Vec::new(),
            selected_launch: None,
            ready: false,
            installing: false,
            launching: false,
            refreshing: false,
            status: "Ready".to_string(),
            history: VecDeque::with_capacity(STATUS_HISTORY_LIMIT),
            notice: None,
        }
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::TaskStarted(kind) => self.set_busy(kind, true),
            UiEvent::TaskFinished(kind) => self.set_busy(kind, false),
            UiEvent::Status(text) => self.set_status(text),
            UiEvent::Notice(notice) => self.notice = Some(notice),
            UiEvent::Catalog(ids) => {
                if let Some(first) = ids.first() {
                    self.selected_install = Some(first.clone());
                }
                self.install_versions = ids;
            }
            UiEvent::Installed(ids) => {
                self.ready = !ids.is_empty();
                if self.selected_launch.as_deref().map_or(true, str::is_empty) {
                    self.selected_launch = ids.first().cloned();
                }
                self.launch_versions = ids;
            }
            UiEvent::LaunchUnavailable => self.ready = false,
            UiEvent::SelectLaunch(id) => self.selected_launch = Some(id),
        }
    }

    pub fn set_status(&mut self, text: String) {
        if self.history.len() == STATUS_HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(StatusEntry {
            timestamp: Local::now(),
            text: text.clone(),
        });
        self.status = text;
    }

    fn set_busy(&mut self, kind: TaskKind, busy: bool) {
        match kind {
            TaskKind::Install => self.installing = busy,
            TaskKind::Launch => self.launching = busy,
            TaskKind::Refresh => self.refreshing = busy,
        }
    }

    pub fn is_busy(&self, kind: TaskKind) -> bool {
        match kind {
            TaskKind::Install => self.installing,
            TaskKind::Launch => self.launching,
            TaskKind::Refresh => self.refreshing,
        }
    }

    pub fn install_enabled(&self) -> bool {
        !self.installing
    }

    pub fn launch_enabled(&self) -> bool {
        self.ready && !self.launching
    }

    pub fn refresh_enabled(&self) -> bool {
        !self.refreshing
    }

    pub fn in_progress(&self) -> bool {
        self.installing || self.launching || self.refreshing
    }

    pub fn cycle_install(&mut self, step: isize) {
        self.selected_install =
            cycle(&self.install_versions, self.selected_install.as_deref(), step);
    }

    pub fn cycle_launch(&mut self, step: isize) {
        self.selected_launch = cycle(&self.launch_versions, self.selected_launch.as_deref(), step);
    }
}

fn cycle(options: &[String], current: Option<&str>, step: isize) -> Option<String> {
    if options.is_empty() {
        return current.map(str::to_string);
    }

    let len = options.len() as isize;
    let next = match current.and_then(|c| options.iter().position(|o| o == c)) {
        Some(index) => (index as isize + step).rem_euclid(len),
        None => 0,
    };
    options.get(next as usize).cloned()
}
