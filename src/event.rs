use std::fmt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Install,
    Launch,
    Refresh,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Install => write!(f, "Installation"),
            TaskKind::Launch => write!(f, "Launch"),
            TaskKind::Refresh => write!(f, "Refresh"),
        }
    }
}

/// Blocking message the user has to dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

/// Updates published by background tasks. Only the interface thread applies
/// them to `AppState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    TaskStarted(TaskKind),
    TaskFinished(TaskKind),
    Status(String),
    Notice(Notice),
    /// Installable catalog ids, already filtered.
    Catalog(Vec<String>),
    /// Result of a successful local scan.
    Installed(Vec<String>),
    /// A scan failed; launching stays disabled.
    LaunchUnavailable,
    SelectLaunch(String),
}

#[derive(Debug, Clone)]
pub struct EventSink {
    sender: UnboundedSender<UiEvent>,
}

impl EventSink {
    pub fn emit(&self, event: UiEvent) {
        if self.sender.send(event).is_err() {
            log::debug!("UI is gone, dropping event");
        }
    }

    pub fn status(&self, text: impl Into<String>) {
        let text = text.into();
        log::info!("{}", text);
        self.emit(UiEvent::Status(text));
    }
}

pub fn channel() -> (EventSink, UnboundedReceiver<UiEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (EventSink { sender }, receiver)
}

#[cfg(test)]
pub(crate) fn drain(receiver: &mut UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
