use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::event::{EventSink, TaskKind, UiEvent};

/// A spawned action that can be cancelled. Dropping it cancels the work.
///
/// The task owns the `TaskStarted`/`TaskFinished` pair for its kind. Nothing
/// else emits them.
pub struct BackgroundTask {
    handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
    done: Arc<AtomicBool>,
}

impl BackgroundTask {
    /// Emits `TaskStarted` before returning, then runs `future` until it
    /// completes or is cancelled. `TaskFinished` is emitted either way.
    pub fn spawn<F>(runtime: &Handle, kind: TaskKind, events: EventSink, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancellation_token = CancellationToken::new();
        let token = cancellation_token.clone();
        let done = Arc::new(AtomicBool::new(false));
        let done_flag = done.clone();

        events.emit(UiEvent::TaskStarted(kind));
        let handle = runtime.spawn(async move {
            tokio::select! {
                _ = future => {}
                _ = token.cancelled() => {
                    log::info!("{} task cancelled", kind);
                    events.status(format!("{} cancelled", kind));
                }
            }
            // Free the slot before the interface can re-enable the control.
            done_flag.store(true, Ordering::Release);
            events.emit(UiEvent::TaskFinished(kind));
        });

        Self {
            handle,
            cancellation_token,
            done,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.done.load(Ordering::Acquire) || self.handle.is_finished()
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    #[cfg(test)]
    pub(crate) async fn join(mut self) {
        let _ = (&mut self.handle).await;
    }
}

impl Drop for BackgroundTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBusy(pub TaskKind);

/// At most one in-flight task per action kind.
#[derive(Default)]
pub struct TaskSlots {
    slots: HashMap<TaskKind, BackgroundTask>,
}

impl TaskSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self, kind: TaskKind) -> bool {
        self.slots.get(&kind).map_or(false, |task| !task.is_finished())
    }

    pub fn try_start<F>(
        &mut self,
        runtime: &Handle,
        kind: TaskKind,
        events: EventSink,
        future: F,
    ) -> Result<(), SlotBusy>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_running(kind) {
            return Err(SlotBusy(kind));
        }

        let task = BackgroundTask::spawn(runtime, kind, events, future);
        self.slots.insert(kind, task);
        Ok(())
    }

    pub fn cancel_all(&mut self) {
        for task in self.slots.values() {
            task.cancel();
        }
        self.slots.clear();
    }

    #[cfg(test)]
    pub(crate) async fn join_all(&mut self) {
        for (_, task) in self.slots.drain() {
            task.join().await;
        }
    }
}
