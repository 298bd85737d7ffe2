//! Periodic background save.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::{ArticleEditor, SaveReason};

/// How often the autosave task checks for unsaved edits.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(10);

/// Handle to a running autosave task.
///
/// The task saves with [`SaveReason::Auto`] on every tick where the editor
/// is dirty and no save is in flight. It runs until [`stop`](Self::stop) is
/// called or the handle is dropped.
#[derive(Debug)]
pub struct Autosave {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Autosave {
    /// Start autosaving every [`AUTOSAVE_INTERVAL`].
    pub fn start(editor: Arc<ArticleEditor>) -> Self {
        Self::with_interval(editor, AUTOSAVE_INTERVAL)
    }

    /// Start autosaving every `period`.
    pub fn with_interval(editor: Arc<ArticleEditor>, period: Duration) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticks.tick() => {
                        if !editor.is_dirty() || editor.is_saving() {
                            continue;
                        }
                        if let Err(e) = editor.save(SaveReason::Auto).await {
                            tracing::debug!(article = %editor.id(), error = %e, "autosave failed; retrying next tick");
                        }
                    }
                }
            }
            tracing::debug!(article = %editor.id(), "autosave stopped");
        });

        Self {
            stop: Some(stop_tx),
            task: Some(task),
        }
    }

    /// Stop the task, letting a save already under way finish first.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!(error = %e, "autosave task ended abnormally");
        }
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
