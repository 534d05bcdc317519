use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The scrollable view holding the live log
pub trait ScrollTarget: Send + Sync {
    fn scroll_to_end(&self);
}

/// Scrolls the log view to its newest entry after every log mutation.
///
/// Changes arriving during the settle delay are folded into a single scroll.
#[derive(Debug, Clone, Copy)]
pub struct Autoscroll {
    delay: Duration,
}

impl Autoscroll {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Watch `log_len` until its sender goes away
    pub fn spawn(self, mut log_len: watch::Receiver<usize>, target: Arc<dyn ScrollTarget>) -> AutoscrollHandle {
        let delay = self.delay;
        let task = tokio::spawn(async move {
            while log_len.changed().await.is_ok() {
                tokio::time::sleep(delay).await;
                let len = *log_len.borrow_and_update();
                if len == 0 {
                    continue;
                }
                tracing::trace!(len, "Scrolling log to end");
                target.scroll_to_end();
            }
        });
        AutoscrollHandle { task }
    }
}

/// Stops the autoscroll task when dropped (view unmounted)
#[derive(Debug)]
pub struct AutoscrollHandle {
    task: JoinHandle<()>,
}

impl AutoscrollHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AutoscrollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
