//! Toast messages for export phase transitions.
//!
//! The caller supplies a `(message, visible)` callback. Result messages are
//! cleared after a delay by a second call with an empty message.

use std::sync::Arc;
use std::time::Duration;

pub const FAILURE_MESSAGE: &str = "Error exporting PDF. Please try again.";
pub const BUSY_MESSAGE: &str = "An export is already in progress.";

/// Callback receiving `(message, visible)`
pub type ToastCallback = Arc<dyn Fn(&str, bool) + Send + Sync>;

/// Wrap a closure as a [`ToastCallback`]
pub fn toast_callback<F>(f: F) -> ToastCallback
where
    F: Fn(&str, bool) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub struct ProgressReporter {
    callback: ToastCallback,
    clear_after: Duration,
}

impl ProgressReporter {
    pub fn new(callback: ToastCallback, clear_after: Duration) -> Self {
        Self {
            callback,
            clear_after,
        }
    }

    pub fn started(&self, view_label: &str, task_count: usize) {
        (self.callback)(
            &format!("Exporting {} ({} tasks)...", view_label, task_count),
            true,
        );
    }

    pub fn succeeded(&self, view_label: &str) {
        self.show_transient(&format!("{} exported successfully!", view_label));
    }

    pub fn failed(&self) {
        self.show_transient(FAILURE_MESSAGE);
    }

    pub fn busy(&self) {
        self.show_transient(BUSY_MESSAGE);
    }

    fn show_transient(&self, message: &str) {
        (self.callback)(message, true);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let callback = Arc::clone(&self.callback);
                let delay = self.clear_after;
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    callback("", false);
                });
            }
            Err(_) => log::warn!("No async runtime available; toast will not auto-clear"),
        }
    }
}
