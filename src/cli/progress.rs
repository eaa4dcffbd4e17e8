//! Progress feedback while waiting on a parse job
//!
//! A single indicatif spinner shows elapsed time during the wait. Ctrl-C is
//! routed into a [`CancellationToken`] so the wait ends cleanly with a
//! `Cancelled` error instead of killing the process mid-request.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const TICK_INTERVAL: Duration = Duration::from_millis(120);

/// Spinner shown while a job is being polled
pub struct WaitSpinner {
    bar: ProgressBar,
}

impl WaitSpinner {
    /// Start a spinner; hidden in quiet mode
    pub fn start(message: impl Into<String>, enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["◐", "◓", "◑", "◒", "●"]);
        bar.set_style(style);
        bar.set_message(message.into());
        bar.enable_steady_tick(TICK_INTERVAL);

        Self { bar }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    /// Stop the spinner and leave a final line behind
    pub fn finish(&self, message: impl Into<String>) {
        self.bar.finish_with_message(message.into());
    }

    /// Stop the spinner and remove it from the terminal
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for WaitSpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Cancel `token` when the user presses Ctrl-C
///
/// The returned task should be aborted once the guarded operation is over.
pub fn cancel_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    debug!("Ctrl-C received, cancelling wait");
                    token.cancel();
                }
                Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
            },
            _ = token.cancelled() => {}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_spinner_lifecycle() {
        let spinner = WaitSpinner::start("Waiting for job abc", false);
        spinner.set_message("Still waiting");
        spinner.finish("done");
        assert!(spinner.bar.is_finished());
    }

    #[tokio::test]
    async fn test_ctrl_c_task_ends_with_token() {
        let token = CancellationToken::new();
        let handle = cancel_on_ctrl_c(token.clone());

        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("listener should stop once the token is cancelled")
            .unwrap();
    }
}
