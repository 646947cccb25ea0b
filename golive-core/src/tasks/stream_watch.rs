// src/tasks/stream_watch.rs
//! The watch loop and its change detector.
//!
//! Each cycle fetches a fresh snapshot of every tracked account, compares it
//! against the snapshot retained from the previous cycle, sends one Telegram
//! message per notifiable transition and installs the fresh snapshot as the
//! new baseline. A fetch failure skips the whole cycle without touching the
//! baseline; a send failure only loses that one message.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::models::stream::initial_state;
use crate::models::{SnapshotSet, StreamStatus};
use crate::platforms::{Notifier, StreamStatusProvider};

/// What the change detector produced for one cycle: the messages to send, in
/// evaluation order, and the snapshot set to retain for the next comparison.
#[derive(Debug, PartialEq, Eq)]
pub struct DetectOutcome {
    pub messages: Vec<String>,
    pub next: SnapshotSet,
}

/// Result of one fetch→detect→notify cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Detection ran and the retained snapshot set was replaced. Counts
    /// cover the notification attempts of this cycle.
    Completed { delivered: usize, failed: usize },
    /// The status fetch failed; nothing was sent and the retained snapshot
    /// set is untouched.
    Skipped(Error),
}

/// Compares consecutive snapshot sets and decides which transitions warrant
/// a message.
///
/// Accounts are evaluated in the order of `accounts` (configuration order),
/// so message order is deterministic. Pure function: same inputs, same
/// outcome, no side effects.
///
/// Rules, per account:
/// - first observation (previous status unknown) never messages, so a
///   process start during a live stream stays silent;
/// - going or staying offline never messages;
/// - anything-but-live → live messages "went live";
/// - live → live with a different game messages "switched to";
/// - live → live with the same game is silent, even when the title changed.
pub fn detect_changes(
    accounts: &[String],
    previous: &SnapshotSet,
    current: SnapshotSet,
) -> DetectOutcome {
    let mut messages = Vec::new();

    for login in accounts {
        let Some(cur) = current.get(login) else {
            // Provider contract violation; nothing sane to compare.
            continue;
        };
        let prev_status = previous
            .get(login)
            .map(|p| p.status)
            .unwrap_or(StreamStatus::Unknown);

        if prev_status == StreamStatus::Unknown {
            continue;
        }
        if cur.status != StreamStatus::Live {
            continue;
        }

        let name = cur.display_name.as_deref().unwrap_or(login);
        let game = cur.game.as_deref().unwrap_or_default();
        let title = cur.title.as_deref().unwrap_or_default();

        if prev_status != StreamStatus::Live {
            messages.push(format!("{name} went live with {game}\n{title}"));
        } else {
            let prev_game = previous.get(login).and_then(|p| p.game.as_deref());
            if prev_game != cur.game.as_deref() {
                messages.push(format!("{name} switched to {game}\n{title}"));
            }
        }
    }

    DetectOutcome {
        messages,
        next: current,
    }
}

/// Owns the retained snapshot set and drives the fetch→detect→notify cycle
/// on a fixed cadence.
pub struct StreamWatcher {
    provider: Arc<dyn StreamStatusProvider>,
    notifier: Arc<dyn Notifier>,
    accounts: Vec<String>,
    interval: Duration,
    state: SnapshotSet,
}

impl StreamWatcher {
    /// Starts from all-unknown snapshots so the first poll never reads as a
    /// transition.
    pub fn new(
        provider: Arc<dyn StreamStatusProvider>,
        notifier: Arc<dyn Notifier>,
        accounts: Vec<String>,
        interval: Duration,
    ) -> Self {
        let state = initial_state(&accounts);
        Self {
            provider,
            notifier,
            accounts,
            interval,
            state,
        }
    }

    /// The snapshot set retained for the next comparison.
    pub fn state(&self) -> &SnapshotSet {
        &self.state
    }

    /// Runs one cycle and reports what it amounted to. Send failures are
    /// logged per message and never abort the batch; the retained state
    /// still advances, since delivery failure is not detection failure.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let current = match self.provider.fetch_statuses(&self.accounts).await {
            Ok(set) => set,
            Err(e) => return CycleOutcome::Skipped(e),
        };

        let DetectOutcome { messages, next } = detect_changes(&self.accounts, &self.state, current);

        let mut delivered = 0;
        let mut failed = 0;
        for message in &messages {
            info!("{message}");
            match self.notifier.send(message).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    error!("Error when sending message: {e}");
                    failed += 1;
                }
            }
        }

        self.state = next;
        CycleOutcome::Completed { delivered, failed }
    }

    /// Loops until the process is terminated: cycle, log the outcome, sleep
    /// the fixed interval regardless of how the cycle went.
    pub async fn run(mut self) {
        info!("Starting monitoring of {} accounts", self.accounts.len());
        loop {
            match self.run_cycle().await {
                CycleOutcome::Completed { delivered, failed } => {
                    if delivered + failed > 0 {
                        info!("cycle completed: {delivered} sent, {failed} failed");
                    } else {
                        debug!("cycle completed, no transitions");
                    }
                }
                CycleOutcome::Skipped(e) => {
                    warn!("status fetch failed, keeping previous state: {e}");
                }
            }
            sleep(self.interval).await;
        }
    }
}

/// Spawns the watch loop as a background task.
pub fn spawn_stream_watch_task(watcher: StreamWatcher) -> tokio::task::JoinHandle<()> {
    tokio::spawn(watcher.run())
}
