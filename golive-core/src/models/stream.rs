// src/models/stream.rs
use std::collections::HashMap;
use std::fmt;

/// Live/offline status of one tracked account.
///
/// `Unknown` only exists in freshly initialized snapshots, before the first
/// poll has reported anything for the account. It is distinct from `Offline`
/// so that the first observation never reads as a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Unknown,
    Offline,
    Live,
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StreamStatus::Unknown => "unknown",
            StreamStatus::Offline => "offline",
            StreamStatus::Live => "live",
        };
        f.write_str(s)
    }
}

/// Observed state of one account as of the most recent poll.
///
/// `game`, `title` and `display_name` are only populated while `status` is
/// `Live`; offline entries carry `None` throughout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub status: StreamStatus,
    pub game: Option<String>,
    pub title: Option<String>,
    pub display_name: Option<String>,
}

impl AccountSnapshot {
    pub fn unknown() -> Self {
        Self {
            status: StreamStatus::Unknown,
            game: None,
            title: None,
            display_name: None,
        }
    }

    pub fn offline() -> Self {
        Self {
            status: StreamStatus::Offline,
            game: None,
            title: None,
            display_name: None,
        }
    }

    pub fn live(display_name: &str, game: &str, title: &str) -> Self {
        Self {
            status: StreamStatus::Live,
            game: Some(game.to_string()),
            title: Some(title.to_string()),
            display_name: Some(display_name.to_string()),
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == StreamStatus::Live
    }
}

/// One snapshot per tracked account, keyed by the normalized login.
///
/// Evaluation order is taken from the configured account list, not from map
/// iteration order.
pub type SnapshotSet = HashMap<String, AccountSnapshot>;

/// The snapshot set a watcher starts from: every configured account present,
/// all `Unknown`.
pub fn initial_state(accounts: &[String]) -> SnapshotSet {
    accounts
        .iter()
        .map(|login| (login.clone(), AccountSnapshot::unknown()))
        .collect()
}
