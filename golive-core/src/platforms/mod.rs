// src/platforms/mod.rs
//! Platform collaborators: the status provider the watcher polls and the
//! notifier it pushes messages through.
//!
//! Both seams are traits so the watch loop can be exercised in tests without
//! real network calls; the concrete implementations live in the platform
//! submodules.

pub mod telegram;
pub mod twitch;

use async_trait::async_trait;

use crate::error::Error;
use crate::models::SnapshotSet;

/// Batched live/offline lookup for a set of tracked accounts.
#[async_trait]
pub trait StreamStatusProvider: Send + Sync {
    /// Returns one entry per requested account. Accounts the platform does
    /// not report as currently streaming MUST come back as explicit offline
    /// entries with empty fields; live accounts carry game, title and
    /// display name. Transport or auth failures are recoverable per cycle.
    async fn fetch_statuses(&self, accounts: &[String]) -> Result<SnapshotSet, Error>;
}

/// Sends one text message to the fixed destination chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), Error>;
}
