// tests/stream_watch_tests.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use golive_core::Error;
use golive_core::models::stream::initial_state;
use golive_core::models::{AccountSnapshot, SnapshotSet};
use golive_core::platforms::{Notifier, StreamStatusProvider};
use golive_core::tasks::stream_watch::{
    CycleOutcome, DetectOutcome, StreamWatcher, detect_changes,
};

fn accounts(logins: &[&str]) -> Vec<String> {
    logins.iter().map(|l| l.to_string()).collect()
}

fn set(entries: &[(&str, AccountSnapshot)]) -> SnapshotSet {
    entries
        .iter()
        .map(|(login, snap)| (login.to_string(), snap.clone()))
        .collect()
}

/// Plays back a scripted sequence of fetch results, one per cycle.
struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<SnapshotSet, Error>>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<Result<SnapshotSet, Error>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl StreamStatusProvider for ScriptedProvider {
    async fn fetch_statuses(&self, _accounts: &[String]) -> Result<SnapshotSet, Error> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("provider called more often than scripted")
    }
}

/// Records every send attempt; fails the attempts whose index was marked.
struct RecordingNotifier {
    attempts: Mutex<Vec<String>>,
    fail_indices: Vec<usize>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self::failing_on(&[])
    }

    fn failing_on(indices: &[usize]) -> Self {
        Self {
            attempts: Mutex::new(Vec::new()),
            fail_indices: indices.to_vec(),
        }
    }

    fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), Error> {
        let mut attempts = self.attempts.lock().unwrap();
        let index = attempts.len();
        attempts.push(text.to_string());
        if self.fail_indices.contains(&index) {
            Err(Error::Notify("chat unreachable".into()))
        } else {
            Ok(())
        }
    }
}

// ---- change detector ----------------------------------------------------

#[test]
fn first_observation_never_messages() {
    let accounts = accounts(&["alice", "bob"]);
    let previous = initial_state(&accounts);
    let current = set(&[
        ("alice", AccountSnapshot::live("Alice", "G1", "T1")),
        ("bob", AccountSnapshot::offline()),
    ]);

    let outcome = detect_changes(&accounts, &previous, current.clone());

    assert!(outcome.messages.is_empty());
    assert_eq!(outcome.next, current);
}

#[test]
fn offline_to_live_messages_went_live() {
    let accounts = accounts(&["alice"]);
    let previous = set(&[("alice", AccountSnapshot::offline())]);
    let current = set(&[("alice", AccountSnapshot::live("Alice", "G", "T"))]);

    let outcome = detect_changes(&accounts, &previous, current);

    assert_eq!(outcome.messages, vec!["Alice went live with G\nT"]);
}

#[test]
fn game_change_messages_switched() {
    let accounts = accounts(&["alice"]);
    let previous = set(&[("alice", AccountSnapshot::live("Alice", "G1", "T"))]);
    let current = set(&[("alice", AccountSnapshot::live("Alice", "G2", "T"))]);

    let outcome = detect_changes(&accounts, &previous, current);

    assert_eq!(outcome.messages, vec!["Alice switched to G2\nT"]);
}

#[test]
fn title_only_change_is_silent() {
    let accounts = accounts(&["alice"]);
    let previous = set(&[("alice", AccountSnapshot::live("Alice", "G", "old title"))]);
    let current = set(&[("alice", AccountSnapshot::live("Alice", "G", "new title"))]);

    let outcome = detect_changes(&accounts, &previous, current.clone());

    assert!(outcome.messages.is_empty());
    assert_eq!(outcome.next, current);
}

#[test]
fn live_to_offline_is_silent_and_clears_fields() {
    let accounts = accounts(&["alice"]);
    let previous = set(&[("alice", AccountSnapshot::live("Alice", "G", "T"))]);
    let current = set(&[("alice", AccountSnapshot::offline())]);

    let outcome = detect_changes(&accounts, &previous, current);

    assert!(outcome.messages.is_empty());
    let retained = &outcome.next["alice"];
    assert!(retained.game.is_none());
    assert!(retained.title.is_none());
}

#[test]
fn detector_is_idempotent() {
    let accounts = accounts(&["alice", "bob"]);
    let previous = set(&[
        ("alice", AccountSnapshot::live("Alice", "G1", "T1")),
        ("bob", AccountSnapshot::offline()),
    ]);
    let current = set(&[
        ("alice", AccountSnapshot::live("Alice", "G2", "T2")),
        ("bob", AccountSnapshot::live("Bob", "H", "U")),
    ]);

    let first = detect_changes(&accounts, &previous, current.clone());
    let second = detect_changes(&accounts, &previous, current);

    assert_eq!(first, second);
}

#[test]
fn message_order_follows_configuration_order() {
    // HashMap iteration order must not leak into message order.
    let accounts = accounts(&["zoe", "alice", "mid"]);
    let previous = set(&[
        ("zoe", AccountSnapshot::offline()),
        ("alice", AccountSnapshot::offline()),
        ("mid", AccountSnapshot::offline()),
    ]);
    let current = set(&[
        ("zoe", AccountSnapshot::live("Zoe", "G", "T")),
        ("alice", AccountSnapshot::live("Alice", "G", "T")),
        ("mid", AccountSnapshot::live("Mid", "G", "T")),
    ]);

    let outcome = detect_changes(&accounts, &previous, current);

    assert_eq!(
        outcome.messages,
        vec![
            "Zoe went live with G\nT",
            "Alice went live with G\nT",
            "Mid went live with G\nT",
        ]
    );
}

#[test]
fn missing_display_name_falls_back_to_login() {
    let accounts = accounts(&["alice"]);
    let previous = set(&[("alice", AccountSnapshot::offline())]);
    let mut live = AccountSnapshot::live("Alice", "G", "T");
    live.display_name = None;
    let current = set(&[("alice", live)]);

    let outcome = detect_changes(&accounts, &previous, current);

    assert_eq!(outcome.messages, vec!["alice went live with G\nT"]);
}

// ---- watch loop ---------------------------------------------------------

#[tokio::test]
async fn end_to_end_four_cycle_scenario() {
    let logins = accounts(&["alice"]);
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(set(&[("alice", AccountSnapshot::live("Alice", "G1", "T1"))])),
        Ok(set(&[("alice", AccountSnapshot::live("Alice", "G2", "T1"))])),
        Ok(set(&[("alice", AccountSnapshot::offline())])),
        Ok(set(&[("alice", AccountSnapshot::live("Alice", "G1", "T2"))])),
    ]));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut watcher = StreamWatcher::new(
        provider,
        notifier.clone(),
        logins,
        Duration::from_secs(60),
    );

    // Cycle 1: first observation of an already-live stream stays silent.
    watcher.run_cycle().await;
    assert!(notifier.attempts().is_empty());
    assert_eq!(
        watcher.state()["alice"],
        AccountSnapshot::live("Alice", "G1", "T1")
    );

    // Cycle 2: game change.
    watcher.run_cycle().await;
    assert_eq!(notifier.attempts(), vec!["Alice switched to G2\nT1"]);

    // Cycle 3: going offline stays silent.
    watcher.run_cycle().await;
    assert_eq!(notifier.attempts().len(), 1);
    assert_eq!(watcher.state()["alice"], AccountSnapshot::offline());

    // Cycle 4: back live again.
    watcher.run_cycle().await;
    assert_eq!(
        notifier.attempts(),
        vec!["Alice switched to G2\nT1", "Alice went live with G1\nT2"]
    );
}

#[tokio::test]
async fn provider_failure_leaves_state_unchanged() {
    let logins = accounts(&["alice"]);
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(set(&[("alice", AccountSnapshot::live("Alice", "G1", "T1"))])),
        Err(Error::Provider("helix unreachable".into())),
    ]));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut watcher = StreamWatcher::new(
        provider,
        notifier.clone(),
        logins,
        Duration::from_secs(60),
    );

    watcher.run_cycle().await;
    let retained = watcher.state().clone();

    let outcome = watcher.run_cycle().await;
    assert!(matches!(outcome, CycleOutcome::Skipped(_)));
    assert_eq!(watcher.state(), &retained);
    assert!(notifier.attempts().is_empty());
}

#[tokio::test]
async fn notify_failure_does_not_drop_batch_or_state() {
    let logins = accounts(&["alice", "bob"]);
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(set(&[
            ("alice", AccountSnapshot::offline()),
            ("bob", AccountSnapshot::offline()),
        ])),
        Ok(set(&[
            ("alice", AccountSnapshot::live("Alice", "G", "T")),
            ("bob", AccountSnapshot::live("Bob", "H", "U")),
        ])),
    ]));
    // First send of the second cycle fails.
    let notifier = Arc::new(RecordingNotifier::failing_on(&[0]));
    let mut watcher = StreamWatcher::new(
        provider,
        notifier.clone(),
        logins,
        Duration::from_secs(60),
    );

    watcher.run_cycle().await;
    let outcome = watcher.run_cycle().await;

    match outcome {
        CycleOutcome::Completed { delivered, failed } => {
            assert_eq!(delivered, 1);
            assert_eq!(failed, 1);
        }
        other => panic!("expected completed cycle, got {other:?}"),
    }
    // Both messages were attempted, in configuration order.
    assert_eq!(
        notifier.attempts(),
        vec!["Alice went live with G\nT", "Bob went live with H\nU"]
    );
    // Delivery failure is not detection failure: state still advanced.
    assert!(watcher.state()["alice"].is_live());
    assert!(watcher.state()["bob"].is_live());
}

#[tokio::test]
async fn fresh_watcher_starts_all_unknown() {
    let logins = accounts(&["alice", "bob"]);
    let provider = Arc::new(ScriptedProvider::new(Vec::new()));
    let notifier = Arc::new(RecordingNotifier::new());
    let watcher = StreamWatcher::new(provider, notifier, logins, Duration::from_secs(60));

    assert_eq!(watcher.state().len(), 2);
    assert!(
        watcher
            .state()
            .values()
            .all(|s| *s == AccountSnapshot::unknown())
    );
}

#[test]
fn detect_outcome_adopts_current_wholesale() {
    let accounts = accounts(&["alice", "bob"]);
    let previous = set(&[
        ("alice", AccountSnapshot::live("Alice", "G", "T")),
        ("bob", AccountSnapshot::unknown()),
    ]);
    let current = set(&[
        ("alice", AccountSnapshot::offline()),
        ("bob", AccountSnapshot::live("Bob", "H", "U")),
    ]);

    let DetectOutcome { next, .. } = detect_changes(&accounts, &previous, current.clone());

    assert_eq!(next, current);
}
