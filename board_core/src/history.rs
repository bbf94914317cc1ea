use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use board_proto::{ActionRecord, GameState};

/// Entries kept in the in-memory action log before the oldest is evicted.
pub const ACTION_LOG_CAPACITY: usize = 100;

/// Append-only bounded log of backend actions, newest first.
#[derive(Debug, Default)]
pub struct ActionLog {
    entries: VecDeque<ActionRecord>,
}

impl ActionLog {
    pub fn push(&mut self, action: ActionRecord) {
        self.entries.push_front(action);
        while self.entries.len() > ACTION_LOG_CAPACITY {
            self.entries.pop_back();
        }
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &ActionRecord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Board snapshots captured from actions, keyed by action id.
///
/// Entries are never replaced or dropped within a session, so a snapshot
/// outlives its action's eviction from the bounded log.
#[derive(Debug, Default)]
pub struct HistoryCache {
    snapshots: HashMap<u64, GameState>,
}

impl HistoryCache {
    /// Store the embedded snapshot if the action carries one. Returns
    /// whether anything was recorded.
    pub fn record_if_present(&mut self, action: &ActionRecord) -> bool {
        match &action.snapshot {
            Some(snapshot) => {
                self.snapshots.insert(action.id, snapshot.clone());
                true
            }
            None => false,
        }
    }

    pub fn lookup(&self, id: u64) -> Option<&GameState> {
        self.snapshots.get(&id)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Which state the painted board reflects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Tracking the live entity store.
    #[default]
    Live,
    /// Frozen on the snapshot recorded for this action id.
    Viewing(u64),
}

impl ViewMode {
    pub fn is_live(self) -> bool {
        matches!(self, ViewMode::Live)
    }
}

/// A history lookup that found nothing. Never fatal; the view keeps
/// whatever it was showing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("no snapshot recorded for action {0}")]
    UnknownAction(u64),
}
