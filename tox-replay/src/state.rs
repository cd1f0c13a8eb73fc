//! Replay state threaded through every listener invocation
//!
//! The listener never keeps tallies of its own; each capability takes the
//! state, records what it saw, and hands it on.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tox_dispatch::{CallStateFlags, FriendNumber};

/// One dispatched event, kept when the event log is enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Index of the batch (tick) the event arrived in
    pub batch: usize,
    pub category: String,
    pub friend: Option<u32>,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayState {
    /// Current batch index
    pub batch: usize,
    /// Events seen per category name
    pub counts: BTreeMap<String, u64>,
    /// Every friend number any event referred to
    pub friends: BTreeSet<u32>,
    /// Most recent call-state mask received
    pub last_call_state: Option<u32>,
    pub events: Option<Vec<EventRecord>>,
}

impl ReplayState {
    pub fn new(keep_events: bool) -> Self {
        Self {
            events: keep_events.then(Vec::new),
            ..Self::default()
        }
    }

    /// Move on to the next batch
    pub fn next_batch(mut self) -> Self {
        self.batch += 1;
        self
    }

    /// Count one event; `detail` is only rendered when the event log is on
    pub fn record(
        mut self,
        category: impl ToString,
        friend: Option<FriendNumber>,
        detail: impl FnOnce() -> String,
    ) -> Self {
        let category = category.to_string();
        if let Some(friend) = friend {
            self.friends.insert(friend.value());
        }
        if let Some(events) = self.events.as_mut() {
            events.push(EventRecord {
                batch: self.batch,
                category: category.clone(),
                friend: friend.map(FriendNumber::value),
                detail: detail(),
            });
        }
        *self.counts.entry(category).or_insert(0) += 1;
        self
    }

    pub fn with_call_state(mut self, call_state: CallStateFlags) -> Self {
        self.last_call_state = Some(call_state.encode());
        self
    }

    /// Total events across all categories
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}
