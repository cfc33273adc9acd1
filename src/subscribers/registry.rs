//! # Ordered subscriber registry.
//!
//! Entries are kept in registration order — that order is the notification
//! order, and it is deterministic for the life of the tracker. Ids come from
//! a strictly increasing counter and are never reused, so two subscriptions
//! of the same callback are fully independent.

use std::fmt;
use std::sync::Arc;

use crate::subscribers::Subscribe;

/// Opaque handle identifying one subscription.
///
/// Formatted as a namespaced string (`<prefix>-<counter>`). Ids are unique
/// for the tracker's lifetime; an id that was unsubscribed never comes back.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Arc<str>);

impl SubscriptionId {
    pub(crate) fn new(prefix: &str, counter: u64) -> Self {
        Self(Arc::from(format!("{prefix}-{counter}")))
    }

    /// The id as its string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct Entry {
    id: SubscriptionId,
    subscriber: Arc<dyn Subscribe>,
}

/// Registration-ordered mapping of subscription ids to subscribers.
///
/// Entries are only ever added by `insert` and removed by `remove`/`clear`;
/// no entry is mutated in place.
pub(crate) struct SubscriberRegistry {
    entries: Vec<Entry>,
}

impl SubscriberRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, id: SubscriptionId, subscriber: Arc<dyn Subscribe>) {
        self.entries.push(Entry { id, subscriber });
    }

    /// Removes an entry; `false` for unknown (or already removed) ids.
    pub(crate) fn remove(&mut self, id: &SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != *id);
        self.entries.len() != before
    }

    /// Clones the entries out, preserving registration order.
    ///
    /// The tracker notifies from a snapshot so the registry lock is never
    /// held while subscriber code runs.
    pub(crate) fn snapshot(&self) -> Vec<(SubscriptionId, Arc<dyn Subscribe>)> {
        self.entries
            .iter()
            .map(|entry| (entry.id.clone(), Arc::clone(&entry.subscriber)))
            .collect()
    }

    /// Drops every entry, returning how many there were.
    pub(crate) fn clear(&mut self) -> usize {
        let drained = self.entries.len();
        self.entries.clear();
        drained
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
