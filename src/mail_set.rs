//! Ordered, duplicate-free message collections
//!
//! [`MailSet`] keeps one folder's messages sorted newest-first and
//! answers the neighbor queries that drive list navigation. Backed by a
//! `BTreeMap` keyed on [`MailKey`], so membership and neighbor lookups
//! are O(log n).

use crate::message::{MailKey, MessageRecord};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Direction of a neighbor lookup relative to the list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards older messages (further down the list).
    Older,
    /// Towards newer messages (further up the list).
    Newer,
}

/// A folder's messages, sorted newest-first.
#[derive(Debug, Default)]
pub struct MailSet {
    inner: BTreeMap<MailKey, MessageRecord>,
}

impl MailSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    /// Insert a record. If a record with the same key is already
    /// present the set is unchanged and the incoming record is handed
    /// back, so a caller holding the only copy of a message cannot
    /// lose it silently.
    pub fn add(&mut self, record: MessageRecord) -> Option<MessageRecord> {
        let key = record.key();
        if self.inner.contains_key(&key) {
            return Some(record);
        }
        self.inner.insert(key, record);
        None
    }

    /// Remove and return the record under `key`, if present.
    pub fn remove(&mut self, key: &MailKey) -> Option<MessageRecord> {
        self.inner.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &MailKey) -> bool {
        self.inner.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &MailKey) -> Option<&MessageRecord> {
        self.inner.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &MailKey) -> Option<&mut MessageRecord> {
        self.inner.get_mut(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// A fresh snapshot of the records, newest first. Mutating the set
    /// afterwards does not affect an already-taken snapshot.
    #[must_use]
    pub fn values(&self) -> Vec<&MessageRecord> {
        self.inner.values().collect()
    }

    /// The newest record, if any.
    #[must_use]
    pub fn first(&self) -> Option<&MessageRecord> {
        self.inner.values().next()
    }

    /// Number of records not yet marked seen.
    #[must_use]
    pub fn unseen_count(&self) -> usize {
        self.inner.values().filter(|rec| !rec.flags().seen).count()
    }

    /// The chronologically adjacent member in `direction`.
    ///
    /// Returns `None` if `key` is not a member, the set has at most
    /// one entry, or `key` is already the extreme element in that
    /// direction.
    #[must_use]
    pub fn neighbor(&self, key: &MailKey, direction: Direction) -> Option<MailKey> {
        if self.inner.len() <= 1 || !self.inner.contains_key(key) {
            return None;
        }
        match direction {
            Direction::Older => self
                .inner
                .range((Bound::Excluded(*key), Bound::Unbounded))
                .next()
                .map(|(k, _)| *k),
            Direction::Newer => self
                .inner
                .range((Bound::Unbounded, Bound::Excluded(*key)))
                .next_back()
                .map(|(k, _)| *k),
        }
    }

    /// The older neighbor if one exists, otherwise the newer one.
    ///
    /// Used to pick a replacement when the member under `key` is about
    /// to leave the list. `None` only if the set would be empty
    /// afterwards.
    #[must_use]
    pub fn other_neighbor(&self, key: &MailKey) -> Option<MailKey> {
        self.neighbor(key, Direction::Older)
            .or_else(|| self.neighbor(key, Direction::Newer))
    }

    /// Remove and return all records, leaving the set empty.
    pub fn take_all(&mut self) -> Vec<MessageRecord> {
        std::mem::take(&mut self.inner).into_values().collect()
    }
}
