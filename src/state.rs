//! Per-folder client state
//!
//! [`FolderState`] owns one folder's message sets and its position in
//! the Unloaded -> Loading -> Loaded lifecycle. It performs no I/O;
//! the [`Mailbox`](crate::mailbox::Mailbox) drives loads and server
//! round-trips and mutates the state through it.

use crate::folder::Folder;
use crate::mail_set::MailSet;
use crate::message::{MailKey, MessageRecord};

/// One folder's messages and lifecycle state.
///
/// Soft-deleted messages stay in memory for the session in the hidden
/// set; everything else the UI may show lives in the visible set. A
/// message is never in both.
#[derive(Debug)]
pub struct FolderState {
    folder: Folder,
    visible: MailSet,
    hidden: MailSet,
    /// Whether an overview fetch has succeeded at least once. A failed
    /// load leaves this unset so the next activation retries.
    retrieved: bool,
    /// Whether an overview fetch is currently outstanding. Tracked
    /// separately from `retrieved` so a slow load cannot be doubled.
    load_pending: bool,
    active: Option<MailKey>,
    /// Transient quick-search term; cleared on deactivation.
    search_term: Option<String>,
}

impl FolderState {
    #[must_use]
    pub const fn new(folder: Folder) -> Self {
        Self {
            folder,
            visible: MailSet::new(),
            hidden: MailSet::new(),
            retrieved: false,
            load_pending: false,
            active: None,
            search_term: None,
        }
    }

    #[must_use]
    pub const fn folder(&self) -> Folder {
        self.folder
    }

    #[must_use]
    pub const fn visible(&self) -> &MailSet {
        &self.visible
    }

    #[must_use]
    pub const fn hidden(&self) -> &MailSet {
        &self.hidden
    }

    #[must_use]
    pub const fn retrieved(&self) -> bool {
        self.retrieved
    }

    /// The currently highlighted message, if any.
    #[must_use]
    pub const fn active(&self) -> Option<MailKey> {
        self.active
    }

    /// Whether activating this folder requires an overview fetch.
    #[must_use]
    pub const fn needs_load(&self) -> bool {
        self.folder.is_server_mirrored() && !self.retrieved && !self.load_pending
    }

    /// Mark an overview fetch as outstanding. Returns `false` if one
    /// already is, in which case the caller must not start another.
    pub(crate) const fn begin_load(&mut self) -> bool {
        if self.load_pending {
            return false;
        }
        self.load_pending = true;
        true
    }

    /// Settle the outstanding overview fetch.
    pub(crate) const fn finish_load(&mut self, success: bool) {
        self.load_pending = false;
        if success {
            self.retrieved = true;
        }
    }

    pub(crate) const fn visible_mut(&mut self) -> &mut MailSet {
        &mut self.visible
    }

    pub(crate) const fn hidden_mut(&mut self) -> &mut MailSet {
        &mut self.hidden
    }

    pub(crate) const fn set_active(&mut self, key: Option<MailKey>) {
        self.active = key;
    }

    /// Insert a batch of records, routing descriptors that already
    /// carry the Deleted flag into the hidden set. Duplicates are
    /// dropped. Returns the number of newly-inserted unseen visible
    /// messages.
    pub(crate) fn ingest(&mut self, records: Vec<MessageRecord>) -> usize {
        let mut newly_unseen = 0;
        for record in records {
            if record.flags().deleted {
                self.hidden.add(record);
            } else {
                let unseen = !record.flags().seen;
                if self.visible.add(record).is_none() && unseen {
                    newly_unseen += 1;
                }
            }
        }
        newly_unseen
    }

    /// The member to highlight once the one under `key` leaves the
    /// visible list.
    #[must_use]
    pub fn replacement_for(&self, key: &MailKey) -> Option<MailKey> {
        self.visible.other_neighbor(key)
    }

    /// Set or clear the quick-search term applied by [`Self::filtered`].
    pub fn set_search_term(&mut self, term: Option<String>) {
        self.search_term = term.filter(|t| !t.is_empty());
    }

    /// The visible snapshot restricted to messages whose sender or
    /// subject contains the current search term, case-insensitively.
    /// Without a term this is the full visible snapshot.
    #[must_use]
    pub fn filtered(&self) -> Vec<&MessageRecord> {
        let Some(term) = self.search_term.as_deref() else {
            return self.visible.values();
        };
        let needle = term.to_lowercase();
        self.visible
            .values()
            .into_iter()
            .filter(|rec| {
                rec.header().sender.to_lowercase().contains(&needle)
                    || rec.header().subject.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Drop transient UI state when the folder stops being shown.
    pub(crate) fn deactivate(&mut self) {
        self.search_term = None;
    }
}
