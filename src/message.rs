//! In-memory message records
//!
//! A [`MessageRecord`] is the client's view of one message: the header
//! and flags from the overview descriptor, the lazily-fetched content
//! parts, and the client-side folder bookkeeping that may lag the
//! server while a move request is outstanding.

use crate::flag::FlagSet;
use crate::folder::Folder;
use crate::model::{ContentPart, MessageDescriptor};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Body returned by [`MessageRecord::get_content`] when neither the
/// requested content type nor the `text/plain` fallback exists.
pub const CONTENT_UNAVAILABLE: &str = "Sorry, no 'text/plain' content available";

/// Sort key of a message within a folder.
///
/// Orders newest-first by date. Ties are broken by UID (descending) so
/// that two messages with identical timestamps remain distinct,
/// deterministic entries instead of silently colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MailKey {
    pub date: DateTime<Utc>,
    pub uid: u32,
}

impl Ord for MailKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .date
            .cmp(&self.date)
            .then_with(|| other.uid.cmp(&self.uid))
    }
}

impl PartialOrd for MailKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One message held by a folder.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    uid: u32,
    header: crate::model::MailHeader,
    flags: FlagSet,
    /// Content type -> body part, populated on first display.
    content: HashMap<String, ContentPart>,
    content_loaded: bool,
    folder: Folder,
    previous_folder: Folder,
}

impl MessageRecord {
    /// Wrap a server descriptor into a record living in `folder`.
    #[must_use]
    pub fn new(descriptor: MessageDescriptor, folder: Folder) -> Self {
        Self {
            uid: descriptor.uid,
            header: descriptor.header,
            flags: descriptor.flags,
            content: HashMap::new(),
            content_loaded: false,
            folder,
            previous_folder: folder,
        }
    }

    #[must_use]
    pub const fn uid(&self) -> u32 {
        self.uid
    }

    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.header.date
    }

    #[must_use]
    pub const fn header(&self) -> &crate::model::MailHeader {
        &self.header
    }

    #[must_use]
    pub const fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// The folder this message belongs to in the client's view.
    #[must_use]
    pub const fn folder(&self) -> Folder {
        self.folder
    }

    /// The folder this message was in before its last move.
    #[must_use]
    pub const fn previous_folder(&self) -> Folder {
        self.previous_folder
    }

    #[must_use]
    pub const fn content_loaded(&self) -> bool {
        self.content_loaded
    }

    /// The key this record sorts under within its folder's set.
    #[must_use]
    pub const fn key(&self) -> MailKey {
        MailKey {
            date: self.header.date,
            uid: self.uid,
        }
    }

    /// The body for `content_type`, falling back to `text/plain`, then
    /// to [`CONTENT_UNAVAILABLE`]. Never fails.
    #[must_use]
    pub fn get_content(&self, content_type: &str) -> &str {
        if let Some(part) = self.content.get(content_type) {
            return &part.body;
        }
        if let Some(part) = self.content.get("text/plain") {
            return &part.body;
        }
        CONTENT_UNAVAILABLE
    }

    /// Content types with a loaded body part.
    #[must_use]
    pub fn content_types(&self) -> Vec<&str> {
        self.content.keys().map(String::as_str).collect()
    }

    /// Merge fetched body parts and mark the content loaded.
    pub fn merge_content(&mut self, parts: HashMap<String, ContentPart>) {
        self.content.extend(parts);
        self.content_loaded = true;
    }

    pub(crate) const fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.flags
    }

    /// Re-folder this record as part of a client-side move.
    pub(crate) const fn record_move(&mut self, target: Folder) {
        self.previous_folder = self.folder;
        self.folder = target;
    }

    /// Restore `previous_folder` after a reversed move.
    pub(crate) const fn restore_previous_folder(&mut self, previous: Folder) {
        self.previous_folder = previous;
    }

    /// Re-folder without touching `previous_folder`, used when spam
    /// routing assigns the client-local folder at ingest time.
    pub(crate) const fn assign_folder(&mut self, folder: Folder) {
        self.folder = folder;
        self.previous_folder = folder;
    }

    /// Apply the server-confirmed UID after a move renumbered the
    /// message.
    pub(crate) fn renumber(&mut self, new_uid: u32, server_folder: &str) {
        self.uid = new_uid;
        self.header.folder = server_folder.to_string();
    }
}
