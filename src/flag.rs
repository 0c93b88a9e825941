//! IMAP message flags
//!
//! Provides a strongly-typed enum for the standard system flags plus the
//! [`FlagSet`] carried by every message. `FlagSet` doubles as the wire
//! form: the backend serializes flags as a JSON object with PascalCase
//! boolean fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An IMAP message flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Message has been read (`\Seen`).
    Seen,
    /// Message is marked for deletion (`\Deleted`).
    Deleted,
    /// Message has been answered (`\Answered`).
    Answered,
    /// Message is flagged for attention (`\Flagged`).
    Flagged,
    /// Message is a draft (`\Draft`).
    Draft,
    /// Message recently arrived in its mailbox (`\Recent`).
    Recent,
}

impl Flag {
    /// The IMAP wire representation of this flag, including the
    /// leading backslash.
    #[must_use]
    pub const fn as_imap_str(self) -> &'static str {
        match self {
            Self::Seen => "\\Seen",
            Self::Deleted => "\\Deleted",
            Self::Answered => "\\Answered",
            Self::Flagged => "\\Flagged",
            Self::Draft => "\\Draft",
            Self::Recent => "\\Recent",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_imap_str())
    }
}

/// The full flag state of one message.
///
/// Field names serialize in PascalCase to match the backend's message
/// descriptors and flag-update requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FlagSet {
    pub seen: bool,
    pub deleted: bool,
    pub answered: bool,
    pub flagged: bool,
    pub draft: bool,
    pub recent: bool,
}

impl FlagSet {
    /// A set with exactly one flag raised, as sent in flag-update
    /// requests.
    #[must_use]
    pub fn only(flag: Flag) -> Self {
        let mut set = Self::default();
        set.set(flag, true);
        set
    }

    #[must_use]
    pub const fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Seen => self.seen,
            Flag::Deleted => self.deleted,
            Flag::Answered => self.answered,
            Flag::Flagged => self.flagged,
            Flag::Draft => self.draft,
            Flag::Recent => self.recent,
        }
    }

    pub const fn set(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::Seen => self.seen = value,
            Flag::Deleted => self.deleted = value,
            Flag::Answered => self.answered = value,
            Flag::Flagged => self.flagged = value,
            Flag::Draft => self.draft = value,
            Flag::Recent => self.recent = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_flags() {
        assert_eq!(Flag::Seen.as_imap_str(), "\\Seen");
        assert_eq!(Flag::Deleted.as_imap_str(), "\\Deleted");
        assert_eq!(Flag::Recent.as_imap_str(), "\\Recent");
    }

    #[test]
    fn only_raises_a_single_flag() {
        let set = FlagSet::only(Flag::Answered);
        assert!(set.answered);
        assert!(!set.seen);
        assert!(!set.deleted);
    }

    #[test]
    fn get_reflects_set() {
        let mut set = FlagSet::default();
        set.set(Flag::Flagged, true);
        assert!(set.get(Flag::Flagged));
        set.set(Flag::Flagged, false);
        assert!(!set.get(Flag::Flagged));
    }

    #[test]
    fn wire_form_is_pascal_case() {
        let json = serde_json::to_string(&FlagSet::only(Flag::Seen)).unwrap();
        assert!(json.contains("\"Seen\":true"));
        assert!(json.contains("\"Deleted\":false"));
    }
}
