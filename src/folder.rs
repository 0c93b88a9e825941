//! Mailbox folder types
//!
//! The folder set is fixed: three server-mirrored folders (Inbox, Sent,
//! Trash) and one client-local pseudo-folder (Spam). Spam messages are
//! physically stored in the Inbox mailbox on the server and only
//! partitioned out on the client, so Spam has no server-side name of
//! its own.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// A mailbox folder.
///
/// Folder variants differ in behavior, not in type: whether a folder is
/// mirrored on the server, which server-side mailbox backs it, and
/// whether incoming batches are screened for spam are all plain
/// per-variant properties.
///
/// # Examples
///
/// ```
/// use webmail_client::Folder;
///
/// assert_eq!(Folder::Inbox.server_name(), "INBOX");
/// // Spam lives in the Inbox mailbox on the server.
/// assert_eq!(Folder::Spam.server_name(), "INBOX");
/// assert!(Folder::Spam.is_local());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Folder {
    /// Incoming messages.
    Inbox,
    /// Sent messages.
    Sent,
    /// Deleted messages.
    Trash,
    /// Messages classified as spam. Client-side only.
    Spam,
}

impl Folder {
    /// All configured folders, in navigation order.
    pub const ALL: [Self; 4] = [Self::Inbox, Self::Sent, Self::Spam, Self::Trash];

    /// The stable client-side key for this folder.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::Sent => "Sent",
            Self::Trash => "Trash",
            Self::Spam => "Spam",
        }
    }

    /// The human-readable label shown in navigation.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        self.as_str()
    }

    /// The server-side mailbox backing this folder.
    ///
    /// For the client-local Spam folder this is the mailbox its
    /// messages physically reside in, so server operations against a
    /// spam message target the right place.
    #[must_use]
    pub const fn server_name(self) -> &'static str {
        match self {
            Self::Inbox | Self::Spam => "INBOX",
            Self::Sent => "Sent",
            Self::Trash => "Trash",
        }
    }

    /// Whether this folder exists only on the client.
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Spam)
    }

    /// Whether activating this folder may trigger an overview fetch.
    #[must_use]
    pub const fn is_server_mirrored(self) -> bool {
        !self.is_local()
    }

    /// Whether message batches entering this folder are screened for
    /// spam before insertion.
    #[must_use]
    pub const fn screens_spam(self) -> bool {
        matches!(self, Self::Inbox)
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Folder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("inbox") {
            return Ok(Self::Inbox);
        }
        match s {
            "Sent" => Ok(Self::Sent),
            "Trash" => Ok(Self::Trash),
            "Spam" => Ok(Self::Spam),
            other => Err(Error::UnknownFolder(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_names() {
        assert_eq!(Folder::Inbox.server_name(), "INBOX");
        assert_eq!(Folder::Sent.server_name(), "Sent");
        assert_eq!(Folder::Trash.server_name(), "Trash");
    }

    #[test]
    fn spam_resolves_to_inbox_mailbox() {
        assert_eq!(Folder::Spam.server_name(), "INBOX");
        assert!(Folder::Spam.is_local());
        assert!(!Folder::Spam.is_server_mirrored());
    }

    #[test]
    fn only_inbox_screens_spam() {
        assert!(Folder::Inbox.screens_spam());
        assert!(!Folder::Sent.screens_spam());
        assert!(!Folder::Trash.screens_spam());
        assert!(!Folder::Spam.screens_spam());
    }

    #[test]
    fn from_str_inbox_case_insensitive() {
        assert_eq!("inbox".parse::<Folder>().unwrap(), Folder::Inbox);
        assert_eq!("INBOX".parse::<Folder>().unwrap(), Folder::Inbox);
    }

    #[test]
    fn from_str_rejects_unknown_names() {
        let err = "Archive".parse::<Folder>().unwrap_err();
        assert!(matches!(err, Error::UnknownFolder(name) if name == "Archive"));
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", Folder::Spam), "Spam");
    }
}
