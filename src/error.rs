//! Error types for webmail-client

use crate::folder::Folder;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The backend rejected a request or the request never completed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server signalled that the session has expired. The embedding
    /// application must redirect the user to the login entry point.
    #[error("session expired")]
    SessionExpired,

    /// A folder name outside the configured folder set was used.
    #[error("unknown folder: {0}")]
    UnknownFolder(String),

    /// A message key did not resolve to a live message, e.g. because
    /// the message was moved or soft-deleted in the meantime.
    #[error("message with UID {0} is no longer present")]
    MissingMessage(u32),

    /// A move's target folder already holds a message under the moved
    /// message's sort key. UIDs are per-mailbox sequences, so distinct
    /// messages in different folders may share a date/UID pair.
    #[error("message with UID {0} collides with an existing message in {1}")]
    KeyCollision(u32, Folder),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
