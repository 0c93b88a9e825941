//! Backend transport contract
//!
//! [`SyncClient`] is the request/response capability the mailbox state
//! machine drives. The embedding application provides the concrete
//! transport (an HTTP client against the webmail backend); this crate
//! only defines the contract and consumes it.

use crate::error::Result;
use crate::flag::FlagSet;
use crate::model::{ContentPart, MessageDescriptor, OutgoingMail, UserInfo};
use std::collections::HashMap;

/// Asynchronous request/response transport to the mail backend.
///
/// All operations map to one backend round-trip. Implementations
/// report a session timeout on the poll endpoint as
/// [`Error::SessionExpired`](crate::Error::SessionExpired); every other
/// failure surfaces as [`Error::Transport`](crate::Error::Transport).
#[allow(async_fn_in_trait)]
pub trait SyncClient {
    /// Fetch the overview descriptors of a server-side mailbox.
    async fn fetch_overview(&self, mailbox: &str) -> Result<Vec<MessageDescriptor>>;

    /// Fetch the body parts of one message, keyed by content type.
    async fn fetch_content(&self, uid: u32, folder: &str) -> Result<HashMap<String, ContentPart>>;

    /// Poll for messages that arrived in the inbox since the last
    /// poll. Returns only the new descriptors.
    async fn poll_new(&self) -> Result<Vec<MessageDescriptor>>;

    /// Add (`add == true`) or remove the raised flags in `flags` on
    /// one message.
    async fn update_flags(&self, folder: &str, uid: u32, add: bool, flags: FlagSet) -> Result<()>;

    /// Move a message between server-side mailboxes. Returns the UID
    /// the server assigned in the target mailbox.
    async fn move_message(&self, uid: u32, orig_folder: &str, target_folder: &str) -> Result<u32>;

    /// Submit an outgoing message for delivery.
    async fn send_message(&self, mail: &OutgoingMail) -> Result<()>;

    /// Fetch the signed-in user's account information.
    async fn user_info(&self) -> Result<UserInfo>;
}
