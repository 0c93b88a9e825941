//! Client-side mailbox state machine for a webmail UI
//!
//! Models what a browser-resident mail client keeps in memory: the
//! fixed folder set (Inbox, Sent, Trash, and the client-local Spam
//! folder), an ordered, duplicate-free message list per folder, and
//! the synchronization protocol with the backend (optimistic flag
//! updates, moves with rollback-on-failure, and cooperative inbox
//! polling).
//!
//! The backend transport is abstracted behind the [`SyncClient`]
//! trait; rendering and event wiring stay with the embedding
//! application, which observes unread-count and compose-overlay
//! changes through [`MailboxObserver`].

mod config;
mod error;
mod flag;
mod folder;
mod mail_set;
mod mailbox;
mod message;
mod model;
mod state;
mod sync;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use flag::{Flag, FlagSet};
pub use folder::Folder;
pub use mail_set::{Direction, MailSet};
pub use mailbox::{Mailbox, MailboxObserver, NoopObserver};
pub use message::{CONTENT_UNAVAILABLE, MailKey, MessageRecord};
pub use model::{ContentPart, MailHeader, MessageDescriptor, OutgoingMail, UserInfo};
pub use state::FolderState;
pub use sync::SyncClient;
