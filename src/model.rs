//! Wire model for the webmail backend
//!
//! Serde types mirroring the JSON the backend exchanges with the
//! client: message descriptors returned by overview fetches and polls,
//! content parts returned by content fetches, and the payloads for
//! sending mail and user bootstrap. Field casing follows the backend
//! exactly (PascalCase for descriptors, lowercase for send/user info).

use crate::flag::FlagSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Header block of a message descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailHeader {
    pub date: DateTime<Utc>,
    /// Server-side mailbox the message resides in. May lag the
    /// client's view while a move request is outstanding.
    pub folder: String,
    #[serde(default)]
    pub size: u64,
    pub sender: String,
    pub receiver: String,
    pub subject: String,
    /// Spam likelihood reported by the server-side filter; values
    /// above the configured threshold route the message to Spam.
    #[serde(default)]
    pub spam_indicator: u32,
    /// Raw MIME header map as parsed by the server. Opaque to the
    /// client; kept for display/debugging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_header: Option<serde_json::Value>,
}

/// One message as returned by `fetch_overview` and `poll_new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageDescriptor {
    #[serde(rename = "UID")]
    pub uid: u32,
    pub header: MailHeader,
    pub flags: FlagSet,
}

/// One body part of a message, keyed by content type in the content
/// fetch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContentPart {
    #[serde(default)]
    pub charset: String,
    #[serde(default)]
    pub encoding: String,
    pub body: String,
}

/// Payload for sending a new message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Response of the user bootstrap request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub email: String,
}
