//! Scripted in-process backend for integration testing
//!
//! Implements [`SyncClient`] over shared in-memory state: folder
//! overviews, content parts, and queued poll batches are seeded
//! through [`BackendBuilder`]; failures are injected per operation at
//! runtime. Every write-side call is recorded so tests can assert on
//! the exact requests the mailbox issued.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use webmail_client::{
    ContentPart, Error, FlagSet, MailHeader, MessageDescriptor, OutgoingMail, Result, SyncClient,
    UserInfo,
};

/// A recorded flag-update request.
#[derive(Debug, Clone)]
pub struct FlagCall {
    pub folder: String,
    pub uid: u32,
    pub add: bool,
    pub flags: FlagSet,
}

/// A recorded move request.
#[derive(Debug, Clone)]
pub struct MoveCall {
    pub uid: u32,
    pub orig_folder: String,
    pub target_folder: String,
}

#[derive(Default)]
struct Inner {
    overviews: HashMap<String, Vec<MessageDescriptor>>,
    contents: HashMap<(u32, String), HashMap<String, ContentPart>>,
    poll_batches: VecDeque<Vec<MessageDescriptor>>,

    fail_overview: bool,
    fail_content: bool,
    fail_flag_updates: bool,
    fail_moves: bool,
    session_expired: bool,

    overview_calls: Vec<String>,
    content_calls: Vec<u32>,
    flag_calls: Vec<FlagCall>,
    move_calls: Vec<MoveCall>,
    sent: Vec<OutgoingMail>,
}

/// Handle to the scripted backend. Clones share state, so tests keep
/// one handle for assertions while the mailbox owns another.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<Inner>>,
}

impl FakeBackend {
    pub fn set_fail_overview(&self, fail: bool) {
        self.inner.lock().unwrap().fail_overview = fail;
    }

    pub fn set_fail_content(&self, fail: bool) {
        self.inner.lock().unwrap().fail_content = fail;
    }

    pub fn set_fail_flag_updates(&self, fail: bool) {
        self.inner.lock().unwrap().fail_flag_updates = fail;
    }

    pub fn set_fail_moves(&self, fail: bool) {
        self.inner.lock().unwrap().fail_moves = fail;
    }

    pub fn set_session_expired(&self, expired: bool) {
        self.inner.lock().unwrap().session_expired = expired;
    }

    pub fn overview_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().overview_calls.clone()
    }

    pub fn content_calls(&self) -> Vec<u32> {
        self.inner.lock().unwrap().content_calls.clone()
    }

    pub fn flag_calls(&self) -> Vec<FlagCall> {
        self.inner.lock().unwrap().flag_calls.clone()
    }

    pub fn move_calls(&self) -> Vec<MoveCall> {
        self.inner.lock().unwrap().move_calls.clone()
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.inner.lock().unwrap().sent.clone()
    }
}

impl SyncClient for FakeBackend {
    async fn fetch_overview(&self, mailbox: &str) -> Result<Vec<MessageDescriptor>> {
        let mut inner = self.inner.lock().unwrap();
        inner.overview_calls.push(mailbox.to_string());
        if inner.fail_overview {
            return Err(Error::Transport("overview fetch refused".to_string()));
        }
        Ok(inner.overviews.get(mailbox).cloned().unwrap_or_default())
    }

    async fn fetch_content(&self, uid: u32, folder: &str) -> Result<HashMap<String, ContentPart>> {
        let mut inner = self.inner.lock().unwrap();
        inner.content_calls.push(uid);
        if inner.fail_content {
            return Err(Error::Transport("content fetch refused".to_string()));
        }
        inner
            .contents
            .get(&(uid, folder.to_string()))
            .cloned()
            .ok_or_else(|| Error::Transport(format!("no content for UID {uid} in {folder}")))
    }

    async fn poll_new(&self) -> Result<Vec<MessageDescriptor>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.session_expired {
            return Err(Error::SessionExpired);
        }
        Ok(inner.poll_batches.pop_front().unwrap_or_default())
    }

    async fn update_flags(&self, folder: &str, uid: u32, add: bool, flags: FlagSet) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.flag_calls.push(FlagCall {
            folder: folder.to_string(),
            uid,
            add,
            flags,
        });
        if inner.fail_flag_updates {
            return Err(Error::Transport("flag update refused".to_string()));
        }
        Ok(())
    }

    async fn move_message(&self, uid: u32, orig_folder: &str, target_folder: &str) -> Result<u32> {
        let mut inner = self.inner.lock().unwrap();
        inner.move_calls.push(MoveCall {
            uid,
            orig_folder: orig_folder.to_string(),
            target_folder: target_folder.to_string(),
        });
        if inner.fail_moves {
            return Err(Error::Transport("move refused".to_string()));
        }
        // The server assigns a fresh UID in the target mailbox.
        Ok(uid + 1000)
    }

    async fn send_message(&self, mail: &OutgoingMail) -> Result<()> {
        self.inner.lock().unwrap().sent.push(mail.clone());
        Ok(())
    }

    async fn user_info(&self) -> Result<UserInfo> {
        Ok(UserInfo {
            email: "testuser@example.com".to_string(),
        })
    }
}

/// Builder seeding the backend's scripted responses.
#[derive(Default)]
pub struct BackendBuilder {
    inner: Inner,
}

impl BackendBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one overview descriptor for a server-side mailbox.
    pub fn message(mut self, mailbox: &str, descriptor: MessageDescriptor) -> Self {
        self.inner
            .overviews
            .entry(mailbox.to_string())
            .or_default()
            .push(descriptor);
        self
    }

    /// Seed a `text/plain` body part for one message.
    pub fn plain_content(mut self, mailbox: &str, uid: u32, body: &str) -> Self {
        self.inner
            .contents
            .entry((uid, mailbox.to_string()))
            .or_default()
            .insert(
                "text/plain".to_string(),
                ContentPart {
                    charset: "utf-8".to_string(),
                    encoding: String::new(),
                    body: body.to_string(),
                },
            );
        self
    }

    /// Queue one poll response batch.
    pub fn poll_batch(mut self, batch: Vec<MessageDescriptor>) -> Self {
        self.inner.poll_batches.push_back(batch);
        self
    }

    pub fn build(self) -> FakeBackend {
        FakeBackend {
            inner: Arc::new(Mutex::new(self.inner)),
        }
    }
}

/// A descriptor with the given identity, dated `2024-03-01 {hour}:00`.
pub fn descriptor(mailbox: &str, uid: u32, hour: u32, seen: bool) -> MessageDescriptor {
    descriptor_at(
        mailbox,
        uid,
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
        seen,
    )
}

pub fn descriptor_at(
    mailbox: &str,
    uid: u32,
    date: DateTime<Utc>,
    seen: bool,
) -> MessageDescriptor {
    MessageDescriptor {
        uid,
        header: MailHeader {
            date,
            folder: mailbox.to_string(),
            size: 512,
            sender: format!("sender{uid}@example.com"),
            receiver: "testuser@example.com".to_string(),
            subject: format!("Message {uid}"),
            spam_indicator: 0,
            mime_header: None,
        },
        flags: FlagSet {
            seen,
            ..FlagSet::default()
        },
    }
}

/// Like [`descriptor`] but carrying a positive spam indicator.
pub fn spam_descriptor(uid: u32, hour: u32, indicator: u32) -> MessageDescriptor {
    let mut desc = descriptor("INBOX", uid, hour, false);
    desc.header.spam_indicator = indicator;
    desc
}
