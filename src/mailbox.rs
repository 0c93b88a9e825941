//! Mailbox coordination
//!
//! [`Mailbox`] owns the fixed folder set, tracks which folder is
//! selected, and orchestrates every server round-trip: folder loads,
//! inbox polling, optimistic flag updates, and moves with
//! rollback-on-failure. UI concerns stay outside; the embedding
//! application renders from the folder snapshots and receives
//! unread-count and compose-overlay events through
//! [`MailboxObserver`].

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::flag::{Flag, FlagSet};
use crate::folder::Folder;
use crate::mail_set::Direction;
use crate::message::{MailKey, MessageRecord};
use crate::model::{MessageDescriptor, OutgoingMail};
use crate::state::FolderState;
use crate::sync::SyncClient;
use tracing::{debug, info, warn};

/// Receiver of UI-relevant mailbox events.
///
/// All methods default to no-ops so embedders implement only what
/// they surface.
pub trait MailboxObserver {
    /// The total unread count changed (window-title/badge update).
    fn unread_changed(&self, _unread: u32) {}

    /// Any open compose overlay must be hidden.
    fn hide_compose(&self) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MailboxObserver for NoopObserver {}

/// The fixed folder set. A total mapping, so folder lookups can never
/// fail once a [`Folder`] value exists.
#[derive(Debug)]
struct Folders {
    inbox: FolderState,
    sent: FolderState,
    trash: FolderState,
    spam: FolderState,
}

impl Folders {
    const fn new() -> Self {
        Self {
            inbox: FolderState::new(Folder::Inbox),
            sent: FolderState::new(Folder::Sent),
            trash: FolderState::new(Folder::Trash),
            spam: FolderState::new(Folder::Spam),
        }
    }

    const fn get(&self, folder: Folder) -> &FolderState {
        match folder {
            Folder::Inbox => &self.inbox,
            Folder::Sent => &self.sent,
            Folder::Trash => &self.trash,
            Folder::Spam => &self.spam,
        }
    }

    const fn get_mut(&mut self, folder: Folder) -> &mut FolderState {
        match folder {
            Folder::Inbox => &mut self.inbox,
            Folder::Sent => &mut self.sent,
            Folder::Trash => &mut self.trash,
            Folder::Spam => &mut self.spam,
        }
    }
}

/// The client-side mailbox state machine.
///
/// Single-owner and `&mut`-driven: every mutation runs to completion
/// before the next starts, so a stale server response can never fire
/// against torn-down state.
pub struct Mailbox<C> {
    transport: C,
    config: ClientConfig,
    folders: Folders,
    selected: Option<Folder>,
    unread: u32,
    observer: Box<dyn MailboxObserver + Send + Sync>,
}

impl<C: SyncClient> Mailbox<C> {
    #[must_use]
    pub fn new(transport: C, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            folders: Folders::new(),
            selected: None,
            unread: 0,
            observer: Box::new(NoopObserver),
        }
    }

    /// Replace the default no-op observer.
    #[must_use]
    pub fn with_observer(mut self, observer: impl MailboxObserver + Send + Sync + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// The currently selected folder, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<Folder> {
        self.selected
    }

    /// Total number of unread messages across all folders.
    #[must_use]
    pub const fn unread(&self) -> u32 {
        self.unread
    }

    #[must_use]
    pub const fn folder(&self, folder: Folder) -> &FolderState {
        self.folders.get(folder)
    }

    /// Mutable folder access for UI-side state such as the
    /// quick-search term.
    pub const fn folder_mut(&mut self, folder: Folder) -> &mut FolderState {
        self.folders.get_mut(folder)
    }

    /// Select the folder named `name`.
    ///
    /// Reselecting the current folder is a no-op. Otherwise the
    /// current folder is deactivated, the target activated (loading
    /// it on first activation), and only then the selection pointer
    /// updated, so exactly one folder is ever mid-activation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFolder`] for names outside the
    /// configured folder set. Load failures are logged, not returned;
    /// the folder stays unretrieved and the next activation retries.
    pub async fn switch_folder(&mut self, name: &str) -> Result<()> {
        let target: Folder = name.parse()?;
        if self.selected == Some(target) {
            return Ok(());
        }
        if let Some(current) = self.selected {
            self.folders.get_mut(current).deactivate();
        }
        self.activate(target).await;
        self.selected = Some(target);
        Ok(())
    }

    async fn activate(&mut self, folder: Folder) {
        if self.folders.get(folder).needs_load() {
            if let Err(e) = self.load_folder(folder).await {
                warn!(folder = %folder, error = %e, "folder load failed, retrying on next activation");
            }
        }
    }

    /// Fetch a server-mirrored folder's overview and ingest it.
    ///
    /// No-op for client-local folders and while a load for the same
    /// folder is already outstanding. Returns the number of
    /// newly-inserted unseen messages.
    ///
    /// # Errors
    ///
    /// Returns the transport error on a failed fetch; the folder
    /// remains unretrieved so a later activation retries.
    pub async fn load_folder(&mut self, folder: Folder) -> Result<usize> {
        if folder.is_local() {
            return Ok(0);
        }
        if !self.folders.get_mut(folder).begin_load() {
            debug!(folder = %folder, "overview fetch already outstanding");
            return Ok(0);
        }
        debug!(folder = %folder, mailbox = folder.server_name(), "fetching folder overview");
        match self.transport.fetch_overview(folder.server_name()).await {
            Ok(descriptors) => {
                let newly_unseen = self.ingest(folder, descriptors);
                self.folders.get_mut(folder).finish_load(true);
                info!(folder = %folder, unseen = newly_unseen, "folder loaded");
                Ok(newly_unseen)
            }
            Err(e) => {
                self.folders.get_mut(folder).finish_load(false);
                warn!(folder = %folder, error = %e, "overview fetch failed");
                Err(e)
            }
        }
    }

    /// Poll for inbox mail that arrived since the last poll and
    /// ingest it. Returns the number of new messages.
    ///
    /// # Errors
    ///
    /// [`Error::SessionExpired`] when the server signals an expired
    /// session; any other transport error as-is.
    pub async fn poll_inbox(&mut self) -> Result<usize> {
        let descriptors = self.transport.poll_new().await?;
        let count = descriptors.len();
        if count > 0 {
            info!(count, "new inbox mail arrived");
            self.ingest(Folder::Inbox, descriptors);
        }
        Ok(count)
    }

    /// Cooperative inbox polling: sleep, poll, repeat. The next poll
    /// is only scheduled after the previous one settled, so at most
    /// one poll request is ever in flight.
    ///
    /// Stops polling on any failure. Returns `Ok(())` on transport
    /// errors (logged; the embedder may restart polling).
    ///
    /// # Errors
    ///
    /// [`Error::SessionExpired`] when the session timed out; the
    /// embedder must redirect to the login entry point.
    pub async fn run_poll_loop(&mut self) -> Result<()> {
        loop {
            tokio::time::sleep(self.config.poll_interval).await;
            match self.poll_inbox().await {
                Ok(count) => debug!(count, "inbox poll complete"),
                Err(Error::SessionExpired) => {
                    warn!("session expired during inbox poll");
                    return Err(Error::SessionExpired);
                }
                Err(e) => {
                    warn!(error = %e, "inbox poll failed, polling stopped");
                    return Ok(());
                }
            }
        }
    }

    /// Wrap descriptors into records and insert them into `folder`,
    /// partitioning spam out first where the folder screens for it.
    /// Returns the number of newly-inserted unseen messages in
    /// `folder` itself (spam routed elsewhere reports separately).
    fn ingest(&mut self, folder: Folder, descriptors: Vec<MessageDescriptor>) -> usize {
        let mut records: Vec<MessageRecord> = descriptors
            .into_iter()
            .map(|d| MessageRecord::new(d, folder))
            .collect();
        if folder.screens_spam() {
            let threshold = self.config.spam_threshold;
            let (spam, ham): (Vec<_>, Vec<_>) = records
                .into_iter()
                .partition(|r| r.header().spam_indicator > threshold);
            records = ham;
            if !spam.is_empty() {
                self.route_spam(spam);
            }
        }
        let newly_unseen = self.folders.get_mut(folder).ingest(records);
        self.note_unseen(newly_unseen, false);
        newly_unseen
    }

    /// Re-folder spam records to the client-local Spam folder and
    /// report its unread delta.
    fn route_spam(&mut self, mut records: Vec<MessageRecord>) {
        debug!(count = records.len(), "routing messages to spam");
        for record in &mut records {
            record.assign_folder(Folder::Spam);
        }
        let newly_unseen = self.folders.get_mut(Folder::Spam).ingest(records);
        self.note_unseen(newly_unseen, false);
    }

    /// Adjust the unread tally and notify the observer. Clamped at
    /// zero.
    fn note_unseen(&mut self, count: usize, was_marked_seen: bool) {
        if count == 0 {
            return;
        }
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.unread = if was_marked_seen {
            self.unread.saturating_sub(count)
        } else {
            self.unread.saturating_add(count)
        };
        self.observer.unread_changed(self.unread);
    }

    /// The folder whose visible set holds `key`, if any.
    fn locate(&self, key: MailKey) -> Option<Folder> {
        Folder::ALL
            .into_iter()
            .find(|f| self.folders.get(*f).visible().contains(&key))
    }

    /// Change one flag on a message: apply locally first, then ask
    /// the server to mirror it. A no-op if the flag already has the
    /// requested value.
    ///
    /// A rejected server update is logged and the optimistic local
    /// state kept; flag changes are never rolled back.
    ///
    /// # Errors
    ///
    /// [`Error::MissingMessage`] if `key` resolves to no visible
    /// message.
    pub async fn set_flag(&mut self, key: MailKey, flag: Flag, value: bool) -> Result<()> {
        let folder = self.locate(key).ok_or(Error::MissingMessage(key.uid))?;
        let Some(record) = self.folders.get_mut(folder).visible_mut().get_mut(&key) else {
            return Err(Error::MissingMessage(key.uid));
        };
        if record.flags().get(flag) == value {
            return Ok(());
        }
        record.flags_mut().set(flag, value);
        let uid = record.uid();
        let server_folder = record.header().folder.clone();
        debug!(uid, flag = %flag, value, "flag changed locally");
        if flag == Flag::Seen {
            self.note_unseen(1, value);
        }
        self.push_flag_update(&server_folder, uid, value, FlagSet::only(flag))
            .await;
        Ok(())
    }

    async fn push_flag_update(&self, folder: &str, uid: u32, add: bool, flags: FlagSet) {
        if let Err(e) = self.transport.update_flags(folder, uid, add, flags).await {
            // Known inconsistency window: the local change stands.
            warn!(uid, folder, error = %e, "flag update rejected by server");
        }
    }

    /// Display a message: load its content on first display, mark it
    /// seen, hide any compose overlay, and highlight it. The active
    /// pointer is updated last, even when the content fetch failed.
    ///
    /// # Errors
    ///
    /// [`Error::MissingMessage`] if `key` resolves to no visible
    /// message; the transport error if the content fetch failed (the
    /// message stays unloaded and a later display retries).
    pub async fn show_message(&mut self, key: MailKey) -> Result<()> {
        let folder = self.locate(key).ok_or(Error::MissingMessage(key.uid))?;
        let mut result = Ok(());

        let needs_content = self
            .folders
            .get(folder)
            .visible()
            .get(&key)
            .filter(|record| !record.content_loaded())
            .map(|record| (record.uid(), record.header().folder.clone()));
        if let Some((uid, server_folder)) = needs_content {
            match self.transport.fetch_content(uid, &server_folder).await {
                Ok(parts) => {
                    if let Some(record) = self.folders.get_mut(folder).visible_mut().get_mut(&key) {
                        record.merge_content(parts);
                        debug!(uid, "message content loaded");
                    }
                }
                Err(e) => {
                    warn!(uid, error = %e, "content fetch failed");
                    result = Err(e);
                }
            }
        }

        if result.is_ok() {
            if let Err(e) = self.set_flag(key, Flag::Seen, true).await {
                debug!(uid = key.uid, error = %e, "could not mark message seen");
            }
            self.observer.hide_compose();
        }

        self.folders.get_mut(folder).set_active(Some(key));
        result
    }

    /// Move the selection to the chronological neighbor of the active
    /// message in the selected folder. Returns whether the selection
    /// changed.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::show_message`] errors for the neighbor.
    pub async fn select_sibling(&mut self, direction: Direction) -> Result<bool> {
        let Some(selected) = self.selected else {
            return Ok(false);
        };
        let state = self.folders.get(selected);
        let Some(active) = state.active() else {
            return Ok(false);
        };
        let Some(next) = state.visible().neighbor(&active, direction) else {
            return Ok(false);
        };
        self.show_message(next).await?;
        Ok(true)
    }

    /// Move a message to `target`, mirroring the move on the server
    /// for server-backed targets.
    ///
    /// The client-side move happens first. If the server then rejects
    /// the move, the client-side move is reversed exactly, including
    /// restoring the pre-move previous-folder marker, and the error
    /// returned. On success the server may renumber the message; the
    /// returned key reflects the confirmed UID.
    ///
    /// # Errors
    ///
    /// [`Error::MissingMessage`] if `key` resolves to no visible
    /// message; [`Error::KeyCollision`] if the target folder already
    /// holds a message under the same sort key (the move is refused
    /// before any server round-trip and the message stays put); the
    /// transport error if the server rejected the move.
    pub async fn move_message(&mut self, key: MailKey, target: Folder) -> Result<MailKey> {
        self.transfer_message(key, target, true).await
    }

    async fn transfer_message(
        &mut self,
        key: MailKey,
        target: Folder,
        also_on_server: bool,
    ) -> Result<MailKey> {
        let source = self.locate(key).ok_or(Error::MissingMessage(key.uid))?;
        if source == target {
            return Ok(key);
        }

        let Some(mut record) = self.folders.get_mut(source).visible_mut().remove(&key) else {
            return Err(Error::MissingMessage(key.uid));
        };
        let saved_previous = record.previous_folder();
        let uid = record.uid();
        let orig_server_folder = record.header().folder.clone();
        record.record_move(target);
        if let Some(mut rejected) = self.folders.get_mut(target).visible_mut().add(record) {
            // UIDs are per-mailbox sequences, so a target-folder record
            // may legitimately share this key. Refuse the move and put
            // the message back; its source slot is still free.
            warn!(uid, from = %source, to = %target, "target already holds this key, move refused");
            rejected.record_move(source);
            rejected.restore_previous_folder(saved_previous);
            self.folders.get_mut(source).visible_mut().add(rejected);
            return Err(Error::KeyCollision(uid, target));
        }
        debug!(uid, from = %source, to = %target, "moved message client-side");

        if !also_on_server || target.is_local() {
            return Ok(key);
        }

        match self
            .transport
            .move_message(uid, &orig_server_folder, target.server_name())
            .await
        {
            Ok(new_uid) => {
                // The server renumbered the message; re-key its entry.
                let state = self.folders.get_mut(target);
                let Some(mut moved) = state.visible_mut().remove(&key) else {
                    return Ok(key);
                };
                moved.renumber(new_uid, target.server_name());
                let new_key = moved.key();
                if let Some(mut unkeyed) = state.visible_mut().add(moved) {
                    // The server-assigned UID keys an existing record.
                    // Keep the client-side key; its slot is still free.
                    warn!(uid, new_uid, to = %target, "server-assigned key already taken");
                    unkeyed.renumber(uid, target.server_name());
                    state.visible_mut().add(unkeyed);
                    return Ok(key);
                }
                if state.active() == Some(key) {
                    state.set_active(Some(new_key));
                }
                info!(uid, new_uid, to = %target, "server confirmed move");
                Ok(new_key)
            }
            Err(e) => {
                warn!(uid, to = %target, error = %e, "server rejected move, reversing");
                if let Some(mut record) = self.folders.get_mut(target).visible_mut().remove(&key) {
                    record.record_move(source);
                    record.restore_previous_folder(saved_previous);
                    self.folders.get_mut(source).visible_mut().add(record);
                }
                Err(e)
            }
        }
    }

    /// Delete the selected folder's active message.
    ///
    /// Outside Trash this highlights a replacement (older neighbor,
    /// else newer) and moves the message to Trash, server included.
    /// Inside Trash the message is soft-deleted instead: its Deleted
    /// flag is raised and it transfers from the visible to the hidden
    /// set for the rest of the session.
    ///
    /// No-op when nothing is selected or highlighted.
    ///
    /// # Errors
    ///
    /// The transport error if the server rejected the Trash move (the
    /// client-side move has been reversed by then).
    pub async fn delete_active(&mut self) -> Result<()> {
        let Some(selected) = self.selected else {
            return Ok(());
        };
        let Some(active) = self.folders.get(selected).active() else {
            return Ok(());
        };

        if selected == Folder::Trash {
            self.soft_delete_in_trash(active).await;
            return Ok(());
        }

        match self.folders.get(selected).replacement_for(&active) {
            Some(next) => {
                if let Err(e) = self.show_message(next).await {
                    warn!(error = %e, "failed to display replacement message");
                }
            }
            None => self.folders.get_mut(selected).set_active(None),
        }
        self.transfer_message(active, Folder::Trash, true)
            .await
            .map(|_| ())
    }

    async fn soft_delete_in_trash(&mut self, key: MailKey) {
        let state = self.folders.get_mut(Folder::Trash);
        let replacement = state.replacement_for(&key);
        let Some(mut record) = state.visible_mut().remove(&key) else {
            return;
        };
        record.flags_mut().set(Flag::Deleted, true);
        let uid = record.uid();
        let server_folder = record.header().folder.clone();
        // A hidden entry may already sit under this key (loaded with
        // the Deleted flag up); the live record supersedes it.
        state.hidden_mut().remove(&key);
        state.hidden_mut().add(record);
        state.set_active(replacement);
        debug!(uid, "message soft-deleted in trash");
        self.push_flag_update(&server_folder, uid, true, FlagSet::only(Flag::Deleted))
            .await;
    }

    /// Soft-delete every visible message in Trash and clear its
    /// highlight. Hidden messages are never surfaced again within the
    /// session.
    pub async fn empty_trash(&mut self) {
        let state = self.folders.get_mut(Folder::Trash);
        let records = state.visible_mut().take_all();
        state.set_active(None);
        let mut updates = Vec::with_capacity(records.len());
        for mut record in records {
            record.flags_mut().set(Flag::Deleted, true);
            updates.push((record.header().folder.clone(), record.uid()));
            state.hidden_mut().remove(&record.key());
            state.hidden_mut().add(record);
        }
        info!(count = updates.len(), "trash emptied");
        for (folder, uid) in updates {
            self.push_flag_update(&folder, uid, true, FlagSet::only(Flag::Deleted))
                .await;
        }
    }

    /// Submit an outgoing message and hide the compose overlay on
    /// success.
    ///
    /// # Errors
    ///
    /// The transport error if delivery was rejected; the compose
    /// overlay stays up so the user can retry.
    pub async fn send_message(&mut self, mail: &OutgoingMail) -> Result<()> {
        self.transport.send_message(mail).await?;
        info!(to = %mail.to, "message handed to server for delivery");
        self.observer.hide_compose();
        Ok(())
    }

    /// The signed-in user's address, for compose prefill.
    ///
    /// # Errors
    ///
    /// The transport error if the bootstrap request failed.
    pub async fn user_email(&self) -> Result<String> {
        Ok(self.transport.user_info().await?.email)
    }
}
