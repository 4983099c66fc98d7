//! Per-selection session state and the read-receipt poller.
//!
//! Message numbers are the 1-based positions of messages in the order they
//! were displayed since the chat was selected. A number, once handed out,
//! keeps pointing at the same message until the next chat switch; deleted
//! messages leave a tombstone rather than shifting later numbers.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::messenger::Messenger;
use crate::observability::{RECEIPT_POLL_ERRORS, RECEIPT_POLLS};
use crate::types::{Chat, ChatId, Message, MessageId};

/// How often the poller refreshes read receipts.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// How many recent messages each poll looks at.
pub const RECEIPT_POLL_WINDOW: usize = 30;

/// What is known about an outgoing message having been read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptStatus {
    pub read: bool,
    /// Group members who saw the message, when the messenger reports them.
    pub readers: Option<Vec<String>>,
}

/// Read receipts shared between the interactive loop and the poller.
#[derive(Debug, Clone, Default)]
pub struct ReadReceipts {
    inner: Arc<Mutex<HashMap<(ChatId, MessageId), ReceiptStatus>>>,
}

impl ReadReceipts {
    /// Records the receipt carried by `message`; incoming messages are ignored.
    pub fn record(&self, message: &Message) {
        if !message.outgoing {
            return;
        }
        self.lock().insert(
            (message.chat_id, message.id),
            ReceiptStatus {
                read: message.read,
                readers: message.readers.clone(),
            },
        );
    }

    pub fn get(&self, chat: ChatId, id: MessageId) -> Option<ReceiptStatus> {
        self.lock().get(&(chat, id)).cloned()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(ChatId, MessageId), ReceiptStatus>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// State of the current chat selection.
#[derive(Debug)]
pub struct SessionState {
    chat: Option<Chat>,
    messages: Vec<MessageId>,
    deleted: HashSet<MessageId>,
    media: Vec<MessageId>,
    receipts: ReadReceipts,
    current: watch::Sender<Option<ChatId>>,
}

impl SessionState {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            chat: None,
            messages: Vec::new(),
            deleted: HashSet::new(),
            media: Vec::new(),
            receipts: ReadReceipts::default(),
            current,
        }
    }

    /// The selected chat.
    pub fn current(&self) -> Option<&Chat> {
        self.chat.as_ref()
    }

    /// Switches to `chat`, forgetting every number and receipt.
    pub fn select(&mut self, chat: Chat) {
        self.messages.clear();
        self.deleted.clear();
        self.media.clear();
        self.receipts.clear();
        let id = chat.id;
        self.chat = Some(chat);
        self.current.send_replace(Some(id));
    }

    /// Receipts of the current selection.
    pub fn receipts(&self) -> &ReadReceipts {
        &self.receipts
    }

    /// Follows the selected chat id.
    pub fn subscribe(&self) -> watch::Receiver<Option<ChatId>> {
        self.current.subscribe()
    }

    /// Starts a fresh history display: numbering restarts at 1 in display
    /// order. Tombstones and receipts of the selection are kept.
    pub fn begin_display(&mut self) {
        self.messages.clear();
        self.media.clear();
    }

    /// Gives `message` its number, reusing the one it already has.
    ///
    /// Media messages also get a media number, and outgoing messages update
    /// the receipt map.
    pub fn record(&mut self, message: &Message) -> usize {
        if message.media.is_some() && !self.media.contains(&message.id) {
            self.media.push(message.id);
        }
        if message.outgoing && self.chat.as_ref().is_some_and(|c| c.id == message.chat_id) {
            self.receipts.record(message);
        }
        match self.messages.iter().position(|id| *id == message.id) {
            Some(idx) => idx + 1,
            None => {
                self.messages.push(message.id);
                self.messages.len()
            }
        }
    }

    /// The message behind `number`, or `None` when the number was never handed out.
    pub fn message_id(&self, number: usize) -> Option<MessageId> {
        number
            .checked_sub(1)
            .and_then(|idx| self.messages.get(idx))
            .copied()
    }

    /// Marks a message as deleted; its number is not reused.
    pub fn tombstone(&mut self, id: MessageId) {
        self.deleted.insert(id);
    }

    pub fn is_deleted(&self, id: MessageId) -> bool {
        self.deleted.contains(&id)
    }

    /// The message behind media number `number`.
    pub fn media_id(&self, number: usize) -> Option<MessageId> {
        number
            .checked_sub(1)
            .and_then(|idx| self.media.get(idx))
            .copied()
    }

    /// The media number of `id`, if it has one.
    pub fn media_number(&self, id: MessageId) -> Option<usize> {
        self.media.iter().position(|m| *m == id).map(|idx| idx + 1)
    }

    /// Number the next new message will get.
    pub fn next_number(&self) -> usize {
        self.messages.len() + 1
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one receipt refresh for the chat `current` names.
///
/// Receipts are written only while that chat is still selected. Returns the
/// number of receipts written.
pub async fn poll_receipts<M: Messenger + ?Sized>(
    client: &M,
    receipts: &ReadReceipts,
    current: &watch::Receiver<Option<ChatId>>,
) -> Result<usize> {
    let selected = *current.borrow();
    let Some(chat) = selected else {
        return Ok(0);
    };
    let history = client.history(chat, RECEIPT_POLL_WINDOW).await?;
    let still_selected = *current.borrow() == Some(chat);
    if !still_selected {
        return Ok(0);
    }
    let mut written = 0;
    for message in history.iter().filter(|m| m.outgoing && m.chat_id == chat) {
        receipts.record(message);
        written += 1;
    }
    Ok(written)
}

/// Spawns the background task that refreshes receipts every
/// [`RECEIPT_POLL_INTERVAL`]. The task ends when the session is dropped or
/// the handle is aborted.
pub fn spawn_receipt_poller<M: Messenger>(
    client: Arc<M>,
    receipts: ReadReceipts,
    current: watch::Receiver<Option<ChatId>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(RECEIPT_POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if current.has_changed().is_err() {
                break;
            }
            RECEIPT_POLLS.click();
            if let Err(err) = poll_receipts(&*client, &receipts, &current).await {
                RECEIPT_POLL_ERRORS.click();
                tracing::warn!(error = %err, "read receipt poll failed");
            }
        }
    })
}
