//! Assistant conversation state
//!
//! Owns the chat log and every reply that has been scheduled but has not
//! landed yet. A turn goes:
//!
//! ```text
//! IDLE --send(text)--> PENDING --(delay elapses)--> IDLE
//! PENDING --clear()--> IDLE   (reply cancelled, never appended)
//! IDLE --clear()--> IDLE
//! ```
//!
//! Sending while a reply is pending schedules another one. Replies land in
//! the order their delays elapse, which need not be the order they were
//! sent in.

use crate::assistant::{ReplyDelay, Responder};
use crate::scheduler::{Scheduler, TimerHandle, TimerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a chat message, derived from its creation time in
/// milliseconds and kept strictly increasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(i64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label shown above the message
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// One entry of the chat log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Time of day for the message header
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// A reply that has been scheduled and not delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResponse {
    /// Timer that will deliver the reply
    pub handle: TimerHandle,

    /// The user text being answered
    pub prompt: String,
}

impl PendingResponse {
    /// Scheduled fire time
    pub fn fire_at(&self) -> DateTime<Utc> {
        self.handle.fire_at
    }

    /// Withdraw the reply's timer
    pub fn cancel(&self, scheduler: &mut dyn Scheduler) {
        scheduler.cancel(self.handle.id);
    }
}

/// Chat log and outstanding replies
pub struct ConversationStore {
    messages: Vec<ChatMessage>,
    pending: BTreeMap<TimerId, PendingResponse>,
    scheduler: Box<dyn Scheduler>,
    responder: Box<dyn Responder>,
    delay: ReplyDelay,
    last_id: i64,
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore")
            .field("messages", &self.messages.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl ConversationStore {
    /// Create an empty conversation
    pub fn new(
        scheduler: Box<dyn Scheduler>,
        responder: Box<dyn Responder>,
        delay: ReplyDelay,
    ) -> Self {
        Self {
            messages: Vec::new(),
            pending: BTreeMap::new(),
            scheduler,
            responder,
            delay,
            last_id: i64::MIN,
        }
    }

    /// Seed an assistant message, e.g. a greeting, without scheduling
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.push(Role::Assistant, greeting.into());
        self
    }

    /// Append the user's text and schedule one assistant reply.
    /// Blank text is ignored.
    pub fn send(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        self.push(Role::User, text.to_string());

        let delay = self.delay.sample();
        let handle = self.scheduler.schedule(delay);
        log::debug!("Reply {} scheduled in {:?}", handle.id, delay);
        self.pending.insert(
            handle.id,
            PendingResponse {
                handle,
                prompt: text.to_string(),
            },
        );
    }

    /// Apply a timer that came due. Returns the appended reply, or `None`
    /// when the timer was cancelled or is unknown.
    pub fn deliver(&mut self, timer: TimerId) -> Option<&ChatMessage> {
        let Some(pending) = self.pending.remove(&timer) else {
            log::warn!("Ignoring delivery for {}, reply was cancelled", timer);
            return None;
        };

        let reply = self.responder.respond(&pending.prompt);
        self.push(Role::Assistant, reply);
        log::debug!("Reply {} delivered, {} still pending", timer, self.pending.len());
        self.messages.last()
    }

    /// Drop the whole log and cancel every pending reply
    pub fn clear(&mut self) {
        for pending in std::mem::take(&mut self.pending).into_values() {
            pending.cancel(self.scheduler.as_mut());
        }
        self.messages.clear();
        log::debug!("Conversation cleared");
    }

    /// Whether any reply is still on its way
    pub fn is_typing(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Messages in the order they were appended
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Outstanding replies, oldest timer first
    pub fn pending(&self) -> impl Iterator<Item = &PendingResponse> {
        self.pending.values()
    }

    /// Number of outstanding replies
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn push(&mut self, role: Role, content: String) {
        let timestamp = self.scheduler.now();
        let id = self.next_id(timestamp);
        self.messages.push(ChatMessage {
            id,
            role,
            content,
            timestamp,
        });
    }

    fn next_id(&mut self, timestamp: DateTime<Utc>) -> MessageId {
        let id = timestamp.timestamp_millis().max(self.last_id.saturating_add(1));
        self.last_id = id;
        MessageId(id)
    }
}
