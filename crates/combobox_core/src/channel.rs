//! Confirmation channel for created options.
//!
//! The widget sends a [`CreateRequest`] for every optimistic insert and keeps
//! the receiving half of its responder. Whoever owns the other end of the
//! channel (an application service, a server bridge) answers with a
//! [`CreateReply`]. Replies are drained on the widget's own turn, so nothing
//! here touches the document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::ComboboxError;

/// Outbound message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayload {
    /// Widget identifier (root id without the `-combo` suffix).
    pub widget_id: String,
    /// Optimistically created value.
    pub value: String,
}

/// Inbound reply. `error` wins over `value` and `label`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateReply {
    pub error: Option<String>,
    pub value: Option<String>,
    pub label: Option<String>,
}

impl CreateReply {
    /// Accept the value as typed.
    pub fn accepted() -> Self {
        Self::default()
    }

    /// Accept with canonical value and/or label.
    pub fn canonical(value: Option<&str>, label: Option<&str>) -> Self {
        Self { error: None, value: value.map(String::from), label: label.map(String::from) }
    }

    /// Reject with a message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), value: None, label: None }
    }

    /// Parse a JSON reply.
    pub fn from_json(json: &str) -> Result<Self, ComboboxError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rejection message. Empty strings count as absent.
    pub fn rejection(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    /// Canonical value. Empty strings count as absent.
    pub fn canonical_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    /// Canonical label. Empty strings count as absent.
    pub fn canonical_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.is_empty())
    }
}

/// One confirmation request with its responder.
#[derive(Debug)]
pub struct CreateRequest {
    id: Uuid,
    event: String,
    payload: CreatePayload,
    sent_at: DateTime<Utc>,
    responder: oneshot::Sender<CreateReply>,
}

impl CreateRequest {
    /// Unique request identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Configured event name.
    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn payload(&self) -> &CreatePayload {
        &self.payload
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Payload as JSON.
    pub fn to_json(&self) -> Result<String, ComboboxError> {
        Ok(serde_json::to_string(&self.payload)?)
    }

    /// Answer the request. Returns false when the widget is gone.
    pub fn respond(self, reply: CreateReply) -> bool {
        let delivered = self.responder.send(reply).is_ok();
        if !delivered {
            tracing::debug!(request_id = %self.id, "Reply dropped, widget gone");
        }
        delivered
    }
}

/// Sending half of the confirmation channel.
#[derive(Debug, Clone)]
pub struct ConfirmationChannel {
    sender: mpsc::UnboundedSender<CreateRequest>,
}

impl ConfirmationChannel {
    /// Create a channel and the receiver the host serves requests from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CreateRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Send a request and return the handle its reply arrives on.
    pub fn dispatch(
        &self,
        event: &str,
        payload: CreatePayload,
    ) -> Result<PendingReply, ComboboxError> {
        let (responder, receiver) = oneshot::channel();
        let request = CreateRequest {
            id: Uuid::new_v4(),
            event: event.to_string(),
            payload: payload.clone(),
            sent_at: Utc::now(),
            responder,
        };
        let request_id = request.id;

        self.sender
            .send(request)
            .map_err(|_| ComboboxError::channel_closed(payload.widget_id.clone()))?;

        tracing::debug!(
            request_id = %request_id,
            widget_id = %payload.widget_id,
            value = %payload.value,
            event,
            "Create confirmation dispatched"
        );
        Ok(PendingReply { request_id, value: payload.value, receiver })
    }

    /// Whether the serving end is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Outcome of polling a pending reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPoll {
    /// No reply yet.
    Pending,
    /// The reply arrived.
    Ready(CreateReply),
    /// The responder was dropped without answering.
    Abandoned,
}

/// A reply the widget is waiting for, keyed by the created value.
#[derive(Debug)]
pub struct PendingReply {
    request_id: Uuid,
    value: String,
    receiver: oneshot::Receiver<CreateReply>,
}

impl PendingReply {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Value the reply applies to.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Check for a reply without blocking.
    pub fn try_take(&mut self) -> ReplyPoll {
        match self.receiver.try_recv() {
            Ok(reply) => ReplyPoll::Ready(reply),
            Err(oneshot::error::TryRecvError::Empty) => ReplyPoll::Pending,
            Err(oneshot::error::TryRecvError::Closed) => ReplyPoll::Abandoned,
        }
    }

    /// Wait for the reply. `None` when the responder was dropped.
    pub async fn recv(self) -> Option<CreateReply> {
        self.receiver.await.ok()
    }
}
