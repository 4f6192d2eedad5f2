//! Create flow: optimistic insert, confirmation bookkeeping, error banner.
//!
//! The widget drives the sequence (append, render, rebind, select, notify).
//! This module owns the parts that outlive a single turn: the confirmation
//! channel, the replies still in flight and the rejection banner.

use uuid::Uuid;

use crate::channel::{ConfirmationChannel, CreatePayload, CreateReply, PendingReply, ReplyPoll};
use crate::dom::{Document, EventKind, ListenerId, ListenerTarget, NodeId, Selector};
use crate::filter::NO_RESULTS_CLASS;
use crate::model::SelectionModel;
use crate::registry::render_row;

/// Class of the rejection banner.
pub const ERROR_BANNER_CLASS: &str = "combobox-create-error";

/// Verdict on a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateCheck {
    /// Nothing left after trimming.
    Empty,
    /// An option with this value exists, ignoring case.
    Duplicate,
    /// Go ahead with the trimmed text.
    Accept(String),
}

/// Decide whether `raw` may become a new option.
pub fn check(doc: &Document, model: &SelectionModel, raw: &str) -> CreateCheck {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        CreateCheck::Empty
    } else if model.contains_value_ci(doc, trimmed) {
        CreateCheck::Duplicate
    } else {
        CreateCheck::Accept(trimmed.to_string())
    }
}

/// An optimistically created option: the store entry and its row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOption {
    pub value: String,
    pub option: NodeId,
    pub row: NodeId,
}

impl CreatedOption {
    /// Whether the very option created is still in the store under the
    /// value it was created with.
    pub fn is_live(&self, doc: &Document, model: &SelectionModel) -> bool {
        model.entry_of(doc, self.option).is_some_and(|entry| entry.value == self.value)
    }
}

/// A reply ready to apply to the option it was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyReply {
    pub created: CreatedOption,
    pub reply: CreateReply,
}

#[derive(Debug)]
struct InFlight {
    created: CreatedOption,
    reply: PendingReply,
}

/// Create-flow state of one widget.
#[derive(Debug, Default)]
pub struct CreateFlow {
    channel: Option<ConfirmationChannel>,
    pending: Vec<InFlight>,
    banner: Option<(NodeId, ListenerId)>,
}

impl CreateFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route confirmation requests through `channel`.
    pub fn attach(&mut self, channel: ConfirmationChannel) {
        self.channel = Some(channel);
    }

    /// Replies still outstanding.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Build the row for a created option with a fresh id.
    pub fn build_row(doc: &mut Document, widget_id: &str, value: &str) -> NodeId {
        let id = format!("{widget_id}-created-{}", Uuid::new_v4().simple());
        render_row(doc, Some(&id), value, value)
    }

    /// Place `row` before the create-row, else before the empty-result
    /// indicator, else at the end of the panel.
    pub fn insert_row(doc: &mut Document, panel: NodeId, create_row: Option<NodeId>, row: NodeId) {
        let anchor = create_row
            .filter(|c| doc.parent(*c).is_some())
            .or_else(|| doc.query(panel, Selector::Class(NO_RESULTS_CLASS)));

        match anchor.and_then(|a| doc.parent(a).map(|p| (p, a))) {
            Some((parent, anchor)) => doc.insert_before(parent, row, anchor),
            None => doc.append_child(panel, row),
        }
    }

    /// Ask for confirmation of `created`. Without a channel or event name
    /// this does nothing. A closed channel is logged and absorbed.
    pub fn dispatch(&mut self, widget_id: &str, event: Option<&str>, created: &CreatedOption) -> bool {
        let (Some(channel), Some(event)) = (&self.channel, event) else {
            return false;
        };
        let payload =
            CreatePayload { widget_id: widget_id.to_string(), value: created.value.clone() };
        match channel.dispatch(event, payload) {
            Ok(reply) => {
                self.pending.push(InFlight { created: created.clone(), reply });
                true
            }
            Err(e) => {
                tracing::warn!(widget_id, value = %created.value, error = %e, "Create confirmation not sent");
                false
            }
        }
    }

    /// Collect every reply that has arrived. Abandoned requests are dropped.
    pub fn take_ready(&mut self) -> Vec<ReadyReply> {
        let mut ready = Vec::new();
        self.pending.retain_mut(|in_flight| match in_flight.reply.try_take() {
            ReplyPoll::Pending => true,
            ReplyPoll::Ready(reply) => {
                ready.push(ReadyReply { created: in_flight.created.clone(), reply });
                false
            }
            ReplyPoll::Abandoned => {
                tracing::debug!(
                    request_id = %in_flight.reply.request_id(),
                    value = in_flight.reply.value(),
                    "Create confirmation abandoned"
                );
                false
            }
        });
        ready
    }

    /// Show `message` below the search field's wrapper, or at the top of the
    /// panel when there is no search field. Replaces any previous banner.
    pub fn show_banner(
        &mut self,
        doc: &mut Document,
        panel: NodeId,
        search: Option<NodeId>,
        message: &str,
    ) -> NodeId {
        self.clear_banner(doc);

        let banner = doc.create_element("div");
        doc.add_class(banner, ERROR_BANNER_CLASS);
        doc.set_attr(banner, "role", "alert");
        doc.set_text(banner, message);

        let placed = search
            .and_then(|s| doc.parent(s))
            .is_some_and(|wrapper| doc.insert_after(wrapper, banner));
        if !placed {
            doc.prepend_child(panel, banner);
        }

        let listener =
            doc.add_listener(ListenerTarget::Node(banner), EventKind::Click, Default::default());
        self.banner = Some((banner, listener));
        banner
    }

    /// Remove the banner if shown.
    pub fn clear_banner(&mut self, doc: &mut Document) {
        if let Some((banner, listener)) = self.banner.take() {
            doc.remove_listener(listener);
            doc.remove(banner);
        }
    }

    pub fn banner(&self) -> Option<NodeId> {
        self.banner.map(|(banner, _)| banner)
    }

    /// Whether `listener` is the banner's dismiss listener.
    pub fn is_banner_listener(&self, listener: ListenerId) -> bool {
        self.banner.is_some_and(|(_, l)| l == listener)
    }
}
