//! Scripted demo session.
//!
//! Builds a creatable tag picker inside a clipping card, serves create
//! confirmations from a background task and drives the widget through
//! the events a browser host would deliver.

use std::time::Duration;

use combobox_core::dom::{Overflow, Rect};
use combobox_core::{
    Combobox, ComboboxError, ComboboxEvent, ComboboxMarkup, ConfirmationChannel, CreateReply,
    CreateRequest, DomEvent, Document, MarkupHandles, Size,
};
use tokio::sync::mpsc::UnboundedReceiver;

const CREATE_EVENT: &str = "tag_created";
const REPLY_WAIT: Duration = Duration::from_secs(2);

/// Demo host owning the document and the widget.
pub struct DemoApp {
    doc: Document,
    handles: MarkupHandles,
    widget: Combobox,
}

impl DemoApp {
    /// Build the page, mount the widget and start the confirmation server.
    pub fn new() -> Result<Self, ComboboxError> {
        let mut doc = Document::new(Size::new(1400.0, 900.0));

        let card = doc.create_element("div");
        doc.add_class(card, "card");
        doc.set_overflow(card, Overflow::Hidden, Overflow::Auto);
        doc.append_child(doc.body(), card);

        let handles = ComboboxMarkup::new("tags")
            .multiple(true)
            .placeholder("Pick tags...")
            .group("Systems", [("rust", "Rust"), ("zig", "Zig"), ("c", "C")])
            .group("Web", [("typescript", "TypeScript"), ("elixir", "Elixir")])
            .selected_option("go", "Go")
            .creatable(Some("Create"))
            .on_create(CREATE_EVENT)
            .build(&mut doc, card);
        doc.set_rect(handles.trigger, Rect::new(120.0, 640.0, 360.0, 40.0));
        doc.set_rect(handles.panel, Rect::new(0.0, 0.0, 360.0, 280.0));

        let mut widget = Combobox::mount(&mut doc, handles.root)?;
        widget.subscribe(log_event);

        let (channel, requests) = ConfirmationChannel::new();
        widget.attach_confirmation(channel);
        tokio::spawn(serve_confirmations(requests));

        Ok(Self { doc, handles, widget })
    }

    /// Run the scripted interaction.
    pub async fn run(&mut self) -> Result<(), ComboboxError> {
        self.click(self.handles.trigger);
        tracing::info!(
            portaled = self.widget.portal_state().is_active(),
            top = ?self.doc.style(self.handles.panel, "top"),
            "Panel open"
        );

        self.type_query("ru");
        self.press("ArrowDown");
        self.press("ArrowUp");
        self.press("Enter");

        self.type_query("Kotlin");
        self.press("Enter");
        self.await_replies().await;

        self.type_query("Bad Tag");
        self.press("Enter");
        self.await_replies().await;
        if let Some(banner) = self.widget.error_banner() {
            tracing::info!(message = %self.doc.text_content(banner), "Create rejected");
        }

        self.press("Escape");

        let values = self.widget.selected_values(&self.doc);
        let summary = serde_json::to_string(&values)?;
        tracing::info!(%summary, "Final selection");
        println!("{summary}");
        Ok(())
    }

    /// Tear the widget down.
    pub fn shutdown(self) {
        let Self { mut doc, widget, .. } = self;
        widget.dispose(&mut doc);
        tracing::info!(listeners = doc.listener_count(), "Demo finished");
    }

    fn click(&mut self, target: combobox_core::NodeId) {
        self.widget.handle_event(&mut self.doc, &DomEvent::click(target));
    }

    fn type_query(&mut self, text: &str) {
        let Some(search) = self.handles.search else {
            return;
        };
        self.doc.set_value(search, text);
        self.widget.handle_event(&mut self.doc, &DomEvent::input(search));
    }

    fn press(&mut self, key: &str) {
        let target = self.doc.focused();
        self.widget.handle_event(&mut self.doc, &DomEvent::key_down(target, key));
    }

    async fn await_replies(&mut self) {
        let wait = async {
            while self.widget.pending_replies() > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
                self.widget.process_replies(&mut self.doc);
            }
        };
        if tokio::time::timeout(REPLY_WAIT, wait).await.is_err() {
            tracing::warn!(pending = self.widget.pending_replies(), "Timed out waiting for replies");
        }
    }
}

fn log_event(event: &ComboboxEvent) {
    tracing::info!(?event, "Combobox event");
}

/// Confirm created tags: slug the value, keep the typed text as the label
/// and refuse anything with whitespace.
async fn serve_confirmations(mut requests: UnboundedReceiver<CreateRequest>) {
    while let Some(request) = requests.recv().await {
        match request.to_json() {
            Ok(body) => tracing::info!(id = %request.id(), event = request.event(), %body, "Create request"),
            Err(e) => tracing::warn!(error = %e, "Unserializable create request"),
        }

        let typed = request.payload().value.clone();
        let reply = if typed.chars().any(char::is_whitespace) {
            CreateReply::rejected("Tags cannot contain spaces")
        } else {
            let slug = typed.to_lowercase();
            CreateReply::canonical(Some(&slug), Some(&typed))
        };
        request.respond(reply);
    }
}
