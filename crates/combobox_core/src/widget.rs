//! The combobox widget.
//!
//! [`Combobox`] ties the components together over a host-owned
//! [`Document`]. The host forwards every [`DomEvent`] through
//! [`Combobox::handle_event`]; each call runs to completion before
//! returning. Create confirmations arrive on a later turn and are applied by
//! [`Combobox::process_replies`]. Changes made to the backing store by
//! someone else are reconciled by [`Combobox::sync_external_mutations`].

use uuid::Uuid;

use crate::channel::{ConfirmationChannel, CreateReply};
use crate::config::ComboboxConfig;
use crate::create_flow::{self, CreateCheck, CreateFlow, CreatedOption};
use crate::dom::{
    Document, DomEvent, EventKind, ListenerId, ListenerOptions, ListenerTarget, NodeId,
    ObserverId, Selector,
};
use crate::error::ComboboxError;
use crate::events::{ComboboxEvent, EventEmitter, SubscriptionId};
use crate::filter::{CreateAffordance, FilterEngine, FilterOutcome};
use crate::model::SelectionModel;
use crate::navigation::{
    key_action, Cursor, FocusContext, KeyAction, NavScope, NavTarget, NavigationController,
};
use crate::portal::{PortalManager, PortalState};
use crate::presentation::{is_row_selected, PresentationParts, Presenter};
use crate::registry::{row_value, OptionRegistry, VALUE_ATTR};

const TRIGGER_CLASS: &str = "combobox-trigger";
const STORE_CLASS: &str = "combo-select";
const SEARCH_CLASS: &str = "combobox-search-input";

/// How a confirmation reply was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyApplied {
    /// Canonical value and/or label written over the optimistic entry.
    Confirmed,
    /// The optimistic entry was removed and the banner shown.
    RolledBack,
    /// The entry is gone; nothing to do.
    Stale,
    /// Accepted as typed.
    Unchanged,
}

/// What a click listener of ours stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ClickAction {
    Trigger,
    Row(NodeId),
    RemovePill(String),
    Create,
    Clear,
    DismissBanner,
}

/// Listeners the widget registered outside the row and pill bindings.
#[derive(Debug)]
struct WidgetListeners {
    trigger_click: ListenerId,
    trigger_key: ListenerId,
    outside_click: ListenerId,
    search_input: Option<ListenerId>,
    clear_click: Option<ListenerId>,
    create_click: Option<ListenerId>,
    document_key: Option<ListenerId>,
}

impl WidgetListeners {
    fn all(&self) -> impl Iterator<Item = ListenerId> {
        [
            Some(self.trigger_click),
            Some(self.trigger_key),
            Some(self.outside_click),
            self.search_input,
            self.clear_click,
            self.create_click,
            self.document_key,
        ]
        .into_iter()
        .flatten()
    }
}

/// A mounted combobox.
pub struct Combobox {
    widget_id: String,
    config: ComboboxConfig,
    root: NodeId,
    trigger: NodeId,
    panel: NodeId,
    search: Option<NodeId>,
    create_row: Option<NodeId>,
    open: bool,

    model: SelectionModel,
    registry: OptionRegistry,
    filter: FilterEngine,
    nav: NavigationController,
    presenter: Presenter,
    portal: PortalManager,
    create: CreateFlow,
    emitter: EventEmitter,

    observer: ObserverId,
    listeners: WidgetListeners,
}

impl Combobox {
    /// Mount on `root`, reading the create-flow configuration from the
    /// root's attributes.
    pub fn mount(doc: &mut Document, root: NodeId) -> Result<Self, ComboboxError> {
        let config = ComboboxConfig::from_attributes(doc, root);
        Self::mount_with_config(doc, root, config)
    }

    /// Mount on `root` with an explicit configuration.
    ///
    /// The trigger, backing store and panel are mandatory; every other part
    /// is optional and its feature is simply unavailable when absent.
    pub fn mount_with_config(
        doc: &mut Document,
        root: NodeId,
        config: ComboboxConfig,
    ) -> Result<Self, ComboboxError> {
        if !doc.is_connected(root) {
            return Err(ComboboxError::detached("mount root"));
        }
        let trigger = doc
            .query(root, Selector::Class(TRIGGER_CLASS))
            .ok_or_else(|| ComboboxError::missing_part("trigger"))?;
        let store = doc
            .query(root, Selector::Class(STORE_CLASS))
            .ok_or_else(|| ComboboxError::missing_part("backing store"))?;
        let panel = doc
            .query(root, Selector::Attr("data-part", "listbox"))
            .ok_or_else(|| ComboboxError::missing_part("listbox"))?;

        let search = doc.query(panel, Selector::Class(SEARCH_CLASS));
        let clear_button = doc.query(root, Selector::Attr("data-part", "clear-combobox-button"));
        let create_row = if config.creatable {
            doc.query(panel, Selector::Attr("data-part", "create-option"))
        } else {
            None
        };
        let parts = PresentationParts {
            summary: doc.query(root, Selector::Class("selected-value")),
            placeholder: doc.query(root, Selector::Class("combobox-placeholder")),
            clear_button,
        };

        let widget_id = match doc.id(root) {
            Some(id) => id.strip_suffix("-combo").unwrap_or(id).to_string(),
            None => format!("combobox-{}", Uuid::new_v4().simple()),
        };
        let trigger_id = match doc.id(trigger) {
            Some(id) => id.to_string(),
            None => {
                let id = format!("{widget_id}-trigger-{}", Uuid::new_v4().simple());
                doc.set_attr(trigger, "id", &id);
                id
            }
        };

        let listeners = WidgetListeners {
            trigger_click: doc.add_listener(
                ListenerTarget::Node(trigger),
                EventKind::Click,
                ListenerOptions::default(),
            ),
            trigger_key: doc.add_listener(
                ListenerTarget::Node(trigger),
                EventKind::KeyDown,
                ListenerOptions::default(),
            ),
            outside_click: doc.add_listener(
                ListenerTarget::Document,
                EventKind::Click,
                ListenerOptions::capture(),
            ),
            search_input: search.map(|s| {
                doc.add_listener(ListenerTarget::Node(s), EventKind::Input, Default::default())
            }),
            clear_click: clear_button.map(|b| {
                doc.add_listener(ListenerTarget::Node(b), EventKind::Click, Default::default())
            }),
            create_click: create_row.map(|c| {
                doc.add_listener(ListenerTarget::Node(c), EventKind::Click, Default::default())
            }),
            document_key: None,
        };

        let observer = doc.observe(store);
        let model = SelectionModel::new(doc, store);

        let mut widget = Self {
            widget_id,
            root,
            trigger,
            panel,
            search,
            create_row,
            open: false,
            model,
            registry: OptionRegistry::new(root),
            filter: FilterEngine::new(),
            nav: NavigationController::new(),
            presenter: Presenter::new(parts),
            portal: PortalManager::new(root, panel, trigger, trigger_id),
            create: CreateFlow::new(),
            emitter: EventEmitter::default(),
            observer,
            listeners,
            config,
        };

        widget.rebind(doc);
        widget.presenter.render(doc, &widget.model, &widget.registry);
        doc.take_records(widget.observer);

        tracing::debug!(
            widget_id = %widget.widget_id,
            multiple = widget.model.is_multiple(),
            creatable = widget.config.creatable,
            rows = widget.registry.bindings().len(),
            "Combobox mounted"
        );
        Ok(widget)
    }

    // ========== Accessors ==========

    /// Identifier sent with create confirmations.
    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn panel(&self) -> NodeId {
        self.panel
    }

    pub fn model(&self) -> &SelectionModel {
        &self.model
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn portal_state(&self) -> &PortalState {
        self.portal.state()
    }

    /// Current navigation cursor.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.nav.cursor()
    }

    /// Current filter query.
    pub fn query(&self) -> &str {
        self.filter.query()
    }

    /// Rejection banner, while shown.
    pub fn error_banner(&self) -> Option<NodeId> {
        self.create.banner()
    }

    /// Confirmations still waiting for a reply.
    pub fn pending_replies(&self) -> usize {
        self.create.pending_count()
    }

    /// Selected values in backing-store order.
    pub fn selected_values(&self, doc: &Document) -> Vec<String> {
        self.model.selected_values(doc)
    }

    // ========== Wiring ==========

    /// Receive notifications.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&ComboboxEvent) + 'static) -> SubscriptionId {
        self.emitter.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.emitter.unsubscribe(id)
    }

    /// Send create confirmations through `channel`. Requests are only sent
    /// when the configuration names an event.
    pub fn attach_confirmation(&mut self, channel: ConfirmationChannel) {
        self.create.attach(channel);
    }

    // ========== Event routing ==========

    /// Dispatch a host event. Returns whether the widget acted on it.
    pub fn handle_event(&mut self, doc: &mut Document, event: &DomEvent) -> bool {
        let route = doc.route(event);
        match event.kind {
            EventKind::Click => self.handle_click(doc, event, &route),
            EventKind::KeyDown => {
                let ours = route.iter().any(|id| {
                    *id == self.listeners.trigger_key || Some(*id) == self.listeners.document_key
                });
                match (&event.key, ours) {
                    (Some(key), true) => self.key_down(doc, key),
                    _ => false,
                }
            }
            EventKind::Input => {
                let ours = self.listeners.search_input.is_some_and(|l| route.contains(&l));
                match self.search.filter(|_| ours) {
                    Some(search) => {
                        let text = doc.value(search).to_string();
                        self.apply_query(doc, &text);
                        true
                    }
                    None => false,
                }
            }
            EventKind::Scroll | EventKind::Resize => {
                if route.iter().any(|id| self.portal.window_listener(*id).is_some()) {
                    self.update_position(doc);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn handle_click(&mut self, doc: &mut Document, event: &DomEvent, route: &[ListenerId]) -> bool {
        if self.open && route.contains(&self.listeners.outside_click) && self.is_outside(doc, event) {
            tracing::trace!(widget_id = %self.widget_id, "Outside click");
            self.close(doc, false);
            return true;
        }

        // Only the innermost listener of ours acts.
        let Some(action) = route.iter().find_map(|id| self.click_action(*id)) else {
            return false;
        };
        match action {
            ClickAction::Trigger => self.toggle_open(doc),
            ClickAction::Row(row) => self.commit_row(doc, row),
            ClickAction::RemovePill(value) => {
                self.deselect(doc, &value);
            }
            ClickAction::Create => {
                let text = self.create_text(doc);
                self.create_new_option(doc, &text);
            }
            ClickAction::Clear => self.clear_button(doc),
            ClickAction::DismissBanner => self.create.clear_banner(doc),
        }
        true
    }

    fn click_action(&self, listener: ListenerId) -> Option<ClickAction> {
        if let Some(row) = self.registry.row_for_listener(listener) {
            return Some(ClickAction::Row(row));
        }
        if let Some(value) = self.presenter.pill_for_listener(listener) {
            return Some(ClickAction::RemovePill(value.to_string()));
        }
        if self.create.is_banner_listener(listener) {
            return Some(ClickAction::DismissBanner);
        }
        if Some(listener) == self.listeners.create_click {
            return Some(ClickAction::Create);
        }
        if Some(listener) == self.listeners.clear_click {
            return Some(ClickAction::Clear);
        }
        (listener == self.listeners.trigger_click).then_some(ClickAction::Trigger)
    }

    /// Outside the root and the overlay, and not on the viewport scrollbar.
    fn is_outside(&self, doc: &Document, event: &DomEvent) -> bool {
        if let Some((x, y)) = event.position {
            let viewport = doc.viewport();
            if x >= viewport.width || y >= viewport.height {
                return false;
            }
        }
        match event.target {
            Some(target) => {
                !doc.contains(self.root, target) && !self.portal.overlay_contains(doc, target)
            }
            None => true,
        }
    }

    // ========== Open / close ==========

    /// Open the dropdown.
    pub fn open(&mut self, doc: &mut Document) {
        if self.open {
            return;
        }
        self.open = true;

        if self.portal.has_clipping_ancestor(doc) && self.portal.activate(doc) {
            self.rebind(doc);
        }
        doc.set_hidden(self.panel, false);
        doc.set_attr(self.trigger, "aria-expanded", "true");
        self.portal.update_position(doc);
        self.portal.attach_listeners(doc);
        if self.listeners.document_key.is_none() {
            self.listeners.document_key = Some(doc.add_listener(
                ListenerTarget::Document,
                EventKind::KeyDown,
                ListenerOptions::default(),
            ));
        }

        let scope = NavScope {
            registry: &self.registry,
            create_row: self.create_row,
            trigger: self.trigger,
        };
        self.nav.place_on_open(doc, &scope, is_row_selected);

        doc.focus(self.search.unwrap_or(self.trigger));

        tracing::debug!(widget_id = %self.widget_id, portaled = self.portal.is_active(), "Dropdown opened");
        self.emitter.emit(ComboboxEvent::Opened);
    }

    /// Close the dropdown. `restore_focus` moves focus back to the trigger.
    pub fn close(&mut self, doc: &mut Document, restore_focus: bool) {
        if !self.open {
            return;
        }
        self.open = false;

        doc.set_hidden(self.panel, true);
        doc.set_attr(self.trigger, "aria-expanded", "false");
        self.create.clear_banner(doc);
        self.portal.detach_listeners(doc);
        if let Some(listener) = self.listeners.document_key.take() {
            doc.remove_listener(listener);
        }
        if self.portal.deactivate(doc) {
            self.rebind(doc);
        }

        let scope = NavScope {
            registry: &self.registry,
            create_row: self.create_row,
            trigger: self.trigger,
        };
        self.nav.clear(doc, &scope);

        if restore_focus {
            doc.focus(self.trigger);
        }

        tracing::debug!(widget_id = %self.widget_id, "Dropdown closed");
        self.emitter.emit(ComboboxEvent::Closed);
    }

    /// Open when closed, close when open.
    pub fn toggle_open(&mut self, doc: &mut Document) {
        if self.open {
            self.close(doc, false);
        } else {
            self.open(doc);
        }
    }

    /// Recompute panel placement.
    pub fn update_position(&mut self, doc: &mut Document) {
        self.portal.update_position(doc);
    }

    // ========== Keyboard ==========

    /// Handle a key press. Returns whether the key was consumed.
    pub fn key_down(&mut self, doc: &mut Document, key: &str) -> bool {
        let focused = doc.focused();
        let focus = FocusContext {
            on_trigger: focused == Some(self.trigger),
            in_search: self.search.is_some() && focused == self.search,
        };
        let Some(action) = key_action(key, self.open, focus) else {
            return false;
        };
        tracing::trace!(widget_id = %self.widget_id, key, ?action, "Key action");

        let scope = NavScope {
            registry: &self.registry,
            create_row: self.create_row,
            trigger: self.trigger,
        };
        match action {
            KeyAction::Open => self.open(doc),
            KeyAction::Next => {
                self.nav.step(doc, &scope, true);
            }
            KeyAction::Previous => {
                self.nav.step(doc, &scope, false);
            }
            KeyAction::Jump(ch) => {
                self.nav.jump_to_char(doc, &scope, &ch);
            }
            KeyAction::Dismiss { restore_focus } => self.close(doc, restore_focus),
            KeyAction::Commit => match self.nav.current(doc, &scope) {
                Some(NavTarget::Create(_)) => {
                    let text = self.create_text(doc);
                    self.create_new_option(doc, &text);
                }
                Some(NavTarget::Row(row)) => self.commit_row(doc, row),
                None => {}
            },
        }
        true
    }

    /// Commit a row: toggle and stay open in multiple mode, select and close
    /// in single mode.
    fn commit_row(&mut self, doc: &mut Document, row: NodeId) {
        let value = row_value(doc, row).to_string();
        if value.is_empty() {
            return;
        }
        self.nav.remember(&value);

        if self.model.is_multiple() {
            if self.model.toggle(doc, &value).is_some() {
                self.commit(doc);
            }
            let scope = NavScope {
                registry: &self.registry,
                create_row: self.create_row,
                trigger: self.trigger,
            };
            self.nav.navigate_to(doc, &scope, NavTarget::Row(row));
            if let Some(search) = self.search {
                doc.focus(search);
            }
        } else {
            if self.model.select(doc, &value) {
                self.commit(doc);
            }
            self.close(doc, true);
        }
    }

    // ========== Selection ==========

    /// Select `value`. Absent values are ignored.
    pub fn select(&mut self, doc: &mut Document, value: &str) -> bool {
        let changed = self.model.select(doc, value);
        if changed {
            self.commit(doc);
        }
        changed
    }

    /// Toggle `value` in multiple mode.
    pub fn toggle(&mut self, doc: &mut Document, value: &str) -> Option<bool> {
        let selected = self.model.toggle(doc, value)?;
        self.commit(doc);
        Some(selected)
    }

    /// Deselect `value`.
    pub fn deselect(&mut self, doc: &mut Document, value: &str) -> bool {
        let changed = self.model.deselect(doc, value);
        if changed {
            self.commit(doc);
        }
        changed
    }

    /// Deselect everything.
    pub fn clear_all(&mut self, doc: &mut Document) -> bool {
        let changed = self.model.clear_all(doc);
        if changed {
            self.commit(doc);
        }
        changed
    }

    fn clear_button(&mut self, doc: &mut Document) {
        self.clear_all(doc);
        self.close(doc, false);
        let scope = NavScope {
            registry: &self.registry,
            create_row: self.create_row,
            trigger: self.trigger,
        };
        self.nav.reset_to_first(doc, &scope);
    }

    /// Refresh the presentation, notify once and drop the observation
    /// records our own store edits produced.
    fn commit(&mut self, doc: &mut Document) {
        self.presenter.render(doc, &self.model, &self.registry);
        doc.take_records(self.observer);
        let values = self.model.selected_values(doc);
        tracing::debug!(widget_id = %self.widget_id, ?values, "Selection changed");
        self.emitter.emit(ComboboxEvent::Changed { values });
    }

    fn rebind(&mut self, doc: &mut Document) {
        let scope = self.portal.scope();
        self.registry.rebind(doc, scope);
    }

    // ========== Filter ==========

    /// Filter rows by `text`, update the create-row, clear the rejection
    /// banner and put the cursor on the first visible row.
    pub fn apply_query(&mut self, doc: &mut Document, text: &str) -> FilterOutcome {
        let create = self
            .create_row
            .map(|row| CreateAffordance { row, label_prefix: &self.config.create_label });
        let outcome = self.filter.apply_query(doc, &self.registry, self.panel, create, text);
        self.create.clear_banner(doc);

        let scope = NavScope {
            registry: &self.registry,
            create_row: self.create_row,
            trigger: self.trigger,
        };
        self.nav.reset_to_first(doc, &scope);
        outcome
    }

    // ========== Create flow ==========

    /// Create an option from user text and select it.
    ///
    /// Empty text, duplicates (ignoring case) and non-creatable widgets are
    /// silent no-ops. Returns the created option.
    pub fn create_new_option(&mut self, doc: &mut Document, raw: &str) -> Option<CreatedOption> {
        if !self.config.creatable {
            tracing::debug!(widget_id = %self.widget_id, "Create ignored: not creatable");
            return None;
        }
        let value = match create_flow::check(doc, &self.model, raw) {
            CreateCheck::Accept(value) => value,
            verdict => {
                tracing::debug!(widget_id = %self.widget_id, ?verdict, "Create ignored");
                return None;
            }
        };

        let option = self.model.append(doc, &value, &value);
        let row = CreateFlow::build_row(doc, &self.widget_id, &value);
        CreateFlow::insert_row(doc, self.panel, self.create_row, row);
        self.rebind(doc);
        self.model.select(doc, &value);
        self.filter.clear(doc, &self.registry, self.panel, self.create_row, self.search);
        self.nav.remember(&value);
        self.commit(doc);

        tracing::debug!(widget_id = %self.widget_id, value = %value, "Option created");

        if !self.model.is_multiple() {
            self.close(doc, false);
            doc.focus(self.trigger);
        } else if self.open {
            let scope = NavScope {
                registry: &self.registry,
                create_row: self.create_row,
                trigger: self.trigger,
            };
            self.nav.navigate_to(doc, &scope, NavTarget::Row(row));
        }

        let created = CreatedOption { value, option, row };
        self.create.dispatch(&self.widget_id, self.config.on_create.as_deref(), &created);
        Some(created)
    }

    /// Text a create gesture applies to: the search field as it reads now.
    fn create_text(&self, doc: &Document) -> String {
        match self.search {
            Some(search) => doc.value(search).to_string(),
            None => self.filter.query().to_string(),
        }
    }

    /// Apply every confirmation reply that has arrived. Returns how many
    /// were applied.
    pub fn process_replies(&mut self, doc: &mut Document) -> usize {
        let ready = self.create.take_ready();
        let count = ready.len();
        for ready in ready {
            self.apply_create_reply(doc, &ready.created, &ready.reply);
        }
        count
    }

    /// Apply a confirmation reply to the option it was requested for. A
    /// reply whose option has left the store, or was renamed since, is
    /// stale, even when a newer option carries the same value.
    pub fn apply_create_reply(
        &mut self,
        doc: &mut Document,
        created: &CreatedOption,
        reply: &CreateReply,
    ) -> ReplyApplied {
        let value = created.value.as_str();
        if !created.is_live(doc, &self.model) {
            tracing::debug!(widget_id = %self.widget_id, value, "Stale create reply ignored");
            return ReplyApplied::Stale;
        }

        if let Some(message) = reply.rejection() {
            self.roll_back(doc, created, message);
            return ReplyApplied::RolledBack;
        }

        let new_value = reply.canonical_value();
        let new_label = reply.canonical_label();
        if new_value.is_none() && new_label.is_none() {
            return ReplyApplied::Unchanged;
        }

        self.model.rewrite(doc, created.option, new_value, new_label);
        if doc.is_connected(created.row) {
            if let Some(new_value) = new_value {
                doc.set_attr(created.row, VALUE_ATTR, new_value);
            }
            let span = doc.query(created.row, Selector::Tag("span"));
            if let (Some(label), Some(span)) = (new_label, span) {
                doc.set_text(span, label);
            }
        }
        if let Some(new_value) = new_value {
            self.nav.rename(value, new_value);
        }
        self.commit(doc);

        tracing::debug!(
            widget_id = %self.widget_id,
            value,
            new_value = ?new_value,
            new_label = ?new_label,
            "Created option confirmed"
        );
        ReplyApplied::Confirmed
    }

    fn roll_back(&mut self, doc: &mut Document, created: &CreatedOption, message: &str) {
        let value = created.value.as_str();
        tracing::warn!(widget_id = %self.widget_id, value, message, "Created option rejected");

        if doc.parent(created.row).is_some() {
            doc.remove(created.row);
        }
        self.model.remove(doc, created.option);
        self.nav.discard(value);
        self.rebind(doc);
        self.commit(doc);
        self.emitter.emit(ComboboxEvent::CreateRejected {
            value: value.to_string(),
            message: message.to_string(),
        });

        self.create.show_banner(doc, self.panel, self.search, message);
        self.open(doc);
    }

    // ========== External mutations ==========

    /// Reconcile after someone else changed the backing store: rebind rows,
    /// re-render the selection, restore the cursor marker. Only display
    /// state is written, never the store. Returns whether anything was
    /// pending.
    pub fn sync_external_mutations(&mut self, doc: &mut Document) -> bool {
        let records = doc.take_records(self.observer);
        if records.is_empty() {
            return false;
        }
        tracing::debug!(widget_id = %self.widget_id, records = records.len(), "Backing store changed externally");

        self.rebind(doc);
        self.presenter.render(doc, &self.model, &self.registry);
        let scope = NavScope {
            registry: &self.registry,
            create_row: self.create_row,
            trigger: self.trigger,
        };
        self.nav.reapply(doc, &scope);
        true
    }

    // ========== Teardown ==========

    /// Remove every listener the widget registered, stop observing and
    /// destroy the overlay.
    pub fn dispose(mut self, doc: &mut Document) {
        self.close(doc, false);
        self.registry.detach_all(doc);
        self.presenter.detach_all(doc);
        self.create.clear_banner(doc);
        self.portal.destroy(doc);
        for listener in self.listeners.all() {
            doc.remove_listener(listener);
        }
        doc.disconnect(self.observer);
        tracing::debug!(widget_id = %self.widget_id, "Combobox disposed");
    }
}

impl std::fmt::Debug for Combobox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combobox")
            .field("widget_id", &self.widget_id)
            .field("open", &self.open)
            .field("multiple", &self.model.is_multiple())
            .field("cursor", &self.nav.cursor())
            .field("portaled", &self.portal.is_active())
            .finish_non_exhaustive()
    }
}
