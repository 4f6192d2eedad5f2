//! Retained element tree the widget operates on.
//!
//! The host owns a [`Document`]: elements with tag, classes, attributes,
//! inline style and text, plus the geometry and computed overflow the host's
//! layout pass measured. The document also owns the listener table, focus,
//! the viewport size and structural observers. Widgets never hold references
//! into the tree; they hold [`NodeId`]s and take `&mut Document` per call.

use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Handle to an element in a [`Document`].
///
/// Ids are never reused. A removed node keeps its id and simply stops being
/// connected to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Screen rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Left edge.
    pub fn left(&self) -> f32 {
        self.x
    }
}

/// Viewport dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Computed overflow behaviour of an element on one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overflow {
    /// Content may paint outside the box.
    #[default]
    Visible,
    /// Content is clipped without scrolling.
    Hidden,
    /// Content is clipped, no scroll container is formed.
    Clip,
    /// Content is clipped and always scrollable.
    Scroll,
    /// Content is clipped and scrollable when it overflows.
    Auto,
}

impl Overflow {
    /// Whether descendants painting outside the box are cut off.
    pub fn clips(self) -> bool {
        !matches!(self, Self::Visible)
    }
}

/// Simple element selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Matches the element tag.
    Tag(&'a str),
    /// Matches a class name.
    Class(&'a str),
    /// Matches an attribute with an exact value.
    Attr(&'a str, &'a str),
    /// Matches the presence of an attribute.
    HasAttr(&'a str),
    /// Matches the `id` attribute.
    Id(&'a str),
}

/// Event categories the document can route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer activation.
    Click,
    /// Key press.
    KeyDown,
    /// Text field edit.
    Input,
    /// Viewport scroll.
    Scroll,
    /// Viewport resize.
    Resize,
}

/// Where a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// A single element.
    Node(NodeId),
    /// The whole document.
    Document,
    /// The window.
    Window,
}

/// Registration flags for a listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Runs before node listeners.
    pub capture: bool,
    /// Never blocks default handling (scroll).
    pub passive: bool,
}

impl ListenerOptions {
    /// Capture-phase registration.
    pub fn capture() -> Self {
        Self { capture: true, passive: false }
    }

    /// Passive registration.
    pub fn passive() -> Self {
        Self { capture: false, passive: true }
    }
}

/// Handle to a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    /// Registration target.
    pub target: ListenerTarget,
    /// Event kind.
    pub kind: EventKind,
    /// Registration flags.
    pub options: ListenerOptions,
}

/// Handle to a structural observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// What changed in an observed subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Children were added or removed.
    ChildList,
    /// An attribute (including `class` and `style`) changed.
    Attribute(String),
    /// Text content changed.
    Text,
}

/// One observed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Node whose attributes, children or text changed.
    pub target: NodeId,
    /// Kind of change.
    pub kind: MutationKind,
}

struct Observer {
    target: NodeId,
    records: Vec<MutationRecord>,
}

/// An input event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    /// Event kind.
    pub kind: EventKind,
    /// Element the event was aimed at, if any.
    pub target: Option<NodeId>,
    /// Key name for key events (`"ArrowDown"`, `"a"`, `" "`...).
    pub key: Option<String>,
    /// Pointer position for click events.
    pub position: Option<(f32, f32)>,
}

impl DomEvent {
    /// A click on an element.
    pub fn click(target: NodeId) -> Self {
        Self { kind: EventKind::Click, target: Some(target), key: None, position: None }
    }

    /// A click on an element at a viewport position.
    pub fn click_at(target: NodeId, x: f32, y: f32) -> Self {
        Self { kind: EventKind::Click, target: Some(target), key: None, position: Some((x, y)) }
    }

    /// A key press aimed at the focused element.
    pub fn key_down(target: Option<NodeId>, key: impl Into<String>) -> Self {
        Self { kind: EventKind::KeyDown, target, key: Some(key.into()), position: None }
    }

    /// A text field edit.
    pub fn input(target: NodeId) -> Self {
        Self { kind: EventKind::Input, target: Some(target), key: None, position: None }
    }

    /// A viewport scroll.
    pub fn scroll() -> Self {
        Self { kind: EventKind::Scroll, target: None, key: None, position: None }
    }

    /// A viewport resize.
    pub fn resize() -> Self {
        Self { kind: EventKind::Resize, target: None, key: None, position: None }
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    rect: Rect,
    overflow: (Overflow, Overflow),
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            text: String::new(),
            rect: Rect::default(),
            overflow: (Overflow::Visible, Overflow::Visible),
        }
    }
}

/// The element tree plus its listener table, focus and observers.
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    viewport: Size,
    focused: Option<NodeId>,
    listeners: BTreeMap<ListenerId, Listener>,
    next_listener_id: u64,
    observers: BTreeMap<ObserverId, Observer>,
    next_observer_id: u64,
}

impl Document {
    /// Create an empty document with a body and the given viewport.
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: vec![Node::new("body")],
            body: NodeId(0),
            viewport,
            focused: None,
            listeners: BTreeMap::new(),
            next_listener_id: 1,
            observers: BTreeMap::new(),
            next_observer_id: 1,
        }
    }

    /// The body element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Viewport dimensions.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Update viewport dimensions.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    // ========== Tree structure ==========

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    /// Element tag.
    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    /// Parent element.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Child elements in order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.record(parent, MutationKind::ChildList);
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0].children.insert(0, child);
        self.nodes[child.0].parent = Some(parent);
        self.record(parent, MutationKind::ChildList);
    }

    /// Insert `child` before `reference`. Appends when `reference` is not a
    /// child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == reference)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        self.record(parent, MutationKind::ChildList);
    }

    /// Insert `child` right after `reference` in the reference's parent.
    /// Returns false when `reference` is detached.
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) -> bool {
        let Some(parent) = self.parent(reference) else {
            return false;
        };
        self.detach(child);
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == reference)
            .map(|i| i + 1)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        self.record(parent, MutationKind::ChildList);
        true
    }

    /// Detach a node from its parent. The subtree stays intact.
    pub fn remove(&mut self, node: NodeId) {
        if self.focused.is_some_and(|f| self.contains(node, f)) {
            self.blur();
        }
        self.detach(node);
    }

    /// Detach every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        if children.is_empty() {
            return;
        }
        for child in &children {
            self.nodes[child.0].parent = None;
        }
        self.record(node, MutationKind::ChildList);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
            self.record(parent, MutationKind::ChildList);
        }
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    /// Whether the node is attached under the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.body, node)
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, node: NodeId) -> SmallVec<[NodeId; 8]> {
        let mut out = SmallVec::new();
        let mut current = self.nodes[node.0].parent;
        while let Some(id) = current {
            out.push(id);
            current = self.nodes[id.0].parent;
        }
        out
    }

    /// Descendants in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    // ========== Queries ==========

    /// Whether the element matches the selector.
    pub fn matches(&self, node: NodeId, selector: Selector<'_>) -> bool {
        match selector {
            Selector::Tag(tag) => self.nodes[node.0].tag == tag,
            Selector::Class(class) => self.has_class(node, class),
            Selector::Attr(name, value) => self.attr(node, name) == Some(value),
            Selector::HasAttr(name) => self.has_attr(node, name),
            Selector::Id(id) => self.attr(node, "id") == Some(id),
        }
    }

    /// First descendant of `root` matching the selector.
    pub fn query(&self, root: NodeId, selector: Selector<'_>) -> Option<NodeId> {
        self.descendants(root).into_iter().find(|id| self.matches(*id, selector))
    }

    /// Every descendant of `root` matching the selector, in document order.
    pub fn query_all(&self, root: NodeId, selector: Selector<'_>) -> Vec<NodeId> {
        self.descendants(root).into_iter().filter(|id| self.matches(*id, selector)).collect()
    }

    /// Nearest inclusive ancestor matching the selector.
    pub fn closest(&self, node: NodeId, selector: Selector<'_>) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.matches(id, selector) {
                return Some(id);
            }
            current = self.nodes[id.0].parent;
        }
        None
    }

    // ========== Attributes and classes ==========

    /// Attribute value.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attrs.get(name).map(String::as_str)
    }

    /// Whether the attribute is present.
    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.nodes[node.0].attrs.contains_key(name)
    }

    /// Set an attribute. Unchanged values are not recorded.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let attrs = &mut self.nodes[node.0].attrs;
        if attrs.get(name).map(String::as_str) == Some(value) {
            return;
        }
        attrs.insert(name.to_string(), value.to_string());
        self.record(node, MutationKind::Attribute(name.to_string()));
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if self.nodes[node.0].attrs.remove(name).is_some() {
            self.record(node, MutationKind::Attribute(name.to_string()));
        }
    }

    /// Element id.
    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    /// Whether the element carries the `hidden` attribute.
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.has_attr(node, "hidden")
    }

    /// Toggle the `hidden` attribute.
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if hidden {
            self.set_attr(node, "hidden", "");
        } else {
            self.remove_attr(node, "hidden");
        }
    }

    /// Whether the element has the class.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    /// Add a class.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        self.nodes[node.0].classes.push(class.to_string());
        self.record(node, MutationKind::Attribute("class".to_string()));
    }

    /// Remove a class.
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.nodes[node.0].classes;
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            self.record(node, MutationKind::Attribute("class".to_string()));
        }
    }

    /// Class list in insertion order.
    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.nodes[node.0].classes
    }

    // ========== Inline style ==========

    /// Inline style property.
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].style.get(property).map(String::as_str)
    }

    /// Every inline style property.
    pub fn inline_style(&self, node: NodeId) -> &BTreeMap<String, String> {
        &self.nodes[node.0].style
    }

    /// Set an inline style property.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let style = &mut self.nodes[node.0].style;
        if style.get(property).map(String::as_str) == Some(value) {
            return;
        }
        style.insert(property.to_string(), value.to_string());
        self.record(node, MutationKind::Attribute("style".to_string()));
    }

    /// Remove an inline style property.
    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        if self.nodes[node.0].style.remove(property).is_some() {
            self.record(node, MutationKind::Attribute("style".to_string()));
        }
    }

    /// Whether the element has inline `display: none`.
    pub fn is_display_none(&self, node: NodeId) -> bool {
        self.style(node, "display") == Some("none")
    }

    // ========== Text and values ==========

    /// Replace the element's content with text.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if self.nodes[node.0].text != text {
            self.nodes[node.0].text = text.to_string();
            self.record(node, MutationKind::Text);
        }
    }

    /// Own text plus the text of every descendant, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.nodes[node.0].text.clone();
        for id in self.descendants(node) {
            out.push_str(&self.nodes[id.0].text);
        }
        out
    }

    /// Current value of a text field.
    pub fn value(&self, node: NodeId) -> &str {
        self.attr(node, "value").unwrap_or("")
    }

    /// Set the value of a text field.
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.set_attr(node, "value", value);
    }

    // ========== Layout ==========

    /// Measured screen rectangle.
    pub fn rect(&self, node: NodeId) -> Rect {
        self.nodes[node.0].rect
    }

    /// Store the measured screen rectangle.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.nodes[node.0].rect = rect;
    }

    /// Computed overflow on the x and y axes.
    pub fn overflow(&self, node: NodeId) -> (Overflow, Overflow) {
        self.nodes[node.0].overflow
    }

    /// Store computed overflow for both axes.
    pub fn set_overflow(&mut self, node: NodeId, x: Overflow, y: Overflow) {
        self.nodes[node.0].overflow = (x, y);
    }

    // ========== Focus ==========

    /// Focused element.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Move focus to an element.
    pub fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    // ========== Listeners ==========

    /// Register a listener.
    pub fn add_listener(
        &mut self,
        target: ListenerTarget,
        kind: EventKind,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.insert(id, Listener { target, kind, options });
        id
    }

    /// Unregister a listener. Returns false when it was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Look up a listener.
    pub fn listener(&self, id: ListenerId) -> Option<&Listener> {
        self.listeners.get(&id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners registered on a target for an event kind.
    pub fn listeners_on(&self, target: ListenerTarget, kind: EventKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, l)| l.target == target && l.kind == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Listeners an event reaches, in delivery order: document capture,
    /// then node listeners from the target outwards, then document bubble,
    /// then window.
    pub fn route(&self, event: &DomEvent) -> Vec<ListenerId> {
        let mut out = self.document_listeners(event.kind, true);

        if let Some(target) = event.target {
            let mut path: SmallVec<[NodeId; 8]> = SmallVec::new();
            path.push(target);
            path.extend(self.ancestors(target));
            for node in path {
                out.extend(self.listeners_on(ListenerTarget::Node(node), event.kind));
            }
        }

        out.extend(self.document_listeners(event.kind, false));
        out.extend(self.listeners_on(ListenerTarget::Window, event.kind));
        out
    }

    fn document_listeners(&self, kind: EventKind, capture: bool) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, l)| {
                l.target == ListenerTarget::Document && l.kind == kind && l.options.capture == capture
            })
            .map(|(id, _)| *id)
            .collect()
    }

    // ========== Structural observation ==========

    /// Start recording changes under `target` (attributes, children, text).
    pub fn observe(&mut self, target: NodeId) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.insert(id, Observer { target, records: Vec::new() });
        id
    }

    /// Stop recording and drop pending records.
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        self.observers.remove(&id).is_some()
    }

    /// Drain pending records.
    pub fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.observers.get_mut(&id).map(|o| std::mem::take(&mut o.records)).unwrap_or_default()
    }

    /// Number of pending records.
    pub fn pending_records(&self, id: ObserverId) -> usize {
        self.observers.get(&id).map_or(0, |o| o.records.len())
    }

    /// Number of active observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn record(&mut self, node: NodeId, kind: MutationKind) {
        if self.observers.is_empty() {
            return;
        }
        let interested: SmallVec<[ObserverId; 4]> = self
            .observers
            .iter()
            .filter(|(_, o)| self.contains(o.target, node))
            .map(|(id, _)| *id)
            .collect();
        for id in interested {
            if let Some(observer) = self.observers.get_mut(&id) {
                observer.records.push(MutationRecord { target: node, kind: kind.clone() });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(Size::new(800.0, 600.0))
    }

    #[test]
    fn test_append_moves_between_parents() {
        let mut doc = doc();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(doc.body(), a);
        doc.append_child(doc.body(), b);
        doc.append_child(a, child);
        doc.append_child(b, child);

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[child]);
        assert_eq!(doc.parent(child), Some(b));
        assert!(doc.is_connected(child));
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut doc = doc();
        let list = doc.create_element("div");
        let first = doc.create_element("div");
        let last = doc.create_element("div");
        doc.append_child(list, first);
        doc.append_child(list, last);

        let middle = doc.create_element("div");
        doc.insert_before(list, middle, last);
        assert_eq!(doc.children(list), &[first, middle, last]);

        let tail = doc.create_element("div");
        assert!(doc.insert_after(last, tail));
        assert_eq!(doc.children(list), &[first, middle, last, tail]);
    }

    #[test]
    fn test_query_in_document_order() {
        let mut doc = doc();
        let root = doc.create_element("div");
        doc.append_child(doc.body(), root);
        let group = doc.create_element("div");
        doc.append_child(root, group);
        let inner = doc.create_element("div");
        doc.add_class(inner, "row");
        doc.append_child(group, inner);
        let outer = doc.create_element("div");
        doc.add_class(outer, "row");
        doc.append_child(root, outer);

        assert_eq!(doc.query_all(root, Selector::Class("row")), vec![inner, outer]);
        assert_eq!(doc.closest(inner, Selector::Tag("div")), Some(inner));
        assert_eq!(doc.ancestors(inner).as_slice(), &[group, root, doc.body()]);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut doc = doc();
        let row = doc.create_element("div");
        let label = doc.create_element("span");
        doc.set_text(label, "Apple");
        doc.append_child(row, label);
        assert_eq!(doc.text_content(row), "Apple");

        doc.set_text(row, "Pear");
        assert!(doc.children(row).is_empty());
        assert_eq!(doc.text_content(row), "Pear");
    }

    #[test]
    fn test_observer_records_subtree_only() {
        let mut doc = doc();
        let watched = doc.create_element("select");
        let other = doc.create_element("div");
        doc.append_child(doc.body(), watched);
        doc.append_child(doc.body(), other);
        let observer = doc.observe(watched);

        let option = doc.create_element("option");
        doc.append_child(watched, option);
        doc.set_attr(option, "selected", "");
        doc.set_attr(other, "data-x", "1");

        let records = doc.take_records(observer);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, MutationKind::ChildList);
        assert_eq!(records[1].kind, MutationKind::Attribute("selected".into()));
        assert_eq!(doc.pending_records(observer), 0);

        // Same value twice is not a change.
        doc.set_attr(option, "selected", "");
        assert_eq!(doc.pending_records(observer), 0);
    }

    #[test]
    fn test_route_orders_capture_target_bubble_window() {
        let mut doc = doc();
        let parent = doc.create_element("div");
        let child = doc.create_element("button");
        doc.append_child(doc.body(), parent);
        doc.append_child(parent, child);

        let bubble = doc.add_listener(
            ListenerTarget::Document,
            EventKind::Click,
            ListenerOptions::default(),
        );
        let on_parent =
            doc.add_listener(ListenerTarget::Node(parent), EventKind::Click, Default::default());
        let on_child =
            doc.add_listener(ListenerTarget::Node(child), EventKind::Click, Default::default());
        let capture =
            doc.add_listener(ListenerTarget::Document, EventKind::Click, ListenerOptions::capture());
        let _other_kind =
            doc.add_listener(ListenerTarget::Node(child), EventKind::KeyDown, Default::default());

        let route = doc.route(&DomEvent::click(child));
        assert_eq!(route, vec![capture, on_child, on_parent, bubble]);

        assert!(doc.remove_listener(on_child));
        assert!(!doc.remove_listener(on_child));
        assert_eq!(doc.route(&DomEvent::click(child)), vec![capture, on_parent, bubble]);
    }

    #[test]
    fn test_overflow_clipping() {
        assert!(!Overflow::Visible.clips());
        assert!(Overflow::Hidden.clips());
        assert!(Overflow::Auto.clips());
    }

    #[test]
    fn test_removing_focused_subtree_blurs() {
        let mut doc = doc();
        let panel = doc.create_element("div");
        doc.append_child(doc.body(), panel);
        let input = doc.create_element("input");
        doc.append_child(panel, input);
        let other = doc.create_element("button");
        doc.append_child(doc.body(), other);

        doc.focus(other);
        doc.remove(panel);
        assert_eq!(doc.focused(), Some(other));

        doc.append_child(doc.body(), panel);
        doc.focus(input);
        doc.remove(panel);
        assert_eq!(doc.focused(), None);
    }
}
