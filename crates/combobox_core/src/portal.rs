//! Viewport-aware placement and portaling of the dropdown panel.
//!
//! When an ancestor of the widget clips overflow, the panel is moved into a
//! fixed, top-level overlay and positioned from the trigger's rectangle.
//! Closing moves it back and drops every inline positioning override.

use crate::config::{FALLBACK_PANEL_HEIGHT, PANEL_GAP, PORTAL_Z_INDEX};
use crate::dom::{
    Document, EventKind, ListenerId, ListenerOptions, ListenerTarget, NodeId, Rect,
};

/// Id prefix of the overlay container.
pub const PORTAL_ID_PREFIX: &str = "combobox-portal-";

/// Classes placing an in-flow panel below the trigger.
pub const BELOW_CLASSES: [&str; 2] = ["top-full", "mt-2"];

/// Classes placing an in-flow panel above the trigger.
pub const ABOVE_CLASSES: [&str; 2] = ["bottom-full", "mb-2"];

const POSITION_PROPERTIES: [&str; 4] = ["position", "top", "left", "width"];

/// Side of the trigger the panel opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Below,
    Above,
}

/// Fixed-position geometry of a portaled panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPosition {
    pub placement: Placement,
    pub top: f32,
    pub left: f32,
    pub width: f32,
}

/// Decide where the panel goes.
///
/// Below when it fits under the trigger, above when the room above exceeds
/// the panel height, below otherwise. An unmeasured panel counts as
/// [`FALLBACK_PANEL_HEIGHT`] tall.
pub fn place(trigger: Rect, panel_height: f32, viewport_height: f32) -> PanelPosition {
    let height = if panel_height > 0.0 { panel_height } else { FALLBACK_PANEL_HEIGHT };
    let space_below = viewport_height - trigger.bottom();

    let placement = if space_below >= height {
        Placement::Below
    } else if trigger.top() > height {
        Placement::Above
    } else {
        Placement::Below
    };

    let top = match placement {
        Placement::Below => trigger.bottom() + PANEL_GAP,
        Placement::Above => trigger.top() - height - PANEL_GAP,
    };

    PanelPosition { placement, top, left: trigger.left(), width: trigger.width }
}

/// Portal bookkeeping. `original_parent` is set iff `active`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortalState {
    active: bool,
    original_parent: Option<NodeId>,
    original_next: Option<NodeId>,
    overlay: Option<NodeId>,
}

impl PortalState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn original_parent(&self) -> Option<NodeId> {
        self.original_parent
    }

    /// Overlay container, once created.
    pub fn overlay(&self) -> Option<NodeId> {
        self.overlay
    }
}

/// Which window listener fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowListener {
    Scroll,
    Resize,
}

/// Moves the panel between its home and the overlay and keeps it placed.
#[derive(Debug)]
pub struct PortalManager {
    root: NodeId,
    panel: NodeId,
    trigger: NodeId,
    trigger_id: String,
    state: PortalState,
    scroll_listener: Option<ListenerId>,
    resize_listener: Option<ListenerId>,
}

impl PortalManager {
    pub fn new(root: NodeId, panel: NodeId, trigger: NodeId, trigger_id: impl Into<String>) -> Self {
        Self {
            root,
            panel,
            trigger,
            trigger_id: trigger_id.into(),
            state: PortalState::default(),
            scroll_listener: None,
            resize_listener: None,
        }
    }

    pub fn state(&self) -> &PortalState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Element rows are queried under: the overlay while portaled, else the
    /// widget root.
    pub fn scope(&self) -> NodeId {
        match self.state.overlay {
            Some(overlay) if self.state.active => overlay,
            _ => self.root,
        }
    }

    /// Whether a strict ancestor of the root, other than the body, clips
    /// overflow on either axis.
    pub fn has_clipping_ancestor(&self, doc: &Document) -> bool {
        doc.ancestors(self.root).into_iter().filter(|a| *a != doc.body()).any(|ancestor| {
            let (x, y) = doc.overflow(ancestor);
            x.clips() || y.clips()
        })
    }

    /// Move the panel into the overlay. Returns whether anything moved; the
    /// caller must rebind rows when it did.
    pub fn activate(&mut self, doc: &mut Document) -> bool {
        if self.state.active {
            return false;
        }
        let Some(parent) = doc.parent(self.panel) else {
            tracing::warn!(trigger = %self.trigger_id, "Panel is detached, portal skipped");
            return false;
        };

        let siblings = doc.children(parent);
        let next = siblings
            .iter()
            .position(|c| *c == self.panel)
            .and_then(|i| siblings.get(i + 1).copied());

        let overlay = self.ensure_overlay(doc);
        doc.append_child(overlay, self.panel);
        doc.set_style(overlay, "pointer-events", "auto");

        self.state.active = true;
        self.state.original_parent = Some(parent);
        self.state.original_next = next;
        self.update_position(doc);

        tracing::debug!(trigger = %self.trigger_id, "Panel portaled");
        true
    }

    /// Move the panel back home and clear inline positioning. Returns whether
    /// anything moved; the caller must rebind rows when it did.
    pub fn deactivate(&mut self, doc: &mut Document) -> bool {
        if !self.state.active {
            return false;
        }

        if let Some(parent) = self.state.original_parent.take() {
            match self.state.original_next.take() {
                Some(next) if doc.parent(next) == Some(parent) => {
                    doc.insert_before(parent, self.panel, next)
                }
                _ => doc.append_child(parent, self.panel),
            }
        }
        for property in POSITION_PROPERTIES {
            doc.remove_style(self.panel, property);
        }
        if let Some(overlay) = self.state.overlay {
            doc.set_style(overlay, "pointer-events", "none");
        }
        self.state.active = false;

        tracing::debug!(trigger = %self.trigger_id, "Panel restored");
        true
    }

    /// Reposition the panel. Portaled panels get fixed geometry; in-flow
    /// panels flip between the above and below classes.
    pub fn update_position(&self, doc: &mut Document) {
        let trigger = doc.rect(self.trigger);
        let panel_height = doc.rect(self.panel).height;
        let position = place(trigger, panel_height, doc.viewport().height);

        if self.state.active {
            doc.set_style(self.panel, "position", "fixed");
            doc.set_style(self.panel, "top", &format!("{}px", position.top));
            doc.set_style(self.panel, "left", &format!("{}px", position.left));
            doc.set_style(self.panel, "width", &format!("{}px", position.width));
        } else {
            let (add, remove) = match position.placement {
                Placement::Below => (BELOW_CLASSES, ABOVE_CLASSES),
                Placement::Above => (ABOVE_CLASSES, BELOW_CLASSES),
            };
            for class in remove {
                doc.remove_class(self.panel, class);
            }
            for class in add {
                doc.add_class(self.panel, class);
            }
        }
        tracing::trace!(placement = ?position.placement, top = position.top, "Panel positioned");
    }

    fn ensure_overlay(&mut self, doc: &mut Document) -> NodeId {
        if let Some(overlay) = self.state.overlay {
            return overlay;
        }
        let overlay = doc.create_element("div");
        doc.set_attr(overlay, "id", &format!("{PORTAL_ID_PREFIX}{}", self.trigger_id));
        doc.set_style(overlay, "position", "fixed");
        doc.set_style(overlay, "top", "0");
        doc.set_style(overlay, "left", "0");
        doc.set_style(overlay, "z-index", &PORTAL_Z_INDEX.to_string());
        doc.set_style(overlay, "pointer-events", "none");
        doc.append_child(doc.body(), overlay);
        self.state.overlay = Some(overlay);
        overlay
    }

    /// Register the passive scroll and the resize listeners on the window.
    pub fn attach_listeners(&mut self, doc: &mut Document) {
        if self.scroll_listener.is_none() {
            self.scroll_listener = Some(doc.add_listener(
                ListenerTarget::Window,
                EventKind::Scroll,
                ListenerOptions::passive(),
            ));
        }
        if self.resize_listener.is_none() {
            self.resize_listener = Some(doc.add_listener(
                ListenerTarget::Window,
                EventKind::Resize,
                ListenerOptions::default(),
            ));
        }
    }

    /// Remove the window listeners.
    pub fn detach_listeners(&mut self, doc: &mut Document) {
        let listeners = [self.scroll_listener.take(), self.resize_listener.take()];
        for listener in listeners.into_iter().flatten() {
            doc.remove_listener(listener);
        }
    }

    /// Which of our window listeners `listener` is.
    pub fn window_listener(&self, listener: ListenerId) -> Option<WindowListener> {
        if self.scroll_listener == Some(listener) {
            Some(WindowListener::Scroll)
        } else if self.resize_listener == Some(listener) {
            Some(WindowListener::Resize)
        } else {
            None
        }
    }

    /// Whether `node` sits in the overlay.
    pub fn overlay_contains(&self, doc: &Document, node: NodeId) -> bool {
        self.state.overlay.is_some_and(|overlay| doc.contains(overlay, node))
    }

    /// Restore the panel, drop listeners and remove the overlay.
    pub fn destroy(&mut self, doc: &mut Document) {
        self.deactivate(doc);
        self.detach_listeners(doc);
        if let Some(overlay) = self.state.overlay.take() {
            doc.remove(overlay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Overflow, Size};

    struct Fixture {
        doc: Document,
        clipper: NodeId,
        root: NodeId,
        panel: NodeId,
        manager: PortalManager,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new(Size::new(1024.0, 768.0));
        let clipper = doc.create_element("div");
        doc.append_child(doc.body(), clipper);
        let root = doc.create_element("div");
        doc.append_child(clipper, root);
        let trigger = doc.create_element("button");
        doc.append_child(root, trigger);
        doc.set_rect(trigger, Rect::new(40.0, 100.0, 240.0, 36.0));
        let panel = doc.create_element("div");
        doc.append_child(root, panel);
        let footer = doc.create_element("div");
        doc.append_child(root, footer);
        let manager = PortalManager::new(root, panel, trigger, "tags-trigger");
        Fixture { doc, clipper, root, panel, manager }
    }

    #[test]
    fn test_place_below_above_and_fallback() {
        let trigger = Rect::new(10.0, 100.0, 200.0, 30.0);
        let below = place(trigger, 150.0, 600.0);
        assert_eq!(below.placement, Placement::Below);
        assert_eq!(below.top, 138.0);
        assert_eq!(below.left, 10.0);
        assert_eq!(below.width, 200.0);

        let low = Rect::new(10.0, 500.0, 200.0, 30.0);
        let above = place(low, 150.0, 600.0);
        assert_eq!(above.placement, Placement::Above);
        assert_eq!(above.top, 342.0);

        // No room either way: below.
        let cramped = place(Rect::new(0.0, 50.0, 100.0, 30.0), 150.0, 150.0);
        assert_eq!(cramped.placement, Placement::Below);

        // Unmeasured panel uses the fallback height.
        assert_eq!(place(low, 0.0, 600.0).top, 500.0 - 200.0 - 8.0);
    }

    #[test]
    fn test_clipping_detection() {
        let mut f = fixture();
        assert!(!f.manager.has_clipping_ancestor(&f.doc));
        f.doc.set_overflow(f.clipper, Overflow::Visible, Overflow::Auto);
        assert!(f.manager.has_clipping_ancestor(&f.doc));
    }

    #[test]
    fn test_body_overflow_is_ignored() {
        let mut f = fixture();
        let body = f.doc.body();
        f.doc.set_overflow(body, Overflow::Hidden, Overflow::Hidden);
        assert!(!f.manager.has_clipping_ancestor(&f.doc));
    }

    #[test]
    fn test_activate_and_deactivate() {
        let mut f = fixture();
        let original_children = f.doc.children(f.root).to_vec();

        assert!(f.manager.activate(&mut f.doc));
        let overlay = f.manager.state().overlay().unwrap();
        assert_eq!(f.doc.parent(f.panel), Some(overlay));
        assert_eq!(f.manager.scope(), overlay);
        assert_eq!(f.manager.state().original_parent(), Some(f.root));
        assert_eq!(f.doc.id(overlay), Some("combobox-portal-tags-trigger"));
        assert_eq!(f.doc.style(overlay, "z-index"), Some("9999"));
        assert_eq!(f.doc.style(f.panel, "position"), Some("fixed"));
        assert_eq!(f.doc.style(f.panel, "top"), Some("144px"));
        assert_eq!(f.doc.style(f.panel, "left"), Some("40px"));
        assert_eq!(f.doc.style(f.panel, "width"), Some("240px"));
        assert!(!f.manager.activate(&mut f.doc));

        assert!(f.manager.deactivate(&mut f.doc));
        assert_eq!(f.doc.children(f.root), original_children.as_slice());
        assert!(f.doc.inline_style(f.panel).is_empty());
        assert!(f.manager.state().original_parent().is_none());
        assert_eq!(f.doc.style(overlay, "pointer-events"), Some("none"));
        assert_eq!(f.manager.scope(), f.root);
    }

    #[test]
    fn test_in_flow_position_classes() {
        let mut f = fixture();
        f.manager.update_position(&mut f.doc);
        assert!(f.doc.has_class(f.panel, "top-full"));

        f.doc.set_viewport(Size::new(1024.0, 200.0));
        f.doc.set_rect(f.panel, Rect::new(0.0, 0.0, 240.0, 80.0));
        f.manager.update_position(&mut f.doc);
        assert!(f.doc.has_class(f.panel, "bottom-full"));
        assert!(f.doc.has_class(f.panel, "mb-2"));
        assert!(!f.doc.has_class(f.panel, "top-full"));
    }

    #[test]
    fn test_destroy_removes_overlay_and_listeners() {
        let mut f = fixture();
        f.manager.attach_listeners(&mut f.doc);
        f.manager.attach_listeners(&mut f.doc);
        assert_eq!(f.doc.listener_count(), 2);
        f.manager.activate(&mut f.doc);
        let overlay = f.manager.state().overlay().unwrap();

        f.manager.destroy(&mut f.doc);
        assert_eq!(f.doc.listener_count(), 0);
        assert!(!f.doc.is_connected(overlay));
        assert_eq!(f.doc.parent(f.panel), Some(f.root));
    }
}
