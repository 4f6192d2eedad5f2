//! Keyboard navigation: the cursor over visible rows and key mapping.
//!
//! The cursor is keyed by row value (or the create-row), never by index, so
//! it survives filtering, creation and re-parenting. Exactly one row carries
//! the `data-combobox-navigate` marker while the cursor is set.

use unicode_segmentation::UnicodeSegmentation;

use crate::dom::{Document, NodeId};
use crate::registry::{row_label, row_value, OptionRegistry};

/// Marker attribute of the navigable row.
pub const NAVIGATE_ATTR: &str = "data-combobox-navigate";

/// What the cursor points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// The row with this value.
    Row(String),
    /// The synthetic create-row.
    Create,
}

/// One entry of the visible sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    /// An option row.
    Row(NodeId),
    /// The create-row.
    Create(NodeId),
}

impl NavTarget {
    /// The element.
    pub fn node(self) -> NodeId {
        match self {
            Self::Row(node) | Self::Create(node) => node,
        }
    }
}

/// Intent derived from a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Open the closed dropdown.
    Open,
    /// Move to the next visible row.
    Next,
    /// Move to the previous visible row.
    Previous,
    /// Commit the cursored row.
    Commit,
    /// Close the dropdown.
    Dismiss {
        /// Whether focus goes back to the trigger.
        restore_focus: bool,
    },
    /// Jump to the next row starting with this lowercased character.
    Jump(String),
}

/// Where focus sits when the key arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusContext {
    /// Focus is on the trigger.
    pub on_trigger: bool,
    /// Focus is in the free-text search field.
    pub in_search: bool,
}

const RESERVED_KEYS: [&str; 5] = ["ArrowDown", "ArrowUp", "Enter", "Tab", "Escape"];

/// Map a key press to an action.
pub fn key_action(key: &str, open: bool, focus: FocusContext) -> Option<KeyAction> {
    if !open {
        return match key {
            " " | "Enter" | "ArrowDown" if focus.on_trigger => Some(KeyAction::Open),
            _ => None,
        };
    }

    match key {
        "Escape" => Some(KeyAction::Dismiss { restore_focus: true }),
        "Tab" => Some(KeyAction::Dismiss { restore_focus: false }),
        "ArrowDown" => Some(KeyAction::Next),
        "ArrowUp" => Some(KeyAction::Previous),
        "Enter" => Some(KeyAction::Commit),
        _ if RESERVED_KEYS.contains(&key) => None,
        _ if key.graphemes(true).count() == 1 => {
            if focus.in_search {
                // Typing into the search field feeds the filter instead.
                None
            } else {
                Some(KeyAction::Jump(key.to_lowercase()))
            }
        }
        _ => None,
    }
}

/// Rows the cursor writes to.
#[derive(Debug, Clone, Copy)]
pub struct NavScope<'a> {
    /// Live rows.
    pub registry: &'a OptionRegistry,
    /// Create-row, when the widget has one.
    pub create_row: Option<NodeId>,
    /// Trigger carrying `aria-activedescendant`.
    pub trigger: NodeId,
}

impl NavScope<'_> {
    /// Visible rows in document order, then the create-row if shown.
    pub fn sequence(&self, doc: &Document) -> Vec<NavTarget> {
        let mut out: Vec<NavTarget> =
            self.registry.visible_rows(doc).into_iter().map(NavTarget::Row).collect();
        if let Some(create) = self.create_row.filter(|c| !doc.is_hidden(*c)) {
            out.push(NavTarget::Create(create));
        }
        out
    }
}

/// Cursor state of one widget.
#[derive(Debug, Default)]
pub struct NavigationController {
    cursor: Option<Cursor>,
    last_navigated: Option<String>,
}

impl NavigationController {
    /// Create a controller with no cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Value of the last row navigated to or committed.
    pub fn last_navigated(&self) -> Option<&str> {
        self.last_navigated.as_deref()
    }

    /// Remember a committed row.
    pub fn remember(&mut self, value: &str) {
        self.last_navigated = Some(value.to_string());
    }

    /// Follow a row whose value was rewritten in place.
    pub fn rename(&mut self, old: &str, new: &str) {
        if self.last_navigated.as_deref() == Some(old) {
            self.last_navigated = Some(new.to_string());
        }
        if self.cursor == Some(Cursor::Row(old.to_string())) {
            self.cursor = Some(Cursor::Row(new.to_string()));
        }
    }

    /// Drop every reference to a removed row.
    pub fn discard(&mut self, value: &str) {
        if self.last_navigated.as_deref() == Some(value) {
            self.last_navigated = None;
        }
        if self.cursor == Some(Cursor::Row(value.to_string())) {
            self.cursor = None;
        }
    }

    /// Position of the cursor within `sequence`.
    pub fn current_index(&self, doc: &Document, sequence: &[NavTarget]) -> Option<usize> {
        let cursor = self.cursor.as_ref()?;
        sequence.iter().position(|target| match (cursor, target) {
            (Cursor::Row(value), NavTarget::Row(row)) => row_value(doc, *row) == value,
            (Cursor::Create, NavTarget::Create(_)) => true,
            _ => false,
        })
    }

    /// Cursored entry of the current sequence.
    pub fn current(&self, doc: &Document, scope: &NavScope<'_>) -> Option<NavTarget> {
        let sequence = scope.sequence(doc);
        self.current_index(doc, &sequence).map(|i| sequence[i])
    }

    /// Put the cursor on `target` and move the marker there.
    pub fn navigate_to(&mut self, doc: &mut Document, scope: &NavScope<'_>, target: NavTarget) {
        Self::clear_markers(doc, scope);
        let node = target.node();
        doc.set_attr(node, NAVIGATE_ATTR, "");

        self.cursor = Some(match target {
            NavTarget::Row(row) => {
                let value = row_value(doc, row).to_string();
                if !value.is_empty() {
                    self.last_navigated = Some(value.clone());
                }
                Cursor::Row(value)
            }
            NavTarget::Create(_) => Cursor::Create,
        });

        match doc.id(node).map(String::from) {
            Some(id) => doc.set_attr(scope.trigger, "aria-activedescendant", &id),
            None => doc.remove_attr(scope.trigger, "aria-activedescendant"),
        }
        tracing::trace!(cursor = ?self.cursor, "Cursor moved");
    }

    /// Remove the cursor and its marker.
    pub fn clear(&mut self, doc: &mut Document, scope: &NavScope<'_>) {
        Self::clear_markers(doc, scope);
        self.cursor = None;
        doc.remove_attr(scope.trigger, "aria-activedescendant");
    }

    /// Write the marker for the current cursor again after rows were
    /// re-rendered. Clears the cursor when its row is gone.
    pub fn reapply(&mut self, doc: &mut Document, scope: &NavScope<'_>) {
        match self.current(doc, scope) {
            Some(target) => self.navigate_to(doc, scope, target),
            None if self.cursor.is_some() => self.clear(doc, scope),
            None => {}
        }
    }

    fn clear_markers(doc: &mut Document, scope: &NavScope<'_>) {
        for row in scope.registry.rows(doc) {
            doc.remove_attr(row, NAVIGATE_ATTR);
        }
        if let Some(create) = scope.create_row {
            doc.remove_attr(create, NAVIGATE_ATTR);
        }
    }

    /// Move circularly through the visible sequence. With no cursor, forward
    /// lands on the first entry and backward on the last.
    pub fn step(&mut self, doc: &mut Document, scope: &NavScope<'_>, forward: bool) -> bool {
        let sequence = scope.sequence(doc);
        let len = sequence.len();
        if len == 0 {
            return false;
        }
        let index = match (self.current_index(doc, &sequence), forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.navigate_to(doc, scope, sequence[index]);
        true
    }

    /// Jump to the next visible row after the cursor, wrapping, whose value
    /// or label starts with `ch` (already lowercased).
    pub fn jump_to_char(&mut self, doc: &mut Document, scope: &NavScope<'_>, ch: &str) -> bool {
        let sequence = scope.sequence(doc);
        let len = sequence.len();
        if len == 0 {
            return false;
        }
        let start = self.current_index(doc, &sequence).map_or(0, |i| i + 1);
        for offset in 0..len {
            let target = sequence[(start + offset) % len];
            let NavTarget::Row(row) = target else {
                continue;
            };
            let value = row_value(doc, row).to_lowercase();
            let label = row_label(doc, row).to_lowercase();
            if value.starts_with(ch) || label.starts_with(ch) {
                self.navigate_to(doc, scope, target);
                return true;
            }
        }
        false
    }

    /// Cursor to the first visible row, else the create-row, else nothing.
    pub fn reset_to_first(&mut self, doc: &mut Document, scope: &NavScope<'_>) {
        match scope.sequence(doc).first().copied() {
            Some(target) => self.navigate_to(doc, scope, target),
            None => self.clear(doc, scope),
        }
    }

    /// Cursor placement on open: the last navigated row if still visible,
    /// else the visible selected row, else the first visible row.
    pub fn place_on_open(
        &mut self,
        doc: &mut Document,
        scope: &NavScope<'_>,
        is_selected: impl Fn(&Document, NodeId) -> bool,
    ) {
        let visible = scope.registry.visible_rows(doc);

        let remembered = self.last_navigated.as_deref().and_then(|value| {
            visible.iter().copied().find(|row| row_value(doc, *row) == value)
        });
        let target = remembered
            .or_else(|| visible.iter().copied().find(|row| is_selected(doc, *row)))
            .or_else(|| visible.first().copied());

        match target {
            Some(row) => self.navigate_to(doc, scope, NavTarget::Row(row)),
            None => self.clear(doc, scope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Size;
    use crate::registry::{CREATE_ROW_CLASS, ROW_CLASS, VALUE_ATTR};

    struct Fixture {
        registry: OptionRegistry,
        create: NodeId,
        trigger: NodeId,
        rows: Vec<NodeId>,
    }

    impl Fixture {
        fn scope(&self) -> NavScope<'_> {
            NavScope { registry: &self.registry, create_row: Some(self.create), trigger: self.trigger }
        }

        fn marked(&self, doc: &Document) -> Vec<NodeId> {
            let mut out: Vec<NodeId> =
                self.rows.iter().copied().filter(|r| doc.has_attr(*r, NAVIGATE_ATTR)).collect();
            if doc.has_attr(self.create, NAVIGATE_ATTR) {
                out.push(self.create);
            }
            out
        }
    }

    fn fixture(values: &[&str]) -> (Document, Fixture) {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let panel = doc.create_element("div");
        doc.append_child(doc.body(), panel);
        let trigger = doc.create_element("button");
        doc.append_child(doc.body(), trigger);
        let mut rows = Vec::new();
        for value in values {
            let row = doc.create_element("div");
            doc.add_class(row, ROW_CLASS);
            doc.set_attr(row, VALUE_ATTR, value);
            doc.set_attr(row, "id", &format!("opt-{value}"));
            let span = doc.create_element("span");
            doc.set_text(span, &value.to_uppercase());
            doc.append_child(row, span);
            doc.append_child(panel, row);
            rows.push(row);
        }
        let create = doc.create_element("div");
        doc.add_class(create, ROW_CLASS);
        doc.add_class(create, CREATE_ROW_CLASS);
        doc.set_hidden(create, true);
        doc.append_child(panel, create);
        let registry = OptionRegistry::new(panel);
        (doc, Fixture { registry, create, trigger, rows })
    }

    #[test]
    fn test_key_action_when_closed() {
        let on_trigger = FocusContext { on_trigger: true, in_search: false };
        assert_eq!(key_action(" ", false, on_trigger), Some(KeyAction::Open));
        assert_eq!(key_action("Enter", false, on_trigger), Some(KeyAction::Open));
        assert_eq!(key_action("a", false, on_trigger), None);
        assert_eq!(key_action("Enter", false, FocusContext::default()), None);
    }

    #[test]
    fn test_key_action_when_open() {
        let in_search = FocusContext { on_trigger: false, in_search: true };
        let on_trigger = FocusContext { on_trigger: true, in_search: false };
        assert_eq!(
            key_action("Escape", true, in_search),
            Some(KeyAction::Dismiss { restore_focus: true })
        );
        assert_eq!(
            key_action("Tab", true, in_search),
            Some(KeyAction::Dismiss { restore_focus: false })
        );
        assert_eq!(key_action("ArrowUp", true, in_search), Some(KeyAction::Previous));
        assert_eq!(key_action("b", true, in_search), None);
        assert_eq!(key_action("B", true, on_trigger), Some(KeyAction::Jump("b".into())));
        assert_eq!(key_action("é", true, on_trigger), Some(KeyAction::Jump("é".into())));
        assert_eq!(key_action("Shift", true, on_trigger), None);
    }

    #[test]
    fn test_arrow_keys_wrap() {
        let (mut doc, f) = fixture(&["a", "b", "c"]);
        let scope = f.scope();
        let mut nav = NavigationController::new();
        nav.navigate_to(&mut doc, &scope, NavTarget::Row(f.rows[0]));

        nav.step(&mut doc, &scope, false);
        assert_eq!(nav.cursor(), Some(&Cursor::Row("c".into())));
        nav.step(&mut doc, &scope, true);
        assert_eq!(nav.cursor(), Some(&Cursor::Row("a".into())));
        assert_eq!(f.marked(&doc), vec![f.rows[0]]);
        assert_eq!(doc.attr(f.trigger, "aria-activedescendant"), Some("opt-a"));
    }

    #[test]
    fn test_step_without_cursor() {
        let (mut doc, f) = fixture(&["a", "b", "c"]);
        let scope = f.scope();
        let mut nav = NavigationController::new();
        nav.step(&mut doc, &scope, false);
        assert_eq!(nav.cursor(), Some(&Cursor::Row("c".into())));

        let mut nav = NavigationController::new();
        nav.step(&mut doc, &scope, true);
        assert_eq!(nav.cursor(), Some(&Cursor::Row("a".into())));
    }

    #[test]
    fn test_step_with_no_visible_rows_is_noop() {
        let (mut doc, f) = fixture(&["a"]);
        doc.set_style(f.rows[0], "display", "none");
        let mut nav = NavigationController::new();
        assert!(!nav.step(&mut doc, &f.scope(), true));
        assert!(nav.cursor().is_none());
    }

    #[test]
    fn test_sequence_includes_visible_create_row_last() {
        let (mut doc, f) = fixture(&["a"]);
        doc.set_hidden(f.create, false);
        let scope = f.scope();
        let mut nav = NavigationController::new();
        nav.navigate_to(&mut doc, &scope, NavTarget::Row(f.rows[0]));
        nav.step(&mut doc, &scope, true);
        assert_eq!(nav.cursor(), Some(&Cursor::Create));
        assert_eq!(f.marked(&doc), vec![f.create]);
        // Create-row has no id.
        assert_eq!(doc.attr(f.trigger, "aria-activedescendant"), None);
    }

    #[test]
    fn test_jump_to_char_cycles_from_cursor() {
        let (mut doc, f) = fixture(&["apple", "banana", "avocado", "cherry"]);
        let scope = f.scope();
        let mut nav = NavigationController::new();

        assert!(nav.jump_to_char(&mut doc, &scope, "a"));
        assert_eq!(nav.cursor(), Some(&Cursor::Row("apple".into())));
        assert!(nav.jump_to_char(&mut doc, &scope, "a"));
        assert_eq!(nav.cursor(), Some(&Cursor::Row("avocado".into())));
        assert!(nav.jump_to_char(&mut doc, &scope, "a"));
        assert_eq!(nav.cursor(), Some(&Cursor::Row("apple".into())));
    }

    #[test]
    fn test_jump_without_match_keeps_cursor() {
        let (mut doc, f) = fixture(&["apple", "banana", "cherry"]);
        let scope = f.scope();
        let mut nav = NavigationController::new();

        // No cursor yet and nothing matches.
        assert!(!nav.jump_to_char(&mut doc, &scope, "z"));
        assert!(nav.cursor().is_none());
        assert!(f.marked(&doc).is_empty());

        nav.navigate_to(&mut doc, &scope, NavTarget::Row(f.rows[1]));
        assert!(!nav.jump_to_char(&mut doc, &scope, "z"));
        assert_eq!(nav.cursor(), Some(&Cursor::Row("banana".into())));
        assert_eq!(f.marked(&doc), vec![f.rows[1]]);
        assert_eq!(doc.attr(f.trigger, "aria-activedescendant"), Some("opt-banana"));

        // Only filtered-out rows match.
        doc.set_style(f.rows[2], "display", "none");
        assert!(!nav.jump_to_char(&mut doc, &scope, "c"));
        assert_eq!(nav.cursor(), Some(&Cursor::Row("banana".into())));
    }

    #[test]
    fn test_reset_to_first_prefers_rows_then_create() {
        let (mut doc, f) = fixture(&["a", "b"]);
        let scope = f.scope();
        let mut nav = NavigationController::new();
        nav.reset_to_first(&mut doc, &scope);
        assert_eq!(nav.cursor(), Some(&Cursor::Row("a".into())));

        for row in &f.rows {
            doc.set_style(*row, "display", "none");
        }
        doc.set_hidden(f.create, false);
        nav.reset_to_first(&mut doc, &scope);
        assert_eq!(nav.cursor(), Some(&Cursor::Create));

        doc.set_hidden(f.create, true);
        nav.reset_to_first(&mut doc, &scope);
        assert!(nav.cursor().is_none());
        assert!(f.marked(&doc).is_empty());
    }

    #[test]
    fn test_place_on_open_priority() {
        let (mut doc, f) = fixture(&["a", "b", "c"]);
        let scope = f.scope();
        let selected = f.rows[1];
        let mut nav = NavigationController::new();

        nav.place_on_open(&mut doc, &scope, |_, row| row == selected);
        assert_eq!(nav.cursor(), Some(&Cursor::Row("b".into())));

        nav.remember("c");
        nav.place_on_open(&mut doc, &scope, |_, row| row == selected);
        assert_eq!(nav.cursor(), Some(&Cursor::Row("c".into())));

        // Remembered row filtered out: fall back to the selected one.
        doc.set_style(f.rows[2], "display", "none");
        nav.place_on_open(&mut doc, &scope, |_, row| row == selected);
        assert_eq!(nav.cursor(), Some(&Cursor::Row("b".into())));

        let mut fresh = NavigationController::new();
        fresh.place_on_open(&mut doc, &scope, |_, _| false);
        assert_eq!(fresh.cursor(), Some(&Cursor::Row("a".into())));
    }

    #[test]
    fn test_rename_and_discard() {
        let mut nav = NavigationController::new();
        nav.cursor = Some(Cursor::Row("Foo".into()));
        nav.remember("Foo");
        nav.rename("Foo", "foo-1");
        assert_eq!(nav.cursor(), Some(&Cursor::Row("foo-1".into())));
        assert_eq!(nav.last_navigated(), Some("foo-1"));

        nav.discard("foo-1");
        assert!(nav.cursor().is_none());
        assert!(nav.last_navigated().is_none());
    }
}
