//! Option registry: the live set of rendered rows and their click bindings.
//!
//! Row elements are not stable across external re-renders or portal moves,
//! so no row handle is trusted across a structural change. [`OptionRegistry::rebind`]
//! drops every tracked binding, re-queries the scope and binds again. It is
//! the only place row bindings are attached.

use crate::dom::{Document, EventKind, ListenerId, ListenerTarget, NodeId, Selector};

/// Class of every option row, including the synthetic create-row.
pub const ROW_CLASS: &str = "combobox-option";

/// Extra class of the synthetic create-row.
pub const CREATE_ROW_CLASS: &str = "combobox-create-option";

/// Attribute carrying a row's value.
pub const VALUE_ATTR: &str = "data-combobox-value";

/// A click binding on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBinding {
    /// The bound row.
    pub row: NodeId,
    /// Its click listener.
    pub listener: ListenerId,
}

/// Tracks the rows of one widget and their click bindings.
#[derive(Debug)]
pub struct OptionRegistry {
    scope: NodeId,
    bindings: Vec<RowBinding>,
}

impl OptionRegistry {
    /// Create an empty registry scoped to `scope`. Nothing is bound until
    /// [`rebind`](Self::rebind) runs.
    pub fn new(scope: NodeId) -> Self {
        Self { scope, bindings: Vec::new() }
    }

    /// Element rows are queried under.
    pub fn scope(&self) -> NodeId {
        self.scope
    }

    /// Detach every tracked binding, re-query rows under `scope` and bind
    /// each one. Returns the number of bound rows.
    pub fn rebind(&mut self, doc: &mut Document, scope: NodeId) -> usize {
        self.detach_all(doc);
        self.scope = scope;

        for row in self.rows(doc) {
            let listener =
                doc.add_listener(ListenerTarget::Node(row), EventKind::Click, Default::default());
            self.bindings.push(RowBinding { row, listener });
        }

        tracing::trace!(rows = self.bindings.len(), "Option rows rebound");
        self.bindings.len()
    }

    /// Remove every tracked binding from the document.
    pub fn detach_all(&mut self, doc: &mut Document) {
        for binding in self.bindings.drain(..) {
            doc.remove_listener(binding.listener);
        }
    }

    /// Row bound to a listener, if the listener is one of ours.
    pub fn row_for_listener(&self, listener: ListenerId) -> Option<NodeId> {
        self.bindings.iter().find(|b| b.listener == listener).map(|b| b.row)
    }

    /// Current bindings.
    pub fn bindings(&self) -> &[RowBinding] {
        &self.bindings
    }

    /// Option rows under the scope in document order. Re-queried every call.
    pub fn rows(&self, doc: &Document) -> Vec<NodeId> {
        doc.query_all(self.scope, Selector::Class(ROW_CLASS))
            .into_iter()
            .filter(|row| !doc.has_class(*row, CREATE_ROW_CLASS))
            .collect()
    }

    /// Rows not hidden by the filter.
    pub fn visible_rows(&self, doc: &Document) -> Vec<NodeId> {
        self.rows(doc).into_iter().filter(|row| is_visible(doc, *row)).collect()
    }

    /// Row carrying `value`.
    pub fn find_by_value(&self, doc: &Document, value: &str) -> Option<NodeId> {
        self.rows(doc).into_iter().find(|row| row_value(doc, *row) == value)
    }
}

/// Build a detached row for `value`: the row element with its value
/// attribute and a label span.
pub fn render_row(doc: &mut Document, id: Option<&str>, value: &str, label: &str) -> NodeId {
    let row = doc.create_element("div");
    doc.add_class(row, ROW_CLASS);
    doc.set_attr(row, VALUE_ATTR, value);
    doc.set_attr(row, "role", "option");
    if let Some(id) = id {
        doc.set_attr(row, "id", id);
    }
    let span = doc.create_element("span");
    doc.set_text(span, label);
    doc.append_child(row, span);
    row
}

/// Value of a row.
pub fn row_value(doc: &Document, row: NodeId) -> &str {
    doc.attr(row, VALUE_ATTR).unwrap_or("")
}

/// Visible label of a row.
pub fn row_label(doc: &Document, row: NodeId) -> String {
    doc.text_content(row).trim().to_string()
}

/// Whether the filter left the row visible.
pub fn is_visible(doc: &Document, row: NodeId) -> bool {
    !doc.is_display_none(row)
}
