//! Presentation of the committed selection.
//!
//! Single mode shows the selected label in the summary element. Multiple mode
//! renders one removable pill per selected option. Placeholder and clear
//! button visibility follow the selection, and every row mirrors its option's
//! selected state.

use crate::dom::{Document, EventKind, ListenerId, ListenerTarget, NodeId};
use crate::model::SelectionModel;
use crate::registry::{row_value, OptionRegistry};

/// Marker attribute of a selected row.
pub const SELECTED_ATTR: &str = "data-combobox-selected";

/// Class of a pill.
pub const PILL_CLASS: &str = "combobox-pill";

/// Class of a pill's remove control.
pub const PILL_REMOVE_CLASS: &str = "combobox-pill-remove";

/// Elements the presentation writes to. Each one is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentationParts {
    /// `.selected-value` summary container.
    pub summary: Option<NodeId>,
    /// `.combobox-placeholder` text.
    pub placeholder: Option<NodeId>,
    /// Clear-all button.
    pub clear_button: Option<NodeId>,
}

/// A rendered pill and the listener on its remove control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillBinding {
    /// Value the pill stands for.
    pub value: String,
    /// The pill element.
    pub pill: NodeId,
    /// Its remove control.
    pub remove: NodeId,
    /// Click listener on the remove control.
    pub listener: ListenerId,
}

/// Renders the selection summary of one widget.
#[derive(Debug)]
pub struct Presenter {
    parts: PresentationParts,
    pills: Vec<PillBinding>,
}

impl Presenter {
    pub fn new(parts: PresentationParts) -> Self {
        Self { parts, pills: Vec::new() }
    }

    pub fn parts(&self) -> PresentationParts {
        self.parts
    }

    /// Current pills in selection order.
    pub fn pills(&self) -> &[PillBinding] {
        &self.pills
    }

    /// Value whose pill owns `listener`.
    pub fn pill_for_listener(&self, listener: ListenerId) -> Option<&str> {
        self.pills.iter().find(|p| p.listener == listener).map(|p| p.value.as_str())
    }

    /// Re-render summary, pills, placeholder, clear button and row markers
    /// from the backing store.
    pub fn render(&mut self, doc: &mut Document, model: &SelectionModel, registry: &OptionRegistry) {
        let selected = model.selected(doc);

        if let Some(summary) = self.parts.summary {
            if model.is_multiple() {
                self.detach_all(doc);
                doc.clear_children(summary);
                for entry in &selected {
                    let binding = Self::render_pill(doc, summary, &entry.value, &entry.label);
                    self.pills.push(binding);
                }
            } else {
                let text = selected.first().map(|e| e.label.as_str()).unwrap_or("");
                doc.set_text(summary, text);
            }
        }

        if let Some(placeholder) = self.parts.placeholder {
            doc.set_hidden(placeholder, !selected.is_empty());
        }
        if let Some(clear) = self.parts.clear_button {
            doc.set_hidden(clear, selected.is_empty());
        }

        for row in registry.rows(doc) {
            let is_selected = selected.iter().any(|e| e.value == row_value(doc, row));
            if is_selected {
                doc.set_attr(row, SELECTED_ATTR, "");
                doc.set_attr(row, "aria-selected", "true");
            } else {
                doc.remove_attr(row, SELECTED_ATTR);
                doc.set_attr(row, "aria-selected", "false");
            }
        }

        tracing::trace!(selected = selected.len(), pills = self.pills.len(), "Selection rendered");
    }

    fn render_pill(doc: &mut Document, summary: NodeId, value: &str, label: &str) -> PillBinding {
        let pill = doc.create_element("span");
        doc.add_class(pill, "selected-item");
        doc.add_class(pill, PILL_CLASS);
        doc.set_attr(pill, "data-value", value);

        let text = doc.create_element("span");
        doc.set_text(text, label);
        doc.append_child(pill, text);

        let remove = doc.create_element("span");
        doc.add_class(remove, PILL_REMOVE_CLASS);
        doc.set_attr(remove, "role", "button");
        doc.set_attr(remove, "aria-label", &format!("Remove {label}"));
        doc.set_text(remove, "×");
        doc.append_child(pill, remove);

        doc.append_child(summary, pill);
        let listener =
            doc.add_listener(ListenerTarget::Node(remove), EventKind::Click, Default::default());
        PillBinding { value: value.to_string(), pill, remove, listener }
    }

    /// Drop every pill listener.
    pub fn detach_all(&mut self, doc: &mut Document) {
        for pill in self.pills.drain(..) {
            doc.remove_listener(pill.listener);
        }
    }
}

/// Whether the row mirrors a selected option.
pub fn is_row_selected(doc: &Document, row: NodeId) -> bool {
    doc.has_attr(row, SELECTED_ATTR)
}
