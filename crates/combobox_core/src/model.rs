//! Selection model adapter over the backing store.
//!
//! The backing store is a `select` element whose `option` children are the
//! authoritative entries: `value` attribute, `selected` attribute, text
//! label. Every edit goes through [`SelectionModel`]. The methods report
//! whether anything changed; the widget turns a change into exactly one
//! notification after refreshing the presentation.

use crate::dom::{Document, NodeId, Selector};

/// One entry of the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    /// The `option` element.
    pub node: NodeId,
    /// Submitted value.
    pub value: String,
    /// Display label (falls back to the value).
    pub label: String,
    /// Whether the entry is selected.
    pub selected: bool,
}

impl OptionEntry {
    /// Placeholder entries have an empty value and never count as a choice.
    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

/// Adapter over the backing `select` element.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    store: NodeId,
    multiple: bool,
}

impl SelectionModel {
    /// Wrap a backing store. Multiplicity is read once from the `multiple`
    /// attribute and fixed from then on.
    pub fn new(doc: &Document, store: NodeId) -> Self {
        Self { store, multiple: doc.has_attr(store, "multiple") }
    }

    /// The backing store element.
    pub fn store(&self) -> NodeId {
        self.store
    }

    /// Whether several entries may be selected.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Every entry in store order.
    pub fn options(&self, doc: &Document) -> Vec<OptionEntry> {
        doc.query_all(self.store, Selector::Tag("option"))
            .into_iter()
            .map(|node| Self::entry(doc, node))
            .collect()
    }

    fn entry(doc: &Document, node: NodeId) -> OptionEntry {
        let value = doc.value(node).to_string();
        let text = doc.text_content(node);
        let label = match text.trim() {
            "" => value.clone(),
            trimmed => trimmed.to_string(),
        };
        OptionEntry { node, value, label, selected: doc.has_attr(node, "selected") }
    }

    /// Entry with exactly this value.
    pub fn find(&self, doc: &Document, value: &str) -> Option<OptionEntry> {
        self.options(doc).into_iter().find(|entry| entry.value == value)
    }

    /// Selected entries in store order. Placeholders are skipped.
    pub fn selected(&self, doc: &Document) -> Vec<OptionEntry> {
        self.options(doc).into_iter().filter(|e| e.selected && !e.is_placeholder()).collect()
    }

    /// Selected values in store order.
    pub fn selected_values(&self, doc: &Document) -> Vec<String> {
        self.selected(doc).into_iter().map(|e| e.value).collect()
    }

    /// Whether an entry's value equals `text`, ignoring case.
    pub fn contains_value_ci(&self, doc: &Document, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.options(doc).iter().any(|e| e.value.to_lowercase() == needle)
    }

    /// Select `value`. In single mode every other entry is deselected.
    /// Absent values leave the store untouched.
    pub fn select(&self, doc: &mut Document, value: &str) -> bool {
        let options = self.options(doc);
        if !options.iter().any(|e| e.value == value) {
            tracing::debug!(value, "Select ignored: value not in store");
            return false;
        }

        let mut changed = false;
        for entry in options {
            let want = if entry.value == value {
                true
            } else if self.multiple {
                entry.selected
            } else {
                false
            };
            changed |= Self::set_selected(doc, &entry, want);
        }
        changed
    }

    /// Flip the selection of `value`. Multiple mode only.
    ///
    /// Returns the new state, or `None` when nothing happened.
    pub fn toggle(&self, doc: &mut Document, value: &str) -> Option<bool> {
        if !self.multiple {
            tracing::debug!(value, "Toggle ignored in single mode");
            return None;
        }
        let entry = self.find(doc, value)?;
        let selected = !entry.selected;
        Self::set_selected(doc, &entry, selected);
        Some(selected)
    }

    /// Deselect `value`.
    pub fn deselect(&self, doc: &mut Document, value: &str) -> bool {
        match self.find(doc, value) {
            Some(entry) => Self::set_selected(doc, &entry, false),
            None => false,
        }
    }

    /// Deselect everything.
    pub fn clear_all(&self, doc: &mut Document) -> bool {
        let mut changed = false;
        for entry in self.options(doc) {
            changed |= Self::set_selected(doc, &entry, false);
        }
        changed
    }

    /// Append a new, unselected entry.
    pub fn append(&self, doc: &mut Document, value: &str, label: &str) -> NodeId {
        let node = doc.create_element("option");
        doc.set_value(node, value);
        doc.set_text(node, label);
        doc.append_child(self.store, node);
        node
    }

    /// The entry for `node` while it is still one of the store's options.
    pub fn entry_of(&self, doc: &Document, node: NodeId) -> Option<OptionEntry> {
        (doc.tag(node) == "option" && doc.contains(self.store, node))
            .then(|| Self::entry(doc, node))
    }

    /// Remove the option `node` from the store.
    pub fn remove(&self, doc: &mut Document, node: NodeId) -> bool {
        if self.entry_of(doc, node).is_none() {
            return false;
        }
        doc.remove(node);
        true
    }

    /// Rewrite value and/or label of the option `node` in place.
    pub fn rewrite(
        &self,
        doc: &mut Document,
        node: NodeId,
        new_value: Option<&str>,
        new_label: Option<&str>,
    ) -> bool {
        if self.entry_of(doc, node).is_none() {
            return false;
        }
        if let Some(new_value) = new_value {
            doc.set_value(node, new_value);
        }
        if let Some(new_label) = new_label {
            doc.set_text(node, new_label);
        }
        new_value.is_some() || new_label.is_some()
    }

    fn set_selected(doc: &mut Document, entry: &OptionEntry, selected: bool) -> bool {
        if entry.selected == selected {
            return false;
        }
        if selected {
            doc.set_attr(entry.node, "selected", "");
        } else {
            doc.remove_attr(entry.node, "selected");
        }
        true
    }
}
