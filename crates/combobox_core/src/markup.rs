//! Builder for the element structure a combobox mounts on.
//!
//! Servers normally render this structure; the builder produces the same
//! tree inside a [`Document`] for hosts that assemble it in code.

use crate::dom::{Document, NodeId};
use crate::filter::{CREATE_LABEL_CLASS, GROUP_CLASS, NO_RESULTS_CLASS};
use crate::registry::{render_row, CREATE_ROW_CLASS, ROW_CLASS};

#[derive(Debug, Clone)]
struct OptionDef {
    value: String,
    label: String,
    selected: bool,
}

#[derive(Debug, Clone)]
enum Entry {
    Option(OptionDef),
    Group { name: String, options: Vec<OptionDef> },
}

/// Describes one combobox.
#[derive(Debug, Clone)]
pub struct ComboboxMarkup {
    id: String,
    multiple: bool,
    placeholder: String,
    entries: Vec<Entry>,
    search: bool,
    clear_button: bool,
    creatable: bool,
    create_label: Option<String>,
    on_create: Option<String>,
    trigger_id: bool,
}

/// Elements of a built combobox.
#[derive(Debug, Clone, Copy)]
pub struct MarkupHandles {
    pub root: NodeId,
    pub store: NodeId,
    pub trigger: NodeId,
    pub placeholder: NodeId,
    pub summary: NodeId,
    pub clear_button: Option<NodeId>,
    pub panel: NodeId,
    pub search: Option<NodeId>,
    pub list: NodeId,
    pub no_results: NodeId,
    pub create_row: Option<NodeId>,
}

impl ComboboxMarkup {
    /// Start a combobox. The root gets the id `{id}-combo`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            multiple: false,
            placeholder: "Select...".to_string(),
            entries: Vec::new(),
            search: true,
            clear_button: true,
            creatable: false,
            create_label: None,
            on_create: None,
            trigger_id: true,
        }
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Add an unselected option.
    pub fn option(self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.push_option(value.into(), label.into(), false)
    }

    /// Add a preselected option.
    pub fn selected_option(self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.push_option(value.into(), label.into(), true)
    }

    fn push_option(mut self, value: String, label: String, selected: bool) -> Self {
        self.entries.push(Entry::Option(OptionDef { value, label, selected }));
        self
    }

    /// Add a named group of unselected options.
    pub fn group<'a>(
        mut self,
        name: impl Into<String>,
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let options = options
            .into_iter()
            .map(|(value, label)| OptionDef {
                value: value.to_string(),
                label: label.to_string(),
                selected: false,
            })
            .collect();
        self.entries.push(Entry::Group { name: name.into(), options });
        self
    }

    /// Include the search field (default on).
    pub fn search(mut self, search: bool) -> Self {
        self.search = search;
        self
    }

    /// Include the clear button (default on).
    pub fn clear_button(mut self, clear_button: bool) -> Self {
        self.clear_button = clear_button;
        self
    }

    /// Allow creating options, with the create-row label prefix.
    pub fn creatable(mut self, label: Option<&str>) -> Self {
        self.creatable = true;
        self.create_label = label.map(String::from);
        self
    }

    /// Event name for create confirmations.
    pub fn on_create(mut self, event: impl Into<String>) -> Self {
        self.on_create = Some(event.into());
        self
    }

    /// Leave the trigger without an id so the widget generates one.
    pub fn anonymous_trigger(mut self) -> Self {
        self.trigger_id = false;
        self
    }

    fn options(&self) -> impl Iterator<Item = &OptionDef> {
        self.entries.iter().flat_map(|entry| match entry {
            Entry::Option(option) => std::slice::from_ref(option).iter(),
            Entry::Group { options, .. } => options.iter(),
        })
    }

    /// Build the tree under `parent`.
    pub fn build(&self, doc: &mut Document, parent: NodeId) -> MarkupHandles {
        let root = doc.create_element("div");
        doc.set_attr(root, "id", &format!("{}-combo", self.id));
        doc.add_class(root, "combobox");
        doc.add_class(root, "relative");
        if self.creatable {
            doc.set_attr(root, "data-creatable", "");
        }
        if let Some(label) = &self.create_label {
            doc.set_attr(root, "data-create-label", label);
        }
        if let Some(event) = &self.on_create {
            doc.set_attr(root, "data-on-create", event);
        }
        doc.append_child(parent, root);

        let store = doc.create_element("select");
        doc.add_class(store, "combo-select");
        doc.set_attr(store, "name", &self.id);
        doc.set_hidden(store, true);
        if self.multiple {
            doc.set_attr(store, "multiple", "");
        }
        for def in self.options() {
            let option = doc.create_element("option");
            doc.set_value(option, &def.value);
            doc.set_text(option, &def.label);
            if def.selected {
                doc.set_attr(option, "selected", "");
            }
            doc.append_child(store, option);
        }
        doc.append_child(root, store);

        let trigger = doc.create_element("button");
        doc.add_class(trigger, "combobox-trigger");
        if self.trigger_id {
            doc.set_attr(trigger, "id", &format!("{}-trigger", self.id));
        }
        doc.set_attr(trigger, "aria-haspopup", "listbox");
        doc.set_attr(trigger, "aria-expanded", "false");
        let placeholder = doc.create_element("span");
        doc.add_class(placeholder, "combobox-placeholder");
        doc.set_text(placeholder, &self.placeholder);
        doc.append_child(trigger, placeholder);
        let summary = doc.create_element("span");
        doc.add_class(summary, "selected-value");
        doc.append_child(trigger, summary);
        doc.append_child(root, trigger);

        let clear_button = self.clear_button.then(|| {
            let button = doc.create_element("button");
            doc.set_attr(button, "data-part", "clear-combobox-button");
            doc.set_attr(button, "aria-label", "Clear selection");
            doc.set_hidden(button, true);
            doc.append_child(root, button);
            button
        });

        let panel = doc.create_element("div");
        doc.set_attr(panel, "data-part", "listbox");
        doc.set_attr(panel, "role", "listbox");
        doc.add_class(panel, "absolute");
        doc.set_hidden(panel, true);
        doc.append_child(root, panel);

        let search = self.search.then(|| {
            let wrapper = doc.create_element("div");
            doc.add_class(wrapper, "combobox-search");
            let input = doc.create_element("input");
            doc.add_class(input, "combobox-search-input");
            doc.set_attr(input, "type", "text");
            doc.append_child(wrapper, input);
            doc.append_child(panel, wrapper);
            input
        });

        let list = doc.create_element("div");
        doc.add_class(list, "combobox-options");
        doc.append_child(panel, list);

        let mut index = 0;
        for entry in &self.entries {
            match entry {
                Entry::Option(def) => {
                    let row = self.row(doc, index, def);
                    doc.append_child(list, row);
                    index += 1;
                }
                Entry::Group { name, options } => {
                    let group = doc.create_element("div");
                    doc.add_class(group, GROUP_CLASS);
                    let header = doc.create_element("div");
                    doc.add_class(header, "option-group-label");
                    doc.set_text(header, name);
                    doc.append_child(group, header);
                    for def in options {
                        let row = self.row(doc, index, def);
                        doc.append_child(group, row);
                        index += 1;
                    }
                    doc.append_child(list, group);
                }
            }
        }

        let no_results = doc.create_element("div");
        doc.add_class(no_results, NO_RESULTS_CLASS);
        doc.add_class(no_results, "hidden");
        doc.set_text(no_results, "No results");
        doc.append_child(list, no_results);

        let create_row = self.creatable.then(|| {
            let row = doc.create_element("div");
            doc.set_attr(row, "data-part", "create-option");
            doc.add_class(row, ROW_CLASS);
            doc.add_class(row, CREATE_ROW_CLASS);
            doc.set_attr(row, "role", "option");
            doc.set_hidden(row, true);
            let label = doc.create_element("span");
            doc.add_class(label, CREATE_LABEL_CLASS);
            doc.append_child(row, label);
            doc.append_child(panel, row);
            row
        });

        MarkupHandles {
            root,
            store,
            trigger,
            placeholder,
            summary,
            clear_button,
            panel,
            search,
            list,
            no_results,
            create_row,
        }
    }

    fn row(&self, doc: &mut Document, index: usize, def: &OptionDef) -> NodeId {
        let id = format!("{}-option-{index}", self.id);
        render_row(doc, Some(&id), &def.value, &def.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Selector, Size};
    use crate::model::SelectionModel;
    use crate::registry::OptionRegistry;

    #[test]
    fn test_build_structure() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.body();
        let handles = ComboboxMarkup::new("fruit")
            .option("apple", "Apple")
            .selected_option("banana", "Banana")
            .group("Berries", [("straw", "Strawberry")])
            .creatable(Some("Add"))
            .on_create("fruit_created")
            .build(&mut doc, body);

        assert_eq!(doc.id(handles.root), Some("fruit-combo"));
        assert_eq!(doc.attr(handles.root, "data-create-label"), Some("Add"));
        assert!(doc.is_hidden(handles.panel));

        let model = SelectionModel::new(&doc, handles.store);
        assert!(!model.is_multiple());
        assert_eq!(model.options(&doc).len(), 3);
        assert_eq!(model.selected_values(&doc), vec!["banana"]);

        let registry = OptionRegistry::new(handles.root);
        assert_eq!(registry.rows(&doc).len(), 3);
        assert_eq!(doc.query_all(handles.panel, Selector::Class(GROUP_CLASS)).len(), 1);
        assert!(handles.create_row.is_some());
        assert!(handles.search.is_some());
    }

    #[test]
    fn test_optional_parts_can_be_left_out() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.body();
        let handles = ComboboxMarkup::new("plain")
            .search(false)
            .clear_button(false)
            .anonymous_trigger()
            .build(&mut doc, body);
        assert!(handles.search.is_none());
        assert!(handles.clear_button.is_none());
        assert!(handles.create_row.is_none());
        assert!(doc.id(handles.trigger).is_none());
    }
}
