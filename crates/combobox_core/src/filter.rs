//! Text filtering of option rows.

use crate::dom::{Document, NodeId, Selector};
use crate::registry::{is_visible, row_label, row_value, OptionRegistry, ROW_CLASS};

/// Class of the empty-result indicator.
pub const NO_RESULTS_CLASS: &str = "no-results";

/// Class of a named group of rows.
pub const GROUP_CLASS: &str = "option-group";

/// Class of the create-row's label element.
pub const CREATE_LABEL_CLASS: &str = "combobox-create-label";

/// The create affordance, when the widget is creatable.
#[derive(Debug, Clone, Copy)]
pub struct CreateAffordance<'a> {
    /// The create-row element.
    pub row: NodeId,
    /// Configured label prefix.
    pub label_prefix: &'a str,
}

/// Result of one filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Rows left visible.
    pub visible: usize,
    /// Whether the create-row is shown.
    pub create_visible: bool,
}

/// Case-insensitive substring match against a row's value or label.
pub fn matches_query(value: &str, label: &str, query: &str) -> bool {
    let query = query.to_lowercase();
    value.to_lowercase().contains(&query) || label.to_lowercase().contains(&query)
}

/// Whether the create-row should be offered for `text`.
///
/// The trimmed text must be non-empty and must not equal any row's value or
/// label, ignoring case.
pub fn offers_create<'a>(text: &str, rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    let needle = trimmed.to_lowercase();
    !rows
        .into_iter()
        .any(|(value, label)| value.to_lowercase() == needle || label.to_lowercase() == needle)
}

/// Applies queries to the rows of one widget.
#[derive(Debug, Default)]
pub struct FilterEngine {
    query: String,
}

impl FilterEngine {
    /// Create an engine with an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Show rows matching `text`, hide the rest, update group headers, the
    /// empty-result indicator and the create-row.
    pub fn apply_query(
        &mut self,
        doc: &mut Document,
        registry: &OptionRegistry,
        panel: NodeId,
        create: Option<CreateAffordance<'_>>,
        text: &str,
    ) -> FilterOutcome {
        self.query = text.to_string();

        let rows: Vec<(NodeId, String, String)> = registry
            .rows(doc)
            .into_iter()
            .map(|row| (row, row_value(doc, row).to_string(), row_label(doc, row)))
            .collect();

        let mut visible = 0;
        for (row, value, label) in &rows {
            if matches_query(value, label, text) {
                doc.remove_style(*row, "display");
                visible += 1;
            } else {
                doc.set_style(*row, "display", "none");
            }
        }

        let no_results = doc.query(panel, Selector::Class(NO_RESULTS_CLASS));
        if let Some(indicator) = no_results {
            if visible == 0 {
                doc.remove_class(indicator, "hidden");
            } else {
                doc.add_class(indicator, "hidden");
            }
        }

        Self::update_groups(doc, panel);

        let mut create_visible = false;
        if let Some(create) = create {
            create_visible =
                offers_create(text, rows.iter().map(|(_, v, l)| (v.as_str(), l.as_str())));
            if create_visible {
                let label = format!("{} '{}'", create.label_prefix, text.trim());
                if let Some(label_el) = doc.query(create.row, Selector::Class(CREATE_LABEL_CLASS))
                {
                    doc.set_text(label_el, &label);
                }
                if let Some(indicator) = no_results {
                    doc.add_class(indicator, "hidden");
                }
            }
            doc.set_hidden(create.row, !create_visible);
        }

        tracing::debug!(query = text, visible, create_visible, "Filter applied");
        FilterOutcome { visible, create_visible }
    }

    /// Drop the query: every row and group visible again, create-row and
    /// empty-result indicator hidden, search field emptied.
    pub fn clear(
        &mut self,
        doc: &mut Document,
        registry: &OptionRegistry,
        panel: NodeId,
        create_row: Option<NodeId>,
        search: Option<NodeId>,
    ) {
        self.query.clear();
        if let Some(search) = search {
            doc.set_value(search, "");
        }
        for row in registry.rows(doc) {
            doc.remove_style(row, "display");
        }
        for group in doc.query_all(panel, Selector::Class(GROUP_CLASS)) {
            doc.remove_style(group, "display");
        }
        if let Some(create_row) = create_row {
            doc.set_hidden(create_row, true);
        }
        if let Some(indicator) = doc.query(panel, Selector::Class(NO_RESULTS_CLASS)) {
            doc.add_class(indicator, "hidden");
        }
    }

    fn update_groups(doc: &mut Document, panel: NodeId) {
        for group in doc.query_all(panel, Selector::Class(GROUP_CLASS)) {
            let any_visible = doc
                .query_all(group, Selector::Class(ROW_CLASS))
                .into_iter()
                .any(|row| is_visible(doc, row));
            if any_visible {
                doc.remove_style(group, "display");
            } else {
                doc.set_style(group, "display", "none");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Size;
    use crate::registry::{CREATE_ROW_CLASS, VALUE_ATTR};

    struct Fixture {
        doc: Document,
        panel: NodeId,
        registry: OptionRegistry,
        create: NodeId,
        no_results: NodeId,
        group: NodeId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let panel = doc.create_element("div");
        doc.append_child(doc.body(), panel);

        let add_row = |doc: &mut Document, parent: NodeId, value: &str, label: &str| {
            let row = doc.create_element("div");
            doc.add_class(row, ROW_CLASS);
            doc.set_attr(row, VALUE_ATTR, value);
            let span = doc.create_element("span");
            doc.set_text(span, label);
            doc.append_child(row, span);
            doc.append_child(parent, row);
        };
        add_row(&mut doc, panel, "apple", "Apple");
        add_row(&mut doc, panel, "banana", "Banana");
        let group = doc.create_element("div");
        doc.add_class(group, GROUP_CLASS);
        doc.append_child(panel, group);
        add_row(&mut doc, group, "cherry", "Cherry");

        let no_results = doc.create_element("div");
        doc.add_class(no_results, NO_RESULTS_CLASS);
        doc.add_class(no_results, "hidden");
        doc.append_child(panel, no_results);

        let create = doc.create_element("div");
        doc.add_class(create, ROW_CLASS);
        doc.add_class(create, CREATE_ROW_CLASS);
        doc.set_hidden(create, true);
        let label = doc.create_element("span");
        doc.add_class(label, CREATE_LABEL_CLASS);
        doc.append_child(create, label);
        doc.append_child(panel, create);

        let registry = OptionRegistry::new(panel);
        Fixture { doc, panel, registry, create, no_results, group }
    }

    fn visible_values(f: &Fixture) -> Vec<String> {
        f.registry.visible_rows(&f.doc).iter().map(|r| row_value(&f.doc, *r).to_string()).collect()
    }

    #[test]
    fn test_matches_value_or_label() {
        assert!(matches_query("nyc", "New York", "york"));
        assert!(matches_query("nyc", "New York", "NY"));
        assert!(!matches_query("nyc", "New York", "boston"));
        assert!(matches_query("x", "y", ""));
    }

    #[test]
    fn test_offers_create_rules() {
        let rows = [("apple", "Apple")];
        assert!(!offers_create("   ", rows));
        assert!(!offers_create(" APPLE ", rows));
        assert!(offers_create("app", rows));
    }

    #[test]
    fn test_apply_query_is_idempotent() {
        let mut f = fixture();
        let mut engine = FilterEngine::new();
        let first = engine.apply_query(&mut f.doc, &f.registry, f.panel, None, "an");
        let after_first = visible_values(&f);
        let second = engine.apply_query(&mut f.doc, &f.registry, f.panel, None, "an");

        assert_eq!(first, second);
        assert_eq!(visible_values(&f), after_first);
        assert_eq!(after_first, vec!["banana"]);
    }

    #[test]
    fn test_group_hidden_when_empty() {
        let mut f = fixture();
        let mut engine = FilterEngine::new();
        engine.apply_query(&mut f.doc, &f.registry, f.panel, None, "apple");
        assert!(f.doc.is_display_none(f.group));

        engine.apply_query(&mut f.doc, &f.registry, f.panel, None, "cher");
        assert!(!f.doc.is_display_none(f.group));
    }

    #[test]
    fn test_no_results_indicator() {
        let mut f = fixture();
        let mut engine = FilterEngine::new();
        let outcome = engine.apply_query(&mut f.doc, &f.registry, f.panel, None, "zzz");
        assert_eq!(outcome.visible, 0);
        assert!(!f.doc.has_class(f.no_results, "hidden"));
    }

    #[test]
    fn test_create_row_label_and_visibility() {
        let mut f = fixture();
        let mut engine = FilterEngine::new();
        let create = Some(CreateAffordance { row: f.create, label_prefix: "Add" });

        let outcome = engine.apply_query(&mut f.doc, &f.registry, f.panel, create, "  kiwi ");
        assert!(outcome.create_visible);
        assert!(!f.doc.is_hidden(f.create));
        assert_eq!(f.doc.text_content(f.create), "Add 'kiwi'");
        // The create-row replaces the empty-result indicator.
        assert!(f.doc.has_class(f.no_results, "hidden"));

        let outcome = engine.apply_query(&mut f.doc, &f.registry, f.panel, create, "banana");
        assert!(!outcome.create_visible);
        assert!(f.doc.is_hidden(f.create));
    }

    #[test]
    fn test_clear_restores_everything() {
        let mut f = fixture();
        let mut engine = FilterEngine::new();
        let search = f.doc.create_element("input");
        f.doc.set_value(search, "zzz");
        engine.apply_query(&mut f.doc, &f.registry, f.panel, None, "zzz");

        engine.clear(&mut f.doc, &f.registry, f.panel, Some(f.create), Some(search));
        assert_eq!(visible_values(&f).len(), 3);
        assert!(!f.doc.is_display_none(f.group));
        assert!(f.doc.has_class(f.no_results, "hidden"));
        assert_eq!(f.doc.value(search), "");
        assert_eq!(engine.query(), "");
    }
}
