//! Widget configuration.
//!
//! The mount root carries the create-flow configuration as attributes
//! (`data-creatable`, `data-create-label`, `data-on-create`). Hosts can also
//! build a [`ComboboxConfig`] in code or load it from JSON.

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};
use crate::error::ComboboxError;

/// Label prefix of the create-row when none is configured.
pub const DEFAULT_CREATE_LABEL: &str = "Create";

/// Gap between trigger and portaled panel, in pixels.
pub const PANEL_GAP: f32 = 8.0;

/// Panel height assumed when the panel has not been measured yet.
pub const FALLBACK_PANEL_HEIGHT: f32 = 200.0;

/// Stacking order of the portal overlay.
pub const PORTAL_Z_INDEX: u32 = 9999;

/// Create-flow configuration of one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComboboxConfig {
    /// Whether users may create options that are not in the list.
    pub creatable: bool,
    /// Prefix of the create-row label (`"{create_label} '{query}'"`).
    pub create_label: String,
    /// Event name sent over the confirmation channel. No confirmation round
    /// trip happens without it.
    pub on_create: Option<String>,
}

impl Default for ComboboxConfig {
    fn default() -> Self {
        Self { creatable: false, create_label: DEFAULT_CREATE_LABEL.to_string(), on_create: None }
    }
}

impl ComboboxConfig {
    /// Read configuration from the mount root's attributes.
    pub fn from_attributes(doc: &Document, root: NodeId) -> Self {
        let create_label = doc
            .attr(root, "data-create-label")
            .filter(|label| !label.is_empty())
            .unwrap_or(DEFAULT_CREATE_LABEL)
            .to_string();

        Self {
            creatable: doc.has_attr(root, "data-creatable"),
            create_label,
            on_create: doc
                .attr(root, "data-on-create")
                .filter(|event| !event.is_empty())
                .map(String::from),
        }
    }

    /// Load configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ComboboxError> {
        serde_json::from_str(json).map_err(|e| ComboboxError::config(e.to_string()))
    }

    /// Set whether options can be created.
    pub fn creatable(mut self, creatable: bool) -> Self {
        self.creatable = creatable;
        self
    }

    /// Set the create-row label prefix.
    pub fn create_label(mut self, label: impl Into<String>) -> Self {
        self.create_label = label.into();
        self
    }

    /// Set the confirmation event name.
    pub fn on_create(mut self, event: impl Into<String>) -> Self {
        self.on_create = Some(event.into());
        self
    }

    /// Label shown on the create-row for a trimmed query.
    pub fn create_row_label(&self, trimmed_query: &str) -> String {
        format!("{} '{}'", self.create_label, trimmed_query)
    }
}
