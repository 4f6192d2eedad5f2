//! Error types for the combobox engine.
//!
//! Only mounting can fail outright. Everything after mount degrades a single
//! feature: the widget logs the error and keeps working.

use thiserror::Error;

/// Main error type for the combobox engine.
#[derive(Debug, Error)]
pub enum ComboboxError {
    /// A mandatory structural part is missing from the mount root.
    #[error("Missing part: {part}")]
    MissingPart {
        /// Role of the missing part (e.g. "trigger").
        part: &'static str,
    },

    /// A confirmation reply could not be decoded.
    #[error("Invalid reply: {message}")]
    InvalidReply {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The confirmation receiver is gone.
    #[error("Confirmation channel closed for widget '{widget_id}'")]
    ChannelClosed {
        /// Identifier of the widget that tried to dispatch.
        widget_id: String,
    },

    /// A node left the document while an operation still referenced it.
    #[error("Detached node: {what}")]
    Detached {
        /// What the node was used for.
        what: String,
    },

    /// Configuration error.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },
}

impl ComboboxError {
    // ========== Constructors ==========

    /// Create a missing part error.
    pub fn missing_part(part: &'static str) -> Self {
        Self::MissingPart { part }
    }

    /// Create an invalid reply error.
    pub fn invalid_reply(message: impl Into<String>) -> Self {
        Self::InvalidReply { message: message.into(), source: None }
    }

    /// Create a channel closed error.
    pub fn channel_closed(widget_id: impl Into<String>) -> Self {
        Self::ChannelClosed { widget_id: widget_id.into() }
    }

    /// Create a detached node error.
    pub fn detached(what: impl Into<String>) -> Self {
        Self::Detached { what: what.into() }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    // ========== Methods ==========

    /// Whether the widget can keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::MissingPart { .. })
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingPart { .. } => "Mount",
            Self::InvalidReply { .. } => "Reply",
            Self::ChannelClosed { .. } => "Channel",
            Self::Detached { .. } => "Document",
            Self::Config { .. } => "Config",
        }
    }

    /// Get actionable hint for the host.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::MissingPart { .. } => {
                Some("The root must contain a trigger, a backing store and a listbox panel")
            }
            Self::InvalidReply { .. } => {
                Some("Replies must be JSON objects with optional error, value and label")
            }
            Self::ChannelClosed { .. } => Some("Keep the confirmation receiver alive"),
            Self::Detached { .. } => None,
            Self::Config { .. } => None,
        }
    }
}

/// Convert from serde_json::Error to ComboboxError.
impl From<serde_json::Error> for ComboboxError {
    fn from(err: serde_json::Error) -> Self {
        ComboboxError::InvalidReply {
            message: format!("JSON error: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_part_is_not_recoverable() {
        let err = ComboboxError::missing_part("trigger");
        assert!(!err.is_recoverable());
        assert_eq!(err.category(), "Mount");
        assert_eq!(err.to_string(), "Missing part: trigger");
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_json_error_converts_to_invalid_reply() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ComboboxError = json_err.into();
        assert!(err.is_recoverable());
        assert_eq!(err.category(), "Reply");
        assert!(err.to_string().starts_with("Invalid reply: JSON error"));
    }
}
