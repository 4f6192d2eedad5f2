//! Headless combobox engine.
//!
//! A combobox over a host-owned element tree: pick one or more values from a
//! filterable list, create new values on the fly, and escape clipping
//! containers by moving the dropdown into a top-level overlay.
//!
//! - **dom**: Retained element tree, listener table and structural observers
//! - **model**: Selection model adapter over the backing `select` store
//! - **registry**: Live option rows and their click bindings
//! - **filter**: Text filtering and the create affordance
//! - **navigation**: Keyboard cursor and key mapping
//! - **presentation**: Summary label, pills, placeholder and clear button
//! - **portal**: Clipping detection, overlay relocation and placement
//! - **create_flow** / **channel**: Optimistic create and its confirmation
//! - **widget**: The [`Combobox`] tying it together
//! - **markup**: Builder for the mount structure
//! - **config**, **events**, **error**, **logging**: Ambient support

pub mod channel;
pub mod config;
pub mod create_flow;
pub mod dom;
pub mod error;
pub mod events;
pub mod filter;
pub mod logging;
pub mod markup;
pub mod model;
pub mod navigation;
pub mod portal;
pub mod presentation;
pub mod registry;
pub mod widget;


pub use channel::{ConfirmationChannel, CreatePayload, CreateReply, CreateRequest};
pub use create_flow::CreatedOption;
pub use config::ComboboxConfig;
pub use dom::{DomEvent, Document, NodeId, Rect, Size};
pub use error::ComboboxError;
pub use events::{ComboboxEvent, EventRecorder, SubscriptionId};
pub use markup::{ComboboxMarkup, MarkupHandles};
pub use model::{OptionEntry, SelectionModel};
pub use navigation::Cursor;
pub use widget::{Combobox, ReplyApplied};
