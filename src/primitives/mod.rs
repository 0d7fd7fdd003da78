//! UI Primitives - Component building blocks.
//!
//! - [`InlineEditField`] - Click-to-edit text with its own edit state machine
//! - [`FormComposer`] - Renders a heterogeneous list of field descriptors
//! - labeled input/textarea renderers (stateless)
//!
//! # Architecture
//!
//! Stateful components own a registry index. The focus system and keyboard
//! router address them by that index:
//! 1. Allocate an index from the registry
//! 2. Register focused-key handlers and focus callbacks
//! 3. Keep local state in signals
//! 4. Unregister everything on drop
//!
//! Rendering is pull-based: `render()` reads current state and returns a
//! fresh [`Element`](crate::renderer::Element) tree.

mod edit_buffer;
mod form;
mod form_field;
mod inline_edit;
mod types;

pub use edit_buffer::EditBuffer;
pub use form::FormComposer;
pub use form_field::{render_input, render_textarea, resolve_id};
pub use inline_edit::InlineEditField;
pub use types::*;
