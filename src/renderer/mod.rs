//! Renderer - Markup tree and output.
//!
//! - [`Element`]/[`Node`]: the tree components produce
//! - [`to_html`]: serialization
//! - [`DiffRenderer`]: writes frames only when they change

mod diff;
mod html;
mod markup;

pub use diff::DiffRenderer;
pub use html::to_html;
pub use markup::{Element, Node};
