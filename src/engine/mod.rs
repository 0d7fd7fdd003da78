//! Component Engine - Index registry for mounted components.
//!
//! Every interactive component (an inline edit field, a traditional control)
//! is identified by a registry index. The focus system and keyboard router
//! address components by that index, never by reference:
//!
//! ```text
//! Index 0: InlineEdit (id="field-title-0",   focusable=true)
//! Index 1: InlineEdit (id="field-content-1", focusable=true)
//! ```

mod registry;

pub use registry::*;
