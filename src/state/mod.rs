//! State Module - Runtime interaction state
//!
//! - **Focus** - Focused index signal, Tab cycling, focus/blur callbacks
//! - **Keyboard** - Event types, handler registry, priority routing

pub mod focus;
pub mod keyboard;

pub use focus::*;
pub use keyboard::*;
