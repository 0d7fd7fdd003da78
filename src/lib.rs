//! # notabili
//!
//! Click-to-edit note fields and a polymorphic form renderer, built on
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals) for component
//! state.
//!
//! ## Architecture
//!
//! Components are registry indices, not objects the platform holds on to.
//! Focus and keyboard routing address them by index; each component keeps its
//! local state in signals and renders a fresh markup tree on demand:
//!
//! ```text
//! host values → FormComposer → InlineEditField / labeled controls → Element → HTML
//!      ↑                                │
//!      └──── on_change / on_save ───────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Field kinds, layouts, control flags, class lists
//! - [`engine`] - Component index registry
//! - [`state`] - Focus and keyboard routing
//! - [`renderer`] - Markup tree, HTML output, diff writer
//! - [`primitives`] - InlineEditField, FormComposer, labeled controls
//! - [`theme`] - Light/dark mode with a persisted preference
//! - [`host`] - Note model, store, persistence worker, notes screen
//! - [`config`], [`context`], [`logging`], [`error`]

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod host;
pub mod logging;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::AppConfig;
pub use context::{AppContext, Session, SessionProvider, StaticSession};
pub use error::{Error, Result};

pub use engine::{
    allocate_index, get_allocated_indices, get_id, get_index, is_allocated, on_destroy,
    release_index, reset_registry,
};

pub use renderer::{to_html, DiffRenderer, Element, Node};

pub use primitives::{
    ChangeCallback, Cleanup, EditBuffer, FieldChrome, FieldDescriptor, FooterLink, FormComposer,
    FormProps, InlineEditField, InlineEditProps, InlineField, LabeledInput, LabeledTextarea,
    NativeAttrs, RawControl, SaveCallback, SubmitButton, SubmitCallback,
};

pub use state::{
    // Focus
    blur, focus_next, focus_previous, get_focusable_indices, get_focused_index, has_focus,
    is_focused, register_callbacks, reset_focus_state, FocusCallbacks,
    // Keyboard
    dispatch_focused, dispatch_global, on as on_keyboard, on_focused, reset_keyboard_state,
    route_keyboard_event, KeyState, KeyboardEvent, Modifiers,
};

pub use theme::{JsonFilePreferences, MemoryPreferences, PreferenceStore, ThemeMode, ThemeState};

pub use host::{MemoryNoteStore, Note, NoteDraft, NoteId, NoteQuery, NoteStore, NotesPage};
