//! Host layer: the notes screen built on the form primitives.
//!
//! - [`note`] - note model, queries, view modes
//! - [`store`] - `NoteStore` trait and the in-memory store
//! - [`worker`] - persistence thread
//! - [`notes_list`] - list panel markup
//! - [`notes_page`] - the page itself

pub mod format;
pub mod note;
pub mod notes_list;
pub mod notes_page;
pub mod store;
pub mod worker;

pub use note::{Note, NoteDraft, NoteId, NoteQuery, SortDirection, SortField, ViewMode};
pub use notes_list::{render_notes_list, NotesListView};
pub use notes_page::{NotesPage, CONTENT_KEY, TITLE_KEY};
pub use store::{MemoryNoteStore, NoteStore};
pub use worker::{PersistenceWorker, RequestId, Response};
