//! Note persistence collaborator.
//!
//! The store runs on the persistence worker thread, so implementations
//! must be `Send`. Everything else in the host stays single-threaded.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::note::{Note, NoteDraft, NoteId, NoteQuery};
use crate::error::{Error, Result};

/// Note storage backend.
pub trait NoteStore: Send {
    fn create(&mut self, draft: NoteDraft) -> Result<Note>;

    fn update(&mut self, id: NoteId, draft: NoteDraft) -> Result<Note>;

    fn get(&self, id: NoteId) -> Result<Note>;

    /// Notes matching `query`, already sorted.
    fn find(&self, query: &NoteQuery) -> Result<Vec<Note>>;
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send>;

/// In-memory store with an injectable clock.
pub struct MemoryNoteStore {
    notes: BTreeMap<NoteId, Note>,
    next_id: u64,
    clock: Clock,
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + 'static) -> Self {
        Self {
            notes: BTreeMap::new(),
            next_id: 1,
            clock: Box::new(clock),
        }
    }

    /// Store pre-filled with the sample notes.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.insert_seed_notes();
        store
    }

    pub fn insert_seed_notes(&mut self) {
        for (title, content) in SEED_NOTES {
            // Seed drafts always carry a title.
            let _ = self.create(NoteDraft::new(*title, *content));
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl NoteStore for MemoryNoteStore {
    fn create(&mut self, draft: NoteDraft) -> Result<Note> {
        draft.validate()?;
        let now = (self.clock)();
        let note = Note {
            id: NoteId::new(self.next_id),
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        };
        self.next_id += 1;
        self.notes.insert(note.id, note.clone());
        tracing::debug!(id = %note.id, "note created");
        Ok(note)
    }

    fn update(&mut self, id: NoteId, draft: NoteDraft) -> Result<Note> {
        draft.validate()?;
        let now = (self.clock)();
        let note = self.notes.get_mut(&id).ok_or(Error::NotFound(id))?;
        note.title = draft.title;
        note.content = draft.content;
        note.updated_at = now;
        tracing::debug!(id = %id, "note updated");
        Ok(note.clone())
    }

    fn get(&self, id: NoteId) -> Result<Note> {
        self.notes.get(&id).cloned().ok_or(Error::NotFound(id))
    }

    fn find(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        Ok(query.apply(self.notes.values()))
    }
}

const SEED_NOTES: &[(&str, &str)] = &[
    (
        "Body weight workout",
        "Neck exercises: - Always hands to the chest. sitting down with back straight. Better in ass under knees for example sitting in stairs side to side - 10 to each side. Shoulder exercises: - Wall slides - 3 sets of 15. - Band pull-aparts - 3 sets of 20. Core exercises: - Plank - 3 sets of 30 seconds. - Dead bug - 3 sets of 10 each side.",
    ),
    (
        "The people of kho rong",
        "Freedom Responsibility Honesty Solitude banning/forbid - doesnt work alchool in states and etc Patience Vulnerability is strength The ability to think to change your mind The ability to think to change your mind is a superpower. It's not a weakness to change your mind when presented with new information. In fact, it's a sign of intellectual maturity and growth.",
    ),
    (
        "Meeting Notes - Project Alpha",
        "Key discussion points:\n- Budget approval for Q2\n- Timeline adjustments needed\n- Resource allocation for new features\n- Risk assessment update\n\nAction items:\n- John to prepare budget proposal by Friday\n- Sarah to update project timeline\n- Mike to conduct risk analysis\n\nNext meeting: Next Tuesday at 2 PM",
    ),
    (
        "Recipe - Chocolate Chip Cookies",
        "Ingredients:\n- 2 1/4 cups all-purpose flour\n- 1 tsp baking soda\n- 1 tsp salt\n- 1 cup butter, softened\n- 3/4 cup granulated sugar\n- 3/4 cup packed brown sugar\n- 2 large eggs\n- 2 tsp vanilla extract\n- 2 cups chocolate chips\n\nInstructions:\n1. Preheat oven to 375°F\n2. Mix dry ingredients in a bowl\n3. Cream butter and sugars\n4. Add eggs and vanilla\n5. Gradually add flour mixture\n6. Stir in chocolate chips\n7. Drop rounded tablespoons onto ungreased cookie sheets\n8. Bake 9-11 minutes until golden brown",
    ),
    (
        "Book Recommendations",
        "Must-read books for this year:\n\nFiction:\n- The Seven Husbands of Evelyn Hugo by Taylor Jenkins Reid\n- Project Hail Mary by Andy Weir\n- The Midnight Library by Matt Haig\n\nNon-fiction:\n- Atomic Habits by James Clear\n- Sapiens by Yuval Noah Harari\n- Thinking, Fast and Slow by Daniel Kahneman\n\nBusiness:\n- Good to Great by Jim Collins\n- The Lean Startup by Eric Ries\n- Zero to One by Peter Thiel",
    ),
];
