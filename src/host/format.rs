//! Date and preview formatting for the notes screens.

use std::fmt;

use chrono::{DateTime, TimeZone};

use super::note::Note;

/// Group heading: `16/10/26`.
pub fn list_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%d/%m/%y").to_string()
}

/// Item timestamp: `16/10/26, 09:30`.
pub fn list_date_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%d/%m/%y, %H:%M").to_string()
}

/// Long form: `16 Oct 2026, 09:30`.
pub fn long_date_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%-d %b %Y, %H:%M").to_string()
}

pub const NEW_NOTE_SUBTITLE: &str = "Start typing to create your note...";

/// Document subtitle for the selected note, rendered in `tz`.
pub fn document_subtitle<Tz: TimeZone>(note: Option<&Note>, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    match note {
        Some(note) => format!(
            "Created: {} • Last updated: {}",
            long_date_time(&note.created_at.with_timezone(tz)),
            long_date_time(&note.updated_at.with_timezone(tz)),
        ),
        None => NEW_NOTE_SUBTITLE.to_string(),
    }
}

/// First `max` characters plus `...`, or the whole text when it fits.
pub fn truncate(content: &str, max: usize) -> String {
    match content.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
