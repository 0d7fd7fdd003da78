//! Notes list panel: header toolbar, search box, sort menu and the notes
//! grouped by day of last update.
//!
//! Buttons carry a `data-action` attribute and note cards a `data-note-id`
//! so the platform can route clicks back to [`NotesPage`](super::NotesPage).

use std::fmt;

use chrono::TimeZone;

use super::format::{list_date, list_date_time, truncate};
use super::note::{Note, NoteId, NoteQuery, SortDirection, SortField, ViewMode};
use crate::renderer::Element;

const TOOL_BUTTON: &str = "p-2 hover:bg-surface-elevated rounded-lg transition-colors text-text-secondary hover:text-text-primary";
const CARD: &str = "bg-surface rounded-lg p-3 hover:bg-surface-elevated transition-colors cursor-pointer border border-border";
const CARD_SELECTED: &str = "border-l-4 border-primary-500 bg-primary-50/10";
const SELECT: &str = "w-full px-2 py-1 bg-surface border border-border rounded text-text-primary focus:outline-none focus:ring-1 focus:ring-border-focus text-xs";

const SORT_ICON: &str = "M3 4h13M3 8h9m-9 4h6m4 0l4-4m0 0l4 4m-4-4v12";
const FILTER_ICON: &str = "M3 4a1 1 0 011-1h16a1 1 0 011 1v2.586a1 1 0 01-.293.707l-6.414 6.414a1 1 0 00-.293.707V17l-4 4v-6.586a1 1 0 00-.293-.707L3.293 7.207A1 1 0 013 6.5V4z";
const VIEW_ICON: &str = "M4 6a2 2 0 012-2h2a2 2 0 012 2v2a2 2 0 01-2 2H6a2 2 0 01-2-2V6zM14 6a2 2 0 012-2h2a2 2 0 012 2v2a2 2 0 01-2 2h-2a2 2 0 01-2-2V6zM4 16a2 2 0 012-2h2a2 2 0 012 2v2a2 2 0 01-2 2H6a2 2 0 01-2-2v-2zM14 16a2 2 0 012-2h2a2 2 0 012 2v2a2 2 0 01-2 2h-2a2 2 0 01-2-2v-2z";
const PLUS_ICON: &str = "M12 4v16m8-8H4";

pub const SEARCH_INPUT_ID: &str = "notes-search";
pub const SORT_FIELD_ID: &str = "notes-sort-field";
pub const SORT_DIRECTION_ID: &str = "notes-sort-direction";

/// Everything the list panel displays.
pub struct NotesListView<'a> {
    pub notes: &'a [Note],
    pub selected: Option<NoteId>,
    pub view_mode: ViewMode,
    pub query: &'a NoteQuery,
    pub show_search: bool,
    pub show_sort_options: bool,
    pub is_loading: bool,
}

/// Group notes by `dd/mm/yy` of their last update, keeping list order.
pub fn group_by_date<'a, Tz: TimeZone>(notes: &'a [Note], tz: &Tz) -> Vec<(String, Vec<&'a Note>)>
where
    Tz::Offset: fmt::Display,
{
    let mut groups: Vec<(String, Vec<&Note>)> = Vec::new();
    for note in notes {
        let day = list_date(&note.updated_at.with_timezone(tz));
        match groups.iter_mut().find(|(d, _)| *d == day) {
            Some((_, members)) => members.push(note),
            None => groups.push((day, vec![note])),
        }
    }
    groups
}

pub fn render_notes_list<Tz: TimeZone>(view: &NotesListView<'_>, tz: &Tz) -> Element
where
    Tz::Offset: fmt::Display,
{
    let mut header = Element::new("div").class(&["mb-4"]).child(toolbar(view.notes.len()));
    if view.show_search {
        header = header.child(search_box(view.query.search.as_deref().unwrap_or("")));
    }
    if view.show_sort_options {
        header = header.child(sort_options(view.query));
    }

    let groups = group_by_date(view.notes, tz).into_iter().map(|(day, notes)| {
        let cards = notes.into_iter().map(|note| note_card(note, view, tz));
        Element::new("div")
            .attr("data-group", day.as_str())
            .child(Element::new("h2").class(&["text-sm font-semibold text-text-secondary mb-2"]).text(day))
            .child(Element::new("div").class(&[match view.view_mode {
                ViewMode::Kanban => "space-y-2",
                ViewMode::List => "space-y-1",
            }])
            .children(cards))
    });

    let list = Element::new("div")
        .class(&[match view.view_mode {
            ViewMode::Kanban => "space-y-4",
            ViewMode::List => "space-y-2",
        }])
        .attr("data-view", view_name(view.view_mode))
        .children(groups);

    let empty = (view.notes.is_empty() && !view.is_loading).then(|| {
        Element::new("div")
            .class(&["text-center py-8"])
            .child(Element::new("p").class(&["text-text-secondary text-sm"]).text("No notes found"))
            .child(
                Element::new("button")
                    .attr("type", "button")
                    .attr("data-action", "new-note")
                    .class(&["mt-2 px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg transition-colors text-white text-sm"])
                    .text("Create your first note"),
            )
    });

    Element::new("div")
        .class(&["w-1/3 border-r border-border bg-surface/50 backdrop-blur-sm overflow-y-auto"])
        .child(
            Element::new("div")
                .class(&["p-4"])
                .child(header)
                .child(list)
                .child_opt(empty),
        )
}

fn view_name(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Kanban => "kanban",
        ViewMode::List => "list",
    }
}

fn icon(path: &str, size: &str) -> Element {
    Element::new("svg")
        .class(&[size])
        .attr("fill", "none")
        .attr("stroke", "currentColor")
        .attr("viewBox", "0 0 24 24")
        .child(
            Element::new("path")
                .attr("stroke-linecap", "round")
                .attr("stroke-linejoin", "round")
                .attr("stroke-width", "2")
                .attr("d", path),
        )
}

fn tool_button(action: &str, label: &str, path: &str) -> Element {
    Element::new("button")
        .attr("type", "button")
        .attr("data-action", action)
        .attr("aria-label", label)
        .class(&[TOOL_BUTTON])
        .child(icon(path, "w-4 h-4"))
}

fn toolbar(count: usize) -> Element {
    Element::new("div")
        .class(&["flex items-center justify-between mb-4"])
        .child(
            Element::new("div")
                .child(Element::new("h1").class(&["text-xl font-bold text-text-primary"]).text("Notes"))
                .child(
                    Element::new("p")
                        .class(&["text-text-secondary text-sm", "notes-count"])
                        .text(format!("{count} notes")),
                ),
        )
        .child(
            Element::new("div")
                .class(&["flex items-center space-x-2"])
                .child(tool_button("toggle-sort", "Sort notes", SORT_ICON))
                .child(tool_button("toggle-search", "Filter notes", FILTER_ICON))
                .child(tool_button("toggle-view", "Change view", VIEW_ICON))
                .child(
                    Element::new("button")
                        .attr("type", "button")
                        .attr("data-action", "new-note")
                        .class(&["px-3 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg transition-colors text-white flex items-center gap-2 text-sm"])
                        .child(icon(PLUS_ICON, "w-3 h-3"))
                        .text("New"),
                ),
        )
}

fn search_box(search: &str) -> Element {
    Element::new("div").class(&["mb-4"]).child(
        Element::new("input")
            .attr("id", SEARCH_INPUT_ID)
            .attr("type", "text")
            .attr("placeholder", "Search notes...")
            .attr("value", search)
            .class(&["w-full px-3 py-2 bg-surface border border-border rounded-lg text-text-primary placeholder-text-tertiary focus:outline-none focus:ring-2 focus:ring-border-focus text-sm"]),
    )
}

fn option(value: &str, label: &str, selected: bool) -> Element {
    Element::new("option")
        .attr("value", value)
        .flag("selected", selected)
        .text(label)
}

fn sort_options(query: &NoteQuery) -> Element {
    let fields = [SortField::UpdatedAt, SortField::CreatedAt, SortField::Title]
        .into_iter()
        .map(|f| option(f.as_str(), f.label(), f == query.sort_field));
    let directions = [SortDirection::Desc, SortDirection::Asc]
        .into_iter()
        .map(|d| option(d.as_str(), d.label(), d == query.direction));

    let labeled = |label: &str, id: &str, options: Vec<Element>| {
        Element::new("div")
            .child(
                Element::new("label")
                    .attr("for", id)
                    .class(&["block text-xs font-medium text-text-secondary mb-1"])
                    .text(label),
            )
            .child(Element::new("select").attr("id", id).class(&[SELECT]).children(options))
    };

    Element::new("div").class(&["mb-4 p-3 bg-surface rounded-lg border border-border"]).child(
        Element::new("div")
            .class(&["grid grid-cols-2 gap-3"])
            .child(labeled("Sort by", SORT_FIELD_ID, fields.collect()))
            .child(labeled("Direction", SORT_DIRECTION_ID, directions.collect())),
    )
}

fn note_card<Tz: TimeZone>(note: &Note, view: &NotesListView<'_>, tz: &Tz) -> Element
where
    Tz::Offset: fmt::Display,
{
    let selected = view.selected == Some(note.id);
    let preview = truncate(&note.content, view.view_mode.preview_len());
    let stamp = list_date_time(&note.updated_at.with_timezone(tz));

    let card = Element::new("div")
        .class(&[CARD, if selected { CARD_SELECTED } else { "" }])
        .attr("data-note-id", note.id.to_string());

    match view.view_mode {
        ViewMode::Kanban => card
            .child(
                Element::new("h3")
                    .class(&["font-semibold text-text-primary mb-1 line-clamp-2 text-sm"])
                    .text(note.title.as_str()),
            )
            .child(Element::new("p").class(&["text-text-secondary text-xs mb-2 line-clamp-2"]).text(preview))
            .child(Element::new("div").class(&["text-xs text-text-tertiary"]).text(stamp)),
        ViewMode::List => card.child(
            Element::new("div")
                .class(&["flex justify-between items-start"])
                .child(
                    Element::new("div")
                        .class(&["flex-1 min-w-0"])
                        .child(
                            Element::new("h3")
                                .class(&["font-semibold text-text-primary mb-1 text-sm line-clamp-1"])
                                .text(note.title.as_str()),
                        )
                        .child(Element::new("p").class(&["text-text-secondary text-xs line-clamp-1"]).text(preview)),
                )
                .child(Element::new("div").class(&["text-xs text-text-tertiary ml-2 flex-shrink-0"]).text(stamp)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    fn note(id: u64, title: &str, content: &str, updated: DateTime<Utc>) -> Note {
        Note {
            id: NoteId::new(id),
            title: title.into(),
            content: content.into(),
            created_at: updated,
            updated_at: updated,
        }
    }

    fn sample() -> Vec<Note> {
        let day1 = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        let day1_later = Utc.with_ymd_and_hms(2026, 10, 16, 11, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2026, 10, 14, 18, 45, 0).unwrap();
        vec![
            note(1, "Latest", "short", day1_later),
            note(2, "Morning", &"x".repeat(70), day1),
            note(3, "Older", "older note", day2),
        ]
    }

    fn view<'a>(notes: &'a [Note], query: &'a NoteQuery, mode: ViewMode) -> NotesListView<'a> {
        NotesListView {
            notes,
            selected: Some(NoteId::new(2)),
            view_mode: mode,
            query,
            show_search: false,
            show_sort_options: false,
            is_loading: false,
        }
    }

    #[test]
    fn test_group_by_date_keeps_order() {
        let notes = sample();
        let groups = group_by_date(&notes, &Utc);
        let summary: Vec<(String, Vec<u64>)> = groups
            .into_iter()
            .map(|(d, ns)| (d, ns.iter().map(|n| n.id.get()).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![("16/10/26".to_string(), vec![1, 2]), ("14/10/26".to_string(), vec![3])]
        );
    }

    #[test]
    fn test_kanban_cards() {
        let notes = sample();
        let query = NoteQuery::default();
        let el = render_notes_list(&view(&notes, &query, ViewMode::Kanban), &Utc);

        assert_eq!(el.find_by_class("notes-count")[0].text_content(), "3 notes");
        let cards = el.find(&|e| e.get_attr("data-note-id") == Some("2")).unwrap();
        assert!(cards.has_class("border-primary-500"));
        assert_eq!(cards.find_by_tag("p")[0].text_content(), format!("{}...", "x".repeat(60)));
        assert_eq!(cards.find_by_class("text-text-tertiary")[0].text_content(), "16/10/26, 09:30");

        let other = el.find(&|e| e.get_attr("data-note-id") == Some("1")).unwrap();
        assert!(!other.has_class("border-primary-500"));
        assert!(el.find_by_tag("h2").len() == 2);
    }

    #[test]
    fn test_list_view_truncates_shorter() {
        let notes = sample();
        let query = NoteQuery::default();
        let el = render_notes_list(&view(&notes, &query, ViewMode::List), &Utc);
        let card = el.find(&|e| e.get_attr("data-note-id") == Some("2")).unwrap();
        assert_eq!(card.find_by_tag("p")[0].text_content(), format!("{}...", "x".repeat(40)));
        assert!(el.find(&|e| e.get_attr("data-view") == Some("list")).is_some());
    }

    #[test]
    fn test_empty_state() {
        let query = NoteQuery::default();
        let mut v = view(&[], &query, ViewMode::Kanban);
        let el = render_notes_list(&v, &Utc);
        assert!(el.text_content().contains("No notes found"));
        assert!(el.text_content().contains("Create your first note"));

        v.is_loading = true;
        let el = render_notes_list(&v, &Utc);
        assert!(!el.text_content().contains("No notes found"));
    }

    #[test]
    fn test_search_and_sort_panels() {
        let notes = sample();
        let query = NoteQuery {
            search: Some("old".into()),
            sort_field: SortField::Title,
            direction: SortDirection::Asc,
        };
        let mut v = view(&notes, &query, ViewMode::Kanban);
        assert!(render_notes_list(&v, &Utc).find_by_id(SEARCH_INPUT_ID).is_none());

        v.show_search = true;
        v.show_sort_options = true;
        let el = render_notes_list(&v, &Utc);
        let search = el.find_by_id(SEARCH_INPUT_ID).unwrap();
        assert_eq!(search.get_attr("value"), Some("old"));
        assert_eq!(search.get_attr("placeholder"), Some("Search notes..."));

        let field = el.find_by_id(SORT_FIELD_ID).unwrap();
        let chosen: Vec<_> = field
            .find_by_tag("option")
            .into_iter()
            .filter(|o| o.has_attr("selected"))
            .map(|o| o.text_content())
            .collect();
        assert_eq!(chosen, vec!["Title"]);

        let direction = el.find_by_id(SORT_DIRECTION_ID).unwrap();
        let labels: Vec<_> = direction.find_by_tag("option").iter().map(|o| o.text_content()).collect();
        assert_eq!(labels, vec!["Newest First", "Oldest First"]);
    }
}
