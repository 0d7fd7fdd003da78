//! NotesPage - the note-taking screen.
//!
//! Owns the authoritative title and content, feeds them to two inline fields
//! through a [`FormComposer`], and turns real commits (`on_save(Some(_))`)
//! into saves on the persistence worker. No-op commits never reach the store.
//!
//! # Save policy
//!
//! - Nothing is saved while both trimmed values are empty.
//! - Both values are trimmed; an empty title becomes the configured
//!   untitled title.
//! - No selected note creates one, otherwise the selection is updated.
//! - One save is in flight at a time. A commit arriving meanwhile is queued
//!   (latest wins) and sent once the first answers, so a brand-new note is
//!   created once and then updated.
//!
//! Selecting a note or starting a new one opens a new editing session.
//! Answers to saves from an earlier session refresh the list but leave the
//! current selection and banners alone.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::Local;
use spark_signals::{signal, Signal};

use super::format::document_subtitle;
use super::note::{Note, NoteDraft, NoteId, NoteQuery, SortDirection, SortField, ViewMode};
use super::notes_list::{
    render_notes_list, NotesListView, SEARCH_INPUT_ID, SORT_DIRECTION_ID, SORT_FIELD_ID,
};
use super::store::NoteStore;
use super::worker::{PersistenceWorker, RequestId, Response};
use crate::context::{AppContext, Session};
use crate::error::{Error, Result};
use crate::primitives::{ChangeCallback, FieldDescriptor, FormComposer, FormProps, InlineField, SaveCallback};
use crate::renderer::Element;
use crate::state::{focus, keyboard, KeyboardEvent};

/// Form key of the title field.
pub const TITLE_KEY: &str = "field-title-0";
/// Form key of the content field.
pub const CONTENT_KEY: &str = "field-content-1";

pub const SAVED_MESSAGE: &str = "Note saved";
pub const SAVE_FAILED: &str = "Failed to save note";
pub const FETCH_FAILED: &str = "Failed to fetch notes";
pub const NETWORK_ERROR: &str = "Network error";

const EMPTY_ICON: &str = "M9 12h6m-6 4h6m2 5H7a2 2 0 01-2-2V5a2 2 0 012-2h5.586a1 1 0 01.707.293l5.414 5.414a1 1 0 01.293.707V19a2 2 0 01-2 2z";

// =============================================================================
// Page State
// =============================================================================

struct InFlightSave {
    request: RequestId,
    session: u64,
}

struct QueuedSave {
    draft: NoteDraft,
    session: u64,
    target: Option<NoteId>,
}

/// State shared with the field callbacks.
struct PageState {
    notes: Signal<Vec<Note>>,
    query: Signal<NoteQuery>,
    view_mode: Signal<ViewMode>,
    show_search: Signal<bool>,
    show_sort_options: Signal<bool>,
    is_loading: Signal<bool>,

    selected: Signal<Option<Note>>,
    is_new: Signal<bool>,
    title: Signal<String>,
    content: Signal<String>,
    error: Signal<Option<String>>,
    success: Signal<Option<String>>,
    success_until: Cell<Option<Instant>>,
    is_saving: Signal<bool>,

    /// Editing session counter, bumped by select/new.
    session: Cell<u64>,
    in_flight: RefCell<Option<InFlightSave>>,
    queued: RefCell<Option<QueuedSave>>,
    pending_fetch: Cell<Option<RequestId>>,
    worker: RefCell<PersistenceWorker>,

    untitled_title: String,
    success_timeout: Duration,
}

impl PageState {
    fn is_current(&self, session: u64) -> bool {
        self.session.get() == session
    }

    fn begin_session(&self) {
        self.session.set(self.session.get() + 1);
        self.error.set(None);
        self.success.set(None);
        self.success_until.set(None);
    }

    fn draft(&self) -> Option<NoteDraft> {
        let title = self.title.get();
        let content = self.content.get();
        let (title, content) = (title.trim(), content.trim());
        if title.is_empty() && content.is_empty() {
            return None;
        }
        let title = if title.is_empty() { self.untitled_title.as_str() } else { title };
        Some(NoteDraft::new(title, content))
    }

    fn save_note(&self) {
        let Some(draft) = self.draft() else {
            tracing::debug!("nothing to save");
            return;
        };
        let target = self.selected.get().map(|note| note.id);
        let session = self.session.get();

        if self.in_flight.borrow().is_some() {
            tracing::debug!(?target, "save queued behind in-flight save");
            *self.queued.borrow_mut() = Some(QueuedSave {
                draft,
                session,
                target,
            });
            return;
        }
        self.dispatch_save(target, draft, session);
    }

    fn dispatch_save(&self, target: Option<NoteId>, draft: NoteDraft, session: u64) {
        if self.is_current(session) {
            self.error.set(None);
        }
        let sent = self.worker.borrow_mut().save(target, draft);
        match sent {
            Ok(request) => {
                tracing::info!(request, ?target, "saving note");
                *self.in_flight.borrow_mut() = Some(InFlightSave { request, session });
                self.is_saving.set(true);
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not send save");
                if self.is_current(session) {
                    self.error.set(Some(NETWORK_ERROR.to_string()));
                }
                self.is_saving.set(false);
            }
        }
    }

    fn refresh(&self) {
        let sent = self.worker.borrow_mut().fetch(self.query.get());
        match sent {
            Ok(request) => {
                self.pending_fetch.set(Some(request));
                self.is_loading.set(true);
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not send fetch");
                self.error.set(Some(NETWORK_ERROR.to_string()));
                self.is_loading.set(false);
            }
        }
    }

    /// Session of the in-flight save answered by `request`.
    fn finish_save(&self, request: RequestId) -> Option<u64> {
        let mut slot = self.in_flight.borrow_mut();
        if slot.as_ref().is_some_and(|f| f.request == request) {
            slot.take().map(|f| f.session)
        } else {
            None
        }
    }

    fn handle_response(&self, response: Response, now: Instant) -> bool {
        match response {
            Response::Saved { request, result } => {
                let Some(session) = self.finish_save(request) else {
                    tracing::warn!(request, "unexpected save response");
                    return false;
                };
                let current = self.is_current(session);

                let saved_id = match result {
                    Ok(note) => {
                        tracing::info!(id = %note.id, request, "note saved");
                        let id = note.id;
                        if current {
                            self.selected.set(Some(note));
                            self.success.set(Some(SAVED_MESSAGE.to_string()));
                            self.success_until.set(Some(now + self.success_timeout));
                        }
                        self.refresh();
                        Some(id)
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, request, "save failed");
                        if current {
                            self.error.set(Some(save_error_text(&err)));
                        }
                        None
                    }
                };
                self.is_saving.set(false);

                let queued = self.queued.borrow_mut().take();
                if let Some(queued) = queued {
                    // A create answered for the same session gives the queued save its target
                    let target = match queued.target {
                        Some(id) => Some(id),
                        None if queued.session == session => saved_id,
                        None => None,
                    };
                    self.dispatch_save(target, queued.draft, queued.session);
                }
                true
            }
            Response::Fetched { request, result } => {
                if self.pending_fetch.get() != Some(request) {
                    tracing::debug!(request, "dropping stale fetch");
                    return false;
                }
                self.pending_fetch.set(None);
                self.is_loading.set(false);
                match result {
                    Ok(notes) => {
                        tracing::debug!(count = notes.len(), "notes fetched");
                        self.notes.set(notes);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "fetch failed");
                        self.error.set(Some(FETCH_FAILED.to_string()));
                    }
                }
                true
            }
        }
    }

    fn expire_success(&self, now: Instant) -> bool {
        match self.success_until.get() {
            Some(until) if now >= until => {
                self.success_until.set(None);
                self.success.set(None);
                true
            }
            _ => false,
        }
    }

    fn is_busy(&self) -> bool {
        self.in_flight.borrow().is_some() || self.pending_fetch.get().is_some()
    }
}

fn save_error_text(err: &Error) -> String {
    match err {
        Error::Validation(message) => message.clone(),
        Error::WorkerGone => NETWORK_ERROR.to_string(),
        _ => SAVE_FAILED.to_string(),
    }
}

// =============================================================================
// NotesPage
// =============================================================================

pub struct NotesPage {
    ctx: Rc<AppContext>,
    state: Rc<PageState>,
    form: FormComposer,
}

impl NotesPage {
    /// Start the persistence worker on `store` and request the first list.
    pub fn new(ctx: Rc<AppContext>, store: Box<dyn NoteStore>) -> Result<Self> {
        let worker = PersistenceWorker::spawn(store)?;
        let ui = &ctx.config.ui;

        let state = Rc::new(PageState {
            notes: signal(Vec::new()),
            query: signal(NoteQuery::default()),
            view_mode: signal(ViewMode::default()),
            show_search: signal(false),
            show_sort_options: signal(false),
            is_loading: signal(false),
            selected: signal(None),
            is_new: signal(false),
            title: signal(String::new()),
            content: signal(String::new()),
            error: signal(None),
            success: signal(None),
            success_until: Cell::new(None),
            is_saving: signal(false),
            session: Cell::new(0),
            in_flight: RefCell::new(None),
            queued: RefCell::new(None),
            pending_fetch: Cell::new(None),
            worker: RefCell::new(worker),
            untitled_title: ui.untitled_title.clone(),
            success_timeout: ui.success_timeout(),
        });

        let page = Self {
            ctx,
            state,
            form: FormComposer::new(),
        };
        if page.ctx.session().is_some() {
            page.state.refresh();
        }
        Ok(page)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn notes(&self) -> Vec<Note> {
        self.state.notes.get()
    }

    pub fn selected(&self) -> Option<Note> {
        self.state.selected.get()
    }

    /// Editing a note that has not been saved yet.
    pub fn is_new_note(&self) -> bool {
        self.state.is_new.get()
    }

    pub fn title(&self) -> String {
        self.state.title.get()
    }

    pub fn content(&self) -> String {
        self.state.content.get()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error.get()
    }

    pub fn success(&self) -> Option<String> {
        self.state.success.get()
    }

    pub fn is_saving(&self) -> bool {
        self.state.is_saving.get()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading.get()
    }

    pub fn query(&self) -> NoteQuery {
        self.state.query.get()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.state.view_mode.get()
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn form(&self) -> &FormComposer {
        &self.form
    }

    // =========================================================================
    // Worker
    // =========================================================================

    /// Apply finished worker responses and expire the success banner.
    /// Returns true when anything visible changed.
    pub fn poll(&self, now: Instant) -> bool {
        let mut changed = false;
        loop {
            let next = self.state.worker.borrow().try_recv();
            let Some(response) = next else { break };
            changed |= self.state.handle_response(response, now);
        }
        changed | self.state.expire_success(now)
    }

    /// Block until every outstanding request is answered or `timeout` passes.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.is_busy() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let next = self.state.worker.borrow().recv_timeout(deadline - now);
            match next {
                Some(response) => {
                    self.state.handle_response(response, Instant::now());
                }
                None => return !self.state.is_busy(),
            }
        }
        true
    }

    // =========================================================================
    // Note Selection
    // =========================================================================

    /// Open a listed note. An open edit commits against the previous note first.
    pub fn select_note(&mut self, id: NoteId) -> bool {
        let Some(note) = self.state.notes.get().into_iter().find(|n| n.id == id) else {
            return false;
        };
        focus::blur();

        let st = &self.state;
        st.begin_session();
        st.title.set(note.title.clone());
        st.content.set(note.content.clone());
        st.selected.set(Some(note));
        st.is_new.set(false);
        tracing::debug!(%id, "note selected");
        true
    }

    /// Start an unsaved note with empty fields.
    pub fn new_note(&mut self) {
        focus::blur();

        let st = &self.state;
        st.begin_session();
        st.selected.set(None);
        st.is_new.set(true);
        st.title.set(String::new());
        st.content.set(String::new());
        tracing::debug!("new note");
    }

    // =========================================================================
    // List Controls
    // =========================================================================

    pub fn set_search(&self, search: &str) {
        let mut query = self.state.query.get();
        query.search = (!search.is_empty()).then(|| search.to_string());
        self.set_query(query);
    }

    pub fn set_sort_field(&self, field: SortField) {
        let mut query = self.state.query.get();
        query.sort_field = field;
        self.set_query(query);
    }

    pub fn set_sort_direction(&self, direction: SortDirection) {
        let mut query = self.state.query.get();
        query.direction = direction;
        self.set_query(query);
    }

    fn set_query(&self, query: NoteQuery) {
        if self.state.query.get() != query {
            self.state.query.set(query);
            self.state.refresh();
        }
    }

    pub fn toggle_search(&self) {
        self.state.show_search.set(!self.state.show_search.get());
    }

    pub fn toggle_sort_options(&self) {
        self.state.show_sort_options.set(!self.state.show_sort_options.get());
    }

    pub fn toggle_view_mode(&self) {
        self.state.view_mode.set(self.state.view_mode.get().toggled());
    }

    pub fn toggle_theme(&self) {
        self.ctx.theme.toggle_theme();
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Route a `data-action` button press.
    pub fn dispatch_action(&mut self, action: &str) -> bool {
        match action {
            "new-note" => self.new_note(),
            "toggle-search" => self.toggle_search(),
            "toggle-sort" => self.toggle_sort_options(),
            "toggle-view" => self.toggle_view_mode(),
            "toggle-theme" => self.toggle_theme(),
            _ => return false,
        }
        true
    }

    /// Native change event on the search box or a sort menu.
    pub fn input(&self, control_id: &str, value: &str) -> bool {
        match control_id {
            SEARCH_INPUT_ID => self.set_search(value),
            SORT_FIELD_ID => match value.parse() {
                Ok(field) => self.set_sort_field(field),
                Err(()) => return false,
            },
            SORT_DIRECTION_ID => match value.parse() {
                Ok(direction) => self.set_sort_direction(direction),
                Err(()) => return false,
            },
            _ => return self.form.input(control_id, value),
        }
        true
    }

    pub fn edit_title(&self) -> bool {
        self.form.click_inline(TITLE_KEY)
    }

    pub fn edit_content(&self) -> bool {
        self.form.click_inline(CONTENT_KEY)
    }

    /// Keyboard input from the platform, routed to the focused field.
    pub fn handle_key(&self, event: KeyboardEvent) -> bool {
        keyboard::route_keyboard_event(event)
    }

    // =========================================================================
    // Render
    // =========================================================================

    pub fn render(&mut self) -> Element {
        let Some(user) = self.ctx.session() else {
            return sign_in_required();
        };

        let notes = self.state.notes.get();
        let query = self.state.query.get();
        let selected = self.state.selected.get();

        let list = render_notes_list(
            &NotesListView {
                notes: &notes,
                selected: selected.as_ref().map(|n| n.id),
                view_mode: self.state.view_mode.get(),
                query: &query,
                show_search: self.state.show_search.get(),
                show_sort_options: self.state.show_sort_options.get(),
                is_loading: self.state.is_loading.get(),
            },
            &Local,
        );
        let editor = self.render_editor(selected.as_ref());
        let theme = self.ctx.theme.theme();

        Element::new("div")
            .class(&[
                "min-h-screen relative overflow-hidden animate-fade-in",
                self.ctx.theme.root_class().unwrap_or(""),
            ])
            .attr("data-theme", theme.as_str())
            .child(Element::new("div").class(&["absolute inset-0 bg-app-gradient"]))
            .child(
                Element::new("div")
                    .class(&["relative text-text-primary"])
                    .child(page_header(&user, notes.len(), theme.toggled().as_str()))
                    .child(
                        Element::new("div")
                            .class(&["flex h-[calc(100vh-80px)]"])
                            .child(list)
                            .child(editor),
                    ),
            )
    }

    fn render_editor(&mut self, selected: Option<&Note>) -> Element {
        let panel = Element::new("div").class(&["flex-1 overflow-y-auto"]);

        if selected.is_none() && !self.state.is_new.get() {
            if !self.form.inline_keys().is_empty() {
                self.form = FormComposer::new();
            }
            return panel.child(empty_editor());
        }

        let props = FormProps {
            layout: self.ctx.config.ui.layout,
            show_logo: false,
            subtitle: Some(document_subtitle(selected, &Local)),
            error: self.state.error.get(),
            success: self.state.success.get(),
            fields: vec![self.title_field(), self.content_field()],
            ..Default::default()
        };
        let form = self.form.render(&props);

        let saving = self.state.is_saving.get().then(|| {
            Element::new("div")
                .class(&["saving-indicator fixed bottom-4 right-4 bg-surface text-text-primary px-4 py-2 rounded-lg shadow-lg flex items-center gap-2"])
                .child(Element::new("div").class(&["loading-spinner"]))
                .child(Element::new("span").text("Saving..."))
        });

        panel.child(Element::new("div").class(&["h-full"]).child(form).child_opt(saving))
    }

    fn save_callback(&self) -> SaveCallback {
        let state = Rc::clone(&self.state);
        Rc::new(move |saved| {
            if saved.is_some() {
                state.save_note();
            }
        })
    }

    fn title_field(&self) -> FieldDescriptor {
        let state = Rc::clone(&self.state);
        let on_change: ChangeCallback = Rc::new(move |value| {
            state.title.set(value.to_string());
        });
        InlineField {
            name: "title".into(),
            value: self.state.title.get(),
            on_change,
            on_save: self.save_callback(),
            placeholder: Some("Note title".into()),
            display_class: Some("note-title".into()),
            title_class: Some("note-title".into()),
            ..Default::default()
        }
        .into()
    }

    fn content_field(&self) -> FieldDescriptor {
        let state = Rc::clone(&self.state);
        let on_change: ChangeCallback = Rc::new(move |value| {
            state.content.set(value.to_string());
        });
        InlineField {
            name: "content".into(),
            value: self.state.content.get(),
            on_change,
            on_save: self.save_callback(),
            placeholder: Some("Start writing your note content here...".into()),
            multiline: true,
            display_class: Some("note-content".into()),
            content_class: Some("note-content".into()),
            ..Default::default()
        }
        .into()
    }
}

fn page_header(user: &Session, count: usize, next_theme: &str) -> Element {
    Element::new("div")
        .class(&["sticky top-0 bg-surface border-b border-border px-4 py-4 backdrop-blur-sm"])
        .child(
            Element::new("div")
                .class(&["flex items-center justify-between"])
                .child(
                    Element::new("div")
                        .child(Element::new("h1").class(&["text-2xl font-bold text-text-primary"]).text("Notes"))
                        .child(
                            Element::new("p")
                                .class(&["text-text-secondary text-sm"])
                                .text(format!("{count} notes")),
                        ),
                )
                .child(
                    Element::new("div")
                        .class(&["flex items-center space-x-4"])
                        .child(Element::new("span").class(&["user-name text-sm"]).text(user.name.as_str()))
                        .child(
                            Element::new("button")
                                .attr("type", "button")
                                .attr("data-action", "toggle-theme")
                                .attr("aria-label", format!("Switch to {next_theme} mode"))
                                .class(&["p-2 rounded-lg transition-colors"])
                                .text(format!("{next_theme} mode")),
                        ),
                ),
        )
}

fn empty_editor() -> Element {
    Element::new("div")
        .class(&["empty-editor h-full flex items-center justify-center"])
        .child(
            Element::new("div")
                .class(&["text-center"])
                .child(
                    Element::new("div")
                        .class(&["w-16 h-16 mx-auto mb-4 bg-surface rounded-full flex items-center justify-center"])
                        .child(
                            Element::new("svg")
                                .class(&["w-8 h-8 text-text-tertiary"])
                                .attr("fill", "none")
                                .attr("stroke", "currentColor")
                                .attr("viewBox", "0 0 24 24")
                                .child(
                                    Element::new("path")
                                        .attr("stroke-linecap", "round")
                                        .attr("stroke-linejoin", "round")
                                        .attr("stroke-width", "2")
                                        .attr("d", EMPTY_ICON),
                                ),
                        ),
                )
                .child(
                    Element::new("h3")
                        .class(&["text-lg font-semibold text-text-primary mb-2"])
                        .text("Select a note to view"),
                )
                .child(
                    Element::new("p")
                        .class(&["text-text-secondary text-sm mb-4"])
                        .text("Choose a note from the list to start reading or editing"),
                )
                .child(
                    Element::new("button")
                        .attr("type", "button")
                        .attr("data-action", "new-note")
                        .class(&["px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg transition-colors text-white"])
                        .text("Create New Note"),
                ),
        )
}

fn sign_in_required() -> Element {
    Element::new("div")
        .class(&["auth-required min-h-screen flex items-center justify-center"])
        .child(Element::new("a").attr("href", "/login").text("Sign in to see your notes"))
}
