//! InlineEdit Primitive - Click-to-edit text field.
//!
//! Shows its value as plain text until clicked, then swaps in an input (or a
//! textarea when `multiline`) holding a working copy of the value.
//!
//! # Commit protocol
//!
//! Enter (single-line), Ctrl/Cmd+Enter (multiline) and losing focus all
//! commit. Only the buffer is trimmed before comparing with the stored
//! value:
//!
//! - `buffer.trim() != value` → `on_change(buffer)`, then `on_save(Some(buffer))`
//! - otherwise → `on_save(None)`
//!
//! Escape discards the buffer without calling either. The field never updates
//! its own value; the host feeds the new value back with [`InlineEditField::set_value`].
//!
//! # Example
//!
//! ```ignore
//! use notabili::primitives::{InlineEditField, InlineEditProps};
//!
//! let field = InlineEditField::new(InlineEditProps {
//!     value: "Groceries".into(),
//!     on_save: Rc::new(|saved| println!("saved: {saved:?}")),
//!     ..Default::default()
//! });
//!
//! field.click();
//! field.handle_key(&KeyboardEvent::new("Enter")); // saved: None
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{effect, flush_sync, signal, Signal};

use crate::engine::{allocate_index, get_id, on_destroy, release_index, set_focusable};
use crate::renderer::Element;
use crate::state::{focus, keyboard, FocusCallbacks, KeyboardEvent};

use super::edit_buffer::EditBuffer;
use super::types::{ChangeCallback, InlineEditProps, SaveCallback};

// =============================================================================
// Field State
// =============================================================================

/// Non-reactive configuration, replaced wholesale on every prop update.
struct FieldConfig {
    on_change: ChangeCallback,
    on_save: SaveCallback,
    placeholder: String,
    multiline: bool,
    class: String,
    title_class: String,
    content_class: String,
}

impl From<&InlineEditProps> for FieldConfig {
    fn from(props: &InlineEditProps) -> Self {
        Self {
            on_change: props.on_change.clone(),
            on_save: props.on_save.clone(),
            placeholder: props.placeholder.clone().unwrap_or_default(),
            multiline: props.multiline,
            class: props.class.clone().unwrap_or_default(),
            title_class: props.title_class.clone().unwrap_or_default(),
            content_class: props.content_class.clone().unwrap_or_default(),
        }
    }
}

/// Everything the key and focus handlers need. Cheap to clone.
#[derive(Clone)]
struct FieldState {
    index: usize,
    value: Signal<String>,
    is_editing: Signal<bool>,
    buffer: Signal<EditBuffer>,
    config: Rc<RefCell<FieldConfig>>,
}

impl FieldState {
    fn multiline(&self) -> bool {
        self.config.borrow().multiline
    }

    fn edit(&self, f: impl FnOnce(&mut EditBuffer)) {
        let mut buffer = self.buffer.get();
        f(&mut buffer);
        self.buffer.set(buffer);
    }

    fn begin_edit(&self) {
        if self.is_editing.get() {
            return;
        }

        let mut buffer = EditBuffer::new(&self.value.get());
        buffer.select_all();
        self.buffer.set(buffer);
        self.is_editing.set(true);

        tracing::debug!(index = self.index, "inline edit started");

        // The control exists now; move focus onto it
        focus::focus(self.index);
    }

    fn commit(&self) {
        if !self.is_editing.get() {
            return;
        }
        // Leave edit mode first so a callback that moves focus cannot
        // re-enter and save twice.
        self.is_editing.set(false);

        let text = self.buffer.get().text();
        let value = self.value.get();
        let (on_change, on_save) = {
            let config = self.config.borrow();
            (config.on_change.clone(), config.on_save.clone())
        };

        if text.trim() != value {
            tracing::debug!(index = self.index, "inline edit committed");
            on_change(&text);
            on_save(Some(&text));
        } else {
            tracing::debug!(index = self.index, "inline edit committed unchanged");
            on_save(None);
        }

        self.release_focus();
    }

    fn cancel(&self) {
        if !self.is_editing.get() {
            return;
        }
        self.buffer.set(EditBuffer::new(&self.value.get()));
        self.is_editing.set(false);

        tracing::debug!(index = self.index, "inline edit cancelled");
        self.release_focus();
    }

    fn release_focus(&self) {
        if focus::is_focused(self.index) {
            focus::blur();
        }
    }

    /// Keyboard handling while this field has focus.
    fn handle_key(&self, event: &KeyboardEvent) -> bool {
        if !self.is_editing.get() {
            // Keyboard users reach the display via Tab and open it with Enter
            if event.key == "Enter" {
                self.begin_edit();
                return true;
            }
            return false;
        }

        let multiline = self.multiline();
        let mods = event.modifiers;

        match event.key.as_str() {
            "Enter" => {
                if !multiline || mods.command() {
                    self.commit();
                } else {
                    self.edit(|b| b.insert_char('\n'));
                }
                true
            }
            "Escape" => {
                self.cancel();
                true
            }
            // Let the router move focus; the blur commits
            "Tab" => false,
            "Backspace" if mods.ctrl => {
                self.edit(EditBuffer::delete_word_back);
                true
            }
            "Backspace" => {
                self.edit(EditBuffer::backspace);
                true
            }
            "Delete" if mods.ctrl => {
                self.edit(EditBuffer::delete_word_forward);
                true
            }
            "Delete" => {
                self.edit(EditBuffer::delete);
                true
            }
            "ArrowLeft" if mods.ctrl => {
                self.edit(|b| b.move_word_left(mods.shift));
                true
            }
            "ArrowLeft" => {
                self.edit(|b| b.move_left(mods.shift));
                true
            }
            "ArrowRight" if mods.ctrl => {
                self.edit(|b| b.move_word_right(mods.shift));
                true
            }
            "ArrowRight" => {
                self.edit(|b| b.move_right(mods.shift));
                true
            }
            "ArrowUp" if multiline => {
                self.edit(|b| b.move_up(mods.shift));
                true
            }
            "ArrowDown" if multiline => {
                self.edit(|b| b.move_down(mods.shift));
                true
            }
            "Home" | "ArrowUp" => {
                self.edit(|b| b.home(mods.shift));
                true
            }
            "End" | "ArrowDown" => {
                self.edit(|b| b.end(mods.shift));
                true
            }
            "a" | "A" if mods.command() => {
                self.edit(EditBuffer::select_all);
                true
            }
            _ => match event.printable() {
                Some(c) => {
                    self.edit(|b| b.insert_char(c));
                    true
                }
                None => false,
            },
        }
    }
}

// =============================================================================
// InlineEditField
// =============================================================================

/// A mounted click-to-edit field.
///
/// Owns a registry index (focusable), a focused-key handler and a blur
/// callback. Both handlers are destroy hooks of the index, so dropping the
/// field unregisters them without committing.
pub struct InlineEditField {
    state: FieldState,
}

impl InlineEditField {
    pub fn new(props: InlineEditProps) -> Self {
        let index = allocate_index(props.id.as_deref());
        set_focusable(index, true);

        let state = FieldState {
            index,
            value: signal(props.value.clone()),
            is_editing: signal(false),
            buffer: signal(EditBuffer::new(&props.value)),
            config: Rc::new(RefCell::new(FieldConfig::from(&props))),
        };

        // Every external value change reseeds the buffer, even mid-edit
        let value_sig = state.value.clone();
        let buffer_sig = state.buffer.clone();
        let stop_resync = effect(move || {
            let value = value_sig.get();
            buffer_sig.set(EditBuffer::new(&value));
        });
        on_destroy(index, stop_resync);

        let key_state = state.clone();
        on_destroy(
            index,
            keyboard::on_focused(index, move |event| key_state.handle_key(event)),
        );

        let blur_state = state.clone();
        on_destroy(
            index,
            focus::register_callbacks(
                index,
                FocusCallbacks {
                    on_blur: Some(Rc::new(move || blur_state.commit())),
                    ..Default::default()
                },
            ),
        );

        Self { state }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn index(&self) -> usize {
        self.state.index
    }

    /// Registry id (the one given in props, or a generated one).
    pub fn id(&self) -> String {
        get_id(self.state.index).unwrap_or_default()
    }

    pub fn value(&self) -> String {
        self.state.value.get()
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing.get()
    }

    /// Current working text.
    pub fn buffer(&self) -> String {
        self.state.buffer.get().text()
    }

    /// Working text with cursor and selection.
    pub fn edit_buffer(&self) -> EditBuffer {
        self.state.buffer.get()
    }

    pub fn is_multiline(&self) -> bool {
        self.state.multiline()
    }

    // =========================================================================
    // Host Updates
    // =========================================================================

    /// Feed a new authoritative value. Reseeds the buffer when it differs.
    pub fn set_value(&self, value: &str) {
        if self.state.value.get() != value {
            self.state.value.set(value.to_string());
            flush_sync();
        }
    }

    /// Apply a fresh set of props (callbacks, classes, value).
    pub fn update(&self, props: &InlineEditProps) {
        *self.state.config.borrow_mut() = FieldConfig::from(props);
        self.set_value(&props.value);
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Pointer activation. Enters edit mode from display; ignored while editing.
    pub fn click(&self) {
        self.state.begin_edit();
    }

    /// Key press delivered directly (the router does the same when focused).
    /// Releases are ignored.
    pub fn handle_key(&self, event: &KeyboardEvent) -> bool {
        event.is_press() && self.state.handle_key(event)
    }

    /// Replace the working text wholesale, as a native change event does.
    /// Ignored outside edit mode.
    pub fn set_buffer(&self, text: &str) {
        if self.state.is_editing.get() {
            self.state.buffer.set(EditBuffer::new(text));
        }
    }

    /// Focus left the control for any reason. Commits while editing.
    pub fn blur(&self) {
        if focus::is_focused(self.state.index) {
            focus::blur();
        } else {
            self.state.commit();
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn render(&self) -> Element {
        let config = self.state.config.borrow();

        if self.state.is_editing.get() {
            let buffer = self.state.buffer.get();
            let placeholder = (!config.placeholder.is_empty()).then_some(config.placeholder.as_str());
            let id = self.id();

            return if config.multiline {
                let rows = buffer.line_count().max(3);
                Element::new("textarea")
                    .attr("id", id)
                    .class(&["inline-edit-input", config.content_class.as_str()])
                    .attr("rows", rows.to_string())
                    .attr_opt("placeholder", placeholder)
                    .flag("autofocus", true)
                    .text(buffer.text())
            } else {
                Element::new("input")
                    .attr("id", id)
                    .class(&["inline-edit-input", config.title_class.as_str()])
                    .attr("value", buffer.text())
                    .attr_opt("placeholder", placeholder)
                    .flag("autofocus", true)
            };
        }

        let value = self.state.value.get();
        let is_empty = value.is_empty();

        let display = Element::new("div").class(&[
            "inline-edit-display",
            config.class.as_str(),
            if is_empty { "inline-edit-empty" } else { "" },
        ]);

        if is_empty {
            display.child(
                Element::new("span")
                    .class(&["inline-edit-placeholder"])
                    .text(config.placeholder.clone()),
            )
        } else {
            let span_class = if config.multiline {
                config.content_class.as_str()
            } else {
                config.title_class.as_str()
            };
            display.child(Element::new("span").class(&[span_class]).text(value))
        }
    }
}

impl Drop for InlineEditField {
    fn drop(&mut self) {
        // Destroy hooks drop the blur callback, so releasing focus cannot commit
        release_index(self.state.index);
        self.state.release_focus();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reset_registry;
    use crate::state::{reset_focus_state, reset_keyboard_state, route_keyboard_event, Modifiers};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Calls {
        changes: RefCell<Vec<String>>,
        saves: RefCell<Vec<Option<String>>>,
        order: RefCell<Vec<&'static str>>,
    }

    fn setup() {
        reset_registry();
        reset_focus_state();
        reset_keyboard_state();
    }

    fn make_field(value: &str, multiline: bool) -> (InlineEditField, Rc<Calls>) {
        let calls = Rc::new(Calls::default());
        let on_change_calls = calls.clone();
        let on_save_calls = calls.clone();
        let field = InlineEditField::new(InlineEditProps {
            value: value.to_string(),
            placeholder: Some("Untitled".to_string()),
            multiline,
            title_class: Some("note-title".to_string()),
            content_class: Some("note-content".to_string()),
            on_change: Rc::new(move |v| {
                on_change_calls.changes.borrow_mut().push(v.to_string());
                on_change_calls.order.borrow_mut().push("change");
            }),
            on_save: Rc::new(move |v| {
                on_save_calls.saves.borrow_mut().push(v.map(str::to_string));
                on_save_calls.order.borrow_mut().push("save");
            }),
            ..Default::default()
        });
        (field, calls)
    }

    fn type_text(field: &InlineEditField, text: &str) {
        for c in text.chars() {
            field.handle_key(&KeyboardEvent::new(c.to_string()));
        }
    }

    #[test]
    fn test_click_enters_edit_with_focus_and_selection() {
        setup();
        let (field, _) = make_field("Groceries", false);

        assert!(!field.is_editing());
        field.click();

        assert!(field.is_editing());
        assert!(focus::is_focused(field.index()));
        assert_eq!(field.edit_buffer().selected_text(), "Groceries");
    }

    #[test]
    fn test_unchanged_commit_is_noop_save() {
        setup();
        let (field, calls) = make_field("Groceries", false);

        field.click();
        field.handle_key(&KeyboardEvent::new("Enter"));

        assert!(!field.is_editing());
        assert!(calls.changes.borrow().is_empty());
        assert_eq!(*calls.saves.borrow(), vec![None]);
        assert!(!focus::has_focus());
    }

    #[test]
    fn test_changed_commit_calls_change_then_save() {
        setup();
        let (field, calls) = make_field("Old", false);

        field.click();
        type_text(&field, "New Value"); // typing replaces the selection
        field.handle_key(&KeyboardEvent::new("Enter"));

        assert_eq!(*calls.changes.borrow(), vec!["New Value".to_string()]);
        assert_eq!(*calls.saves.borrow(), vec![Some("New Value".to_string())]);
        assert_eq!(*calls.order.borrow(), vec!["change", "save"]);

        // Host feeds the value back
        field.set_value("New Value");
        assert_eq!(field.render().text_content(), "New Value");
    }

    #[test]
    fn test_escape_discards() {
        setup();
        let (field, calls) = make_field("Original", false);

        field.click();
        type_text(&field, "Changed");
        field.handle_key(&KeyboardEvent::new("Escape"));

        assert!(!field.is_editing());
        assert_eq!(field.buffer(), "Original");
        assert!(calls.changes.borrow().is_empty());
        assert!(calls.saves.borrow().is_empty());
        assert_eq!(field.render().text_content(), "Original");
    }

    #[test]
    fn test_blur_commits_once() {
        setup();
        let (field, calls) = make_field("Old", false);

        field.click();
        field.set_buffer("Typed");
        field.blur();
        field.blur();

        assert_eq!(*calls.saves.borrow(), vec![Some("Typed".to_string())]);
    }

    #[test]
    fn test_enter_then_blur_does_not_double_save() {
        setup();
        let (field, calls) = make_field("Old", false);

        field.click();
        field.set_buffer("Typed");
        field.handle_key(&KeyboardEvent::new("Enter"));
        field.blur();

        assert_eq!(calls.saves.borrow().len(), 1);
    }

    #[test]
    fn test_whitespace_asymmetry() {
        setup();

        // Padding added to an unpadded value trims back to it: no-op
        let (field, calls) = make_field("Hello", false);
        field.click();
        field.set_buffer("Hello ");
        field.blur();
        assert!(calls.changes.borrow().is_empty());
        assert_eq!(*calls.saves.borrow(), vec![None]);
        drop(field);

        // A padded stored value never equals the trimmed buffer: real save
        let (field, calls) = make_field("Hello ", false);
        field.click();
        field.blur();
        assert_eq!(*calls.changes.borrow(), vec!["Hello ".to_string()]);
        assert_eq!(*calls.saves.borrow(), vec![Some("Hello ".to_string())]);
    }

    #[test]
    fn test_multiline_enter_inserts_newline() {
        setup();
        let (field, calls) = make_field("line", true);

        field.click();
        field.handle_key(&KeyboardEvent::new("End"));
        field.handle_key(&KeyboardEvent::new("Enter"));

        assert!(field.is_editing());
        assert_eq!(field.buffer(), "line\n");
        assert!(calls.saves.borrow().is_empty());

        type_text(&field, "more");
        field.handle_key(&KeyboardEvent::with_modifiers("Enter", Modifiers::ctrl()));
        assert!(!field.is_editing());
        assert_eq!(*calls.saves.borrow(), vec![Some("line\nmore".to_string())]);
    }

    #[test]
    fn test_multiline_meta_enter_commits() {
        setup();
        let (field, calls) = make_field("text", true);

        field.click();
        field.handle_key(&KeyboardEvent::with_modifiers("Enter", Modifiers::meta()));
        assert_eq!(*calls.saves.borrow(), vec![None]);
    }

    #[test]
    fn test_external_value_resyncs_buffer() {
        setup();
        let (field, _) = make_field("First", false);

        field.set_value("Second");
        assert_eq!(field.buffer(), "Second");

        // Even mid-edit
        field.click();
        field.set_buffer("draft");
        field.set_value("Third");
        assert_eq!(field.buffer(), "Third");
    }

    #[test]
    fn test_empty_display_uses_placeholder() {
        setup();
        let (field, _) = make_field("", false);

        let el = field.render();
        assert!(el.has_class("inline-edit-display"));
        assert!(el.has_class("inline-edit-empty"));
        assert_eq!(el.find_by_class("inline-edit-placeholder").len(), 1);
        assert_eq!(el.text_content(), "Untitled");

        field.set_value("x");
        let el = field.render();
        assert!(!el.has_class("inline-edit-empty"));
        assert_eq!(el.text_content(), "x");
        assert!(el.find_by_class("note-title").len() == 1);
    }

    #[test]
    fn test_edit_rendering() {
        setup();
        let (single, _) = make_field("Title", false);
        single.click();
        let el = single.render();
        assert_eq!(el.tag, "input");
        assert_eq!(el.get_attr("value"), Some("Title"));
        assert!(el.has_class("inline-edit-input"));
        assert!(el.has_class("note-title"));
        assert!(el.has_attr("autofocus"));

        let (multi, _) = make_field("a\nb\nc\nd", true);
        multi.click();
        let el = multi.render();
        assert_eq!(el.tag, "textarea");
        assert_eq!(el.get_attr("rows"), Some("4"));
        assert!(el.has_class("note-content"));

        let (short, _) = make_field("one line", true);
        short.click();
        assert_eq!(short.render().get_attr("rows"), Some("3"));
    }

    #[test]
    fn test_clicking_another_field_commits_first() {
        setup();
        let (first, first_calls) = make_field("A", false);
        let (second, _) = make_field("B", false);

        first.click();
        first.set_buffer("A2");
        second.click();

        assert!(!first.is_editing());
        assert!(second.is_editing());
        assert_eq!(*first_calls.saves.borrow(), vec![Some("A2".to_string())]);
    }

    #[test]
    fn test_routed_keys_reach_focused_field() {
        setup();
        let (field, calls) = make_field("", false);

        field.click();
        route_keyboard_event(KeyboardEvent::new("h"));
        route_keyboard_event(KeyboardEvent::new("i"));
        route_keyboard_event(KeyboardEvent::new("Tab"));

        assert!(!field.is_editing());
        assert_eq!(*calls.saves.borrow(), vec![Some("hi".to_string())]);
    }

    #[test]
    fn test_enter_on_focused_display_starts_editing() {
        setup();
        let (field, _) = make_field("Notes", false);

        focus::focus(field.index());
        route_keyboard_event(KeyboardEvent::new("Enter"));
        assert!(field.is_editing());
    }

    #[test]
    fn test_drop_releases_without_commit() {
        setup();
        let (field, calls) = make_field("Old", false);
        let index = field.index();

        field.click();
        field.set_buffer("unsaved");
        drop(field);

        assert!(calls.saves.borrow().is_empty());
        assert!(!focus::has_focus());
        assert!(!crate::engine::is_allocated(index));
    }

    #[test]
    fn test_fields_sharing_an_id_stay_independent() {
        setup();
        let saves = Rc::new(RefCell::new(Vec::new()));
        let titled = |value: &str| {
            let saves = saves.clone();
            let name = value.to_string();
            InlineEditField::new(InlineEditProps {
                id: Some("title".to_string()),
                value: value.to_string(),
                on_save: Rc::new(move |v| {
                    saves.borrow_mut().push((name.clone(), v.map(str::to_string)));
                }),
                ..Default::default()
            })
        };
        let first = titled("first");
        let second = titled("second");
        assert_ne!(first.index(), second.index());

        second.click();
        route_keyboard_event(KeyboardEvent::new("x"));
        route_keyboard_event(KeyboardEvent::new("Enter"));

        assert!(!first.is_editing());
        assert!(!second.is_editing());
        assert_eq!(
            *saves.borrow(),
            vec![("second".to_string(), Some("x".to_string()))]
        );

        let second_index = second.index();
        drop(first);
        assert!(crate::engine::is_allocated(second_index));
        second.click();
        assert!(focus::is_focused(second_index));
    }

    #[test]
    fn test_key_release_is_ignored() {
        setup();
        let (field, calls) = make_field("Old", false);

        field.click();
        let mut release = KeyboardEvent::new("Enter");
        release.state = crate::state::KeyState::Release;

        assert!(!field.handle_key(&release));
        assert!(field.is_editing());
        assert!(calls.saves.borrow().is_empty());
    }
}
