//! FormComposer - Polymorphic form renderer.
//!
//! Renders, in order: header (logo, title, subtitle), success and error
//! alerts, a `form` (when `on_submit` is set) or plain `div` wrapping the
//! field list and the submit control, then the footer.
//!
//! Inline fields are delegated to [`InlineEditField`] instances kept across
//! renders by key (`field-{name}-{index}`), the same way `each()` keeps one
//! component per list key: new keys mount a field, existing keys receive the
//! fresh value and callbacks, vanished keys are dropped. Input and textarea
//! descriptors are rendered statelessly.
//!
//! The markup is inert. Events come back through [`FormComposer::click_inline`],
//! [`FormComposer::input`] and [`FormComposer::submit`], and are routed to the
//! handlers of the most recent render.

use std::collections::{HashMap, HashSet};

use crate::renderer::Element;

use super::form_field::{
    error_text, help_text, input_id, raw_id, render_input, render_raw_input, render_raw_textarea,
    render_textarea, textarea_id,
};
use super::inline_edit::InlineEditField;
use super::types::{
    ChangeCallback, FieldDescriptor, FooterLink, FormProps, InlineEditProps, InlineField,
    SubmitButton, SubmitCallback,
};

const SUCCESS_ICON: &str = "M9 12l2 2 4-4m6 2a9 9 0 11-18 0 9 9 0 0118 0z";
const ERROR_ICON: &str = "M12 8v4m0 4h.01M21 12a9 9 0 11-18 0 9 9 0 0118 0z";

/// Stateful renderer for one form on a page.
#[derive(Default)]
pub struct FormComposer {
    inline_fields: HashMap<String, InlineEditField>,
    /// Change handlers of traditional and legacy controls, by control id.
    change_handlers: HashMap<String, ChangeCallback>,
    on_submit: Option<SubmitCallback>,
    /// Submit button is busy or disabled.
    submit_blocked: bool,
}

impl FormComposer {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Render
    // =========================================================================

    pub fn render(&mut self, props: &FormProps) -> Element {
        self.change_handlers.clear();
        self.on_submit = props.on_submit.clone();
        self.submit_blocked = props
            .submit_button
            .as_ref()
            .is_some_and(|b| b.is_submitting || b.disabled);

        let layout = props.layout;

        let header = Element::new("header")
            .class(&[layout.header_class(), opt(&props.header_class)])
            .child_opt(props.show_logo.then(logo))
            .child_opt(present(&props.title).map(|title| {
                Element::new("h1")
                    .class(&[layout.title_class()])
                    .attr("style", "color: var(--color-text-primary)")
                    .text(title)
            }))
            .child_opt(present(&props.subtitle).map(|subtitle| {
                Element::new("p")
                    .class(&[layout.subtitle_class()])
                    .attr("style", "color: var(--color-text-secondary)")
                    .text(subtitle)
            }));

        let body_tag = if props.on_submit.is_some() { "form" } else { "div" };
        let body = Element::new(body_tag)
            .class(&[props.form_class.as_deref().unwrap_or("space-y-6")])
            .child_opt(self.render_fields(props))
            .child_opt(props.submit_button.as_ref().map(submit_button));

        let content = Element::new("div")
            .class(&[layout.content_class(), opt(&props.content_class)])
            .child_opt(present(&props.success).map(|text| alert("alert-success", SUCCESS_ICON, text)))
            .child_opt(present(&props.error).map(|text| alert("alert-error", ERROR_ICON, text)))
            .child(body);

        tracing::trace!(
            fields = props.fields.len(),
            inline = self.inline_fields.len(),
            layout = ?layout,
            "form rendered"
        );

        Element::new("div")
            .class(&[layout.container_class(), opt(&props.container_class)])
            .child(header)
            .child(content)
            .child_opt(footer(props))
    }

    fn render_fields(&mut self, props: &FormProps) -> Option<Element> {
        if !props.fields.is_empty() {
            let mut seen = HashSet::new();
            let mut list = Element::new("div").class(&["space-y-6"]);

            for (index, field) in props.fields.iter().enumerate() {
                let key = field.key(index);
                // The single dispatch point over field kinds
                let rendered = match field {
                    FieldDescriptor::Inline(inline) => self.render_inline(&key, inline),
                    FieldDescriptor::Input(input) => {
                        let id = input_id(input, &key);
                        if let Some(on_change) = &input.attrs.on_change {
                            self.change_handlers.insert(id.clone(), on_change.clone());
                        }
                        render_input(input, &id)
                    }
                    FieldDescriptor::Textarea(textarea) => {
                        let id = textarea_id(textarea, &key);
                        if let Some(on_change) = &textarea.attrs.on_change {
                            self.change_handlers.insert(id.clone(), on_change.clone());
                        }
                        render_textarea(textarea, &id)
                    }
                };
                list = list.child(rendered);
                seen.insert(key);
            }

            self.inline_fields.retain(|key, _| seen.contains(key));
            return Some(list);
        }

        // Legacy shape: raw attribute bags, only when no descriptors are given
        self.inline_fields.clear();

        if props.legacy_inputs.is_empty() && props.legacy_textareas.is_empty() {
            return None;
        }

        let mut list = Element::new("div").class(&["space-y-6"]);
        for (position, control) in props.legacy_inputs.iter().enumerate() {
            let id = raw_id(control, "input", position);
            if let Some(on_change) = &control.attrs.on_change {
                self.change_handlers.insert(id.clone(), on_change.clone());
            }
            list = list.child(render_raw_input(control, &id));
        }
        for (position, control) in props.legacy_textareas.iter().enumerate() {
            let id = raw_id(control, "textarea", position);
            if let Some(on_change) = &control.attrs.on_change {
                self.change_handlers.insert(id.clone(), on_change.clone());
            }
            list = list.child(render_raw_textarea(control, &id));
        }
        Some(list)
    }

    fn render_inline(&mut self, key: &str, field: &InlineField) -> Element {
        let props = InlineEditProps {
            id: None,
            value: field.value.clone(),
            on_change: field.on_change.clone(),
            on_save: field.on_save.clone(),
            placeholder: field.placeholder.clone(),
            multiline: field.multiline,
            class: field.display_class.clone(),
            title_class: field.title_class.clone(),
            content_class: field.content_class.clone(),
        };

        let component = self
            .inline_fields
            .entry(key.to_string())
            .and_modify(|existing| existing.update(&props))
            .or_insert_with(|| InlineEditField::new(props.clone()));

        Element::new("div")
            .class(&["field-container"])
            .attr("data-field-key", key)
            .child_opt(present(&field.label).map(|label| {
                Element::new("label")
                    .class(&["form-label"])
                    .attr("style", "color: var(--color-text-secondary)")
                    .text(label)
            }))
            .child(component.render())
            .child_opt(present(&field.help_text).map(|text| help_text(text, None)))
            .child_opt(present(&field.error).map(|text| error_text(text, None)))
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Click on the inline field rendered under `key`.
    /// Returns false when no such field exists.
    pub fn click_inline(&self, key: &str) -> bool {
        match self.inline_fields.get(key) {
            Some(field) => {
                field.click();
                true
            }
            None => false,
        }
    }

    /// Mounted inline field for a key.
    pub fn inline_field(&self, key: &str) -> Option<&InlineEditField> {
        self.inline_fields.get(key)
    }

    /// Keys of all mounted inline fields, sorted.
    pub fn inline_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inline_fields.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Native change event on a traditional or legacy control.
    /// Returns false when the control has no change handler.
    pub fn input(&self, control_id: &str, value: &str) -> bool {
        match self.change_handlers.get(control_id) {
            Some(on_change) => {
                on_change(value);
                true
            }
            None => false,
        }
    }

    /// Submit the form. Ignored when there is no submit handler or the
    /// submit control is busy or disabled.
    pub fn submit(&self) -> bool {
        if self.submit_blocked {
            return false;
        }
        match &self.on_submit {
            Some(on_submit) => {
                tracing::debug!("form submitted");
                on_submit();
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Fragments
// =============================================================================

fn opt(class: &Option<String>) -> &str {
    class.as_deref().unwrap_or("")
}

/// Only non-empty text renders.
fn present(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}

fn logo() -> Element {
    Element::new("div").class(&["flex justify-center"]).child(
        Element::new("picture")
            .child(
                Element::new("source")
                    .attr("srcset", "/images/logo.webp")
                    .attr("type", "image/webp"),
            )
            .child(
                Element::new("img")
                    .attr("src", "/images/logo.png")
                    .attr("alt", "Notabili Logo")
                    .class(&["h-32 w-auto"])
                    .attr("loading", "eager")
                    .attr("decoding", "async"),
            ),
    )
}

fn alert(variant: &str, icon: &str, text: &str) -> Element {
    let svg = Element::new("svg")
        .class(&["alert-icon"])
        .attr("fill", "none")
        .attr("stroke", "currentColor")
        .attr("viewBox", "0 0 24 24")
        .child(
            Element::new("path")
                .attr("stroke-linecap", "round")
                .attr("stroke-linejoin", "round")
                .attr("stroke-width", "2")
                .attr("d", icon),
        );

    Element::new("div")
        .class(&["alert", variant])
        .child(svg)
        .child(Element::new("span").text(text))
}

fn submit_button(button: &SubmitButton) -> Element {
    let busy = button.is_submitting;

    let label = if busy {
        match present(&button.loading_label) {
            Some(text) => Element::new("span").text(text),
            None => Element::new("span").class(&["sr-only"]).text("Submitting..."),
        }
    } else {
        Element::new("span").text(present(&button.label).unwrap_or("Submit"))
    };

    Element::new("button")
        .attr("type", button.button_type.as_str())
        .class(&[
            "btn btn-primary w-full",
            if busy { "btn-loading" } else { "" },
            opt(&button.class),
        ])
        .flag("disabled", busy || button.disabled)
        .attr("aria-busy", if busy { "true" } else { "false" })
        .child(label)
}

fn footer(props: &FormProps) -> Option<Element> {
    let text = present(&props.footer_text);
    let link = props.footer_link.as_ref();
    if text.is_none() && link.is_none() {
        return None;
    }

    let mut line = Element::new("p")
        .class(&["text-sm"])
        .attr("style", "color: var(--color-text-secondary)");
    if let Some(text) = text {
        line = line.text(text);
    }
    if text.is_some() && link.is_some() {
        line = line.text(" ");
    }
    if let Some(FooterLink { href, label }) = link {
        line = line.child(
            Element::new("a")
                .attr("href", href.as_str())
                .class(&["font-medium link-accent"])
                .text(label.as_str()),
        );
    }

    Some(
        Element::new("footer")
            .class(&["mt-8 text-center", opt(&props.footer_class)])
            .child(line),
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reset_registry;
    use crate::primitives::types::{FieldChrome, LabeledInput, LabeledTextarea, NativeAttrs, RawControl};
    use crate::state::{reset_focus_state, reset_keyboard_state, KeyboardEvent};
    use crate::types::Layout;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() {
        reset_registry();
        reset_focus_state();
        reset_keyboard_state();
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn recorder(log: &Log, tag: &'static str) -> ChangeCallback {
        let log = log.clone();
        Rc::new(move |v| log.borrow_mut().push(format!("{tag}:{v}")))
    }

    fn mixed_fields(log: &Log) -> Vec<FieldDescriptor> {
        vec![
            InlineField {
                name: "title".into(),
                value: "Groceries".into(),
                on_change: recorder(log, "title"),
                ..Default::default()
            }
            .into(),
            LabeledInput {
                name: "email".into(),
                chrome: FieldChrome { label: Some("Email".into()), ..Default::default() },
                attrs: NativeAttrs { on_change: Some(recorder(log, "email")), ..Default::default() },
                ..Default::default()
            }
            .into(),
            LabeledTextarea {
                name: "bio".into(),
                attrs: NativeAttrs { on_change: Some(recorder(log, "bio")), ..Default::default() },
                ..Default::default()
            }
            .into(),
        ]
    }

    fn field_list(root: &Element) -> &Element {
        root.find(&|e| e.has_class("space-y-6") && e.tag == "div" && e.element_children().count() > 0
            && e.element_children().all(|c| c.has_class("field-container") || c.has_class("form-group")))
            .expect("field list")
    }

    #[test]
    fn test_fields_render_in_order_by_kind() {
        setup();
        let log: Log = Rc::default();
        let mut form = FormComposer::new();
        let root = form.render(&FormProps { fields: mixed_fields(&log), ..Default::default() });

        let list = field_list(&root);
        let children: Vec<&Element> = list.element_children().collect();
        assert_eq!(children.len(), 3);
        assert!(children[0].has_class("field-container"));
        assert_eq!(children[0].get_attr("data-field-key"), Some("field-title-0"));
        assert_eq!(children[1].find_by_tag("input")[0].get_attr("id"), Some("email"));
        assert_eq!(children[2].find_by_tag("textarea")[0].get_attr("id"), Some("bio"));
    }

    #[test]
    fn test_each_field_wired_to_its_own_change() {
        setup();
        let log: Log = Rc::default();
        let mut form = FormComposer::new();
        form.render(&FormProps { fields: mixed_fields(&log), ..Default::default() });

        assert!(form.input("email", "a@b.c"));
        assert!(form.input("bio", "hello"));
        assert!(!form.input("nope", "x"));

        assert!(form.click_inline("field-title-0"));
        let title = form.inline_field("field-title-0").expect("inline field");
        title.set_buffer("Errands");
        title.handle_key(&KeyboardEvent::new("Enter"));

        assert_eq!(
            *log.borrow(),
            vec!["email:a@b.c".to_string(), "bio:hello".to_string(), "title:Errands".to_string()]
        );
    }

    #[test]
    fn test_inline_fields_survive_rerender() {
        setup();
        let log: Log = Rc::default();
        let mut form = FormComposer::new();
        form.render(&FormProps { fields: mixed_fields(&log), ..Default::default() });
        let index = form.inline_field("field-title-0").map(|f| f.index());

        form.click_inline("field-title-0");
        let root = form.render(&FormProps { fields: mixed_fields(&log), ..Default::default() });

        // Same instance, still editing
        let field = form.inline_field("field-title-0").expect("inline field");
        assert_eq!(Some(field.index()), index);
        assert!(field.is_editing());
        assert_eq!(root.find_by_class("inline-edit-input").len(), 1);
    }

    #[test]
    fn test_duplicate_names_get_distinct_keys() {
        setup();
        let mut form = FormComposer::new();
        let fields = vec![
            InlineField { name: "line".into(), value: "a".into(), ..Default::default() }.into(),
            InlineField { name: "line".into(), value: "b".into(), ..Default::default() }.into(),
        ];
        form.render(&FormProps { fields, ..Default::default() });
        assert_eq!(form.inline_keys(), vec!["field-line-0".to_string(), "field-line-1".to_string()]);
    }

    #[test]
    fn test_removed_fields_unmount() {
        setup();
        let mut form = FormComposer::new();
        let two: Vec<FieldDescriptor> = vec![
            InlineField { name: "a".into(), ..Default::default() }.into(),
            InlineField { name: "b".into(), ..Default::default() }.into(),
        ];
        form.render(&FormProps { fields: two, ..Default::default() });
        assert_eq!(crate::engine::get_allocated_count(), 2);

        let one: Vec<FieldDescriptor> = vec![InlineField { name: "a".into(), ..Default::default() }.into()];
        form.render(&FormProps { fields: one, ..Default::default() });
        assert_eq!(form.inline_keys(), vec!["field-a-0".to_string()]);
        assert_eq!(crate::engine::get_allocated_count(), 1);
    }

    #[test]
    fn test_descriptors_take_priority_over_legacy() {
        setup();
        let log: Log = Rc::default();
        let mut form = FormComposer::new();
        let root = form.render(&FormProps {
            fields: mixed_fields(&log),
            legacy_inputs: vec![RawControl { name: Some("legacy".into()), ..Default::default() }],
            ..Default::default()
        });

        assert!(root.find_by_id("legacy").is_none());
        assert_eq!(field_list(&root).element_children().count(), 3);
    }

    #[test]
    fn test_legacy_path_when_no_descriptors() {
        setup();
        let mut form = FormComposer::new();
        let root = form.render(&FormProps {
            legacy_inputs: vec![
                RawControl { name: Some("user".into()), ..Default::default() },
                RawControl::default(),
            ],
            legacy_textareas: vec![RawControl::default()],
            ..Default::default()
        });

        assert!(root.find_by_id("user").is_some());
        assert!(root.find_by_id("input-1").is_some());
        assert!(root.find_by_id("textarea-0").is_some());
        assert!(root.find_by_tag("label").is_empty());
    }

    #[test]
    fn test_no_fields_no_list() {
        setup();
        let mut form = FormComposer::new();
        let root = form.render(&FormProps { show_logo: false, ..Default::default() });
        assert!(root.find_by_class("field-container").is_empty());
        assert!(root.find_by_class("form-group").is_empty());
    }

    #[test]
    fn test_submit_busy_state() {
        setup();
        let mut form = FormComposer::new();
        let busy = SubmitButton {
            label: Some("Save".into()),
            loading_label: Some("Saving...".into()),
            is_submitting: true,
            ..Default::default()
        };
        let root = form.render(&FormProps { submit_button: Some(busy), ..Default::default() });
        let button = root.find_by_tag("button")[0];
        assert!(button.has_attr("disabled"));
        assert_eq!(button.get_attr("aria-busy"), Some("true"));
        assert!(button.has_class("btn-loading"));
        assert_eq!(button.text_content(), "Saving...");

        // No loading label: visually hidden default
        let busy_default = SubmitButton { is_submitting: true, ..Default::default() };
        let root = form.render(&FormProps { submit_button: Some(busy_default), ..Default::default() });
        let button = root.find_by_tag("button")[0];
        assert_eq!(button.find_by_class("sr-only")[0].text_content(), "Submitting...");

        let idle = SubmitButton::default();
        let root = form.render(&FormProps { submit_button: Some(idle), ..Default::default() });
        let button = root.find_by_tag("button")[0];
        assert!(!button.has_attr("disabled"));
        assert_eq!(button.get_attr("aria-busy"), Some("false"));
        assert_eq!(button.text_content(), "Submit");
        assert_eq!(button.get_attr("type"), Some("submit"));
    }

    #[test]
    fn test_submit_routing() {
        setup();
        let submitted = Rc::new(RefCell::new(0));
        let counter = submitted.clone();
        let on_submit: SubmitCallback = Rc::new(move || *counter.borrow_mut() += 1);

        let mut form = FormComposer::new();
        let root = form.render(&FormProps {
            on_submit: Some(on_submit.clone()),
            submit_button: Some(SubmitButton::default()),
            ..Default::default()
        });
        assert_eq!(root.find_by_tag("form").len(), 1);
        assert!(form.submit());

        form.render(&FormProps {
            on_submit: Some(on_submit),
            submit_button: Some(SubmitButton { disabled: true, ..Default::default() }),
            ..Default::default()
        });
        assert!(!form.submit());
        assert_eq!(*submitted.borrow(), 1);

        let root = form.render(&FormProps::default());
        assert!(root.find_by_tag("form").is_empty());
        assert!(!form.submit());
    }

    #[test]
    fn test_header_alerts_and_footer() {
        setup();
        let mut form = FormComposer::new();
        let root = form.render(&FormProps {
            title: Some("Sign in".into()),
            subtitle: Some("Welcome back".into()),
            success: Some("Saved".into()),
            error: Some("Oops".into()),
            footer_text: Some("No account?".into()),
            footer_link: Some(FooterLink { href: "/register".into(), label: "Register".into() }),
            ..Default::default()
        });

        assert_eq!(root.find_by_tag("img")[0].get_attr("alt"), Some("Notabili Logo"));
        assert_eq!(root.find_by_tag("h1")[0].text_content(), "Sign in");
        assert!(root.find_by_tag("h1")[0].has_class("text-2xl"));
        // Both alerts may show at once, success first
        let alerts = root.find_by_class("alert");
        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].has_class("alert-success"));
        assert!(alerts[1].has_class("alert-error"));

        let footer = root.find_by_tag("footer")[0];
        assert_eq!(footer.text_content(), "No account? Register");
        assert_eq!(footer.find_by_tag("a")[0].get_attr("href"), Some("/register"));
    }

    #[test]
    fn test_layout_only_changes_classes() {
        setup();
        let mut form = FormComposer::new();
        let props = |layout| FormProps {
            title: Some("Note".into()),
            subtitle: Some("meta".into()),
            layout,
            show_logo: false,
            ..Default::default()
        };

        let doc = form.render(&props(Layout::Document));
        assert!(doc.has_class("note-container"));
        assert!(doc.find_by_tag("h1")[0].has_class("note-title"));
        assert!(doc.find_by_tag("p")[0].has_class("note-meta"));
        assert_eq!(doc.find_by_class("note-document").len(), 1);

        let minimal = form.render(&props(Layout::Minimal));
        assert_eq!(minimal.get_attr("class"), Some("w-full max-w-md"));
        assert!(minimal.find_by_tag("header")[0].has_class("mb-6"));
    }
}
