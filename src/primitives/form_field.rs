//! Labeled field renderers - stateless input and textarea markup.
//!
//! Pure functions of their descriptor: label (bound to the control id), the
//! native control with merged classes, then help text and error text. Each
//! piece is rendered only when present.

use crate::renderer::Element;

use super::types::{FieldChrome, LabeledInput, LabeledTextarea, NativeAttrs, RawControl};

const HELP_STYLE: &str = "color: var(--color-text-tertiary)";
const ERROR_STYLE: &str = "color: var(--color-error)";

/// Control id: explicit id, then name, then the fallback.
pub fn resolve_id(id: Option<&str>, name: Option<&str>, fallback: impl FnOnce() -> String) -> String {
    id.filter(|id| !id.is_empty())
        .or(name.filter(|name| !name.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(fallback)
}

/// Id of a labeled input rendered under `key`.
pub fn input_id(field: &LabeledInput, key: &str) -> String {
    resolve_id(field.attrs.id.as_deref(), Some(&field.name), || format!("input-{key}"))
}

/// Id of a labeled textarea rendered under `key`.
pub fn textarea_id(field: &LabeledTextarea, key: &str) -> String {
    resolve_id(field.attrs.id.as_deref(), Some(&field.name), || format!("textarea-{key}"))
}

/// Id of a legacy control at `position` (`input-0`, `textarea-2`, ...).
pub fn raw_id(control: &RawControl, prefix: &str, position: usize) -> String {
    resolve_id(control.attrs.id.as_deref(), control.name.as_deref(), || {
        format!("{prefix}-{position}")
    })
}

/// Help text line.
pub fn help_text(text: &str, class: Option<&str>) -> Element {
    Element::new("p")
        .class(&["text-sm mt-1", class.unwrap_or("")])
        .attr("style", HELP_STYLE)
        .text(text)
}

/// Error text line.
pub fn error_text(text: &str, class: Option<&str>) -> Element {
    Element::new("p")
        .class(&["text-sm mt-1", class.unwrap_or("")])
        .attr("style", ERROR_STYLE)
        .text(text)
}

/// Native attributes shared by both control kinds. `value` is handled by the
/// caller since inputs and textareas carry it differently.
fn native_attrs(control: Element, attrs: &NativeAttrs) -> Element {
    let mut control = control
        .attr_opt("placeholder", attrs.placeholder.as_deref())
        .attr_opt("autocomplete", attrs.autocomplete.as_deref());

    for name in attrs.flags.attribute_names() {
        control = control.flag(name, true);
    }
    for (name, value) in &attrs.extra {
        control = control.attr(name.as_str(), value.as_str());
    }
    control
}

fn labeled(chrome: &FieldChrome, control_id: &str, control: Element) -> Element {
    let label = chrome.label.as_deref().filter(|l| !l.is_empty()).map(|text| {
        Element::new("label")
            .attr("for", control_id)
            .class(&["form-label", chrome.label_class.as_deref().unwrap_or("")])
            .text(text)
    });

    let help = chrome
        .help_text
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|text| help_text(text, chrome.help_class.as_deref()));

    let error = chrome
        .error
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|text| error_text(text, chrome.error_class.as_deref()));

    Element::new("div")
        .class(&["form-group", chrome.container_class.as_deref().unwrap_or("")])
        .child_opt(label)
        .child(control)
        .child_opt(help)
        .child_opt(error)
}

fn control_class<'a>(chrome: &'a FieldChrome, attrs: &'a NativeAttrs) -> [&'a str; 3] {
    [
        "form-input",
        chrome.control_class.as_deref().unwrap_or(""),
        attrs.class.as_deref().unwrap_or(""),
    ]
}

/// Labeled single-line input.
pub fn render_input(field: &LabeledInput, control_id: &str) -> Element {
    let control = Element::new("input")
        .attr("id", control_id)
        .attr("name", field.name.as_str())
        .attr("type", field.input_type.as_str())
        .class(&control_class(&field.chrome, &field.attrs))
        .attr_opt("value", field.attrs.value.as_deref());

    labeled(&field.chrome, control_id, native_attrs(control, &field.attrs))
}

/// Labeled multi-line textarea.
pub fn render_textarea(field: &LabeledTextarea, control_id: &str) -> Element {
    let control = Element::new("textarea")
        .attr("id", control_id)
        .attr("name", field.name.as_str())
        .class(&control_class(&field.chrome, &field.attrs))
        .attr_opt("rows", field.rows.map(|r| r.to_string()).as_deref());

    let control = native_attrs(control, &field.attrs)
        .child_opt(field.attrs.value.clone());

    labeled(&field.chrome, control_id, control)
}

/// Legacy input: bare `form-group`, no label, help or error.
pub fn render_raw_input(control: &RawControl, control_id: &str) -> Element {
    let input = Element::new("input")
        .attr("id", control_id)
        .attr_opt("name", control.name.as_deref())
        .attr_opt("type", control.input_type.as_deref())
        .class(&[control.attrs.class.as_deref().unwrap_or("form-input")])
        .attr_opt("value", control.attrs.value.as_deref());

    Element::new("div")
        .class(&["form-group"])
        .child(native_attrs(input, &control.attrs))
}

/// Legacy textarea.
pub fn render_raw_textarea(control: &RawControl, control_id: &str) -> Element {
    let textarea = Element::new("textarea")
        .attr("id", control_id)
        .attr_opt("name", control.name.as_deref())
        .class(&[control.attrs.class.as_deref().unwrap_or("form-input")])
        .attr_opt("rows", control.rows.map(|r| r.to_string()).as_deref());

    Element::new("div")
        .class(&["form-group"])
        .child(native_attrs(textarea, &control.attrs).child_opt(control.attrs.value.clone()))
}
