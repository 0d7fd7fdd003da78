//! Primitive types - Props, field descriptors and callbacks.
//!
//! Descriptors are plain data plus `Rc` callbacks. The host builds a fresh
//! set every render and hands them to the form; nothing here is reactive.

use std::fmt;
use std::rc::Rc;

use crate::types::{ButtonType, ControlFlags, FieldKind, Layout};

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by registrations.
///
/// Call this to unregister handlers and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Value change callback (receives the full new text).
pub type ChangeCallback = Rc<dyn Fn(&str)>;

/// Save callback. `Some(text)` for a real change, `None` for a no-op commit.
pub type SaveCallback = Rc<dyn Fn(Option<&str>)>;

/// Form submission callback.
pub type SubmitCallback = Rc<dyn Fn()>;

fn noop_change() -> ChangeCallback {
    Rc::new(|_| {})
}

fn noop_save() -> SaveCallback {
    Rc::new(|_| {})
}

// =============================================================================
// InlineEdit Props
// =============================================================================

/// Properties for an [`InlineEditField`](super::InlineEditField).
#[derive(Clone)]
pub struct InlineEditProps {
    /// Registry id. Generated when absent.
    pub id: Option<String>,
    /// Authoritative value owned by the host.
    pub value: String,
    pub on_change: ChangeCallback,
    pub on_save: SaveCallback,
    pub placeholder: Option<String>,
    /// Textarea editing; plain Enter inserts a newline.
    pub multiline: bool,
    /// Extra classes on the display wrapper.
    pub class: Option<String>,
    /// Classes for the single-line value span and input.
    pub title_class: Option<String>,
    /// Classes for the multi-line value span and textarea.
    pub content_class: Option<String>,
}

impl Default for InlineEditProps {
    fn default() -> Self {
        Self {
            id: None,
            value: String::new(),
            on_change: noop_change(),
            on_save: noop_save(),
            placeholder: None,
            multiline: false,
            class: None,
            title_class: None,
            content_class: None,
        }
    }
}

impl fmt::Debug for InlineEditProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineEditProps")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("placeholder", &self.placeholder)
            .field("multiline", &self.multiline)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Field Descriptors
// =============================================================================

/// One field of a form. The variant is fixed at construction; a field that
/// changes kind is a new descriptor.
#[derive(Clone)]
pub enum FieldDescriptor {
    Inline(InlineField),
    Input(LabeledInput),
    Textarea(LabeledTextarea),
}

impl FieldDescriptor {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Inline(_) => FieldKind::Inline,
            Self::Input(_) => FieldKind::Input,
            Self::Textarea(_) => FieldKind::Textarea,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Inline(field) => &field.name,
            Self::Input(field) => &field.name,
            Self::Textarea(field) => &field.name,
        }
    }

    /// Rendering key: position disambiguates duplicate names.
    pub fn key(&self, index: usize) -> String {
        format!("field-{}-{}", self.name(), index)
    }
}

impl From<InlineField> for FieldDescriptor {
    fn from(field: InlineField) -> Self {
        Self::Inline(field)
    }
}

impl From<LabeledInput> for FieldDescriptor {
    fn from(field: LabeledInput) -> Self {
        Self::Input(field)
    }
}

impl From<LabeledTextarea> for FieldDescriptor {
    fn from(field: LabeledTextarea) -> Self {
        Self::Textarea(field)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.kind().as_str()).field(&self.name()).finish()
    }
}

/// Click-to-edit field.
#[derive(Clone)]
pub struct InlineField {
    pub name: String,
    pub value: String,
    pub on_change: ChangeCallback,
    pub on_save: SaveCallback,
    pub placeholder: Option<String>,
    pub multiline: bool,
    pub display_class: Option<String>,
    pub title_class: Option<String>,
    pub content_class: Option<String>,
    pub label: Option<String>,
    pub help_text: Option<String>,
    pub error: Option<String>,
}

impl Default for InlineField {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: String::new(),
            on_change: noop_change(),
            on_save: noop_save(),
            placeholder: None,
            multiline: false,
            display_class: None,
            title_class: None,
            content_class: None,
            label: None,
            help_text: None,
            error: None,
        }
    }
}

/// Decoration shared by labeled inputs and textareas.
#[derive(Clone, Default, Debug)]
pub struct FieldChrome {
    pub label: Option<String>,
    pub error: Option<String>,
    pub help_text: Option<String>,
    pub container_class: Option<String>,
    pub label_class: Option<String>,
    /// Classes merged onto the native control after `form-input`.
    pub control_class: Option<String>,
    pub error_class: Option<String>,
    pub help_class: Option<String>,
}

/// Native attributes of an input or textarea.
#[derive(Clone, Default)]
pub struct NativeAttrs {
    pub id: Option<String>,
    pub value: Option<String>,
    pub placeholder: Option<String>,
    /// Plain `class` attribute, merged after the control class.
    pub class: Option<String>,
    pub flags: ControlFlags,
    pub autocomplete: Option<String>,
    pub on_change: Option<ChangeCallback>,
    /// Anything else, written verbatim after the known attributes.
    pub extra: Vec<(String, String)>,
}

/// Labeled single-line input.
#[derive(Clone)]
pub struct LabeledInput {
    pub name: String,
    /// `type` attribute, "text" by default.
    pub input_type: String,
    pub chrome: FieldChrome,
    pub attrs: NativeAttrs,
}

impl Default for LabeledInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            input_type: "text".to_string(),
            chrome: FieldChrome::default(),
            attrs: NativeAttrs::default(),
        }
    }
}

/// Labeled multi-line textarea.
#[derive(Clone, Default)]
pub struct LabeledTextarea {
    pub name: String,
    pub rows: Option<u32>,
    pub chrome: FieldChrome,
    pub attrs: NativeAttrs,
}

// =============================================================================
// Legacy Controls
// =============================================================================

/// Raw input/textarea attribute bag rendered without decoration.
#[derive(Clone, Default)]
pub struct RawControl {
    pub name: Option<String>,
    /// Input `type`; ignored for textareas.
    pub input_type: Option<String>,
    /// Textarea rows; ignored for inputs.
    pub rows: Option<u32>,
    pub attrs: NativeAttrs,
}

// =============================================================================
// Form Props
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FooterLink {
    pub href: String,
    pub label: String,
}

/// Submit control descriptor.
#[derive(Clone, Debug, Default)]
pub struct SubmitButton {
    pub label: Option<String>,
    pub loading_label: Option<String>,
    pub is_submitting: bool,
    pub disabled: bool,
    pub button_type: ButtonType,
    pub class: Option<String>,
}

/// Everything a [`FormComposer`](super::FormComposer) renders from.
#[derive(Clone)]
pub struct FormProps {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub show_logo: bool,
    pub success: Option<String>,
    pub error: Option<String>,
    /// When set the fields are wrapped in a `form`, otherwise a `div`.
    pub on_submit: Option<SubmitCallback>,
    pub form_class: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub legacy_inputs: Vec<RawControl>,
    pub legacy_textareas: Vec<RawControl>,
    pub submit_button: Option<SubmitButton>,
    pub footer_text: Option<String>,
    pub footer_link: Option<FooterLink>,
    pub layout: Layout,
    pub container_class: Option<String>,
    pub header_class: Option<String>,
    pub content_class: Option<String>,
    pub footer_class: Option<String>,
}

impl Default for FormProps {
    fn default() -> Self {
        Self {
            title: None,
            subtitle: None,
            show_logo: true,
            success: None,
            error: None,
            on_submit: None,
            form_class: None,
            fields: Vec::new(),
            legacy_inputs: Vec::new(),
            legacy_textareas: Vec::new(),
            submit_button: None,
            footer_text: None,
            footer_link: None,
            layout: Layout::default(),
            container_class: None,
            header_class: None,
            content_class: None,
            footer_class: None,
        }
    }
}
