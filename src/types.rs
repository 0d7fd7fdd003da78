//! Core types for notabili.
//!
//! These types define the vocabulary shared by the components, the form
//! composer and the host: field kinds, layout presets, native control flags
//! and the class-list helper used by every renderer.

use serde::{Deserialize, Serialize};

// =============================================================================
// Field Kinds
// =============================================================================

/// The three field archetypes a form can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Click-to-edit text that commits on blur/Enter.
    Inline,
    /// Labeled single-line input.
    Input,
    /// Labeled multi-line textarea.
    Textarea,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Input => "input",
            Self::Textarea => "textarea",
        }
    }
}

// =============================================================================
// Layout Presets
// =============================================================================

/// Form layout preset.
///
/// Purely cosmetic: selects container, header, content and heading classes.
/// Event handling is identical for every preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Card,
    Document,
    Minimal,
}

impl Layout {
    /// Base classes of the outer container.
    pub fn container_class(&self) -> &'static str {
        match self {
            Self::Card => "card w-full max-w-md animate-slide-in",
            Self::Document => "note-container",
            Self::Minimal => "w-full max-w-md",
        }
    }

    /// Base classes of the header region.
    pub fn header_class(&self) -> &'static str {
        match self {
            Self::Card => "text-center mb-10",
            Self::Document => "mb-10",
            Self::Minimal => "mb-6",
        }
    }

    /// Base classes of the content region.
    pub fn content_class(&self) -> &'static str {
        match self {
            Self::Card | Self::Minimal => "space-y-6",
            Self::Document => "note-document",
        }
    }

    /// Heading class: note-style for documents, generic otherwise.
    pub fn title_class(&self) -> &'static str {
        match self {
            Self::Document => "note-title",
            Self::Card | Self::Minimal => "mt-6 text-2xl font-semibold",
        }
    }

    pub fn subtitle_class(&self) -> &'static str {
        match self {
            Self::Document => "note-meta",
            Self::Card | Self::Minimal => "mt-2 text-sm",
        }
    }
}

// =============================================================================
// Native Control Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Boolean attributes of a native input/textarea/button.
    ///
    /// Combine with bitwise OR: `ControlFlags::REQUIRED | ControlFlags::DISABLED`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ControlFlags: u8 {
        const NONE = 0;
        const REQUIRED = 1 << 0;
        const DISABLED = 1 << 1;
        const READONLY = 1 << 2;
        const AUTOFOCUS = 1 << 3;
    }
}

impl ControlFlags {
    /// Attribute names for every set flag, in a stable order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            (Self::REQUIRED, "required"),
            (Self::DISABLED, "disabled"),
            (Self::READONLY, "readonly"),
            (Self::AUTOFOCUS, "autofocus"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}

// =============================================================================
// Button Type
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonType {
    #[default]
    Submit,
    Button,
    Reset,
}

impl ButtonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Button => "button",
            Self::Reset => "reset",
        }
    }
}

// =============================================================================
// Class List Helper
// =============================================================================

/// Join class fragments, dropping empty ones and collapsing whitespace.
///
/// `class_list(&["form-input", "", " wide "])` → `"form-input wide"`
pub fn class_list(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_skips_empty_fragments() {
        assert_eq!(class_list(&["form-input", "", "  wide  "]), "form-input wide");
        assert_eq!(class_list(&["", "  "]), "");
        assert_eq!(class_list(&["a b", "c"]), "a b c");
    }

    #[test]
    fn test_layout_classes() {
        assert_eq!(Layout::Document.container_class(), "note-container");
        assert_eq!(Layout::Card.header_class(), "text-center mb-10");
        assert_eq!(Layout::Minimal.content_class(), "space-y-6");
        assert_eq!(Layout::Document.title_class(), "note-title");
        assert_eq!(Layout::Minimal.subtitle_class(), "mt-2 text-sm");
    }

    #[test]
    fn test_layout_default_is_card() {
        assert_eq!(Layout::default(), Layout::Card);
    }

    #[test]
    fn test_control_flags_attribute_names() {
        let flags = ControlFlags::DISABLED | ControlFlags::REQUIRED;
        let names: Vec<_> = flags.attribute_names().collect();
        assert_eq!(names, vec!["required", "disabled"]);
        assert_eq!(ControlFlags::NONE.attribute_names().count(), 0);
    }

    #[test]
    fn test_field_kind_names() {
        assert_eq!(FieldKind::Inline.as_str(), "inline");
        assert_eq!(FieldKind::Textarea.as_str(), "textarea");
    }
}
