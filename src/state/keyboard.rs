//! Keyboard Module - Keyboard event types, handler registry and routing
//!
//! # API
//!
//! - `on(handler)` - Subscribe to events no focused component consumed
//! - `on_focused(i, fn)` - Subscribe when component i has focus
//! - `route_keyboard_event(event)` - Deliver an event in priority order
//!
//! Routing order: the focused component's handlers, then global handlers,
//! then Tab/Shift+Tab focus cycling. Tab
//! with no other focusable component clears focus.
//!
//! # Example
//!
//! ```ignore
//! use notabili::state::keyboard;
//!
//! let cleanup = keyboard::on_focused(component_index, |event| {
//!     println!("Focused component got: {}", event.key);
//!     false
//! });
//! keyboard::route_keyboard_event(KeyboardEvent::new("Enter"));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::focus;

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    pub fn meta() -> Self {
        Self { meta: true, ..Self::default() }
    }

    /// Ctrl or Meta (Cmd on macOS), the "commit" chord for multi-line fields.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "ArrowUp")
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Press and repeat both count as "the key went down".
    pub fn is_press(&self) -> bool {
        self.state != KeyState::Release
    }

    /// The character this event would insert, if any.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.ctrl || self.modifiers.alt || self.modifiers.meta {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

impl From<KeyEvent> for KeyboardEvent {
    fn from(event: KeyEvent) -> Self {
        let key = match event.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Esc => "Escape".to_string(),
            KeyCode::Up => "ArrowUp".to_string(),
            KeyCode::Down => "ArrowDown".to_string(),
            KeyCode::Left => "ArrowLeft".to_string(),
            KeyCode::Right => "ArrowRight".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            _ => String::new(),
        };

        let state = match event.kind {
            KeyEventKind::Press => KeyState::Press,
            KeyEventKind::Repeat => KeyState::Repeat,
            KeyEventKind::Release => KeyState::Release,
        };

        let mods = event.modifiers;
        let modifiers = Modifiers {
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
            shift: mods.contains(KeyModifiers::SHIFT) || event.code == KeyCode::BackTab,
            meta: mods.contains(KeyModifiers::SUPER) || mods.contains(KeyModifiers::META),
        };

        Self { key, modifiers, state }
    }
}

/// Handler for keyboard events. Return true to consume the event.
pub type KeyHandler = Rc<dyn Fn(&KeyboardEvent) -> bool>;

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

#[derive(Default)]
struct HandlerRegistry {
    global_handlers: Vec<(usize, KeyHandler)>,
    focused_handlers: HashMap<usize, Vec<(usize, KeyHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::default());
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================
//
// Handlers are cloned out of the registry before they run. A handler that
// commits a field may cause components to unmount and unregister handlers.

/// Dispatch to global handlers only (not focused).
pub fn dispatch_global(event: &KeyboardEvent) -> bool {
    let handlers: Vec<KeyHandler> = REGISTRY.with(|reg| {
        reg.borrow()
            .global_handlers
            .iter()
            .map(|(_, h)| h.clone())
            .collect()
    });

    handlers.iter().any(|handler| handler(event))
}

/// Dispatch to focused component handlers.
/// Returns true if consumed.
pub fn dispatch_focused(focused_index: i32, event: &KeyboardEvent) -> bool {
    if focused_index < 0 || !event.is_press() {
        return false;
    }

    let handlers: Vec<KeyHandler> = REGISTRY.with(|reg| {
        reg.borrow()
            .focused_handlers
            .get(&(focused_index as usize))
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    });

    handlers.iter().any(|handler| handler(event))
}

/// Route an event through the full priority chain.
/// Returns true if anything consumed it.
pub fn route_keyboard_event(event: KeyboardEvent) -> bool {
    if !event.is_press() {
        return false;
    }

    if dispatch_focused(focus::get_focused_index(), &event) {
        return true;
    }

    if dispatch_global(&event) {
        return true;
    }

    if event.key == "Tab" {
        let moved = if event.modifiers.shift {
            focus::focus_previous()
        } else {
            focus::focus_next()
        };
        // Nowhere else to go: focus leaves the page
        if !moved {
            focus::blur();
        }
        return true;
    }

    false
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to events that no focused component consumed.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut().global_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to events when a specific component has focus.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on_focused<F>(index: usize, handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.focused_handlers
            .entry(index)
            .or_default()
            .push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.focused_handlers.get_mut(&index) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.focused_handlers.remove(&index);
                }
            }
        });
    }
}

/// Reset keyboard state (for testing)
pub fn reset_keyboard_state() {
    REGISTRY.with(|reg| *reg.borrow_mut() = HandlerRegistry::default());
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, reset_registry, set_focusable};
    use std::cell::Cell;

    fn setup() {
        reset_registry();
        focus::reset_focus_state();
        reset_keyboard_state();
    }

    #[test]
    fn test_focused_handler_only_when_focused() {
        setup();
        let index = allocate_index(None);
        set_focusable(index, true);

        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let _cleanup = on_focused(index, move |_| {
            hits_clone.set(hits_clone.get() + 1);
            true
        });

        route_keyboard_event(KeyboardEvent::new("x"));
        assert_eq!(hits.get(), 0);

        focus::focus(index);
        assert!(route_keyboard_event(KeyboardEvent::new("x")));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_focused_handler_takes_priority() {
        setup();
        let index = allocate_index(None);
        set_focusable(index, true);
        focus::focus(index);

        let global_hit = Rc::new(Cell::new(false));
        let global_clone = global_hit.clone();
        let _g = on(move |_| {
            global_clone.set(true);
            true
        });
        let _f = on_focused(index, |_| true);

        route_keyboard_event(KeyboardEvent::new("Enter"));
        assert!(!global_hit.get());
    }

    #[test]
    fn test_global_handler_sees_unconsumed_chords() {
        setup();
        let index = allocate_index(None);
        set_focusable(index, true);
        focus::focus(index);

        // Focused handler ignores chords, like an editing field does
        let _f = on_focused(index, |event| event.printable().is_some());

        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let cleanup = on(move |event| {
            if event.modifiers.ctrl && event.key == "n" {
                hits_clone.set(hits_clone.get() + 1);
                return true;
            }
            false
        });

        assert!(route_keyboard_event(KeyboardEvent::with_modifiers("n", Modifiers::ctrl())));
        assert!(route_keyboard_event(KeyboardEvent::new("n")));
        assert_eq!(hits.get(), 1);

        cleanup();
        assert!(!route_keyboard_event(KeyboardEvent::with_modifiers("n", Modifiers::ctrl())));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_release_events_not_dispatched() {
        setup();
        let hit = Rc::new(Cell::new(false));
        let hit_clone = hit.clone();
        let _cleanup = on(move |_| {
            hit_clone.set(true);
            true
        });

        let mut event = KeyboardEvent::new("a");
        event.state = KeyState::Release;
        assert!(!route_keyboard_event(event));
        assert!(!hit.get());
    }

    #[test]
    fn test_tab_cycles_focus() {
        setup();
        let a = allocate_index(None);
        let b = allocate_index(None);
        set_focusable(a, true);
        set_focusable(b, true);

        route_keyboard_event(KeyboardEvent::new("Tab"));
        assert!(focus::is_focused(a));
        route_keyboard_event(KeyboardEvent::new("Tab"));
        assert!(focus::is_focused(b));
        route_keyboard_event(KeyboardEvent::with_modifiers("Tab", Modifiers::shift()));
        assert!(focus::is_focused(a));
    }

    #[test]
    fn test_crossterm_conversion() {
        let event: KeyboardEvent = KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL).into();
        assert_eq!(event.key, "Enter");
        assert!(event.modifiers.command());

        let event: KeyboardEvent = KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE).into();
        assert_eq!(event.key, "Tab");
        assert!(event.modifiers.shift);

        let event: KeyboardEvent = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE).into();
        assert_eq!(event.printable(), Some('q'));
    }

    #[test]
    fn test_printable() {
        assert_eq!(KeyboardEvent::new("é").printable(), Some('é'));
        assert_eq!(KeyboardEvent::new("Enter").printable(), None);
        assert_eq!(KeyboardEvent::with_modifiers("a", Modifiers::ctrl()).printable(), None);
    }
}
