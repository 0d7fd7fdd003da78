//! Focus System - Which component currently owns the keyboard.
//!
//! - `focused_index` signal (currently focused component, -1 if none)
//! - Focus cycling (Tab/Shift+Tab) over focusable indices
//! - Focus callbacks (on_focus/on_blur), fired at the source of the change
//!
//! Losing focus is how an inline edit field learns that the user clicked or
//! tabbed away. The focused index is updated first, then blur callbacks run,
//! then focus callbacks, so a blur handler already sees itself unfocused.
//!
//! # Example
//!
//! ```ignore
//! use notabili::state::focus;
//!
//! let cleanup = focus::register_callbacks(index, FocusCallbacks {
//!     on_blur: Some(Rc::new(|| println!("left the field"))),
//!     ..Default::default()
//! });
//! focus::focus(index);
//! focus::blur(); // prints
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::engine::{get_allocated_indices, get_focusable};

// =============================================================================
// FOCUSED INDEX SIGNAL
// =============================================================================

thread_local! {
    static FOCUSED_INDEX: Signal<i32> = signal(-1);
}

/// Get the currently focused component index (-1 if none)
pub fn get_focused_index() -> i32 {
    FOCUSED_INDEX.with(|s| s.get())
}

/// Check if any component is focused
pub fn has_focus() -> bool {
    get_focused_index() >= 0
}

/// Check if specific component is focused
pub fn is_focused(index: usize) -> bool {
    get_focused_index() == index as i32
}

// =============================================================================
// FOCUS CALLBACKS
// =============================================================================

/// Callbacks fired when focus changes
#[derive(Default, Clone)]
pub struct FocusCallbacks {
    pub on_focus: Option<Rc<dyn Fn()>>,
    pub on_blur: Option<Rc<dyn Fn()>>,
}

thread_local! {
    static FOCUS_CALLBACK_REGISTRY: RefCell<HashMap<usize, Vec<(usize, FocusCallbacks)>>> = RefCell::new(HashMap::new());
    static NEXT_CALLBACK_ID: RefCell<usize> = const { RefCell::new(0) };
}

/// Register focus callbacks for a component.
/// Returns cleanup function to unregister.
pub fn register_callbacks(index: usize, callbacks: FocusCallbacks) -> impl FnOnce() {
    let callback_id = NEXT_CALLBACK_ID.with(|next| {
        let mut next = next.borrow_mut();
        let id = *next;
        *next += 1;
        id
    });

    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow_mut()
            .entry(index)
            .or_default()
            .push((callback_id, callbacks));
    });

    move || {
        FOCUS_CALLBACK_REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.get_mut(&index) {
                list.retain(|(id, _)| *id != callback_id);
                if list.is_empty() {
                    reg.remove(&index);
                }
            }
        });
    }
}

/// Snapshot the callbacks for an index so they can run without holding the
/// registry borrow (a blur handler may unregister itself).
fn callbacks_for(index: i32) -> Vec<FocusCallbacks> {
    if index < 0 {
        return Vec::new();
    }
    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow()
            .get(&(index as usize))
            .map(|list| list.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default()
    })
}

/// Internal: Set focus and fire callbacks at the source
fn set_focus_with_callbacks(new_index: i32) {
    let old_index = get_focused_index();

    // No change, no callbacks
    if old_index == new_index {
        return;
    }

    // Update reactive state first so a blur handler that asks
    // "am I still focused?" gets the right answer.
    FOCUSED_INDEX.with(|s| s.set(new_index));

    for cb in callbacks_for(old_index) {
        if let Some(on_blur) = cb.on_blur {
            on_blur();
        }
    }

    for cb in callbacks_for(new_index) {
        if let Some(on_focus) = cb.on_focus {
            on_focus();
        }
    }
}

// =============================================================================
// FOCUSABLE QUERIES
// =============================================================================

/// Get all focusable component indices in allocation order
pub fn get_focusable_indices() -> Vec<usize> {
    get_allocated_indices()
        .into_iter()
        .filter(|&i| get_focusable(i))
        .collect()
}

// =============================================================================
// FOCUS NAVIGATION
// =============================================================================

/// Find next focusable component, wrapping around
fn find_next_focusable(from_index: i32, direction: i32) -> i32 {
    let focusables = get_focusable_indices();
    if focusables.is_empty() {
        return -1;
    }

    let current_pos = if from_index >= 0 {
        focusables.iter().position(|&i| i == from_index as usize)
    } else {
        None
    };

    match current_pos {
        None => {
            if direction == 1 {
                focusables[0] as i32
            } else {
                focusables[focusables.len() - 1] as i32
            }
        }
        Some(pos) => {
            let len = focusables.len() as i32;
            let next_pos = ((pos as i32 + direction) % len + len) % len;
            focusables[next_pos as usize] as i32
        }
    }
}

/// Move focus to next focusable component
pub fn focus_next() -> bool {
    let current = get_focused_index();
    let next = find_next_focusable(current, 1);
    if next != -1 && next != current {
        set_focus_with_callbacks(next);
        return true;
    }
    false
}

/// Move focus to previous focusable component
pub fn focus_previous() -> bool {
    let current = get_focused_index();
    let prev = find_next_focusable(current, -1);
    if prev != -1 && prev != current {
        set_focus_with_callbacks(prev);
        return true;
    }
    false
}

/// Focus a specific component by index
pub fn focus(index: usize) -> bool {
    if !get_focusable(index) {
        return false;
    }
    set_focus_with_callbacks(index as i32);
    true
}

/// Clear focus (no component focused)
pub fn blur() {
    set_focus_with_callbacks(-1);
}

// =============================================================================
// RESET (for testing)
// =============================================================================

/// Reset all focus state (for testing)
pub fn reset_focus_state() {
    FOCUS_CALLBACK_REGISTRY.with(|reg| reg.borrow_mut().clear());
    FOCUSED_INDEX.with(|s| s.set(-1));
}

// =============================================================================
// TESTS
// =============================================================================
