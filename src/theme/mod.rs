//! Theme System - light/dark mode with a persisted preference.
//!
//! The mode lives in a signal owned by [`ThemeState`], which the application
//! context hands to whoever needs it. An effect writes every change (and the
//! initial value) to the [`PreferenceStore`] under the `theme` key.
//!
//! # Example
//!
//! ```ignore
//! use notabili::theme::{MemoryPreferences, ThemeMode, ThemeState};
//!
//! let theme = ThemeState::init(Rc::new(MemoryPreferences::new()), false);
//! theme.toggle_theme();
//! assert_eq!(theme.theme(), ThemeMode::Dark);
//! ```

mod store;

pub use store::{JsonFilePreferences, MemoryPreferences, PreferenceStore};

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use spark_signals::{effect, flush_sync, signal, Signal};

use crate::primitives::Cleanup;

/// Preference key for the theme.
pub const THEME_KEY: &str = "theme";

// =============================================================================
// ThemeMode
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

// =============================================================================
// ThemeState
// =============================================================================

pub struct ThemeState {
    mode: Signal<ThemeMode>,
    stop_persist: Option<Cleanup>,
}

impl ThemeState {
    /// Saved preference if it is a valid mode, otherwise the platform default.
    pub fn init(store: Rc<dyn PreferenceStore>, prefers_dark: bool) -> Self {
        let saved = match store.get(THEME_KEY) {
            Ok(saved) => saved.and_then(|s| s.parse::<ThemeMode>().ok()),
            Err(err) => {
                tracing::warn!(error = %err, "could not read theme preference");
                None
            }
        };
        let initial = saved.unwrap_or(if prefers_dark { ThemeMode::Dark } else { ThemeMode::Light });
        tracing::debug!(theme = %initial, from_store = saved.is_some(), "theme initialized");

        let mode = signal(initial);

        let mode_for_persist = mode.clone();
        let stop = effect(move || {
            let current = mode_for_persist.get();
            if let Err(err) = store.set(THEME_KEY, current.as_str()) {
                tracing::warn!(error = %err, theme = %current, "could not persist theme preference");
            }
        });

        Self {
            mode,
            stop_persist: Some(Box::new(stop)),
        }
    }

    pub fn theme(&self) -> ThemeMode {
        self.mode.get()
    }

    pub fn set_theme(&self, mode: ThemeMode) {
        if self.mode.get() != mode {
            self.mode.set(mode);
            flush_sync();
        }
    }

    pub fn toggle_theme(&self) {
        self.set_theme(self.theme().toggled());
    }

    /// Class for the document root: `dark` in dark mode.
    pub fn root_class(&self) -> Option<&'static str> {
        match self.theme() {
            ThemeMode::Dark => Some("dark"),
            ThemeMode::Light => None,
        }
    }

    /// Underlying signal, for effects that follow the theme.
    pub fn signal(&self) -> Signal<ThemeMode> {
        self.mode.clone()
    }
}

impl Drop for ThemeState {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_persist.take() {
            stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_preference_wins() {
        let store = Rc::new(MemoryPreferences::new());
        store.set(THEME_KEY, "dark").unwrap();

        let theme = ThemeState::init(store, false);
        assert_eq!(theme.theme(), ThemeMode::Dark);
        assert_eq!(theme.root_class(), Some("dark"));
    }

    #[test]
    fn test_platform_default_when_unset_or_invalid() {
        let theme = ThemeState::init(Rc::new(MemoryPreferences::new()), true);
        assert_eq!(theme.theme(), ThemeMode::Dark);

        let store = Rc::new(MemoryPreferences::new());
        store.set(THEME_KEY, "sepia").unwrap();
        let theme = ThemeState::init(store, false);
        assert_eq!(theme.theme(), ThemeMode::Light);
        assert_eq!(theme.root_class(), None);
    }

    #[test]
    fn test_changes_are_persisted() {
        let store = Rc::new(MemoryPreferences::new());
        let theme = ThemeState::init(store.clone(), false);

        // Initial value is written too
        assert_eq!(store.get(THEME_KEY).unwrap(), Some("light".to_string()));

        theme.toggle_theme();
        assert_eq!(store.get(THEME_KEY).unwrap(), Some("dark".to_string()));

        theme.set_theme(ThemeMode::Light);
        assert_eq!(store.get(THEME_KEY).unwrap(), Some("light".to_string()));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert!("Dark".parse::<ThemeMode>().is_err());
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
    }
}
