//! Application context handed to hosts: configuration, theme and session.

use std::rc::Rc;

use crate::config::AppConfig;
use crate::theme::{JsonFilePreferences, MemoryPreferences, PreferenceStore, ThemeState};

/// The signed-in caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// Authentication collaborator: is there a valid session, and for whom.
pub trait SessionProvider {
    fn current(&self) -> Option<Session>;
}

/// Fixed answer, for terminals and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(Option<Session>);

impl StaticSession {
    pub fn signed_in(session: Session) -> Self {
        Self(Some(session))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl SessionProvider for StaticSession {
    fn current(&self) -> Option<Session> {
        self.0.clone()
    }
}

pub struct AppContext {
    pub config: AppConfig,
    pub theme: ThemeState,
    pub session: Rc<dyn SessionProvider>,
}

impl AppContext {
    pub fn new(config: AppConfig, theme: ThemeState, session: Rc<dyn SessionProvider>) -> Self {
        Self {
            config,
            theme,
            session,
        }
    }

    /// Build the theme from `config.theme`: file-backed preferences when a
    /// path is configured, in-memory otherwise.
    pub fn from_config(config: AppConfig, session: Rc<dyn SessionProvider>) -> Self {
        let store: Rc<dyn PreferenceStore> = match &config.theme.preference_file {
            Some(path) => Rc::new(JsonFilePreferences::new(path.clone())),
            None => Rc::new(MemoryPreferences::new()),
        };
        let theme = ThemeState::init(store, config.theme.prefer_dark);
        Self::new(config, theme, session)
    }

    pub fn session(&self) -> Option<Session> {
        self.session.current()
    }
}
