use std::fmt::Display;

use crate::models::chat::{ Message, UserId };

/// Which screen the client is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Startup: reading the stored token and history.
    #[default]
    Loading,
    /// Waiting for credentials. Every failure path lands here.
    Login,
    /// Registering with the notification service and the endpoint.
    Authenticating,
    /// Chat is live.
    Ready,
}

impl Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let screen = match self {
            Screen::Loading => "loading",
            Screen::Login => "login",
            Screen::Authenticating => "authenticating",
            Screen::Ready => "ready",
        };
        write!(f, "{screen}")
    }
}

/// Application lifecycle state as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Active,
    Background,
    Inactive,
}

/// Client-side aggregate of screen, credentials and chat history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub screen: Screen,
    pub app_state: AppState,
    pub username: Option<String>,
    pub password: Option<String>,
    pub warning_message: Option<String>,
    pub token: Option<String>,
    pub user_id: Option<UserId>,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Falls back to the login screen with a warning.
    pub fn fail_to_login(&mut self, warning: &str) {
        self.screen = Screen::Login;
        self.warning_message = Some(warning.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_loading_and_active() {
        let session = Session::new();
        assert_eq!(session.screen, Screen::Loading);
        assert_eq!(session.app_state, AppState::Active);
        assert!(session.messages.is_empty());
    }

    #[test]
    fn fail_to_login_sets_warning() {
        let mut session = Session::new();
        session.screen = Screen::Ready;
        session.fail_to_login("nope");
        assert_eq!(session.screen, Screen::Login);
        assert_eq!(session.warning_message.as_deref(), Some("nope"));
    }

    #[test]
    fn screens_display_lowercase() {
        assert_eq!(Screen::Authenticating.to_string(), "authenticating");
    }
}
