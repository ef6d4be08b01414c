use log::{ debug, error, info, warn };
use std::sync::Arc;

use super::event::Event;
use super::state::{ AppState, Screen, Session };
use crate::config::users::UserDirectory;
use crate::models::chat::{ last_message_checkpoint, Message, Timestamp };
use crate::models::wire::{ PushRequest, RegisterRequest };
use crate::notifications::{ ensure_permission, NotificationService };
use crate::remote::{ RemoteError, RemoteService };
use crate::store::LocalStore;

pub const WARN_CREDENTIALS_REQUIRED: &str = "Username and password required!";
pub const WARN_PERMISSION_DENIED: &str = "Not enough permissions to continue";
pub const WARN_NO_PUSH_TOKEN: &str = "Failed to obtain unique ID";
pub const WARN_HOST_UNREACHABLE: &str = "Failed to contact the host";
pub const WARN_REJECTED: &str = "The server doesn't love you.";

/// Owns the session and moves it between screens in response to events.
///
/// Every collaborator call happens inside [`SessionController::handle`], never
/// while presenting a screen, so re-drawing a screen cannot re-run a transition.
pub struct SessionController {
    session: Session,
    store: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteService>,
    notifications: Arc<dyn NotificationService>,
    directory: UserDirectory,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn LocalStore>,
        remote: Arc<dyn RemoteService>,
        notifications: Arc<dyn NotificationService>,
        directory: UserDirectory
    ) -> Self {
        Self {
            session: Session::new(),
            store,
            remote,
            notifications,
            directory,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Applies one event and returns the follow-up event, if any.
    pub async fn handle(&mut self, event: Event) -> Option<Event> {
        debug!("[{}] handling {:?}", self.session.screen, event);
        match event {
            Event::Started => {
                if self.session.screen != Screen::Loading {
                    warn!("Ignoring start: already past loading ({})", self.session.screen);
                    return None;
                }
                self.resume().await;
                None
            }

            Event::LoginSubmitted { username, password } => {
                if self.session.screen != Screen::Login {
                    warn!("Ignoring login submitted on the {} screen", self.session.screen);
                    return None;
                }
                self.login(&username, &password)
            }

            Event::Authenticate => {
                if self.session.screen != Screen::Authenticating {
                    warn!("Ignoring authenticate on the {} screen", self.session.screen);
                    return None;
                }
                self.authenticate().await;
                None
            }

            Event::Refresh => {
                self.refresh().await;
                None
            }

            Event::NotificationReceived => {
                self.on_notification().await;
                None
            }

            Event::AppStateChanged(next) => {
                self.on_app_state_change(next).await;
                None
            }

            Event::Send(messages) => {
                if self.session.screen != Screen::Ready {
                    warn!("Dropping {} messages sent outside the chat", messages.len());
                    return None;
                }
                self.on_send(messages).await;
                None
            }

            Event::Compose(text) => {
                if self.session.screen != Screen::Ready {
                    warn!("Dropping composed text outside the chat");
                    return None;
                }
                self.compose(&text).await;
                None
            }

            Event::Shutdown => None,
        }
    }

    /// Validates the login form. On success moves to authenticating and asks
    /// for the `Authenticate` follow-up.
    pub fn login(&mut self, username: &str, password: &str) -> Option<Event> {
        self.session.username = Some(username.to_string());
        self.session.password = Some(password.to_string());

        if username.is_empty() || password.is_empty() {
            self.session.warning_message = Some(WARN_CREDENTIALS_REQUIRED.to_string());
            return None;
        }

        self.session.warning_message = None;
        self.session.screen = Screen::Authenticating;
        info!("Login accepted for {}, authenticating", username);
        Some(Event::Authenticate)
    }

    pub async fn authenticate(&mut self) {
        let permission = ensure_permission(self.notifications.as_ref()).await;
        if !permission.is_granted() {
            warn!("Notification permission not granted: {:?}", permission);
            self.session.fail_to_login(WARN_PERMISSION_DENIED);
            return;
        }

        let token = match self.notifications.push_token().await {
            Ok(token) => token,
            Err(e) => {
                error!("Could not obtain a push token: {}", e);
                self.session.fail_to_login(WARN_NO_PUSH_TOKEN);
                return;
            }
        };

        let request = RegisterRequest::login(
            self.session.username.as_deref().unwrap_or_default(),
            self.session.password.as_deref().unwrap_or_default(),
            &token
        );

        let response = match self.remote.register(&request).await {
            Ok(response) => response,
            Err(e) if e.is_transport() => {
                error!("Registration failed: {}", e);
                self.session.fail_to_login(WARN_HOST_UNREACHABLE);
                return;
            }
            Err(e) => {
                error!("Registration rejected: {}", e);
                self.session.fail_to_login(WARN_REJECTED);
                return;
            }
        };

        if let Err(e) = self.store.save_token(&token).await {
            error!("Failed to persist token: {}", e);
        }

        if !response.messages.is_empty() {
            self.append_messages(response.messages).await;
        }

        self.session.token = Some(token);
        self.session.user_id = response.user_id;
        self.session.password = None;
        self.session.screen = Screen::Ready;
        info!("Authenticated as user {:?}", self.session.user_id);
    }

    /// Background fetch of messages newer than `last_message`. Failures are
    /// logged and otherwise ignored.
    pub async fn fetch_messages(&mut self, token: &str, last_message: Timestamp) {
        let request = RegisterRequest::refresh(token, last_message.clone());
        let response = match self.remote.register(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Background refresh since {} failed: {}", last_message, e);
                return;
            }
        };

        if !response.messages.is_empty() {
            info!("Fetched {} new messages", response.messages.len());
            self.append_messages(response.messages).await;
        }

        self.session.token = Some(token.to_string());
        self.session.user_id = response.user_id;
        self.session.screen = Screen::Ready;
    }

    /// Refreshes using the current token and the last local message as checkpoint.
    pub async fn refresh(&mut self) {
        let Some(token) = self.session.token.clone() else {
            debug!("No token yet, skipping refresh");
            return;
        };
        self.fetch_messages(&token, last_message_checkpoint(&self.session.messages)).await;
    }

    /// Appends locally and persists before pushing. A transport failure drops
    /// the chat back to login; the appended messages stay stored.
    pub async fn on_send(&mut self, messages: Vec<Message>) {
        let sent = self.append_messages(messages).await;

        let request = PushRequest {
            token: self.session.token.clone().unwrap_or_default(),
            messages: sent,
        };
        if let Err(e) = self.remote.push(&request).await {
            if e.is_transport() {
                error!("Push failed: {}", e);
                self.session.fail_to_login(WARN_HOST_UNREACHABLE);
            } else {
                warn!("Push returned an error that is not a transport failure: {}", e);
            }
        }
    }

    pub async fn compose(&mut self, text: &str) {
        let message = Message::new(text, self.session.user_id);
        self.on_send(vec![message]).await;
    }

    /// Resolves user references, appends without de-duplication and persists
    /// the whole history. Returns the appended messages as stored.
    pub async fn append_messages(&mut self, messages: Vec<Message>) -> Vec<Message> {
        let resolved: Vec<Message> = messages
            .into_iter()
            .map(|mut message| {
                message.user = self.directory.resolve(message.user.as_ref());
                message
            })
            .collect();

        self.session.messages.extend(resolved.iter().cloned());

        if let Err(e) = self.store.save_messages(&self.session.messages).await {
            error!("Failed to persist {} messages: {}", self.session.messages.len(), e);
        }
        resolved
    }

    /// Startup: with a stored token, load the stored history and refresh;
    /// otherwise go to login.
    pub async fn resume(&mut self) {
        let token = match self.store.load_token().await {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to read stored token: {}", e);
                None
            }
        };

        if let Some(token) = token {
            match self.store.load_messages().await {
                Ok(messages) => {
                    info!("Resuming with {} stored messages", messages.len());
                    self.session.messages = messages;
                }
                Err(e) => error!("Failed to read stored messages: {}", e),
            }
            self.fetch_messages(&token, last_message_checkpoint(&self.session.messages)).await;
        } else {
            info!("No stored token");
        }

        if self.session.screen == Screen::Loading {
            self.session.screen = Screen::Login;
        }
    }

    pub async fn on_notification(&mut self) {
        if self.session.app_state == AppState::Active {
            self.notifications.dismiss_all().await;
        }
        self.refresh().await;
    }

    pub async fn on_app_state_change(&mut self, next: AppState) {
        debug!("App state {:?} -> {:?}", self.session.app_state, next);
        self.session.app_state = next;
        if next == AppState::Active {
            self.notifications.dismiss_all().await;
        }
    }
}
