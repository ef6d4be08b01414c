use super::state::AppState;
use crate::models::chat::Message;

/// Inputs to the session controller. Handlers may answer with a follow-up
/// event, which the event loop runs before anything else queued.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Process start: read the stored token and resume or ask for login.
    Started,
    LoginSubmitted {
        username: String,
        password: String,
    },
    /// Register with the notification service and the endpoint.
    Authenticate,
    /// Background fetch of messages newer than the checkpoint.
    Refresh,
    NotificationReceived,
    AppStateChanged(AppState),
    /// Messages composed by the chat view, already carrying ids and timestamps.
    Send(Vec<Message>),
    /// Plain text from the user, wrapped into a message for the current user.
    Compose(String),
    Shutdown,
}
