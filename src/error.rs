use thiserror::Error;
use tokio::sync::mpsc::error::SendError;

use crate::config::users::DirectoryError;
use crate::remote::RemoteError;
use crate::session::Event;
use crate::store::StoreError;

/// Startup failures. Once the event loop runs, failures are handled inside
/// the session and never surface here.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("failed to start input reader: {0}")]
    Io(#[from] std::io::Error),
    #[error("event queue closed before startup events were queued: {0}")]
    QueueClosed(#[from] SendError<Event>),
}
