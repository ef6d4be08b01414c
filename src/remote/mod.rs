mod http;

pub use http::HttpRemoteService;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::wire::{ PushRequest, RegisterRequest, RegisterResponse };

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("failed to contact the host: {0}")]
    Transport(String),
    /// A response arrived with a status other than 200.
    #[error("endpoint rejected the request with status {0}")]
    Rejected(u16),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl RemoteError {
    pub fn is_transport(&self) -> bool {
        matches!(self, RemoteError::Transport(_))
    }
}

/// The chat endpoint: `/token` registers a device or fetches newer messages,
/// `/push` uploads messages sent from this device.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, RemoteError>;

    /// Only transport failures are reported; the response status is ignored.
    async fn push(&self, request: &PushRequest) -> Result<(), RemoteError>;
}
