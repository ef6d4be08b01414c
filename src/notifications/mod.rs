mod device;

pub use device::DeviceNotifications;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("push token unavailable: {0}")]
    TokenUnavailable(String),
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn permission_status(&self) -> PermissionStatus;

    async fn request_permission(&self) -> PermissionStatus;

    /// Opaque device identifier used both as the push address and as the
    /// credential for refresh calls.
    async fn push_token(&self) -> Result<String, NotificationError>;

    async fn dismiss_all(&self);
}

/// Checks the current permission and asks for it only when not yet granted.
pub async fn ensure_permission(service: &dyn NotificationService) -> PermissionStatus {
    let existing = service.permission_status().await;
    if existing.is_granted() {
        return existing;
    }
    service.request_permission().await
}
