use async_trait::async_trait;
use log::{ debug, info };
use std::sync::Mutex;
use std::sync::atomic::{ AtomicUsize, Ordering };
use uuid::Uuid;

use super::{ NotificationError, NotificationService, PermissionStatus };
use crate::cli::Args;

/// Notification backend for a terminal device. Permission is answered from
/// configuration; the push token is fixed or generated once per process.
pub struct DeviceNotifications {
    grant_on_request: bool,
    status: Mutex<PermissionStatus>,
    token: Mutex<Option<String>>,
    pending: AtomicUsize,
}

impl DeviceNotifications {
    pub fn new(grant_on_request: bool, token: Option<String>) -> Self {
        Self {
            grant_on_request,
            status: Mutex::new(PermissionStatus::Undetermined),
            token: Mutex::new(token.filter(|t| !t.trim().is_empty())),
            pending: AtomicUsize::new(0),
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(args.notifications_granted, args.push_token.clone())
    }

    /// Records an incoming notification as pending until dismissed.
    pub fn deliver(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationService for DeviceNotifications {
    async fn permission_status(&self) -> PermissionStatus {
        self.status.lock().map(|s| *s).unwrap_or(PermissionStatus::Undetermined)
    }

    async fn request_permission(&self) -> PermissionStatus {
        let answer = if self.grant_on_request {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        if let Ok(mut status) = self.status.lock() {
            *status = answer;
        }
        info!("Notification permission {:?}", answer);
        answer
    }

    async fn push_token(&self) -> Result<String, NotificationError> {
        let mut guard = self.token
            .lock()
            .map_err(|e| NotificationError::TokenUnavailable(e.to_string()))?;
        let token = guard
            .get_or_insert_with(|| format!("ExponentPushToken[{}]", Uuid::new_v4().simple()))
            .clone();
        Ok(token)
    }

    async fn dismiss_all(&self) {
        let dismissed = self.pending.swap(0, Ordering::SeqCst);
        debug!("Dismissed {} pending notifications", dismissed);
    }
}
