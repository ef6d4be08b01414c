//! Scripted collaborators for controller and event loop tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{ AtomicUsize, Ordering };

use crate::models::wire::{ PushRequest, RegisterRequest, RegisterResponse };
use crate::notifications::{ NotificationError, NotificationService, PermissionStatus };
use crate::remote::{ RemoteError, RemoteService };

/// Answers `register` from a queue of scripted replies; an empty queue is a
/// transport failure.
#[derive(Default)]
pub struct FakeRemote {
    replies: Mutex<VecDeque<Result<RegisterResponse, RemoteError>>>,
    push_failure: Mutex<Option<RemoteError>>,
    registers: Mutex<Vec<RegisterRequest>>,
    pushes: Mutex<Vec<PushRequest>>,
}

impl FakeRemote {
    pub fn reply(&self, reply: Result<RegisterResponse, RemoteError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn fail_push(&self, error: RemoteError) {
        *self.push_failure.lock().unwrap() = Some(error);
    }

    pub fn register_requests(&self) -> Vec<RegisterRequest> {
        self.registers.lock().unwrap().clone()
    }

    pub fn push_requests(&self) -> Vec<PushRequest> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteService for FakeRemote {
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, RemoteError> {
        self.registers.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Transport("no scripted reply".into())))
    }

    async fn push(&self, request: &PushRequest) -> Result<(), RemoteError> {
        self.pushes.lock().unwrap().push(request.clone());
        match self.push_failure.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

pub struct FakeNotifications {
    status: Mutex<PermissionStatus>,
    answer: PermissionStatus,
    token: Result<String, String>,
    requests: AtomicUsize,
    dismissals: AtomicUsize,
}

impl FakeNotifications {
    pub fn new(status: PermissionStatus, answer: PermissionStatus, token: Result<String, String>) -> Self {
        Self {
            status: Mutex::new(status),
            answer,
            token,
            requests: AtomicUsize::new(0),
            dismissals: AtomicUsize::new(0),
        }
    }

    pub fn granted(token: &str) -> Self {
        Self::new(PermissionStatus::Granted, PermissionStatus::Granted, Ok(token.to_string()))
    }

    pub fn permission_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn dismissals(&self) -> usize {
        self.dismissals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationService for FakeNotifications {
    async fn permission_status(&self) -> PermissionStatus {
        *self.status.lock().unwrap()
    }

    async fn request_permission(&self) -> PermissionStatus {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.status.lock().unwrap() = self.answer;
        self.answer
    }

    async fn push_token(&self) -> Result<String, NotificationError> {
        self.token.clone().map_err(NotificationError::TokenUnavailable)
    }

    async fn dismiss_all(&self) {
        self.dismissals.fetch_add(1, Ordering::SeqCst);
    }
}
