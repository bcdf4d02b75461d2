//! Desktop notification support.
//!
//! This module provides:
//!
//! - [`NotificationSender`]: the seam to the platform notification service
//! - [`DesktopNotificationSender`]: notify-rust implementation
//! - [`MockNotificationSender`]: in-process recorder for tests
//! - [`Notifier`]: the completion side effects (tone and notice) as used by
//!   the session engine
//!
//! Notices are permission-gated: nothing is shown until a permission
//! request has resolved to [`NotificationPermission::Granted`].

mod content;
mod desktop;
pub mod error;
mod notifier;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub use self::content::{NoticeContent, APP_NAME};
pub use self::desktop::DesktopNotificationSender;
pub use self::error::NotificationError;
pub use self::notifier::Notifier;

/// Whether notices may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPermission {
    /// Not yet requested.
    #[default]
    Default,
    Granted,
    Denied,
}

/// Trait for notification service implementations.
pub trait NotificationSender {
    /// Returns the current permission state.
    fn permission(&self) -> NotificationPermission;

    /// Resolves an undecided permission and returns the resulting state.
    /// A decided permission is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the permission state cannot be determined.
    fn request_permission(&self) -> Result<NotificationPermission, NotificationError>;

    /// Shows a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if permission is not granted or delivery fails.
    fn send(&self, content: &NoticeContent) -> Result<(), NotificationError>;
}

impl<T: NotificationSender + ?Sized> NotificationSender for std::sync::Arc<T> {
    fn permission(&self) -> NotificationPermission {
        (**self).permission()
    }

    fn request_permission(&self) -> Result<NotificationPermission, NotificationError> {
        (**self).request_permission()
    }

    fn send(&self, content: &NoticeContent) -> Result<(), NotificationError> {
        (**self).send(content)
    }
}

/// Mock notification sender for testing.
#[derive(Debug)]
pub struct MockNotificationSender {
    permission: Mutex<NotificationPermission>,
    grant_on_request: AtomicBool,
    should_fail: AtomicBool,
    requests: AtomicUsize,
    sent: Mutex<Vec<NoticeContent>>,
}

impl Default for MockNotificationSender {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationSender {
    /// Creates an undecided sender that grants on request.
    #[must_use]
    pub fn new() -> Self {
        Self::with_permission(NotificationPermission::Default)
    }

    #[must_use]
    pub fn with_permission(permission: NotificationPermission) -> Self {
        Self {
            permission: Mutex::new(permission),
            grant_on_request: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_grant_on_request(&self, grant: bool) {
        self.grant_on_request.store(grant, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn sent(&self) -> Vec<NoticeContent> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationSender for MockNotificationSender {
    fn permission(&self) -> NotificationPermission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&self) -> Result<NotificationPermission, NotificationError> {
        let mut permission = self.permission.lock().unwrap();
        if *permission == NotificationPermission::Default {
            self.requests.fetch_add(1, Ordering::SeqCst);
            *permission = if self.grant_on_request.load(Ordering::SeqCst) {
                NotificationPermission::Granted
            } else {
                NotificationPermission::Denied
            };
        }
        Ok(*permission)
    }

    fn send(&self, content: &NoticeContent) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        if self.permission() != NotificationPermission::Granted {
            return Err(NotificationError::PermissionDenied);
        }
        self.sent.lock().unwrap().push(content.clone());
        Ok(())
    }
}
