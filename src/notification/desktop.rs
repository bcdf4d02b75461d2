//! Desktop notifications through notify-rust.
//!
//! Desktop notification services have no permission prompt. Requesting
//! permission instead checks whether a notification service is reachable:
//! on freedesktop platforms the D-Bus server is queried, elsewhere the
//! platform facility is assumed present.
//!
//! Both the lookup and `show` are blocking D-Bus calls on freedesktop. Inside
//! a tokio runtime they run on the blocking pool, so the session engine
//! never waits on the notification server.

use std::sync::{Mutex, OnceLock};

use notify_rust::Notification;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::content::{NoticeContent, APP_NAME};
use super::error::NotificationError;
use super::{NotificationPermission, NotificationSender};

/// Sends notifications to the desktop notification service.
#[derive(Debug, Default)]
pub struct DesktopNotificationSender {
    permission: Mutex<NotificationPermission>,
    /// What a permission request resolves to, once the service was looked up
    service: OnceLock<NotificationPermission>,
}

impl DesktopNotificationSender {
    /// Creates a sender that looks the service up on the first request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sender with the service lookup already made on the
    /// blocking pool.
    pub async fn detect() -> Self {
        let sender = Self::new();
        let service = tokio::task::spawn_blocking(Self::lookup)
            .await
            .unwrap_or_else(|e| {
                warn!("Notification service lookup failed: {}", e);
                NotificationPermission::Denied
            });
        let _ = sender.service.set(service);
        sender
    }

    fn lookup() -> NotificationPermission {
        match Self::query_service() {
            Ok(()) => NotificationPermission::Granted,
            Err(e) => {
                warn!("Notifications unavailable: {} ({})", e, e.suggestion());
                NotificationPermission::Denied
            }
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn query_service() -> Result<(), NotificationError> {
        let info = notify_rust::get_server_information()
            .map_err(|e| NotificationError::NotAvailable(e.to_string()))?;
        debug!("Notification server: {} {}", info.name, info.version);
        Ok(())
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn query_service() -> Result<(), NotificationError> {
        Ok(())
    }

    fn current(&self) -> NotificationPermission {
        self.permission
            .lock()
            .map(|p| *p)
            .unwrap_or(NotificationPermission::Denied)
    }
}

impl NotificationSender for DesktopNotificationSender {
    fn permission(&self) -> NotificationPermission {
        self.current()
    }

    fn request_permission(&self) -> Result<NotificationPermission, NotificationError> {
        let mut permission = self
            .permission
            .lock()
            .map_err(|e| NotificationError::AuthorizationFailed(e.to_string()))?;
        if *permission != NotificationPermission::Default {
            return Ok(*permission);
        }

        *permission = *self.service.get_or_init(Self::lookup);
        debug!("Notification permission: {:?}", *permission);
        Ok(*permission)
    }

    fn send(&self, content: &NoticeContent) -> Result<(), NotificationError> {
        if self.current() != NotificationPermission::Granted {
            return Err(NotificationError::PermissionDenied);
        }

        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&content.title)
            .body(&content.body);

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    if let Err(e) = notification.show() {
                        warn!("Failed to show notification: {}", e);
                    }
                });
                Ok(())
            }
            Err(_) => notification
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string())),
        }
    }
}
