//! Notification system error types.
//!
//! This module defines the error types for the notification system.
//! Callers treat every variant as "no notification" and carry on.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to determine whether notifications can be shown.
    #[error("通知許可の取得に失敗しました: {0}")]
    AuthorizationFailed(String),

    /// Failed to send a notification.
    #[error("通知の送信に失敗しました: {0}")]
    SendFailed(String),

    /// Notification permission was denied.
    #[error("通知許可が拒否されています")]
    PermissionDenied,

    /// No notification service is running.
    #[error("通知サービスが利用できません: {0}")]
    NotAvailable(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationFailed(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) | Self::PermissionDenied => {
                "デスクトップの通知設定を確認してください"
            }
            Self::SendFailed(_) => "通知デーモンが動作しているか確認してください",
            Self::NotAvailable(_) => {
                "通知を無効にするには `pomodoro settings set --notifications off` を実行してください"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotificationError::PermissionDenied;
        assert_eq!(err.to_string(), "通知許可が拒否されています");

        let err = NotificationError::AuthorizationFailed("test".to_string());
        assert!(err.to_string().contains("test"));

        let err = NotificationError::NotAvailable("no dbus".to_string());
        assert!(err.to_string().contains("no dbus"));
    }

    #[test]
    fn test_is_permission_error() {
        assert!(NotificationError::PermissionDenied.is_permission_error());
        assert!(NotificationError::AuthorizationFailed("x".into()).is_permission_error());
        assert!(!NotificationError::SendFailed("x".into()).is_permission_error());
        assert!(!NotificationError::NotAvailable("x".into()).is_permission_error());
    }

    #[test]
    fn test_suggestion() {
        let err = NotificationError::NotAvailable("x".into());
        assert!(err.suggestion().contains("notifications off"));
    }
}
