//! Completion side effects: the tone and the desktop notice.
//!
//! Both are best-effort. Failures are logged at `warn` and never reach
//! the caller.

use tracing::{debug, warn};

use super::content::NoticeContent;
use super::{NotificationPermission, NotificationSender};
use crate::sound::{SoundPlayer, Tone};
use crate::types::TimerMode;

/// Plays the completion tone and shows completion notices.
pub struct Notifier {
    sound: Option<Box<dyn SoundPlayer>>,
    sender: Box<dyn NotificationSender>,
}

impl Notifier {
    /// Creates a notifier. `sound` is `None` when no audio device exists.
    pub fn new(sound: Option<Box<dyn SoundPlayer>>, sender: Box<dyn NotificationSender>) -> Self {
        Self { sound, sender }
    }

    /// Plays the completion tone, ignoring any failure.
    pub fn play_tone(&self) {
        let Some(player) = &self.sound else {
            debug!("No audio output, skipping tone");
            return;
        };
        if !player.is_available() {
            debug!("Audio unavailable, skipping tone");
            return;
        }
        if let Err(e) = player.play(&Tone::COMPLETION) {
            warn!("Could not play notification sound: {}", e);
        }
    }

    /// Shows the completion notice for `finished`.
    ///
    /// Does nothing unless permission has been granted. Returns true if the
    /// notice was handed to the notification service.
    pub fn show_completion_notice(&self, finished: TimerMode) -> bool {
        if self.sender.permission() != NotificationPermission::Granted {
            debug!("Notification permission not granted, skipping notice");
            return false;
        }
        match self.sender.send(&NoticeContent::for_completed(finished)) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not show notification: {} ({})", e, e.suggestion());
                false
            }
        }
    }

    /// Requests permission if it has not been decided yet, and returns the
    /// resulting state.
    pub fn request_permission(&self) -> NotificationPermission {
        if self.sender.permission() != NotificationPermission::Default {
            return self.sender.permission();
        }
        match self.sender.request_permission() {
            Ok(permission) => permission,
            Err(e) => {
                warn!("Could not request notification permission: {}", e);
                self.sender.permission()
            }
        }
    }

    /// Returns the current permission state.
    pub fn permission(&self) -> NotificationPermission {
        self.sender.permission()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("sound", &self.sound.is_some())
            .field("permission", &self.sender.permission())
            .finish()
    }
}
