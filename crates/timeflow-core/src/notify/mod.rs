//! Completion alerts.
//!
//! The dispatcher turns one completion into a system notification (only with
//! permission) and a sound cue (always attempted). Neither failure ever
//! reaches the caller; both are logged.

mod desktop;

pub use desktop::{CommandAudioPlayer, DesktopNotifier};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::NotifyError;
use crate::storage::NotificationsConfig;

pub const NOTIFICATION_SUMMARY: &str = "TimeFlow Reminder";

/// Whether the user allowed system notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    /// Never asked.
    #[default]
    Default,
    Granted,
    Denied,
}

impl NotificationPermission {
    pub fn is_granted(self) -> bool {
        self == NotificationPermission::Granted
    }
}

impl fmt::Display for NotificationPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotificationPermission::Default => "default",
            NotificationPermission::Granted => "granted",
            NotificationPermission::Denied => "denied",
        })
    }
}

impl FromStr for NotificationPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(NotificationPermission::Default),
            "granted" => Ok(NotificationPermission::Granted),
            "denied" => Ok(NotificationPermission::Denied),
            _ => Err(format!("unknown permission '{s}' (expected default, granted or denied)")),
        }
    }
}

/// Shows a system-level notification.
pub trait Notifier: Send {
    fn show(&self, summary: &str, body: &str) -> Result<(), NotifyError>;
}

/// Starts playback of a short sound. Must not wait for playback to finish.
pub trait AudioPlayer: Send {
    fn play(&self, cue: &SoundCue) -> Result<(), NotifyError>;
}

/// The sound to play on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundCue {
    /// Custom file; `None` means the player's platform default.
    pub path: Option<PathBuf>,
    /// 0..=100
    pub volume: u32,
}

impl Default for SoundCue {
    fn default() -> Self {
        Self {
            path: None,
            volume: 50,
        }
    }
}

/// Notifier that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn show(&self, _summary: &str, _body: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Audio player that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAudio;

impl AudioPlayer for NoopAudio {
    fn play(&self, _cue: &SoundCue) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// What a dispatch actually managed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DispatchReport {
    pub notified: bool,
    pub sound_played: bool,
}

pub struct NotificationDispatcher {
    enabled: bool,
    permission: NotificationPermission,
    cue: SoundCue,
    notifier: Box<dyn Notifier>,
    audio: Box<dyn AudioPlayer>,
}

impl NotificationDispatcher {
    pub fn new(
        permission: NotificationPermission,
        notifier: impl Notifier + 'static,
        audio: impl AudioPlayer + 'static,
    ) -> Self {
        Self {
            enabled: true,
            permission,
            cue: SoundCue::default(),
            notifier: Box::new(notifier),
            audio: Box::new(audio),
        }
    }

    /// Dispatcher backed by the desktop notification service and the first
    /// available command-line audio player.
    pub fn from_config(config: &NotificationsConfig) -> Self {
        let mut dispatcher = Self::new(config.permission, DesktopNotifier, CommandAudioPlayer::new());
        dispatcher.enabled = config.enabled;
        dispatcher.cue = SoundCue {
            path: config.sound.as_ref().map(PathBuf::from),
            volume: config.volume.min(100),
        };
        dispatcher
    }

    /// Dispatcher that never notifies or plays anything.
    pub fn silent() -> Self {
        let mut dispatcher = Self::new(NotificationPermission::Denied, NoopNotifier, NoopAudio);
        dispatcher.enabled = false;
        dispatcher
    }

    pub fn permission(&self) -> NotificationPermission {
        self.permission
    }

    pub fn set_permission(&mut self, permission: NotificationPermission) {
        self.permission = permission;
    }

    /// Alert the user that the timer titled `title` finished.
    pub fn dispatch(&self, title: &str) -> DispatchReport {
        let mut report = DispatchReport::default();
        if !self.enabled {
            debug!(title, "notifications disabled, skipping alert");
            return report;
        }

        if self.permission.is_granted() {
            let body = format!("{title} has finished!");
            match self.notifier.show(NOTIFICATION_SUMMARY, &body) {
                Ok(()) => report.notified = true,
                Err(e) => warn!(title, error = %e, "system notification failed"),
            }
        } else {
            debug!(title, permission = %self.permission, "no notification permission");
        }

        match self.audio.play(&self.cue) {
            Ok(()) => report.sound_played = true,
            Err(e) => warn!(title, error = %e, "sound cue failed"),
        }

        report
    }
}
