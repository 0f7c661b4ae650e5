//! Desktop implementations of the notification seams.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{AudioPlayer, Notifier, SoundCue};
use crate::error::NotifyError;

/// Notification through the platform notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn show(&self, summary: &str, body: &str) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .summary(summary)
            .body(body)
            .appname("timeflow")
            .icon("alarm-clock")
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Notification(e.to_string()))
    }
}

/// A command-line player and how it takes a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Player {
    Paplay,
    Aplay,
    Afplay,
}

impl Player {
    fn program(self) -> &'static str {
        match self {
            Player::Paplay => "paplay",
            Player::Aplay => "aplay",
            Player::Afplay => "afplay",
        }
    }

    fn args(self, file: &Path, volume: u32) -> Vec<String> {
        let file = file.display().to_string();
        match self {
            // paplay: 0..=65536
            Player::Paplay => vec![format!("--volume={}", volume.min(100) * 65536 / 100), file],
            Player::Aplay => vec!["-q".to_string(), file],
            // afplay: 0.0..=1.0
            Player::Afplay => vec![
                "-v".to_string(),
                format!("{:.2}", volume.min(100) as f64 / 100.0),
                file,
            ],
        }
    }
}

const DEFAULT_SOUNDS: [&str; 4] = [
    "/usr/share/sounds/freedesktop/stereo/complete.oga",
    "/usr/share/sounds/sound-icons/guitar-11.wav",
    "/usr/share/sounds/generic.wav",
    "/System/Library/Sounds/Glass.aiff",
];

/// Plays the cue with the first player found on `PATH`.
///
/// The player process is spawned and reaped on a background thread, so
/// `play` returns as soon as playback has started.
#[derive(Debug, Clone)]
pub struct CommandAudioPlayer {
    players: Vec<Player>,
    default_sounds: Vec<PathBuf>,
}

impl CommandAudioPlayer {
    pub fn new() -> Self {
        Self {
            players: vec![Player::Paplay, Player::Aplay, Player::Afplay],
            default_sounds: DEFAULT_SOUNDS.iter().map(|s| PathBuf::from(*s)).collect(),
        }
    }

    fn resolve_sound(&self, cue: &SoundCue) -> Result<PathBuf, NotifyError> {
        match &cue.path {
            Some(path) if path.exists() => Ok(path.clone()),
            Some(path) => Err(NotifyError::MissingSound(path.clone())),
            None => self
                .default_sounds
                .iter()
                .find(|p| p.exists())
                .cloned()
                .ok_or(NotifyError::NoDefaultSound),
        }
    }
}

impl Default for CommandAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for CommandAudioPlayer {
    fn play(&self, cue: &SoundCue) -> Result<(), NotifyError> {
        let file = self.resolve_sound(cue)?;

        for player in &self.players {
            let spawned = Command::new(player.program())
                .args(player.args(&file, cue.volume))
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(mut child) => {
                    debug!(player = player.program(), file = %file.display(), "playing sound cue");
                    std::thread::spawn(move || {
                        let _ = child.wait();
                    });
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(NotifyError::Playback(e)),
            }
        }

        Err(NotifyError::NoPlayer(file.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_custom_sound_is_an_error() {
        let player = CommandAudioPlayer::new();
        let cue = SoundCue {
            path: Some(PathBuf::from("/definitely/not/here.wav")),
            volume: 50,
        };
        assert!(matches!(
            player.play(&cue),
            Err(NotifyError::MissingSound(_))
        ));
    }

    #[test]
    fn no_player_on_path_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let sound = dir.path().join("bell.wav");
        std::fs::write(&sound, b"RIFF").unwrap();
        let player = CommandAudioPlayer {
            players: vec![],
            default_sounds: vec![],
        };
        let cue = SoundCue {
            path: Some(sound),
            volume: 50,
        };
        assert!(matches!(player.play(&cue), Err(NotifyError::NoPlayer(_))));
    }

    #[test]
    fn volume_is_scaled_per_player() {
        let file = Path::new("/tmp/x.wav");
        assert_eq!(Player::Paplay.args(file, 50)[0], "--volume=32768");
        assert_eq!(Player::Paplay.args(file, 400)[0], "--volume=65536");
        assert_eq!(Player::Afplay.args(file, 25)[1], "0.25");
        assert_eq!(Player::Aplay.args(file, 80), vec!["-q", "/tmp/x.wav"]);
    }
}
