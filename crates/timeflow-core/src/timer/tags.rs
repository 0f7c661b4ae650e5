//! Display tags attached to a timer.
//!
//! Colors and moods are closed vocabularies. They carry no timing behavior;
//! each variant maps statically to the data a front end needs to render it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Accent color of a timer card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerColor {
    #[default]
    Blue,
    Indigo,
    Purple,
    Pink,
    Rose,
    Orange,
    Emerald,
    Cyan,
}

impl TimerColor {
    pub const ALL: [TimerColor; 8] = [
        TimerColor::Blue,
        TimerColor::Indigo,
        TimerColor::Purple,
        TimerColor::Pink,
        TimerColor::Rose,
        TimerColor::Orange,
        TimerColor::Emerald,
        TimerColor::Cyan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TimerColor::Blue => "blue",
            TimerColor::Indigo => "indigo",
            TimerColor::Purple => "purple",
            TimerColor::Pink => "pink",
            TimerColor::Rose => "rose",
            TimerColor::Orange => "orange",
            TimerColor::Emerald => "emerald",
            TimerColor::Cyan => "cyan",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            TimerColor::Blue => "#3b82f6",
            TimerColor::Indigo => "#6366f1",
            TimerColor::Purple => "#a855f7",
            TimerColor::Pink => "#ec4899",
            TimerColor::Rose => "#f43f5e",
            TimerColor::Orange => "#f97316",
            TimerColor::Emerald => "#10b981",
            TimerColor::Cyan => "#06b6d4",
        }
    }

    /// Style key used by the web front end (`bg-<name>-500`).
    pub fn style_key(self) -> String {
        format!("bg-{}-500", self.name())
    }

    /// Pick a palette entry at random (quick-start timers).
    pub fn random() -> Self {
        use rand::seq::SliceRandom;
        *Self::ALL.choose(&mut rand::thread_rng()).unwrap_or(&TimerColor::Blue)
    }

    /// Accepts a palette name, a style key, or a hex value.
    fn lookup(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| {
            raw == c.name() || raw == c.hex() || raw == c.style_key()
        })
    }
}

impl fmt::Display for TimerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimerColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| {
            let names: Vec<_> = Self::ALL.iter().map(|c| c.name()).collect();
            format!("unknown color '{s}' (expected one of: {})", names.join(", "))
        })
    }
}

impl Serialize for TimerColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// Unknown colors in stored data fall back to the first palette entry.
impl<'de> Deserialize<'de> for TimerColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::lookup(&raw).unwrap_or_default())
    }
}

/// Serde adapter writing a color as its style key (`bg-blue-500`), the form
/// stored timer records use. Reading accepts any form [`TimerColor`] does.
pub(crate) mod as_style_key {
    use super::TimerColor;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &TimerColor, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color.style_key())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimerColor, D::Error> {
        TimerColor::deserialize(deserializer)
    }
}

/// How the user feels about the work a timer tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Focus,
    Energy,
    Creative,
    Learning,
    Relax,
    Routine,
    Tired,
    Anxious,
    /// Anything outside the known vocabulary.
    #[serde(other)]
    Other,
}

impl Mood {
    pub const KNOWN: [Mood; 8] = [
        Mood::Focus,
        Mood::Energy,
        Mood::Creative,
        Mood::Learning,
        Mood::Relax,
        Mood::Routine,
        Mood::Tired,
        Mood::Anxious,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Mood::Focus => "focus",
            Mood::Energy => "energy",
            Mood::Creative => "creative",
            Mood::Learning => "learning",
            Mood::Relax => "relax",
            Mood::Routine => "routine",
            Mood::Tired => "tired",
            Mood::Anxious => "anxious",
            Mood::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Focus => "Deep focus",
            Mood::Energy => "Full of energy",
            Mood::Creative => "Inspired",
            Mood::Learning => "Immersed in learning",
            Mood::Relax => "Relaxing",
            Mood::Routine => "Routine chores",
            Mood::Tired => "A bit tired",
            Mood::Anxious => "Under pressure",
            Mood::Other => "Other",
        }
    }

    /// Icon name in the front end's icon set.
    pub fn icon(self) -> &'static str {
        match self {
            Mood::Focus => "Brain",
            Mood::Energy => "Zap",
            Mood::Creative => "Lightbulb",
            Mood::Learning => "BookOpen",
            Mood::Relax => "Coffee",
            Mood::Routine => "ClipboardList",
            Mood::Tired => "BatteryLow",
            Mood::Anxious => "CloudRain",
            Mood::Other => "Sparkles",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        Self::KNOWN
            .into_iter()
            .find(|m| m.id() == raw)
            .ok_or_else(|| {
                let ids: Vec<_> = Self::KNOWN.iter().map(|m| m.id()).collect();
                format!("unknown mood '{s}' (expected one of: {})", ids.join(", "))
            })
    }
}
