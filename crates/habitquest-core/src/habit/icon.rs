//! Habit icons and the color palette offered when creating a habit.
//!
//! Icons are stored by name. Names resolve through a fixed lookup table;
//! anything unrecognised falls back to [`HabitIcon::Target`].

use serde::{Deserialize, Serialize};

/// Icon shown next to a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HabitIcon {
    Flame,
    BookOpen,
    BrainCircuit,
    Dumbbell,
    Salad,
    Coffee,
    Code,
    Heart,
    TrendingUp,
    Wind,
    Palette,
    Sparkles,
    /// Fallback for unknown names
    Target,
}

const ICON_TABLE: [(&str, HabitIcon); 13] = [
    ("Flame", HabitIcon::Flame),
    ("BookOpen", HabitIcon::BookOpen),
    ("BrainCircuit", HabitIcon::BrainCircuit),
    ("Dumbbell", HabitIcon::Dumbbell),
    ("Salad", HabitIcon::Salad),
    ("Coffee", HabitIcon::Coffee),
    ("Code", HabitIcon::Code),
    ("Heart", HabitIcon::Heart),
    ("TrendingUp", HabitIcon::TrendingUp),
    ("Wind", HabitIcon::Wind),
    ("Palette", HabitIcon::Palette),
    ("Sparkles", HabitIcon::Sparkles),
    ("Target", HabitIcon::Target),
];

/// Icons offered by the "new habit" picker, in display order.
pub const PICKER_ICONS: [HabitIcon; 10] = [
    HabitIcon::Dumbbell,
    HabitIcon::BookOpen,
    HabitIcon::BrainCircuit,
    HabitIcon::Salad,
    HabitIcon::Coffee,
    HabitIcon::Code,
    HabitIcon::Heart,
    HabitIcon::TrendingUp,
    HabitIcon::Wind,
    HabitIcon::Palette,
];

/// Subset used when adopting an AI suggestion.
pub const SUGGESTION_ICONS: [HabitIcon; 6] = [
    HabitIcon::Dumbbell,
    HabitIcon::BookOpen,
    HabitIcon::BrainCircuit,
    HabitIcon::Salad,
    HabitIcon::Coffee,
    HabitIcon::Code,
];

/// Colors offered by the "new habit" picker. The first six double as the
/// suggestion palette.
pub const PALETTE: [&str; 8] = [
    "#FFA500", "#008080", "#8A2BE2", "#32CD32", "#A0522D", "#4682B4", "#FF6347", "#40E0D0",
];

impl HabitIcon {
    /// Resolve an icon by its stored name. Unknown names map to `Target`.
    pub fn from_name(name: &str) -> Self {
        ICON_TABLE
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, icon)| *icon)
            .unwrap_or(HabitIcon::Target)
    }

    /// Resolve an icon by name, case-insensitively, rejecting unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        ICON_TABLE
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, icon)| *icon)
    }

    pub fn name(&self) -> &'static str {
        ICON_TABLE
            .iter()
            .find(|(_, icon)| icon == self)
            .map(|(key, _)| *key)
            .unwrap_or("Target")
    }

    /// Terminal rendering of the icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            HabitIcon::Flame => "🔥",
            HabitIcon::BookOpen => "📖",
            HabitIcon::BrainCircuit => "🧠",
            HabitIcon::Dumbbell => "🏋",
            HabitIcon::Salad => "🥗",
            HabitIcon::Coffee => "☕",
            HabitIcon::Code => "💻",
            HabitIcon::Heart => "❤",
            HabitIcon::TrendingUp => "📈",
            HabitIcon::Wind => "🌬",
            HabitIcon::Palette => "🎨",
            HabitIcon::Sparkles => "✨",
            HabitIcon::Target => "🎯",
        }
    }
}

impl Default for HabitIcon {
    fn default() -> Self {
        PICKER_ICONS[0]
    }
}

impl From<String> for HabitIcon {
    fn from(name: String) -> Self {
        HabitIcon::from_name(&name)
    }
}

impl From<HabitIcon> for String {
    fn from(icon: HabitIcon) -> Self {
        icon.name().to_string()
    }
}

impl std::fmt::Display for HabitIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
