use serde::Serialize;

/// A named emotional category users tag reviews with
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Mood {
    pub id: i64,
    pub name: String,
}

/// Mood names seeded on first startup; admins may extend the set
pub const DEFAULT_MOODS: [&str; 8] = [
    "Happy",
    "Sad",
    "Scary",
    "Surprised",
    "Heartwarming",
    "Tense",
    "Funny",
    "Relaxing",
];

/// Display emoji for a mood name; unknown moods fall back to the clapper
pub fn emoji_for(name: &str) -> &'static str {
    match name {
        "Happy" => "😊",
        "Sad" => "😢",
        "Scary" => "😱",
        "Surprised" => "😲",
        "Heartwarming" => "🥰",
        "Tense" => "😬",
        "Funny" => "😂",
        "Relaxing" => "😌",
        _ => "🎬",
    }
}

impl Mood {
    /// Display emoji for the mood
    pub fn emoji(&self) -> &'static str {
        emoji_for(&self.name)
    }
}

/// Mood entry shown in pickers and on the home screen
#[derive(Debug, Clone, Serialize)]
pub struct MoodSummary {
    pub id: i64,
    pub name: String,
    pub emoji: &'static str,
}

impl From<Mood> for MoodSummary {
    fn from(mood: Mood) -> Self {
        let emoji = mood.emoji();
        Self {
            id: mood.id,
            name: mood.name,
            emoji,
        }
    }
}
