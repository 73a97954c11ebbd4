use serde::{Deserialize, Serialize};

/// Connection details for the hosted data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub id: String,
    pub url: String,
    pub api_key: String,
    pub user_id: String,
}

impl BackendConfig {
    pub fn new(url: String, api_key: String, user_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.trim_end_matches('/').to_string(),
            api_key,
            user_id,
        }
    }
}

/// Whether a track plays through the audio or the video element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    #[default]
    Audio,
    Video,
}

/// Activity bucket credited with listening/viewing minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Meditation,
    Yoga,
    Reading,
    Music,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meditation => "meditation",
            Self::Yoga => "yoga",
            Self::Reading => "reading",
            Self::Music => "music",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Track {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: TrackKind,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default, alias = "mediaUrl")]
    pub media_url: String,
    #[serde(default, alias = "coverUrl")]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default, alias = "playCount")]
    pub play_count: u32,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl Track {
    /// Which activity aggregate this track's minutes count toward.
    pub fn activity(&self) -> ActivityKind {
        match self.category.to_ascii_lowercase().as_str() {
            "meditation" | "breathing" | "sleep" => ActivityKind::Meditation,
            "yoga" | "movement" => ActivityKind::Yoga,
            "reading" | "stories" => ActivityKind::Reading,
            _ => ActivityKind::Music,
        }
    }
}

/// Format a duration in seconds as m:ss (or h:mm:ss past an hour).
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
