use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who may read a journal or mood entry. Set once at creation, never
/// changed afterwards.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Circles,
    Public,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Circles => "circles",
            Visibility::Public => "public",
        }
    }

    /// Parse a stored tag. Unknown values read as private so a bad row
    /// can never leak content.
    pub fn parse(s: &str) -> Visibility {
        match s {
            "circles" => Visibility::Circles,
            "public" => Visibility::Public,
            _ => Visibility::Private,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum CircleVisibility {
    Public,
    Private,
}

impl CircleVisibility {
    pub fn as_str(self) -> &'static str {
        match self {
            CircleVisibility::Public => "public",
            CircleVisibility::Private => "private",
        }
    }

    pub fn parse(s: &str) -> CircleVisibility {
        match s {
            "public" => CircleVisibility::Public,
            _ => CircleVisibility::Private,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum MoodKind {
    Good,
    Neutral,
    Bad,
}

impl MoodKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MoodKind::Good => "good",
            MoodKind::Neutral => "neutral",
            MoodKind::Bad => "bad",
        }
    }

    pub fn parse(s: &str) -> MoodKind {
        match s {
            "good" => MoodKind::Good,
            "bad" => MoodKind::Bad,
            _ => MoodKind::Neutral,
        }
    }
}

/// Public profile shape, never carries the password hash.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub interests: Vec<String>,
    pub avatar_url: Option<String>,
    pub is_profile_setup: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub mood: MoodKind,
    pub visibility: Visibility,
    #[serde(rename = "date")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub visibility: CircleVisibility,
    pub member_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
