use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trophy {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub icon_color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrophyStatus {
    Locked,
    Unlocked,
    InProgress,
}

impl TrophyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrophyStatus::Locked => "locked",
            TrophyStatus::Unlocked => "unlocked",
            TrophyStatus::InProgress => "in-progress",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTrophy {
    pub id: i64,
    pub user_id: i64,
    pub trophy_id: i64,
    pub status: TrophyStatus,
    pub earned_at: Option<DateTime<Utc>>,
}
