use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    pub id: i64,
    pub user_id: i64,
    pub subject_id: i64,
    pub progress: u8,
    pub rating: u8,
    pub last_updated: DateTime<Utc>,
}
