use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::answer::UserAnswer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: i64,
    pub user_id: i64,
    pub test_id: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub unattempted: u32,
    pub score: u32,
    pub user_answers: Vec<UserAnswer>,
    pub completed_at: DateTime<Utc>,
}
