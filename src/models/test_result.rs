use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::answer::UserAnswer;
use crate::models::difficulty::DifficultyLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_id: String,
    /// Tier the scored test was generated at.
    pub difficulty: DifficultyLevel,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub unattempted: u32,
    /// Rounded integer percentage.
    pub score: u32,
    pub user_answers: Vec<UserAnswer>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultFeedback {
    Excellent,
    Good,
    Fair,
    KeepPracticing,
}

impl ResultFeedback {
    pub fn for_score(score: u32) -> Self {
        match score {
            90.. => ResultFeedback::Excellent,
            70..=89 => ResultFeedback::Good,
            50..=69 => ResultFeedback::Fair,
            _ => ResultFeedback::KeepPracticing,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ResultFeedback::Excellent => "Excellent work! You're ready for a more challenging test.",
            ResultFeedback::Good => "Good job! You've mastered most of the concepts.",
            ResultFeedback::Fair => "Nice effort! Review the questions you missed and try again.",
            ResultFeedback::KeepPracticing => "Keep practicing! Review the material and try again.",
        }
    }
}
