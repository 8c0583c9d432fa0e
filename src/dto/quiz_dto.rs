use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::answer::UserAnswer;
use crate::models::difficulty::DifficultyLevel;
use crate::models::test::Test;
use crate::models::test_result::{ResultFeedback, TestResult};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateTestRequest {
    #[validate(length(min = 1))]
    pub subject_id: String,
    #[serde(default)]
    pub difficulty: DifficultyLevel,
    pub chapter_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTestRequest {
    pub test: Test,
    #[serde(default)]
    pub answers: Vec<UserAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTestResponse {
    pub result: TestResult,
    pub next_difficulty: DifficultyLevel,
    pub feedback: ResultFeedback,
    pub feedback_message: String,
}

impl ScoreTestResponse {
    pub fn new(result: TestResult, next_difficulty: DifficultyLevel) -> Self {
        let feedback = ResultFeedback::for_score(result.score);
        Self {
            result,
            next_difficulty,
            feedback,
            feedback_message: feedback.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterListResponse {
    pub subject_id: String,
    pub chapters: Vec<String>,
}
