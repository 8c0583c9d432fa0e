use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::answer::UserAnswer;
use crate::models::difficulty::DifficultyLevel;
use crate::models::question::Question;
use crate::models::test::GeneratedBy;
use crate::models::trophy::TrophyStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserPayload {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSubjectPayload {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub background_color: String,
    pub icon_background_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTestRecordPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub chapter: String,
    pub icon: String,
    pub difficulty: DifficultyLevel,
    #[serde(default = "default_generated_by")]
    pub generated_by: GeneratedBy,
    #[validate(range(min = 1))]
    pub duration: u32,
    #[validate(custom(function = "validate_questions"))]
    pub questions: Vec<Question>,
}

fn default_generated_by() -> GeneratedBy {
    GeneratedBy::System
}

fn validate_questions(questions: &[Question]) -> Result<(), ValidationError> {
    if questions.iter().all(Question::is_well_formed) {
        Ok(())
    } else {
        Err(ValidationError::new("correct_answer_out_of_range"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertProgressPayload {
    pub subject_id: i64,
    #[validate(range(max = 100))]
    pub progress: u8,
    #[validate(range(max = 5))]
    pub rating: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_result_counts"))]
pub struct CreateResultPayload {
    #[validate(length(min = 1))]
    pub test_id: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub unattempted: u32,
    #[validate(range(max = 100))]
    pub score: u32,
    #[serde(default)]
    pub user_answers: Vec<UserAnswer>,
    pub completed_at: Option<DateTime<Utc>>,
}

fn validate_result_counts(payload: &CreateResultPayload) -> Result<(), ValidationError> {
    let counted = payload
        .correct_answers
        .checked_add(payload.incorrect_answers)
        .and_then(|sum| sum.checked_add(payload.unattempted));
    match counted {
        Some(counted) if counted == payload.total_questions => Ok(()),
        _ => Err(ValidationError::new("counts_do_not_sum_to_total")),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTrophyPayload {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    pub icon: String,
    pub icon_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserTrophyPayload {
    pub trophy_id: i64,
    #[serde(default = "default_trophy_status")]
    pub status: TrophyStatus,
}

fn default_trophy_status() -> TrophyStatus {
    TrophyStatus::Locked
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserTrophyPayload {
    pub status: TrophyStatus,
}
