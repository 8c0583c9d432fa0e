use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::difficulty::DifficultyLevel;
use crate::models::question::Question;
use crate::models::test::GeneratedBy;

/// A test saved through the store, keyed by an auto-incrementing id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: i64,
    pub title: String,
    pub subject_id: i64,
    pub chapter: String,
    pub icon: String,
    pub difficulty: DifficultyLevel,
    pub generated_by: GeneratedBy,
    pub duration: u32,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}
