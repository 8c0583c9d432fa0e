use serde::{Deserialize, Serialize};

use crate::models::difficulty::DifficultyLevel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub difficulty: DifficultyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// At least two options and an answer index that points at one of them.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() >= 2 && self.correct_answer < self.options.len()
    }

    pub fn with_id(&self, id: String) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}
