use serde::Deserialize;

use crate::models::difficulty::DifficultyLevel;
use crate::models::question::Question;

/// A subject's question bank, one array per difficulty tier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TieredQuestions {
    #[serde(default)]
    pub easy: Vec<Question>,
    #[serde(default)]
    pub medium: Vec<Question>,
    #[serde(default)]
    pub intermediate: Vec<Question>,
    #[serde(default)]
    pub hard: Vec<Question>,
}

impl TieredQuestions {
    pub fn tier(&self, difficulty: DifficultyLevel) -> &[Question] {
        match difficulty {
            DifficultyLevel::Easy => &self.easy,
            DifficultyLevel::Medium => &self.medium,
            DifficultyLevel::Intermediate => &self.intermediate,
            DifficultyLevel::Hard => &self.hard,
        }
    }

    pub fn len(&self) -> usize {
        DifficultyLevel::ALL.iter().map(|d| self.tier(*d).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub background_color: String,
    pub icon_background_color: String,
    pub chapters: Vec<String>,
    /// Icon shown on tests generated for this subject.
    pub test_icon: String,
    #[serde(default)]
    pub questions: Option<TieredQuestions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrophyEntry {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub icon_color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub default_subject: String,
    pub subjects: Vec<SubjectEntry>,
    #[serde(default)]
    pub trophies: Vec<TrophyEntry>,
}
