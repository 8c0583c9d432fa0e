use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty tier of a question or a generated test, totally ordered from
/// `Easy` to `Hard`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[default]
    Easy,
    Medium,
    Intermediate,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 4] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Hard => "Hard",
        }
    }

    fn rank(&self) -> usize {
        *self as usize
    }

    fn from_rank(rank: usize) -> Self {
        Self::ALL[rank.min(Self::ALL.len() - 1)]
    }

    /// Moves `steps` tiers up, stopping at `Hard`.
    pub fn step_up(self, steps: usize) -> Self {
        Self::from_rank(self.rank().saturating_add(steps))
    }

    /// Moves `steps` tiers down, stopping at `Easy`.
    pub fn step_down(self, steps: usize) -> Self {
        Self::from_rank(self.rank().saturating_sub(steps))
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(DifficultyLevel::Easy),
            "medium" => Ok(DifficultyLevel::Medium),
            "intermediate" => Ok(DifficultyLevel::Intermediate),
            "hard" => Ok(DifficultyLevel::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}
