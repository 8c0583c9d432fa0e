use std::sync::Arc;

use crate::models::answer::UserAnswer;
use crate::models::difficulty::DifficultyLevel;
use crate::models::test::Test;
use crate::models::test_result::TestResult;
use crate::utils::time::Clock;

#[derive(Clone)]
pub struct ScoringService {
    clock: Arc<dyn Clock>,
}

impl ScoringService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Scores a submitted test. Answers are matched to questions by id; a
    /// question with no answer, or with `selected_option: None`, counts as
    /// unattempted.
    pub fn score_test(&self, test: &Test, answers: &[UserAnswer]) -> TestResult {
        let mut correct: u32 = 0;
        let mut incorrect: u32 = 0;
        let mut unattempted: u32 = 0;

        for question in &test.questions {
            let selected = answers
                .iter()
                .find(|a| a.question_id == question.id)
                .and_then(|a| a.selected_option);

            match selected {
                None => unattempted += 1,
                Some(option) if option == question.correct_answer => correct += 1,
                Some(_) => incorrect += 1,
            }
        }

        let total = test.questions.len() as u32;
        TestResult {
            test_id: test.id.clone(),
            difficulty: test.difficulty,
            total_questions: total,
            correct_answers: correct,
            incorrect_answers: incorrect,
            unattempted,
            score: percentage(correct, total),
            user_answers: answers.to_vec(),
            completed_at: self.clock.now(),
        }
    }

    /// Recommends the tier for the next test: two tiers up at 90% or more, one
    /// up from 70%, one down below 40%, otherwise unchanged.
    pub fn next_difficulty(result: &TestResult) -> DifficultyLevel {
        let current = result.difficulty;
        match result.score {
            90.. => current.step_up(2),
            70..=89 => current.step_up(1),
            0..=39 => current.step_down(1),
            _ => current,
        }
    }
}

/// `round(correct / total * 100)` with halves rounded up; an empty test scores 0.
fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct * 200 + total) / (2 * total)
}
