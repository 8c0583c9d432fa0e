use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::answer::UserAnswer;
use crate::models::difficulty::DifficultyLevel;
use crate::models::test::Test;
use crate::models::test_result::TestResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Intro,
    InProgress,
    Completed,
    Review,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Intro => "intro",
            SessionState::InProgress => "in-progress",
            SessionState::Completed => "completed",
            SessionState::Review => "review",
        }
    }
}

/// Presentation preferences handed to each session explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    pub reduced_motion: bool,
}

/// Which completion animations the client should play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    pub confetti: bool,
    pub trophy: bool,
}

impl Celebration {
    pub const TROPHY_SCORE: u32 = 70;

    pub fn for_score(score: u32, preferences: UiPreferences) -> Self {
        if preferences.reduced_motion {
            return Self::default();
        }
        Self {
            confetti: true,
            trophy: score >= Self::TROPHY_SCORE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    /// Already on the last question; the caller should submit.
    AtEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running(u32),
    /// The countdown reached zero; the caller should submit.
    Expired,
    /// The session is not in progress.
    Idle,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestSession {
    pub id: Uuid,
    pub subject_id: String,
    pub state: SessionState,
    pub test: Test,
    pub current_index: usize,
    pub answers: Vec<UserAnswer>,
    pub time_remaining: u32,
    pub result: Option<TestResult>,
    /// Tier the next generated test will use.
    pub difficulty: DifficultyLevel,
    pub chapter_id: Option<String>,
    pub celebration: Celebration,
    pub preferences: UiPreferences,
}

impl TestSession {
    pub fn new(
        subject_id: impl Into<String>,
        test: Test,
        chapter_id: Option<String>,
        preferences: UiPreferences,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id: subject_id.into(),
            state: SessionState::Intro,
            difficulty: test.difficulty,
            time_remaining: test.duration,
            test,
            current_index: 0,
            answers: Vec::new(),
            result: None,
            chapter_id,
            celebration: Celebration::default(),
            preferences,
        }
    }

    fn expect_state(&self, allowed: &[SessionState], action: &str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::Conflict(format!(
                "Cannot {} while the session is {}",
                action,
                self.state.as_str()
            )))
        }
    }

    /// Swaps in a freshly generated test and clears everything tied to the old
    /// one.
    pub fn reset(&mut self, test: Test, chapter_id: Option<String>) {
        self.time_remaining = test.duration;
        self.difficulty = test.difficulty;
        self.test = test;
        self.chapter_id = chapter_id;
        self.state = SessionState::Intro;
        self.current_index = 0;
        self.answers.clear();
        self.result = None;
        self.celebration = Celebration::default();
    }

    pub fn ensure_can_regenerate(&self) -> Result<()> {
        self.expect_state(
            &[SessionState::Intro, SessionState::Completed, SessionState::Review],
            "generate a new test",
        )
    }

    pub fn ensure_intro(&self, action: &str) -> Result<()> {
        self.expect_state(&[SessionState::Intro], action)
    }

    pub fn start(&mut self) -> Result<()> {
        self.expect_state(&[SessionState::Intro], "start")?;
        self.state = SessionState::InProgress;
        self.time_remaining = self.test.duration;
        self.current_index = 0;
        self.answers = self
            .test
            .questions
            .iter()
            .map(|q| UserAnswer {
                question_id: q.id.clone(),
                selected_option: None,
            })
            .collect();
        Ok(())
    }

    pub fn select_option(&mut self, option: usize) -> Result<()> {
        self.expect_state(&[SessionState::InProgress], "answer")?;
        let question = self
            .test
            .questions
            .get(self.current_index)
            .ok_or_else(|| Error::Conflict("The test has no questions".to_string()))?;
        if option >= question.options.len() {
            return Err(Error::BadRequest(format!(
                "Option {} does not exist; question has {} options",
                option,
                question.options.len()
            )));
        }

        match self.answers.iter_mut().find(|a| a.question_id == question.id) {
            Some(answer) => answer.selected_option = Some(option),
            None => self.answers.push(UserAnswer {
                question_id: question.id.clone(),
                selected_option: Some(option),
            }),
        }
        Ok(())
    }

    pub fn selected_option(&self) -> Option<usize> {
        let question = self.test.questions.get(self.current_index)?;
        self.answers
            .iter()
            .find(|a| a.question_id == question.id)
            .and_then(|a| a.selected_option)
    }

    pub fn next(&mut self) -> Result<Advance> {
        self.expect_state(&[SessionState::InProgress], "move to the next question")?;
        if self.current_index + 1 < self.test.questions.len() {
            self.current_index += 1;
            Ok(Advance::Moved)
        } else {
            Ok(Advance::AtEnd)
        }
    }

    pub fn previous(&mut self) -> Result<()> {
        self.expect_state(&[SessionState::InProgress], "move to the previous question")?;
        self.current_index = self.current_index.saturating_sub(1);
        Ok(())
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state != SessionState::InProgress {
            return TickOutcome::Idle;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.time_remaining)
        }
    }

    pub fn ensure_can_submit(&self) -> Result<()> {
        self.expect_state(&[SessionState::InProgress], "submit")
    }

    /// Records the result of a submission and the tier recommended for the
    /// next test.
    pub fn complete(&mut self, result: TestResult, next_difficulty: DifficultyLevel) -> Result<()> {
        self.ensure_can_submit()?;
        self.celebration = Celebration::for_score(result.score, self.preferences);
        self.result = Some(result);
        self.difficulty = next_difficulty;
        self.state = SessionState::Completed;
        Ok(())
    }

    pub fn review(&mut self) -> Result<()> {
        self.expect_state(&[SessionState::Completed], "review answers")?;
        self.state = SessionState::Review;
        Ok(())
    }

    pub fn back_to_results(&mut self) -> Result<()> {
        self.expect_state(&[SessionState::Review], "return to results")?;
        self.state = SessionState::Completed;
        Ok(())
    }

    pub fn ensure_finished(&self) -> Result<()> {
        self.expect_state(
            &[SessionState::Completed, SessionState::Review],
            "take the test again",
        )
    }
}
