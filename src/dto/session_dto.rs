use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::answer::UserAnswer;
use crate::models::difficulty::DifficultyLevel;
use crate::models::question::Question;
use crate::models::session::{Celebration, SessionState, TestSession, UiPreferences};
use crate::models::test::GeneratedBy;
use crate::models::test_result::{ResultFeedback, TestResult};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1))]
    pub subject_id: String,
    #[serde(default)]
    pub difficulty: DifficultyLevel,
    pub chapter_id: Option<String>,
    /// Overrides the server-wide default for this session.
    pub reduced_motion: Option<bool>,
}

impl CreateSessionRequest {
    pub fn preferences(&self) -> Option<UiPreferences> {
        self.reduced_motion
            .map(|reduced_motion| UiPreferences { reduced_motion })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectOptionRequest {
    pub option: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChooseChapterRequest {
    #[validate(length(min = 1))]
    pub chapter_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDifficultyRequest {
    pub difficulty: DifficultyLevel,
}

/// A question as shown to the student. The answer key is only included once
/// the test has been submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub difficulty: DifficultyLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl SessionQuestion {
    fn from_question(question: Question, reveal: bool) -> Self {
        Self {
            id: question.id,
            text: question.text,
            options: question.options,
            difficulty: question.difficulty,
            correct_answer: reveal.then_some(question.correct_answer),
            explanation: if reveal { question.explanation } else { None },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTest {
    pub id: String,
    pub title: String,
    pub chapter: String,
    pub icon: String,
    pub duration: u32,
    pub difficulty: DifficultyLevel,
    pub generated_by: GeneratedBy,
    pub questions: Vec<SessionQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub subject_id: String,
    pub state: SessionState,
    pub test: SessionTest,
    pub current_index: usize,
    pub selected_option: Option<usize>,
    pub answers: Vec<UserAnswer>,
    pub time_remaining: u32,
    /// Tier the next generated test will use.
    pub difficulty: DifficultyLevel,
    pub chapter_id: Option<String>,
    pub result: Option<TestResult>,
    pub feedback: Option<ResultFeedback>,
    pub feedback_message: Option<String>,
    pub celebration: Celebration,
}

impl From<TestSession> for SessionResponse {
    fn from(session: TestSession) -> Self {
        let reveal = matches!(session.state, SessionState::Completed | SessionState::Review);
        let selected_option = session.selected_option();
        let feedback = session
            .result
            .as_ref()
            .map(|r| ResultFeedback::for_score(r.score));

        let test = session.test;
        Self {
            id: session.id,
            subject_id: session.subject_id,
            state: session.state,
            test: SessionTest {
                id: test.id,
                title: test.title,
                chapter: test.chapter,
                icon: test.icon,
                duration: test.duration,
                difficulty: test.difficulty,
                generated_by: test.generated_by,
                questions: test
                    .questions
                    .into_iter()
                    .map(|q| SessionQuestion::from_question(q, reveal))
                    .collect(),
            },
            current_index: session.current_index,
            selected_option,
            answers: session.answers,
            time_remaining: session.time_remaining,
            difficulty: session.difficulty,
            chapter_id: session.chapter_id,
            result: session.result,
            feedback,
            feedback_message: feedback.map(|f| f.message().to_string()),
            celebration: session.celebration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test::Test;

    fn session() -> TestSession {
        let test = Test {
            id: "science-test-1".into(),
            subject_id: "science".into(),
            title: "Science Easy Test".into(),
            chapter: "Chapter 1: Food: Where Does It Come From?".into(),
            icon: "fa-atom".into(),
            duration: 300,
            difficulty: DifficultyLevel::Easy,
            questions: vec![Question {
                id: "q1".into(),
                text: "Which part of the plant do we eat in a carrot?".into(),
                options: vec!["Root".into(), "Stem".into()],
                correct_answer: 0,
                difficulty: DifficultyLevel::Easy,
                explanation: Some("Carrots are roots.".into()),
            }],
            generated_by: GeneratedBy::Ai,
        };
        TestSession::new("science", test, None, UiPreferences::default())
    }

    #[test]
    fn answer_key_hidden_until_submitted() {
        let view = SessionResponse::from(session());
        let question = &view.test.questions[0];
        assert!(question.correct_answer.is_none());
        assert!(question.explanation.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["test"]["questions"][0].get("correct_answer").is_none());
        assert_eq!(json["state"], "intro");
    }

    #[test]
    fn answer_key_revealed_after_completion() {
        let mut session = session();
        session.state = SessionState::Review;
        let view = SessionResponse::from(session);
        assert_eq!(view.test.questions[0].correct_answer, Some(0));
        assert_eq!(
            view.test.questions[0].explanation.as_deref(),
            Some("Carrots are roots.")
        );
    }
}
