use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: String,
    /// `None` means the question was left unattempted.
    pub selected_option: Option<usize>,
}
