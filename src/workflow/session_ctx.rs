//! Session context
//!
//! Captures "which question of which session am I on" for log prefixes.

use std::fmt::Display;

/// Context for the question currently being processed
#[derive(Debug, Clone)]
pub struct SessionCtx {
    /// Session id (timestamp-derived)
    pub session_id: String,

    /// 1-based index of the current question
    pub question_index: usize,

    /// Number of questions in this session
    pub total_questions: usize,
}

impl SessionCtx {
    pub fn new(session_id: String, question_index: usize, total_questions: usize) -> Self {
        Self {
            session_id,
            question_index,
            total_questions,
        }
    }
}

impl Display for SessionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[session {} question {}/{}]",
            self.session_id, self.question_index, self.total_questions
        )
    }
}
