pub mod loaders;
pub mod question;

pub use loaders::load_question_bank;
pub use question::{AnswerRecord, Difficulty, Evaluation, Question, SessionStats};
