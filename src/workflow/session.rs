//! Session state machine - workflow layer
//!
//! Core responsibility: decide what happens after each evaluated answer.
//! Owns no resources and performs no I/O; the orchestrator feeds it
//! evaluations and acts on the returned events.
//!
//! Transition rules:
//! 1. weak score, retry not yet spent → hand back a hint, same question
//! 2. otherwise accept the answer and advance
//! 3. past the early-stop mark with a weak running average → end early
//! 4. past the last question → finished

use crate::config::Config;
use crate::models::question::{AnswerRecord, Evaluation, Question, SessionStats};

/// Stock hint for questions that carry none of their own.
const FALLBACK_HINT: &str = "Let's think about that from another angle.";

/// What the session wants to happen next
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Same question again, with a hint for the candidate
    RetryWithHint(String),
    /// Answer accepted, move on to the question at this 0-based index
    NextQuestion(usize),
    /// Answer accepted, the running average ended the interview early
    FinishedEarly,
    /// Answer accepted, that was the last question
    Finished,
}

/// One interview session's state
#[derive(Debug)]
pub struct Session {
    questions: Vec<Question>,
    records: Vec<AnswerRecord>,
    current_index: usize,
    retry_spent: bool,
    retry_score_threshold: u8,
    early_stop_ratio: f64,
    early_stop_average: f64,
}

impl Session {
    pub fn new(questions: Vec<Question>, config: &Config) -> Self {
        Self {
            questions,
            records: Vec::new(),
            current_index: 0,
            retry_spent: false,
            retry_score_threshold: config.retry_score_threshold,
            early_stop_ratio: config.early_stop_ratio,
            early_stop_average: config.early_stop_average,
        }
    }

    /// The question currently awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Accepted answers so far, in presentation order.
    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::from_records(&self.records, self.questions.len())
    }

    /// Feed one evaluated answer into the machine.
    ///
    /// A weak first attempt gets one retry with a hint and is not recorded;
    /// every other attempt is accepted as the question's single record.
    pub fn record_evaluation(&mut self, answer: String, evaluation: Evaluation) -> SessionEvent {
        let question = self.questions[self.current_index].clone();

        if evaluation.score < self.retry_score_threshold && !self.retry_spent {
            self.retry_spent = true;
            let hint = question
                .hint
                .clone()
                .unwrap_or_else(|| FALLBACK_HINT.to_string());
            return SessionEvent::RetryWithHint(hint);
        }

        self.retry_spent = false;
        self.records.push(AnswerRecord {
            question,
            answer,
            evaluation,
        });
        self.current_index += 1;

        if self.should_stop_early() {
            return SessionEvent::FinishedEarly;
        }

        if self.current_index < self.questions.len() {
            SessionEvent::NextQuestion(self.current_index)
        } else {
            SessionEvent::Finished
        }
    }

    /// Early-stop rule: once the answered count reaches the configured
    /// fraction of the session and the running average is weak, there is
    /// enough signal to end the assessment.
    fn should_stop_early(&self) -> bool {
        if self.current_index >= self.questions.len() {
            return false;
        }
        let mark = (self.questions.len() as f64 * self.early_stop_ratio).ceil() as usize;
        let stats = self.stats();
        self.records.len() >= mark
            && stats.average_score > 0.0
            && stats.average_score < self.early_stop_average
    }
}
