//! # Excel Interviewer
//!
//! A console mock-interview application for Excel skills. Questions come
//! from a JSON knowledge base, answers are scored by an OpenAI-compatible
//! LLM API against per-question rubrics, and the session ends with a
//! Markdown performance report.
//!
//! ## Architecture
//!
//! The system is layered strictly, top to bottom:
//!
//! ### ① Models
//! - `models/` - question records, evaluations, answer records, the JSON
//!   knowledge-base loader
//!
//! ### ② Services (capabilities)
//! - `services/` - "what I can do", one concern each, no flow knowledge
//! - `EvaluatorService` - score one answer via the LLM
//! - `ReportService` - turn a transcript into the final report
//! - `sampler` - pick the interview's question set
//! - `ReportWriter` - persist the report to disk
//!
//! ### ③ Workflow
//! - `workflow/` - the session state machine: retry-with-hint, early stop,
//!   record accumulation. Owns no resources, performs no I/O.
//!
//! ### ④ Orchestration
//! - `orchestrator/` - `App` owns the services and the stdin/stdout chat
//!   loop, drives one session from welcome banner to written report

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use config::Config;
pub use error::{AppError, Result};
pub use models::question::{AnswerRecord, Evaluation, Question};
pub use orchestrator::App;
pub use workflow::{Session, SessionCtx, SessionEvent};
