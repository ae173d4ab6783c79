//! Interview runner - orchestration layer
//!
//! ## Responsibilities
//!
//! This module is the application entry point: it owns every resource and
//! drives one interview session end to end.
//!
//! 1. **Initialization**: load the knowledge base, sample the session's
//!    questions, build the services
//! 2. **Chat loop**: print questions on stdout, read the candidate's
//!    answers from stdin
//! 3. **Delegation**: evaluation goes to `EvaluatorService`, transitions to
//!    the `Session` state machine, the final report to `ReportService` and
//!    `ReportWriter`
//! 4. **Degradation**: a failed evaluation is recorded as a score-0 verdict
//!    so the session continues and the report stays complete

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use crate::config::Config;
use crate::models::loaders::load_question_bank;
use crate::models::question::Evaluation;
use crate::services::{sample_questions, EvaluatorService, ReportService, ReportWriter};
use crate::utils::logging;
use crate::workflow::{Session, SessionCtx, SessionEvent};

/// Application main structure
pub struct App {
    config: Config,
    session: Session,
    session_id: String,
    evaluator: EvaluatorService,
    reporter: ReportService,
    report_writer: ReportWriter,
}

impl App {
    /// Initialize the application: load the bank, sample the session's
    /// questions, build the services.
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        let bank = load_question_bank(&config.question_bank_path).await?;
        let sampled = sample_questions(&bank, config.interview_length);
        info!(
            "sampled {} of {} questions for this session",
            sampled.len(),
            bank.len()
        );

        let session_id = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        let evaluator = EvaluatorService::new(&config);
        let reporter = ReportService::new(&config);
        let report_writer = ReportWriter::new(&config.report_dir);
        let session = Session::new(sampled, &config);

        Ok(Self {
            config,
            session,
            session_id,
            evaluator,
            reporter,
            report_writer,
        })
    }

    /// Run the interview: welcome banner, start gate, question loop, final
    /// report.
    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        self.print_welcome();
        if !self.wait_for_start(&mut lines).await? {
            info!("input closed before the interview started");
            return Ok(());
        }

        self.run_question_loop(&mut lines).await?;
        self.finish().await
    }

    fn print_welcome(&self) {
        println!("Hello! I'm your adaptive Excel interviewer.\n");
        println!("Here's how this will work:");
        println!("1. I will ask you a series of questions to assess your Excel skills.");
        println!("2. If an answer isn't quite right, I may give you a hint and a chance to try again.");
        println!("3. The interview may end early if a clear skill level is determined.\n");
        println!(
            "This session will have up to {} questions. Ready? Type 'start'.",
            self.session.total_questions()
        );
    }

    async fn wait_for_start(&self, lines: &mut Lines<BufReader<Stdin>>) -> Result<bool> {
        while let Some(line) = lines.next_line().await? {
            if line.to_lowercase().contains("start") {
                return Ok(true);
            }
            println!("Type 'start' when you are ready.");
        }
        Ok(false)
    }

    async fn run_question_loop(&mut self, lines: &mut Lines<BufReader<Stdin>>) -> Result<()> {
        let total = self.session.total_questions();

        while let Some(question) = self.session.current_question().cloned() {
            let ctx = SessionCtx::new(
                self.session_id.clone(),
                self.session.records().len() + 1,
                total,
            );
            info!("{} asking: {}", ctx, logging::truncate_text(&question.question, 80));

            println!(
                "\nQuestion {}/{} ({}, {}):",
                ctx.question_index, total, question.topic, question.difficulty
            );
            println!("{}", question.question);

            let answer = match self.read_answer(lines).await? {
                Some(answer) => answer,
                None => {
                    warn!("{} input closed mid-session, wrapping up", ctx);
                    return Ok(());
                }
            };

            println!("\nAnalyzing your response...");
            let evaluation = self.evaluate_with_fallback(&question, &answer, &ctx).await;

            match self.session.record_evaluation(answer, evaluation) {
                SessionEvent::RetryWithHint(hint) => {
                    println!(
                        "\nThat's not quite what I was looking for. Here's a hint: {}",
                        hint
                    );
                    println!("Why don't you try answering that question again?");
                }
                SessionEvent::NextQuestion(_) => {
                    let stats = self.session.stats();
                    println!("\nThank you. Progress: {}.", stats);
                    if self.config.verbose_logging {
                        if let Some(record) = self.session.records().last() {
                            info!(
                                "{} score {}/5: {}",
                                ctx, record.evaluation.score, record.evaluation.justification
                            );
                        }
                    }
                }
                SessionEvent::FinishedEarly => {
                    info!("{} early stop: {}", ctx, self.session.stats());
                    println!(
                        "\nThank you for your time. Based on the responses so far, I have \
                         enough information to complete the assessment."
                    );
                    break;
                }
                SessionEvent::Finished => {
                    println!(
                        "\nThank you, that was the final question. Please wait a moment \
                         while I generate your performance report."
                    );
                    break;
                }
            }
        }

        Ok(())
    }

    /// Read the next non-empty line; `None` means stdin closed.
    async fn read_answer(&self, lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
        print!("\n> ");
        use std::io::Write;
        std::io::stdout().flush()?;

        while let Some(line) = lines.next_line().await? {
            let answer = line.trim().to_string();
            if !answer.is_empty() {
                return Ok(Some(answer));
            }
        }
        Ok(None)
    }

    /// Evaluate one answer; an API failure becomes a score-0 record instead
    /// of ending the session.
    async fn evaluate_with_fallback(
        &self,
        question: &crate::models::question::Question,
        answer: &str,
        ctx: &SessionCtx,
    ) -> Evaluation {
        match self.evaluator.evaluate_answer(question, answer).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!("{} evaluation failed: {}", ctx, e);
                println!("An error occurred during evaluation: {}.", e);
                Evaluation::failed(&e.to_string())
            }
        }
    }

    /// Generate, print, and persist the final report.
    async fn finish(self) -> Result<()> {
        let records = self.session.records();
        if records.is_empty() {
            println!("\nNo answers were recorded, so there is no report to generate.");
            return Ok(());
        }

        println!("\nThe interview is complete! Generating your performance report...\n");
        let report = self.reporter.generate(records).await;

        println!("----------------------------------------");
        println!("Your Performance Report\n");
        println!("{report}");
        println!("----------------------------------------");

        let path = self.report_writer.write(&report).await?;
        println!("\nReport saved to {}", path.display());

        logging::log_session_complete(&self.session.stats(), &self.config.report_dir);

        Ok(())
    }
}
