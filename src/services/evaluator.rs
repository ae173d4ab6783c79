//! Evaluator service - capability layer
//!
//! Owns the "score one answer" capability, nothing else: no session state,
//! no question lists, no flow order.
//!
//! ## Stack
//! - `async-openai` against any OpenAI-compatible endpoint
//! - lenient response parsing: models wrap JSON in code fences and prose
//!   often enough that strict parsing would fail real sessions

use std::time::Duration;

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::question::{Evaluation, Question};

const EVALUATOR_SYSTEM_MESSAGE: &str =
    "You are an expert Excel evaluator that only responds in valid JSON.";

/// Global scoring band, prepended to every per-question rubric.
const SCORING_BAND: &str = "\
- 5: Excellent. The answer is accurate, complete, and demonstrates deep understanding.
- 4: Good. The answer is mostly correct but may have minor inaccuracies.
- 3: Satisfactory. The answer demonstrates a basic understanding but is incomplete or contains notable errors.
- 2: Poor. The answer is largely incorrect and shows a fundamental misunderstanding.
- 1: Very Poor. The answer is completely wrong or irrelevant.";

/// Evaluator service
pub struct EvaluatorService {
    client: Client<OpenAIConfig>,
    model_name: String,
    rate_limit: Duration,
}

impl EvaluatorService {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            rate_limit: Duration::from_millis(config.rate_limit_ms),
        }
    }

    /// The one raw LLM call. Everything else in this service is built on
    /// top of it.
    ///
    /// Pauses for the configured rate-limit window after a successful call.
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String> {
        debug!("calling LLM API, model: {}", self.model_name);
        debug!("user message length: {} chars", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(1024u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API call failed: {}", e);
            anyhow::anyhow!("LLM API call failed: {}", e)
        })?;

        debug!("LLM API call succeeded");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("the model returned an empty completion"))?;

        tokio::time::sleep(self.rate_limit).await;

        Ok(content.trim().to_string())
    }

    /// Score one answer against the question's rubric.
    ///
    /// Prompts for a single JSON object (`score`, `justification`) and
    /// parses whatever came back as leniently as possible.
    pub async fn evaluate_answer(&self, question: &Question, answer: &str) -> Result<Evaluation> {
        let user_message = self.build_evaluation_message(question, answer);

        let response = self
            .send_to_llm(&user_message, Some(EVALUATOR_SYSTEM_MESSAGE))
            .await?;

        let evaluation = self.parse_evaluation_response(&response)?;

        debug!(
            "evaluated question {}: score {}/5",
            question.id, evaluation.score
        );

        Ok(evaluation)
    }

    fn build_evaluation_message(&self, question: &Question, answer: &str) -> String {
        format!(
            r#"You are an expert Excel Interview Evaluator. Your task is to analyze a candidate's answer to an interview question.
You must provide a numeric score from 1 to 5 and a brief justification for your score based on the provided rubric.
Your entire output must be a single, valid JSON object with exactly two keys: "score" and "justification".

**Rubric:**
{SCORING_BAND}

**Interview Question:**
{question}

**Candidate's Answer:**
{answer}

**Evaluation Rubric for this question:**
{rubric}"#,
            question = question.question,
            answer = answer,
            rubric = question.rubric,
        )
    }

    /// Extract an [`Evaluation`] from raw model output.
    ///
    /// Accepts the bare JSON object, a fenced code block around it, or an
    /// object buried in surrounding prose. Scores outside 1..=5 are clamped
    /// with a warning rather than rejected.
    fn parse_evaluation_response(&self, response: &str) -> Result<Evaluation> {
        let candidate = strip_code_fences(response);

        if let Ok(evaluation) = serde_json::from_str::<Evaluation>(candidate.trim()) {
            return Ok(self.clamp(evaluation));
        }

        // Fall back to the first {...} block in the text. Justifications do
        // not contain braces in practice, so a non-greedy match suffices.
        let object_re = Regex::new(r"(?s)\{.*?\}").unwrap();
        for m in object_re.find_iter(&candidate) {
            if let Ok(evaluation) = serde_json::from_str::<Evaluation>(m.as_str()) {
                debug!("recovered evaluation JSON from noisy completion");
                return Ok(self.clamp(evaluation));
            }
        }

        warn!("could not parse evaluation from: {:?}", response);
        anyhow::bail!(
            "could not parse the evaluation from the model output: {}",
            truncate_for_error(response)
        )
    }

    fn clamp(&self, mut evaluation: Evaluation) -> Evaluation {
        // The serde visitor already clamps numeric extremes; this guards the
        // 0 band, which is reserved for failed evaluations.
        if evaluation.score == 0 {
            warn!("model scored 0, clamping to the bottom of the 1-5 band");
            evaluation.score = 1;
        }
        evaluation
    }
}

/// Drop Markdown code fences (``` or ```json) around the payload, if any.
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    trimmed
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_for_error(text: &str) -> String {
    crate::utils::logging::truncate_text(text, 120)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> EvaluatorService {
        let config = Config {
            llm_api_key: "test-key".to_string(),
            rate_limit_ms: 0,
            ..Config::default()
        };
        EvaluatorService::new(&config)
    }

    fn test_question() -> Question {
        serde_json::from_str(
            r#"{"id": "xl-010", "topic": "formulas", "difficulty": "basic",
                "question": "What does SUMIF do?", "rubric": "Conditional summing."}"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_a_bare_json_object() {
        let service = test_service();
        let evaluation = service
            .parse_evaluation_response(r#"{"score": 4, "justification": "Mostly correct."}"#)
            .unwrap();
        assert_eq!(evaluation.score, 4);
        assert_eq!(evaluation.justification, "Mostly correct.");
    }

    #[test]
    fn parses_a_fenced_json_object() {
        let service = test_service();
        let response = "```json\n{\"score\": \"5\", \"justification\": \"Complete.\"}\n```";
        let evaluation = service.parse_evaluation_response(response).unwrap();
        assert_eq!(evaluation.score, 5);
    }

    #[test]
    fn parses_an_object_buried_in_prose() {
        let service = test_service();
        let response = "Here is my evaluation:\n{\"score\": 2, \"justification\": \"Misses the point.\"}\nHope that helps!";
        let evaluation = service.parse_evaluation_response(response).unwrap();
        assert_eq!(evaluation.score, 2);
    }

    #[test]
    fn clamps_a_zero_score_into_the_band() {
        let service = test_service();
        let evaluation = service
            .parse_evaluation_response(r#"{"score": 0, "justification": "?"}"#)
            .unwrap();
        assert_eq!(evaluation.score, 1);
    }

    #[test]
    fn rejects_output_with_no_object() {
        let service = test_service();
        let result = service.parse_evaluation_response("I would rate this answer a four.");
        assert!(result.is_err());
    }

    #[test]
    fn evaluation_prompt_carries_question_answer_and_rubric() {
        let service = test_service();
        let question = test_question();
        let prompt = service.build_evaluation_message(&question, "It sums matching cells.");

        assert!(prompt.contains("What does SUMIF do?"));
        assert!(prompt.contains("It sums matching cells."));
        assert!(prompt.contains("Conditional summing."));
        assert!(prompt.contains("5: Excellent"));
    }

    /// Live API smoke test.
    ///
    /// Run with: `cargo test evaluate -- --ignored --nocapture`
    #[tokio::test]
    #[ignore]
    async fn evaluate_answer_against_live_api() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::load().expect("configuration with an API key");
        let service = EvaluatorService::new(&config);
        let question = test_question();

        let evaluation = service
            .evaluate_answer(&question, "SUMIF adds up cells that match a condition.")
            .await
            .expect("evaluation should succeed");

        println!("score: {}/5 - {}", evaluation.score, evaluation.justification);
        assert!((1..=5).contains(&evaluation.score));
        assert!(!evaluation.justification.is_empty());
    }
}
