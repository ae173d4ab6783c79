use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

use crate::models::question::Question;

/// Load the question knowledge base from a JSON file.
///
/// The file holds a JSON array of question records. An empty bank or a
/// duplicate question id is rejected: both would break the sampling
/// guarantees downstream.
pub async fn load_question_bank(path: impl AsRef<Path>) -> Result<Vec<Question>> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read knowledge base: {}", path.display()))?;

    let questions: Vec<Question> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse knowledge base: {}", path.display()))?;

    if questions.is_empty() {
        anyhow::bail!("knowledge base {} holds no questions", path.display());
    }

    let mut seen = HashSet::new();
    for question in &questions {
        if !seen.insert(question.id.as_str()) {
            anyhow::bail!(
                "knowledge base {} has a duplicate question id: {}",
                path.display(),
                question.id
            );
        }
    }

    tracing::info!(
        "loaded {} questions from {}",
        questions.len(),
        path.display()
    );

    Ok(questions)
}
