use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM service errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    /// File and knowledge-base errors
    #[error("file error: {0}")]
    File(#[from] FileError),
    /// Business-rule errors
    #[error("business error: {0}")]
    Business(#[from] BusinessError),
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Wrapper for third-party errors
    #[error("error: {0}")]
    Other(String),
}

/// LLM service errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API call failed: {message}")]
    ApiCallFailed { message: String },
    #[error("the model returned an empty completion")]
    EmptyCompletion,
    #[error("could not parse the evaluation from the model output: {response}")]
    UnparsableEvaluation { response: String },
}

/// File and knowledge-base errors
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Business-rule errors
#[derive(Debug, Error)]
pub enum BusinessError {
    #[error("the knowledge base is empty")]
    EmptyKnowledgeBase,
    #[error("duplicate question id in the knowledge base: {id}")]
    DuplicateQuestionId { id: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no LLM API key: set LLM_API_KEY or add llm_api_key to {secrets_file}")]
    MissingApiKey { secrets_file: String },
    #[error("invalid configuration value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Result alias for application errors
pub type Result<T> = std::result::Result<T, AppError>;

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_failing_piece() {
        let err = AppError::Config(ConfigError::MissingApiKey {
            secrets_file: "secrets.toml".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.contains("secrets.toml"));
        assert!(msg.contains("LLM_API_KEY"));
    }

    #[test]
    fn business_errors_wrap_into_app_error() {
        let err: AppError = BusinessError::EmptyKnowledgeBase.into();
        assert!(matches!(err, AppError::Business(_)));
    }
}
