use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AppError, ConfigError};

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of questions per interview session
    pub interview_length: usize,
    /// Path to the question knowledge base (JSON)
    pub question_bank_path: String,
    /// Directory the final report is written to
    pub report_dir: String,
    /// Local secrets file carrying the API key
    pub secrets_file: String,
    /// Whether to log evaluation details
    pub verbose_logging: bool,
    // --- LLM settings ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- Session rules ---
    /// Scores below this threshold earn one hint + retry
    pub retry_score_threshold: u8,
    /// Fraction of the session after which a weak average ends it early
    pub early_stop_ratio: f64,
    /// Running average below this value triggers the early stop
    pub early_stop_average: f64,
    /// Pause after each LLM call, for API rate limits
    pub rate_limit_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interview_length: 3,
            question_bank_path: "data/interview_questions.json".to_string(),
            report_dir: "reports".to_string(),
            secrets_file: "secrets.toml".to_string(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            retry_score_threshold: 3,
            early_stop_ratio: 0.75,
            early_stop_average: 3.0,
            rate_limit_ms: 1000,
        }
    }
}

/// Contents of the local secrets file (TOML)
#[derive(Debug, Deserialize)]
struct Secrets {
    llm_api_key: Option<String>,
}

impl Config {
    /// Build the configuration from environment variables over the defaults
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            interview_length: std::env::var("INTERVIEW_LENGTH").ok().and_then(|v| v.parse().ok()).unwrap_or(default.interview_length),
            question_bank_path: std::env::var("QUESTION_BANK_PATH").unwrap_or(default.question_bank_path),
            report_dir: std::env::var("REPORT_DIR").unwrap_or(default.report_dir),
            secrets_file: std::env::var("SECRETS_FILE").unwrap_or(default.secrets_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            retry_score_threshold: std::env::var("RETRY_SCORE_THRESHOLD").ok().and_then(|v| v.parse().ok()).unwrap_or(default.retry_score_threshold),
            early_stop_ratio: std::env::var("EARLY_STOP_RATIO").ok().and_then(|v| v.parse().ok()).unwrap_or(default.early_stop_ratio),
            early_stop_average: std::env::var("EARLY_STOP_AVERAGE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.early_stop_average),
            rate_limit_ms: std::env::var("RATE_LIMIT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.rate_limit_ms),
        }
    }

    /// Full startup path: env overrides, then the secrets file, then
    /// validation. The API key must come from somewhere.
    pub fn load() -> Result<Self, AppError> {
        let mut config = Self::from_env();
        config.merge_secrets_file();

        if config.llm_api_key.is_empty() {
            return Err(AppError::Config(ConfigError::MissingApiKey {
                secrets_file: config.secrets_file,
            }));
        }
        if config.interview_length == 0 {
            return Err(AppError::Config(ConfigError::InvalidValue {
                key: "interview_length".to_string(),
                reason: "must be at least 1".to_string(),
            }));
        }

        Ok(config)
    }

    /// Overlay the secrets file, if present. The environment wins over the
    /// file so one-off runs can override a stored key.
    fn merge_secrets_file(&mut self) {
        if !self.llm_api_key.is_empty() {
            debug!("API key taken from environment, skipping secrets file");
            return;
        }

        let path = Path::new(&self.secrets_file);
        if !path.exists() {
            debug!("secrets file {} not found", self.secrets_file);
            return;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("failed to read secrets file {}: {}", self.secrets_file, e);
                return;
            }
        };

        match toml::from_str::<Secrets>(&content) {
            Ok(secrets) => {
                if let Some(key) = secrets.llm_api_key {
                    self.llm_api_key = key;
                }
            }
            Err(e) => warn!("failed to parse secrets file {}: {}", self.secrets_file, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_rules_match_the_interview_design() {
        let config = Config::default();
        assert_eq!(config.interview_length, 3);
        assert_eq!(config.retry_score_threshold, 3);
        assert!((config.early_stop_ratio - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn load_rejects_missing_api_key() {
        // Point at a secrets file that does not exist so nothing leaks in
        // from the developer's machine.
        std::env::set_var("SECRETS_FILE", "does-not-exist.toml");
        std::env::remove_var("LLM_API_KEY");

        let result = Config::load();
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::MissingApiKey { .. }))
        ));

        std::env::remove_var("SECRETS_FILE");
    }

    #[test]
    fn secrets_file_fills_in_the_api_key() {
        let dir = std::env::temp_dir().join("excel-interviewer-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("secrets.toml");
        std::fs::write(&path, "llm_api_key = \"test-key-123\"\n").unwrap();

        let mut config = Config {
            secrets_file: path.to_string_lossy().to_string(),
            ..Config::default()
        };
        config.merge_secrets_file();

        assert_eq!(config.llm_api_key, "test-key-123");
    }

    #[test]
    fn environment_key_wins_over_the_secrets_file() {
        let dir = std::env::temp_dir().join("excel-interviewer-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("secrets_env_wins.toml");
        std::fs::write(&path, "llm_api_key = \"file-key\"\n").unwrap();

        let mut config = Config {
            secrets_file: path.to_string_lossy().to_string(),
            llm_api_key: "env-key".to_string(),
            ..Config::default()
        };
        config.merge_secrets_file();

        assert_eq!(config.llm_api_key, "env-key");
    }
}
