//! Logging utilities
//!
//! Tracing setup plus the banner helpers used around session boundaries.

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::question::SessionStats;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` controls the filter; the default keeps the chat transcript
/// readable by sending only warnings to the terminal.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Log the startup banner.
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("Excel interviewer starting");
    info!("knowledge base: {}", config.question_bank_path);
    info!("interview length: {}", config.interview_length);
    info!("model: {} @ {}", config.llm_model_name, config.llm_api_base_url);
    info!("{}", "=".repeat(60));
}

/// Log the end-of-session summary.
pub fn log_session_complete(stats: &SessionStats, report_dir: &str) {
    info!("{}", "=".repeat(60));
    info!("session complete: {}", stats);
    info!(
        "finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("reports directory: {}", report_dir);
    info!("{}", "=".repeat(60));
}

/// Truncate long text for log display.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
