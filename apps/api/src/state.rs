use std::sync::Arc;

use crate::config::Config;
use crate::feedback::generator::FeedbackWriter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable feedback backend. Default: `LlmClient`. `None` when
    /// ANTHROPIC_API_KEY is unset; generation requests then fail with a
    /// configuration error.
    pub feedback_writer: Option<Arc<dyn FeedbackWriter>>,
    pub config: Config,
}
