//! Axum route handlers for the Feedback API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::feedback::export::render_combined;
use crate::feedback::generator::{run_batch, GenerateRequest, GenerateResponse};
use crate::feedback::level::{ClassLevel, LEVELS};
use crate::models::student::ReportResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LevelSummary {
    pub value: ClassLevel,
    pub label: &'static str,
    pub cefr: &'static str,
    pub max_words_per_sentence: u8,
    pub style_guidance: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LevelsResponse {
    pub levels: Vec<LevelSummary>,
    pub default: ClassLevel,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub reports: Vec<ReportResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/levels
///
/// Lists the class levels, lowest first, for level pickers.
pub async fn handle_levels() -> Json<LevelsResponse> {
    let levels = LEVELS
        .iter()
        .map(|c| LevelSummary {
            value: c.level,
            label: c.level.label(),
            cefr: c.cefr,
            max_words_per_sentence: c.max_words_per_sentence,
            style_guidance: c.style_guidance,
        })
        .collect();

    Json(LevelsResponse {
        levels,
        default: ClassLevel::default(),
    })
}

/// POST /api/v1/reports/generate (also served at POST /api/generate)
///
/// Generates one feedback report per named student, sequentially.
/// Per-student failures are flagged in the result, not returned as errors.
pub async fn handle_generate(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let response = run_batch(state.feedback_writer.as_deref(), &request).await?;
    Ok(Json(response))
}

/// POST /api/v1/reports/export
///
/// Renders a batch of reports as a single plain-text document.
pub async fn handle_export(AppJson(request): AppJson<ExportRequest>) -> Result<String, AppError> {
    if request.reports.is_empty() {
        return Err(AppError::Validation("No reports provided".to_string()));
    }
    Ok(render_combined(&request.reports))
}
