//! Feedback generation: validates a batch, then writes one report per student.
//!
//! Flow: validate batch → resolve level → for each student, in order:
//!       build_prompt → one LLM call → ReportResult.
//!
//! Requests are issued strictly one at a time. A failed call marks that
//! student's result and the loop moves on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::level::{resolve_level, LevelConfig};
use crate::feedback::prompts::{build_prompt, FEEDBACK_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::student::{
    lenient_students, lenient_text, ReportResult, StudentRecord, MAX_STUDENTS,
};

/// Report text for a student whose generation call failed.
pub const FAILED_REPORT: &str = "Error generating report. Please try again.";
/// Report text when the model answered without any text.
pub const EMPTY_REPORT: &str = "Error generating report.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default, deserialize_with = "lenient_students")]
    pub students: Vec<StudentRecord>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub class_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub reports: Vec<ReportResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Anything that can turn a system policy and a prompt into feedback text.
///
/// Carried in `AppState` as `Option<Arc<dyn FeedbackWriter>>`; `None` when no
/// API key is configured.
#[async_trait]
pub trait FeedbackWriter: Send + Sync {
    async fn write_feedback(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl FeedbackWriter for LlmClient {
    async fn write_feedback(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.call_text(prompt, system).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Rejects batches that are empty or larger than `MAX_STUDENTS`.
pub fn validate_batch(students: &[StudentRecord]) -> Result<(), AppError> {
    if students.is_empty() {
        return Err(AppError::Validation("No students provided".to_string()));
    }
    if students.len() > MAX_STUDENTS {
        return Err(AppError::Validation(format!(
            "Maximum {MAX_STUDENTS} students allowed"
        )));
    }
    Ok(())
}

/// Runs one generation batch.
///
/// Batch-level checks run before any call: batch size first, then the
/// presence of a writer (i.e. a configured API key).
pub async fn run_batch(
    writer: Option<&dyn FeedbackWriter>,
    request: &GenerateRequest,
) -> Result<GenerateResponse, AppError> {
    validate_batch(&request.students)?;
    let writer =
        writer.ok_or_else(|| AppError::Configuration("API key not configured".to_string()))?;

    let level = resolve_level(&request.class_level);
    let shown_level = level_name(&request.class_level, level);
    let batch_id = Uuid::new_v4();
    let span = info_span!("feedback_batch", %batch_id, level = level.level.key());

    let reports = async {
        info!("Generating feedback for {} students", request.students.len());
        let reports = generate_reports(writer, &request.students, level, shown_level).await;
        let failed = reports.iter().filter(|r| r.error).count();
        info!("Batch finished: {} reports, {} failed", reports.len(), failed);
        reports
    }
    .instrument(span)
    .await;

    Ok(GenerateResponse { reports })
}

/// Name shown on the prompt's LEVEL line: the level as submitted, or the
/// fallback key when nothing was submitted.
pub fn level_name<'a>(submitted: &'a str, level: &LevelConfig) -> &'a str {
    match submitted.trim() {
        "" => level.level.key(),
        name => name,
    }
}

/// Writes one report per named student, in input order.
///
/// Students with a blank name are skipped. Each call is awaited before the
/// next starts.
pub async fn generate_reports(
    writer: &dyn FeedbackWriter,
    students: &[StudentRecord],
    level: &LevelConfig,
    level_name: &str,
) -> Vec<ReportResult> {
    let mut reports = Vec::with_capacity(students.len());

    for (row, student) in students.iter().enumerate() {
        if !student.has_name() {
            continue;
        }

        let prompt = build_prompt(student, level, level_name);
        let result = match writer.write_feedback(FEEDBACK_SYSTEM, &prompt).await {
            Ok(text) if !text.trim().is_empty() => ReportResult::generated(&student.name, &text),
            Ok(_) | Err(LlmError::EmptyContent) => {
                warn!(row, "LLM returned no feedback text");
                ReportResult::failed(&student.name, EMPTY_REPORT)
            }
            Err(e) => {
                warn!(row, "Feedback generation failed: {e}");
                ReportResult::failed(&student.name, FAILED_REPORT)
            }
        };
        reports.push(result);
    }

    reports
}
