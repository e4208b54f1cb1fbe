//! Axum route handlers for the student upload API.

use axum::{extract::Multipart, Json};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::intake::{intake_students, IntakeError};
use crate::models::student::StudentRecord;

/// Multipart field carrying the spreadsheet.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub students: Vec<StudentRecord>,
    pub count: usize,
}

/// POST /api/v1/students/upload
///
/// Accepts a `.csv`, `.xlsx` or `.xls` file in the `file` field and returns
/// the normalized student records, ready to post to `/api/generate`.
pub async fn handle_upload(mut multipart: Multipart) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;

        let students = intake_students(&file_name, &bytes).map_err(|e| {
            match &e {
                IntakeError::Parse { detail, .. } => {
                    warn!("Unreadable upload '{file_name}': {detail}")
                }
                other => info!("Rejected upload '{file_name}': {other}"),
            }
            AppError::from(e)
        })?;

        info!(
            "Parsed upload '{}': {} students",
            file_name,
            students.len()
        );

        return Ok(Json(UploadResponse {
            count: students.len(),
            students,
        }));
    }

    Err(AppError::Validation(format!(
        "Missing '{FILE_FIELD}' field in upload"
    )))
}
