//! Request extractors whose rejections render as `AppError`.

use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` with malformed bodies reported in the JSON error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
