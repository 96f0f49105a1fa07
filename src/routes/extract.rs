use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `Json` extractor whose rejections use the `{"error": ...}` body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` extractor whose rejections use the `{"error": ...}` body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
