//! REST API module.
//!
//! Handlers for the portal pages, content editing, the message board and the AI tutor.

mod admin;
mod assistant;
mod board;
mod pages;
mod posts;
mod subjects;

pub use admin::*;
pub use assistant::*;
pub use board::*;
pub use pages::*;
pub use posts::*;
pub use subjects::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Wall-clock time used to stamp new entities.
fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}
