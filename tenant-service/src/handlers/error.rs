use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::TenantError;

// ============= Error Handling =============

#[derive(Debug)]
pub enum AppError {
    Tenant(TenantError),
}

impl From<TenantError> for AppError {
    fn from(err: TenantError) -> Self {
        AppError::Tenant(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Tenant(TenantError::NotFound) => StatusCode::NOT_FOUND,
            // Malformed bodies share the not-found class, like missing records.
            AppError::Tenant(TenantError::Binding(_)) => StatusCode::NOT_FOUND,
            AppError::Tenant(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let AppError::Tenant(err) = self;

        let message = match &err {
            TenantError::NotFound => {
                tracing::warn!("{}", err);
                "Unable to get tenant details".to_string()
            }
            TenantError::Binding(msg) => {
                tracing::warn!("Binding error: {}", msg);
                "Unable to bind request to tenant".to_string()
            }
            TenantError::Multipart(msg) => {
                tracing::error!("Multipart error: {}", msg);
                "Error accessing multipart form".to_string()
            }
            TenantError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                "Internal server error".to_string()
            }
            TenantError::Io(msg) => {
                tracing::error!("I/O error: {}", msg);
                "Error saving file".to_string()
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
