use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let database = match &state.db_pool {
        Some(pool) => {
            if shared::database::health_check(pool).await {
                "up"
            } else {
                "down"
            }
        }
        None => "not configured",
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "tenant-service",
            "version": env!("CARGO_PKG_VERSION"),
            "database": database,
        })),
    )
}
