use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::handlers::AppError;
use crate::models::{Tenant, TenantError, TenantRequest};
use crate::AppState;

/// Non-numeric identifiers can never match a row, so they are reported as
/// not found rather than as a malformed request.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::from(TenantError::NotFound))
}

fn bind(payload: Result<Json<TenantRequest>, JsonRejection>) -> Result<TenantRequest, AppError> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| TenantError::Binding(rejection.body_text()).into())
}

/// Get a tenant by id
pub async fn get_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Tenant>, AppError> {
    let id = parse_id(&id)?;
    let tenant = state.store.get(id).await?;
    Ok(Json(tenant))
}

/// Create a new tenant
pub async fn create_tenant(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TenantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Tenant>), AppError> {
    let req = bind(payload)?;
    let tenant = state.store.create(req.name).await?;

    tracing::info!("Created tenant: id={}, shard={}", tenant.id, tenant.md5.shard());
    Ok((StatusCode::CREATED, Json(tenant)))
}

/// Rename a tenant
pub async fn update_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TenantRequest>, JsonRejection>,
) -> Result<Json<Tenant>, AppError> {
    let id = parse_id(&id)?;
    let req = bind(payload)?;
    let tenant = state.store.update(id, req.name).await?;
    Ok(Json(tenant))
}

/// Delete a tenant
pub async fn delete_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
