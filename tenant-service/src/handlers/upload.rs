use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::handlers::AppError;
use crate::models::{FileDescriptor, TenantError};
use crate::AppState;

/// Multipart field carrying the attachments
const FILES_FIELD: &str = "files";

/// Store uploaded files in the tenant's shard directory.
///
/// Parts are written in arrival order. The first failure aborts the request
/// and files written before it stay on disk. The tenant is resolved before
/// the body is inspected, so an unknown tenant is always reported as such.
pub async fn upload_to_tenant(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<FileDescriptor>>, AppError> {
    let tenant = state.store.get_by_name(&name).await?;
    let mut multipart =
        multipart.map_err(|rejection| TenantError::Multipart(rejection.body_text()))?;

    let dir = state.storage.ensure_shard(&tenant.md5).await.map_err(TenantError::from)?;
    tracing::debug!("Uploading for tenant {} into {}", tenant.id, dir.display());

    let mut written = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| TenantError::Multipart(e.body_text()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        let mut file = state
            .storage
            .create_file(&dir, &filename)
            .await
            .map_err(TenantError::from)?;

        let mut size = 0u64;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| TenantError::Multipart(e.body_text()))?
        {
            file.write_all(&chunk).await.map_err(TenantError::from)?;
            size += chunk.len() as u64;
        }
        file.flush().await.map_err(TenantError::from)?;

        tracing::info!(
            "Stored file: tenant={}, filename={}, size={} bytes",
            tenant.name,
            filename,
            size
        );

        written.push(FileDescriptor {
            filename,
            content_type,
            size,
        });
    }

    Ok(Json(written))
}
