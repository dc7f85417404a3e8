//! Subject and material API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{now, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateMaterialRequest, CreateSubjectRequest, Material, Subject};
use crate::AppState;

/// GET /api/subjects - List all subjects in insertion order.
pub async fn list_subjects(State(state): State<AppState>) -> ApiResult<Vec<Subject>> {
    success(state.portal.snapshot().await.subjects)
}

/// GET /api/subjects/:id - Get a single subject with its materials.
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Subject> {
    let snapshot = state.portal.snapshot().await;
    match snapshot.subject(&id) {
        Some(subject) => success(subject.clone()),
        None => Err(AppError::NotFound(format!("Subject {} not found", id))),
    }
}

/// POST /api/subjects - Create a subject in the configured year.
pub async fn create_subject(
    State(state): State<AppState>,
    Json(request): Json<CreateSubjectRequest>,
) -> ApiResult<Option<Subject>> {
    let year = state.config.new_subject_year;
    let now = now();
    let subject = state
        .portal
        .apply(|current| Ok(current.add_subject(&request, year, now)))
        .await?;

    if let Some(subject) = &subject {
        tracing::info!(id = %subject.id, year, "Subject created");
    }
    success(subject)
}

/// POST /api/subjects/:id/materials - Attach a material to a subject.
pub async fn add_material(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Json(request): Json<CreateMaterialRequest>,
) -> ApiResult<Option<Material>> {
    let now = now();
    let material = state
        .portal
        .apply(|current| current.add_material(&subject_id, &request, now))
        .await?;

    if let Some(material) = &material {
        tracing::info!(%subject_id, id = %material.id, "Material added");
    }
    success(material)
}

/// DELETE /api/subjects/:id/materials/:materialId - Remove a material.
pub async fn delete_material(
    State(state): State<AppState>,
    Path((subject_id, material_id)): Path<(String, String)>,
) -> ApiResult<()> {
    state
        .portal
        .apply(|current| current.remove_material(&subject_id, &material_id))
        .await?;
    tracing::info!(%subject_id, %material_id, "Material deleted");
    success(())
}
