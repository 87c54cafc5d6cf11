use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::store::DocumentStore;
use shared_models::actor::capability;
use shared_models::auth::{AuthToken, AuthUser};
use shared_models::error::AppError;
use shared_utils::resolver::resolve_actor;

use crate::models::{CreateDoctorRequest, DoctorListQuery, UpdateDoctorRequest};
use crate::services::directory::DoctorDirectoryService;

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::CREATE_DOCTORS)?;

    let service = DoctorDirectoryService::new(store);
    let doctor = service.create(&actor, request, &token.0).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Doctor created",
            "data": doctor,
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DoctorListQuery>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::VIEW_DOCTORS)?;

    let service = DoctorDirectoryService::new(store);
    let doctors = service.list(&query, &token.0).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctors fetched",
        "data": {
            "doctors": doctors,
            "page": query.page.unwrap_or(1),
            "limit": query.limit.unwrap_or(20),
        },
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::VIEW_DOCTORS)?;

    let service = DoctorDirectoryService::new(store);
    let doctor = service
        .get(&doctor_id, &token.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor fetched",
        "data": doctor,
    })))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::UPDATE_DOCTORS)?;

    let service = DoctorDirectoryService::new(store);
    let doctor = service.update(&actor, &doctor_id, request, &token.0).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor updated",
        "data": doctor,
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::DELETE_DOCTORS)?;

    let service = DoctorDirectoryService::new(store);
    service.soft_delete(&actor, &doctor_id, &token.0).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor deleted",
    })))
}
