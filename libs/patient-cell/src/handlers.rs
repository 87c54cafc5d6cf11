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

use crate::models::{CreatePatientRequest, PatientListQuery, UpdatePatientRequest};
use crate::services::directory::PatientDirectoryService;

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::CREATE_PATIENTS)?;

    let service = PatientDirectoryService::new(store);
    let patient = service.create(&actor, request, &token.0).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Patient created",
            "data": patient,
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::UPDATE_PATIENTS)?;

    let service = PatientDirectoryService::new(store);
    let patient = service.update(&actor, &patient_id, request, &token.0).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Patient updated",
        "data": patient,
    })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::VIEW_PATIENTS)?;

    let service = PatientDirectoryService::new(store);
    let patient = service
        .get(&patient_id, &token.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Patient fetched",
        "data": patient,
    })))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<PatientListQuery>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::VIEW_PATIENTS)?;

    let service = PatientDirectoryService::new(store);
    let patients = service.list(&query, &token.0).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Patients fetched",
        "data": {
            "patients": patients,
            "page": query.page.unwrap_or(1),
            "limit": query.limit.unwrap_or(20),
        },
    })))
}
