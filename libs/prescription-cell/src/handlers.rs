use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::store::DocumentStore;
use shared_models::auth::{AuthToken, AuthUser};
use shared_models::error::AppError;
use shared_utils::resolver::resolve_actor;

use crate::models::{CreatePrescriptionRequest, PrescriptionListQuery};
use crate::services::prescribing::PrescribingService;

#[axum::debug_handler]
pub async fn create_prescription(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;

    let service = PrescribingService::new(store);
    let prescription = service.create(&actor, request, &token.0).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Prescription created",
            "data": prescription,
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_prescriptions(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<PrescriptionListQuery>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;

    let service = PrescribingService::new(store);
    let prescriptions = service.list(&actor, &query, &token.0).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Prescriptions fetched",
        "data": {
            "prescriptions": prescriptions,
            "page": query.page.unwrap_or(1),
            "limit": query.limit.unwrap_or(20),
        },
    })))
}
