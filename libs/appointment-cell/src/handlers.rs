use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::store::DocumentStore;
use shared_models::auth::{AuthToken, AuthUser};
use shared_models::error::AppError;
use shared_utils::resolver::resolve_actor;

use crate::models::{AppointmentListQuery, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::services::scheduler::AppointmentSchedulingService;

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;

    let service = AppointmentSchedulingService::new(&state);
    let appointment = service.create_appointment(&actor, request, &token.0).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Appointment booked",
            "data": appointment,
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;

    let service = AppointmentSchedulingService::new(&state);
    let appointment = service
        .update_appointment(&actor, &appointment_id, request, &token.0)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment updated",
        "data": appointment,
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;

    let service = AppointmentSchedulingService::new(&state);
    let appointment = service
        .get_appointment(&actor, &appointment_id, &token.0)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment fetched",
        "data": appointment,
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AppointmentListQuery>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;

    let service = AppointmentSchedulingService::new(&state);
    let appointments = service.list_appointments(&actor, &query, &token.0).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointments fetched",
        "data": {
            "appointments": appointments,
            "page": query.page.unwrap_or(1),
            "limit": query.limit.unwrap_or(20),
        },
    })))
}
