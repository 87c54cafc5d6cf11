use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::store::DocumentStore;
use shared_models::actor::capability;
use shared_models::auth::{AuthToken, AuthUser};
use shared_models::error::AppError;
use shared_utils::resolver::resolve_actor;

use crate::models::RecordListQuery;
use crate::services::records::MedicalRecordService;
use crate::services::reports::ReportAssemblyService;

#[axum::debug_handler]
pub async fn list_records(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<RecordListQuery>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::VIEW_MEDICAL_RECORDS)?;

    let service = MedicalRecordService::new(store);
    let records = service.list(&query, &token.0).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Medical records fetched",
        "data": {
            "records": records,
            "page": query.page.unwrap_or(1),
            "limit": query.limit.unwrap_or(20),
        },
    })))
}

#[axum::debug_handler]
pub async fn get_record(
    State(state): State<Arc<AppConfig>>,
    Path(record_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::VIEW_MEDICAL_RECORDS)?;

    let service = MedicalRecordService::new(store);
    let record = service
        .get(&record_id, &token.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Medical record not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Medical record fetched",
        "data": record,
    })))
}

#[axum::debug_handler]
pub async fn download_report(
    State(state): State<Arc<AppConfig>>,
    Path(record_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(DocumentStore::new(&state));
    let actor = resolve_actor(&store, &user, &token.0).await?;
    actor.require(capability::DOWNLOAD_REPORTS)?;

    let service = ReportAssemblyService::new(store);
    let report = service.assemble(&record_id, &token.0).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Report assembled",
        "data": report,
    })))
}
