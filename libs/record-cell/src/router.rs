use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Record listing for back-office staff, mounted under
/// `/api/admin/medical-records`.
pub fn admin_record_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/getall", get(handlers::list_records))
        .route("/get/{record_id}", get(handlers::get_record))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// Report assembly, mounted under `/api/doctor/reports`.
pub fn doctor_report_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/download-report/{record_id}",
            get(handlers::download_report),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
