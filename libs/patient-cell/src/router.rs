use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Patient management surface, mounted under `/api/admin/patients`.
pub fn admin_patient_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/create", post(handlers::create_patient))
        .route("/get-all", get(handlers::list_patients))
        .route("/get/{patient_id}", get(handlers::get_patient))
        .route("/update/{patient_id}", patch(handlers::update_patient))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
