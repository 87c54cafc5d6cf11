use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Doctor management surface, mounted under `/api/admin/doctors`.
pub fn admin_doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/create", post(handlers::create_doctor))
        .route("/get-all", get(handlers::list_doctors))
        .route("/get/{doctor_id}", get(handlers::get_doctor))
        .route("/update/{doctor_id}", patch(handlers::update_doctor))
        .route("/delete/{doctor_id}", delete(handlers::delete_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
