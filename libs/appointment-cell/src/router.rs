use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Scheduling surface for back-office staff, mounted under
/// `/api/admin/appointments`.
pub fn admin_appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/create", post(handlers::create_appointment))
        .route("/get-all", get(handlers::list_appointments))
        .route("/get/{appointment_id}", get(handlers::get_appointment))
        .route("/update/{appointment_id}", put(handlers::update_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// A doctor's own schedule, mounted under `/api/doctor/appointments`.
/// Ownership scoping happens in the service layer.
pub fn doctor_appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/get-all", get(handlers::list_appointments))
        .route("/get/{appointment_id}", get(handlers::get_appointment))
        .route(
            "/update/{appointment_id}",
            patch(handlers::update_appointment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
