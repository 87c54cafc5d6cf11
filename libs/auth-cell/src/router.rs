use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/me", get(handlers::me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/register", post(handlers::register_patient))
        .route("/login", post(handlers::login))
        .merge(protected_routes)
        .with_state(state)
}

pub fn super_admin_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/login", post(handlers::super_admin_login))
        .with_state(state)
}
