use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::{admin_appointment_routes, doctor_appointment_routes};
use auth_cell::router::{auth_routes, super_admin_routes};
use doctor_cell::router::admin_doctor_routes;
use patient_cell::router::admin_patient_routes;
use prescription_cell::router::doctor_prescription_routes;
use record_cell::router::{admin_record_routes, doctor_report_routes};
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Hospital management API is running!" }))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/super-admin", super_admin_routes(state.clone()))
        .nest("/api/admin/doctors", admin_doctor_routes(state.clone()))
        .nest("/api/admin/patients", admin_patient_routes(state.clone()))
        .nest(
            "/api/admin/appointments",
            admin_appointment_routes(state.clone()),
        )
        .nest(
            "/api/admin/medical-records",
            admin_record_routes(state.clone()),
        )
        .nest(
            "/api/doctor/appointments",
            doctor_appointment_routes(state.clone()),
        )
        .nest(
            "/api/doctor/prescriptions",
            doctor_prescription_routes(state.clone()),
        )
        .nest("/api/doctor/reports", doctor_report_routes(state))
}
