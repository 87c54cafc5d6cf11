use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::actor::{Actor, Role};
use shared_models::auth::AuthUser;

use crate::jwt::issue_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub store_url: String,
    pub store_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            store_url: "http://localhost:54321".to_string(),
            store_api_key: "test-api-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_store_url(url: &str) -> Self {
        Self {
            store_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_api_key: self.store_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            environment: "test".to_string(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub role: Role,
    pub permissions: Vec<String>,
}

impl TestUser {
    pub fn new(role: Role, permissions: &[&str]) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn admin() -> Self {
        Self::new(Role::Admin, &[])
    }

    pub fn super_admin() -> Self {
        Self::new(Role::SuperAdmin, &[])
    }

    pub fn doctor(permissions: &[&str]) -> Self {
        Self::new(Role::Doctor, permissions)
    }

    pub fn patient() -> Self {
        Self::new(Role::Patient, &[])
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id.clone(),
            role: self.role,
            permissions: self.permissions.clone(),
        }
    }

    pub fn to_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role, self.permissions.clone())
    }

    pub fn token(&self, secret: &str) -> String {
        issue_token(&self.id, self.role, &self.permissions, secret, 24)
            .expect("test token should sign")
    }
}

/// Canned store rows for wiremock-backed tests.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn doctor_row(id: &str, email: &str, name: &str, department: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "email": email,
            "phone": "4155550173",
            "department": department,
            "specialization": "General Practice",
            "license_number": "LIC-1001",
            "status": "active",
            "permissions": ["create_prescription", "update_appointments"],
            "avatar_url": "https://cdn.example.com/avatars/doctor.png",
            "is_deleted": false,
            "created_by": id,
            "created_by_model": "Admin",
            "created_at": "2026-01-10T09:00:00Z",
            "updated_by": id,
            "updated_by_model": "Admin",
            "updated_at": "2026-01-10T09:00:00Z",
        })
    }

    pub fn patient_row(id: &str, email: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "email": email,
            "phone": "4155550199",
            "gender": "female",
            "blood_group": "O+",
            "address": "12 Harbor St",
            "avatar_url": "https://cdn.example.com/avatars/default-patient.png",
            "status": "active",
            "is_deleted": false,
            "created_by": id,
            "created_by_model": "Patient",
            "created_at": "2026-01-12T10:00:00Z",
            "updated_by": id,
            "updated_by_model": "Patient",
            "updated_at": "2026-01-12T10:00:00Z",
        })
    }

    pub fn appointment_row(
        id: &str,
        doctor_id: &str,
        patient_id: &str,
        date: &str,
        time_slot: &str,
        status: &str,
    ) -> Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "date": date,
            "time_slot": time_slot,
            "status": status,
            "reason": "Routine checkup",
            "notes": null,
            "is_deleted": false,
            "created_by": "admin-1",
            "created_by_model": "Admin",
            "created_at": "2026-02-01T08:00:00Z",
            "updated_by": "admin-1",
            "updated_by_model": "Admin",
            "updated_at": "2026-02-01T08:00:00Z",
        })
    }

    pub fn prescription_row(
        id: &str,
        appointment_id: &str,
        doctor_id: &str,
        patient_id: &str,
    ) -> Value {
        json!({
            "id": id,
            "appointment_id": appointment_id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "medicines": [{
                "name": "Ibuprofen",
                "dosage": "200mg",
                "frequency": "2x/day",
                "duration": "5d",
                "instructions": "After meals",
            }],
            "diagnosis": "Tension headache",
            "advice": "Hydrate, rest",
            "follow_up_date": null,
            "is_deleted": false,
            "created_by": doctor_id,
            "created_by_model": "Doctor",
            "created_at": "2026-02-05T15:30:00Z",
            "updated_by": doctor_id,
            "updated_by_model": "Doctor",
            "updated_at": "2026-02-05T15:30:00Z",
        })
    }

    pub fn medical_record_row(
        id: &str,
        patient_id: &str,
        appointment_id: &str,
        prescription_id: &str,
    ) -> Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "appointment_id": appointment_id,
            "prescription_id": prescription_id,
            "details": "Tension headache",
            "notes": "Hydrate, rest",
            "status": "active",
            "is_deleted": false,
            "created_by": "doc-1",
            "created_by_model": "Doctor",
            "created_at": "2026-02-05T15:30:01Z",
            "updated_by": "doc-1",
            "updated_by_model": "Doctor",
            "updated_at": "2026-02-05T15:30:01Z",
        })
    }
}
