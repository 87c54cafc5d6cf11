use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::error::StoreError;
use shared_database::store::DocumentStore;
use shared_models::actor::Actor;
use shared_models::error::AppError;
use shared_utils::audit;
use shared_utils::password::hash_password;
use shared_utils::store::map_store_error;
use shared_utils::validate;

use crate::models::{
    CreateDoctorRequest, Doctor, DoctorListQuery, UpdateDoctorRequest, DOCTOR_STATUSES,
};

pub struct DoctorDirectoryService {
    store: Arc<DocumentStore>,
}

impl DoctorDirectoryService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateDoctorRequest,
        token: &str,
    ) -> Result<Doctor, AppError> {
        validate::require_str("name", &request.name)?;
        validate::validate_email("email", &request.email)?;
        validate::validate_phone("phone", &request.phone)?;
        validate::require_str("department", &request.department)?;
        validate::require_str("specialization", &request.specialization)?;
        validate::require_str("license_number", &request.license_number)?;
        if request.password.len() < 8 {
            return Err(AppError::Validation {
                field: "password".to_string(),
                reason: "must be at least 8 characters".to_string(),
            });
        }

        let email = request.email.trim().to_lowercase();
        self.reject_duplicates(&email, &request.license_number, None, token)
            .await?;

        let mut body = json!({
            "id": Uuid::new_v4().to_string(),
            "name": request.name.trim(),
            "email": email,
            "phone": request.phone,
            "password_hash": hash_password(&request.password)?,
            "department": request.department.trim(),
            "specialization": request.specialization.trim(),
            "license_number": request.license_number.trim(),
            "permissions": request.permissions,
            "avatar_url": request.avatar_url,
            "status": "active",
            "is_deleted": false,
        });
        audit::apply_stamp(&mut body, audit::creation_stamp(actor));

        let doctor: Doctor = self
            .store
            .insert("doctors", body, Some(token))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppError::Conflict(
                    "A doctor with this email or license number already exists".to_string(),
                ),
                other => map_store_error(other),
            })?;

        info!("Doctor {} created by {}", doctor.id, actor.id);
        Ok(doctor)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        doctor_id: &str,
        request: UpdateDoctorRequest,
        token: &str,
    ) -> Result<Doctor, AppError> {
        let existing = self
            .get(doctor_id, token)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

        let mut patch = json!({});
        if let Some(name) = &request.name {
            validate::require_str("name", name)?;
            patch["name"] = json!(name.trim());
        }
        if let Some(email) = &request.email {
            validate::validate_email("email", email)?;
        }
        if let Some(license_number) = &request.license_number {
            validate::require_str("license_number", license_number)?;
        }

        // The pre-check runs whenever either unique field changes, against
        // the incoming values.
        let email = request.email.as_ref().map(|e| e.trim().to_lowercase());
        let license_number = request
            .license_number
            .as_ref()
            .map(|l| l.trim().to_string());
        let email_changed = email.as_deref().is_some_and(|e| e != existing.email);
        let license_changed = license_number
            .as_deref()
            .is_some_and(|l| l != existing.license_number);
        if email_changed || license_changed {
            self.reject_duplicates(
                email.as_deref().unwrap_or(&existing.email),
                license_number.as_deref().unwrap_or(&existing.license_number),
                Some(doctor_id),
                token,
            )
            .await?;
        }
        if let Some(email) = email {
            patch["email"] = json!(email);
        }
        if let Some(license_number) = license_number {
            patch["license_number"] = json!(license_number);
        }
        if let Some(phone) = &request.phone {
            validate::validate_phone("phone", phone)?;
            patch["phone"] = json!(phone);
        }
        if let Some(department) = &request.department {
            validate::require_str("department", department)?;
            patch["department"] = json!(department.trim());
        }
        if let Some(specialization) = &request.specialization {
            validate::require_str("specialization", specialization)?;
            patch["specialization"] = json!(specialization.trim());
        }
        if let Some(permissions) = &request.permissions {
            patch["permissions"] = json!(permissions);
        }
        if let Some(avatar_url) = &request.avatar_url {
            patch["avatar_url"] = json!(avatar_url);
        }
        if let Some(status) = &request.status {
            validate::validate_enum("status", status, DOCTOR_STATUSES)?;
            patch["status"] = json!(status);
        }

        audit::apply_stamp(&mut patch, audit::update_stamp(actor));

        let doctor: Doctor = self
            .store
            .update_by_id("doctors", doctor_id, patch, Some(token))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppError::Conflict(
                    "A doctor with this email or license number already exists".to_string(),
                ),
                other => map_store_error(other),
            })?;

        info!("Doctor {} updated by {}", doctor.id, actor.id);
        Ok(doctor)
    }

    /// Soft delete only; the row stays behind the `is_deleted` flag.
    pub async fn soft_delete(
        &self,
        actor: &Actor,
        doctor_id: &str,
        token: &str,
    ) -> Result<(), AppError> {
        self.get(doctor_id, token)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

        let mut patch = json!({ "is_deleted": true, "status": "inactive" });
        audit::apply_stamp(&mut patch, audit::update_stamp(actor));

        let _: Doctor = self
            .store
            .update_by_id("doctors", doctor_id, patch, Some(token))
            .await
            .map_err(map_store_error)?;

        info!("Doctor {} soft-deleted by {}", doctor_id, actor.id);
        Ok(())
    }

    pub async fn get(&self, doctor_id: &str, token: &str) -> Result<Option<Doctor>, AppError> {
        debug!("Loading doctor {}", doctor_id);
        self.store
            .find_one(
                "doctors",
                &[
                    format!("id=eq.{}", doctor_id),
                    "is_deleted=eq.false".to_string(),
                ],
                Some(token),
            )
            .await
            .map_err(map_store_error)
    }

    pub async fn list(
        &self,
        query: &DoctorListQuery,
        token: &str,
    ) -> Result<Vec<Doctor>, AppError> {
        let limit = query.limit.unwrap_or(20).clamp(1, 100);
        let page = query.page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let mut filters = vec![
            "is_deleted=eq.false".to_string(),
            "order=created_at.desc".to_string(),
            format!("limit={}", limit),
            format!("offset={}", offset),
        ];

        if let Some(department) = &query.department {
            filters.push(format!("department=eq.{}", urlencoding::encode(department)));
        }
        if let Some(specialization) = &query.specialization {
            filters.push(format!(
                "specialization=eq.{}",
                urlencoding::encode(specialization)
            ));
        }
        if let Some(status) = &query.status {
            filters.push(format!("status=eq.{}", status));
        }
        if let Some(search) = &query.search {
            let pattern = urlencoding::encode(search.trim()).into_owned();
            filters.push(format!(
                "or=(name.ilike.*{}*,email.ilike.*{}*)",
                pattern, pattern
            ));
        }

        self.store
            .find("doctors", &filters, Some(token))
            .await
            .map_err(map_store_error)
    }

    async fn reject_duplicates(
        &self,
        email: &str,
        license_number: &str,
        exclude_id: Option<&str>,
        token: &str,
    ) -> Result<(), AppError> {
        let mut filters = vec![
            format!(
                "or=(email.eq.{},license_number.eq.{})",
                urlencoding::encode(email),
                urlencoding::encode(license_number)
            ),
            "is_deleted=eq.false".to_string(),
            "select=id".to_string(),
        ];
        if let Some(id) = exclude_id {
            filters.push(format!("id=neq.{}", id));
        }

        let existing: Option<Value> = self
            .store
            .find_one("doctors", &filters, Some(token))
            .await
            .map_err(map_store_error)?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "A doctor with this email or license number already exists".to_string(),
            ));
        }
        Ok(())
    }
}
