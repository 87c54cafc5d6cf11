use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::DocumentStore;
use shared_models::actor::{Actor, Role};
use shared_models::auth::{AuthToken, AuthUser};
use shared_models::error::AppError;
use shared_utils::audit;
use shared_utils::jwt::issue_token;
use shared_utils::store::map_store_error;
use shared_utils::validate;

use patient_cell::models::{Patient, DEFAULT_AVATAR_URL};

use crate::models::{
    CredentialRecord, LoginData, LoginRequest, RegisterPatientRequest, SuperAdminLoginRequest,
    UserSummary,
};
use shared_utils::password::{hash_password, verify_password};
use shared_utils::resolver::resolve_actor;

const TOKEN_TTL_HOURS: i64 = 24;

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(("token", token.to_string()))
        .path("/")
        .http_only(true)
        .build()
}

/// Patient self-registration. Creates an active patient record with the
/// default avatar when none is supplied.
#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RegisterPatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate::require_str("name", &request.name)?;
    validate::validate_email("email", &request.email)?;
    validate::validate_phone("phone", &request.phone)?;
    if request.password.len() < 8 {
        return Err(AppError::Validation {
            field: "password".to_string(),
            reason: "must be at least 8 characters".to_string(),
        });
    }

    let store = DocumentStore::new(&state);
    let email = request.email.trim().to_lowercase();

    let existing: Option<Value> = store
        .find_one(
            "patients",
            &[
                format!("email=eq.{}", urlencoding::encode(&email)),
                "is_deleted=eq.false".to_string(),
                "select=id".to_string(),
            ],
            None,
        )
        .await
        .map_err(map_store_error)?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let password_hash = hash_password(&request.password)?;
    let avatar_url = request
        .avatar_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string());

    let mut body = json!({
        "id": id,
        "name": request.name.trim(),
        "email": email,
        "phone": request.phone,
        "password_hash": password_hash,
        "gender": request.gender,
        "address": request.address,
        "avatar_url": avatar_url,
        "status": "active",
        "is_deleted": false,
    });

    // Self-registration: the patient is their own creator.
    let actor = Actor::new(id.clone(), Role::Patient, vec![]);
    audit::apply_stamp(&mut body, audit::creation_stamp(&actor));

    let patient: Patient = store
        .insert("patients", body, None)
        .await
        .map_err(|e| match e {
            shared_database::error::StoreError::Conflict(_) => AppError::Conflict(
                "An account with this email already exists".to_string(),
            ),
            other => map_store_error(other),
        })?;

    info!("Registered patient {}", patient.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration successful",
            "data": patient,
        })),
    ))
}

async fn authenticate(
    state: &AppConfig,
    role: Role,
    email: &str,
    password: &str,
) -> Result<LoginData, AppError> {
    let store = DocumentStore::new(state);
    let email = email.trim().to_lowercase();

    let filters = vec![
        format!("email=eq.{}", urlencoding::encode(&email)),
        "is_deleted=eq.false".to_string(),
        "status=eq.active".to_string(),
        "select=id,name,email,password_hash,permissions".to_string(),
    ];

    let record: Option<CredentialRecord> = store
        .find_one(role.collection(), &filters, None)
        .await
        .map_err(map_store_error)?;

    let record = match record {
        Some(record) => record,
        None => {
            warn!("Login failed for unknown {} account", role);
            return Err(AppError::Unauthenticated(
                "Invalid email or password".to_string(),
            ));
        }
    };

    if !verify_password(password, &record.password_hash) {
        warn!("Login failed for {} {}", role, record.id);
        return Err(AppError::Unauthenticated(
            "Invalid email or password".to_string(),
        ));
    }

    let token = issue_token(
        &record.id,
        role,
        &record.permissions,
        &state.jwt_secret,
        TOKEN_TTL_HOURS,
    )
    .map_err(|e| AppError::Internal(e.to_string()))?;

    info!("{} {} logged in", role, record.id);

    Ok(LoginData {
        token,
        user: UserSummary {
            id: record.id,
            name: record.name,
            email: record.email,
            role: role.to_string(),
        },
    })
}

/// Role login for admin/doctor/patient accounts.
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let role = Role::parse(&request.role)
        .filter(|role| *role != Role::SuperAdmin)
        .ok_or_else(|| AppError::BadRequest("Unknown login role".to_string()))?;

    let data = authenticate(&state, role, &request.email, &request.password).await?;
    let jar = jar.add(session_cookie(&data.token));

    Ok((
        jar,
        Json(json!({
            "success": true,
            "message": "Login successful",
            "data": data,
        })),
    ))
}

/// Super-admin login on its dedicated endpoint.
#[axum::debug_handler]
pub async fn super_admin_login(
    State(state): State<Arc<AppConfig>>,
    jar: CookieJar,
    Json(request): Json<SuperAdminLoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let data = authenticate(&state, Role::SuperAdmin, &request.email, &request.password).await?;
    let jar = jar.add(session_cookie(&data.token));

    Ok((
        jar,
        Json(json!({
            "success": true,
            "message": "Login successful",
            "data": data,
        })),
    ))
}

/// Resolved profile of the calling actor.
#[axum::debug_handler]
pub async fn me(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, AppError> {
    debug!("Fetching profile for {}", user.id);

    let store = DocumentStore::new(&state);
    let actor = resolve_actor(&store, &user, &token.0).await?;

    let mut permissions: Vec<String> = actor.permissions.iter().cloned().collect();
    permissions.sort();

    Ok(Json(json!({
        "success": true,
        "message": "Profile fetched",
        "data": {
            "id": actor.id,
            "role": actor.role.to_string(),
            "permissions": permissions,
        },
    })))
}
