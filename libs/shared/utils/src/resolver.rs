use serde::Deserialize;
use tracing::{debug, warn};

use shared_database::store::DocumentStore;
use shared_models::actor::Actor;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::store::map_store_error;

/// Minimal actor row loaded during resolution.
#[derive(Debug, Deserialize)]
struct ActorRecord {
    id: String,
    #[serde(default)]
    permissions: Vec<String>,
}

/// Load the acting user's live record and confirm it is still active. Fails
/// closed with `Forbidden` (distinct from the 401 the middleware produces)
/// when the actor is gone, soft-deleted or inactive. The permission set comes
/// from the stored record, not the token, so revocations take effect
/// immediately.
pub async fn resolve_actor(
    store: &DocumentStore,
    user: &AuthUser,
    token: &str,
) -> Result<Actor, AppError> {
    debug!("Resolving {} actor {}", user.role, user.id);

    let filters = vec![
        format!("id=eq.{}", user.id),
        "is_deleted=eq.false".to_string(),
        "status=eq.active".to_string(),
        "select=id,permissions".to_string(),
    ];

    let record: Option<ActorRecord> = store
        .find_one(user.role.collection(), &filters, Some(token))
        .await
        .map_err(map_store_error)?;

    let record = record.ok_or_else(|| {
        warn!("Actor {} ({}) missing or inactive", user.id, user.role);
        AppError::Forbidden("Account is inactive or no longer exists".to_string())
    })?;

    Ok(Actor::new(record.id, user.role, record.permissions))
}
