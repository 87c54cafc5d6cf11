use chrono::Utc;
use serde_json::{json, Value};

use shared_models::actor::Actor;

/// Audit fields written once at creation. `created_*` is never overwritten
/// afterwards.
pub fn creation_stamp(actor: &Actor) -> Value {
    let now = Utc::now();
    json!({
        "created_by": actor.id,
        "created_by_model": actor.role.label(),
        "created_at": now,
        "updated_by": actor.id,
        "updated_by_model": actor.role.label(),
        "updated_at": now,
    })
}

/// Audit fields refreshed on every mutation.
pub fn update_stamp(actor: &Actor) -> Value {
    json!({
        "updated_by": actor.id,
        "updated_by_model": actor.role.label(),
        "updated_at": Utc::now(),
    })
}

/// Merge stamp fields into a JSON object payload about to be persisted.
pub fn apply_stamp(payload: &mut Value, stamp: Value) {
    if let (Some(target), Some(fields)) = (payload.as_object_mut(), stamp.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}
