use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use shared_database::store::DocumentStore;

use crate::models::AppointmentError;

/// Double-booking pre-check for a doctor's exact (date, time-slot) tuple.
///
/// This is a UX optimization, not the enforcement mechanism: two concurrent
/// writers can both pass this check before either commits. The store's
/// partial unique index on (doctor_id, date, time_slot) where
/// is_deleted=false is what actually preserves the invariant; a violation
/// there surfaces as a Conflict on the write.
pub struct SlotConflictService {
    store: Arc<DocumentStore>,
}

impl SlotConflictService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// True when another non-deleted appointment already occupies the slot,
    /// excluding the appointment currently being updated (if any).
    pub async fn has_conflict(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        time_slot: &str,
        exclude_appointment_id: Option<&str>,
        auth_token: &str,
    ) -> Result<bool, AppointmentError> {
        debug!(
            "Checking slot conflict for doctor {} on {} at {}",
            doctor_id, date, time_slot
        );

        let mut query_parts = vec![
            format!("doctor_id=eq.{}", doctor_id),
            format!("date=eq.{}", date),
            format!("time_slot=eq.{}", urlencoding::encode(time_slot)),
            "is_deleted=eq.false".to_string(),
            "select=id".to_string(),
        ];

        if let Some(exclude_id) = exclude_appointment_id {
            query_parts.push(format!("id=neq.{}", exclude_id));
        }

        let occupied: Vec<Value> = self
            .store
            .find("appointments", &query_parts, Some(auth_token))
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let has_conflict = !occupied.is_empty();
        if has_conflict {
            warn!(
                "Slot conflict for doctor {} on {} at {}",
                doctor_id, date, time_slot
            );
        }

        Ok(has_conflict)
    }
}
