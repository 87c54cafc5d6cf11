use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus};

/// Status transitions are driven entirely by the caller-supplied status
/// value; there is no automatic expiry or time-based transition.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// All valid next statuses for a given current status.
    pub fn allowed_transitions(&self, current: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Scheduled | AppointmentStatus::Pending => vec![
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            AppointmentStatus::Confirmed => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            // Terminal states
            AppointmentStatus::Completed
            | AppointmentStatus::Cancelled
            | AppointmentStatus::NoShow => vec![],
        }
    }

    /// Re-asserting the current status is a no-op, not a transition.
    pub fn validate_status_transition(
        &self,
        current: &AppointmentStatus,
        next: &AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition {} -> {}", current, next);

        if current == next {
            return Ok(());
        }

        if !self.allowed_transitions(current).contains(next) {
            warn!("Invalid status transition attempted: {} -> {}", current, next);
            return Err(AppointmentError::InvalidStatusTransition {
                from: *current,
                to: *next,
            });
        }

        Ok(())
    }

    /// Statuses an appointment may be created with.
    pub fn validate_initial_status(
        &self,
        status: &AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        match status {
            AppointmentStatus::Scheduled
            | AppointmentStatus::Pending
            | AppointmentStatus::Confirmed => Ok(()),
            other => Err(AppointmentError::InvalidStatusTransition {
                from: AppointmentStatus::Scheduled,
                to: *other,
            }),
        }
    }

    /// Scheduling into the past is rejected; `today` is the caller's local
    /// calendar day so the rule stays testable.
    pub fn ensure_schedulable_date(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), AppointmentError> {
        if date < today {
            return Err(AppointmentError::PastDate);
        }
        Ok(())
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
