use std::sync::Arc;

use tracing::{error, info};

use record_cell::models::NewMedicalRecord;
use record_cell::services::records::MedicalRecordService;
use shared_database::store::DocumentStore;
use shared_models::actor::Actor;

use crate::models::Prescription;

/// Creates the medical record that accompanies every prescription.
///
/// The fan-out is not transactional: the prescription write has already
/// committed when this runs, and a failure here leaves a prescription with
/// no record. That window is accepted; the failure is logged at error level
/// and the prescription response still succeeds.
pub struct RecordCascade {
    records: MedicalRecordService,
}

impl RecordCascade {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            records: MedicalRecordService::new(store),
        }
    }

    pub async fn run(&self, actor: &Actor, prescription: &Prescription, auth_token: &str) {
        let input = NewMedicalRecord {
            patient_id: prescription.patient_id.clone(),
            appointment_id: prescription.appointment_id.clone(),
            prescription_id: prescription.id.clone(),
            details: prescription.diagnosis.clone(),
            notes: prescription.advice.clone(),
        };

        match self.records.create(actor, input, auth_token).await {
            Ok(record) => {
                info!(
                    "Cascaded medical record {} from prescription {}",
                    record.id, prescription.id
                );
            }
            Err(e) => {
                error!(
                    "Medical record cascade failed for prescription {}: {}",
                    prescription.id, e
                );
            }
        }
    }
}
