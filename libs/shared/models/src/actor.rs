use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Capability strings stored in Doctor/Admin permission arrays. Flat
/// allow-list: membership test only, no hierarchy or wildcards.
pub mod capability {
    pub const CREATE_DOCTORS: &str = "create_doctors";
    pub const VIEW_DOCTORS: &str = "view_doctors";
    pub const UPDATE_DOCTORS: &str = "update_doctors";
    pub const DELETE_DOCTORS: &str = "delete_doctors";

    pub const CREATE_PATIENTS: &str = "create_patients";
    pub const VIEW_PATIENTS: &str = "view_patients";
    pub const UPDATE_PATIENTS: &str = "update_patients";

    pub const CREATE_APPOINTMENTS: &str = "create_appointments";
    pub const VIEW_APPOINTMENTS: &str = "view_appointments";
    pub const UPDATE_APPOINTMENTS: &str = "update_appointments";

    pub const CREATE_PRESCRIPTION: &str = "create_prescription";
    pub const VIEW_PRESCRIPTIONS: &str = "view_prescriptions";

    pub const VIEW_MEDICAL_RECORDS: &str = "view_medical_records";
    pub const DOWNLOAD_REPORTS: &str = "download_reports";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Doctor,
    Patient,
}

impl Role {
    /// Store collection backing this role's actor records.
    pub fn collection(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admins",
            Role::Admin => "admins",
            Role::Doctor => "doctors",
            Role::Patient => "patients",
        }
    }

    /// Label written into audit fields (`created_by_model`/`updated_by_model`).
    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::Admin => "Admin",
            Role::Doctor => "Doctor",
            Role::Patient => "Patient",
        }
    }

    /// SuperAdmin and Admin skip the permission-array check entirely.
    pub fn bypasses_permissions(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "super_admin" | "superadmin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "doctor" => Some(Role::Doctor),
            "patient" => Some(Role::Patient),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "super_admin"),
            Role::Admin => write!(f, "admin"),
            Role::Doctor => write!(f, "doctor"),
            Role::Patient => write!(f, "patient"),
        }
    }
}

/// A resolved, active principal: identity plus role plus stored capability set.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub role: Role,
    pub permissions: HashSet<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role, permissions: Vec<String>) -> Self {
        Self {
            id: id.into(),
            role,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Authorization gate: allow iff the role bypasses permissions or the
    /// capability string is an exact member of the stored set.
    pub fn can(&self, capability: &str) -> bool {
        self.role.bypasses_permissions() || self.permissions.contains(capability)
    }

    pub fn require(&self, capability: &str) -> Result<(), AppError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Missing '{}' permission",
                capability
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor_with(perms: &[&str]) -> Actor {
        Actor::new(
            "d-1",
            Role::Doctor,
            perms.iter().map(|p| p.to_string()).collect(),
        )
    }

    #[test]
    fn admin_roles_bypass_permission_list() {
        let admin = Actor::new("a-1", Role::Admin, vec![]);
        let super_admin = Actor::new("s-1", Role::SuperAdmin, vec![]);

        assert!(admin.can(capability::CREATE_DOCTORS));
        assert!(admin.can("anything_at_all"));
        assert!(super_admin.can(capability::UPDATE_APPOINTMENTS));
    }

    #[test]
    fn doctor_needs_exact_capability_string() {
        let doctor = doctor_with(&[capability::CREATE_PRESCRIPTION]);

        assert!(doctor.can(capability::CREATE_PRESCRIPTION));
        assert!(!doctor.can(capability::UPDATE_APPOINTMENTS));
        // No prefix/wildcard matching.
        assert!(!doctor.can("create_prescription_extra"));
        assert!(!doctor.can("create"));
    }

    #[test]
    fn patient_without_permissions_is_denied() {
        let patient = Actor::new("p-1", Role::Patient, vec![]);
        assert!(!patient.can(capability::VIEW_DOCTORS));
        assert!(patient.require(capability::VIEW_DOCTORS).is_err());
    }

    #[test]
    fn role_parse_accepts_both_super_admin_spellings() {
        assert_eq!(Role::parse("super_admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("superadmin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("nurse"), None);
    }
}
