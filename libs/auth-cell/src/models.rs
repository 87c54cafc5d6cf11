use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterPatientRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// One of "admin", "doctor", "patient". Super-admin logs in on its own
    /// endpoint.
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct SuperAdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Stored credential row, common across the role collections. Patients carry
/// no permission array, so it defaults to empty.
#[derive(Debug, Deserialize)]
pub struct CredentialRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}
