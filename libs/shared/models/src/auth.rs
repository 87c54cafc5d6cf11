use serde::{Deserialize, Serialize};

use crate::actor::Role;

/// Claims carried inside the signed bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
}

/// Verified principal attached to request extensions by the auth middleware.
/// Resolution against the live actor record happens separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
    pub permissions: Vec<String>,
}

/// Raw credential forwarded to the document store on behalf of the caller.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);
