use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::actor::Role;
use shared_models::auth::{AuthUser, JwtClaims};

type HmacSha256 = Hmac<Sha256>;

/// Credential verification failure kinds. The middleware maps each to a
/// distinct 401 message so clients can tell "log in" from "log in again".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Authentication required, please log in")]
    Missing,

    #[error("Session expired, please log in again")]
    Expired,

    #[error("Invalid authentication token")]
    Malformed,
}

/// Verify an HS256 bearer token and extract the acting principal.
pub fn verify_token(token: &str, jwt_secret: &str) -> Result<AuthUser, AuthFailure> {
    if token.is_empty() {
        return Err(AuthFailure::Missing);
    }
    if jwt_secret.is_empty() {
        debug!("JWT secret is not set");
        return Err(AuthFailure::Malformed);
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthFailure::Malformed);
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|e| {
            debug!("Failed to decode signature: {}", e);
            AuthFailure::Malformed
        })?;

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| AuthFailure::Malformed)?;
    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(AuthFailure::Malformed);
    }

    let claims_bytes = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| AuthFailure::Malformed)?;

    let claims: JwtClaims = serde_json::from_slice(&claims_bytes).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        AuthFailure::Malformed
    })?;

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err(AuthFailure::Expired);
        }
    }

    let role = Role::parse(&claims.role).ok_or(AuthFailure::Malformed)?;

    let user = AuthUser {
        id: claims.sub,
        role,
        permissions: claims.permissions,
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}

/// Sign a bearer token for a freshly authenticated actor. Same HS256
/// primitives as `verify_token`.
pub fn issue_token(
    subject: &str,
    role: Role,
    permissions: &[String],
    jwt_secret: &str,
    ttl_hours: i64,
) -> Result<String, AuthFailure> {
    if jwt_secret.is_empty() {
        return Err(AuthFailure::Malformed);
    }

    let now = Utc::now();
    let exp = now + Duration::hours(ttl_hours);

    let header = json!({ "alg": "HS256", "typ": "JWT" });
    let claims = json!({
        "sub": subject,
        "role": role.to_string(),
        "permissions": permissions,
        "iat": now.timestamp(),
        "exp": exp.timestamp(),
    });

    let header_bytes = serde_json::to_vec(&header).map_err(|_| AuthFailure::Malformed)?;
    let claims_bytes = serde_json::to_vec(&claims).map_err(|_| AuthFailure::Malformed)?;

    let header_b64 = URL_SAFE_NO_PAD.encode(header_bytes);
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims_bytes);
    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| AuthFailure::Malformed)?;
    mac.update(signing_input.as_bytes());
    let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature_b64))
}
