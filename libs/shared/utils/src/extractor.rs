use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use shared_config::AppConfig;
use shared_models::auth::AuthToken;
use shared_models::error::AppError;

use crate::jwt::{verify_token, AuthFailure};

/// Pull the bearer credential from the `token` cookie, falling back to the
/// `Authorization: Bearer` header.
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get("token") {
        return Ok(cookie.value().to_string());
    }

    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthenticated(AuthFailure::Missing.to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Invalid authorization header format".to_string()))?;

    let token = auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthenticated("Invalid authorization header format".to_string()))?;

    Ok(token.to_string())
}

/// Middleware guarding every protected route: verifies the credential and
/// attaches the `AuthUser` plus raw token to request extensions.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())?;

    let user = verify_token(&token, &config.jwt_secret)
        .map_err(|e| AppError::Unauthenticated(e.to_string()))?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(AuthToken(token));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{AUTHORIZATION, COOKIE};

    #[test]
    fn cookie_takes_precedence_over_header() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "token=from-cookie".parse().unwrap());
        headers.insert(AUTHORIZATION, "Bearer from-header".parse().unwrap());

        assert_eq!(extract_token(&headers).unwrap(), "from-cookie");
    }

    #[test]
    fn bearer_header_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());

        assert_eq!(extract_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_credential_is_unauthenticated() {
        let headers = HeaderMap::new();
        assert!(matches!(
            extract_token(&headers),
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(matches!(
            extract_token(&headers),
            Err(AppError::Unauthenticated(_))
        ));
    }
}
