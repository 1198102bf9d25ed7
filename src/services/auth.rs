//! Shared-secret authorization for mutating catalog routes.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use std::sync::Arc;
use tracing::warn;

use crate::errors::{AppError, CatalogError};

/// Dedicated header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// The process-wide admin secret, fixed at startup.
#[derive(Clone)]
pub struct AdminGate {
    secret: Arc<str>,
}

impl AdminGate {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// True only when the provided token is non-empty and equals the secret.
    pub fn authorize(&self, headers: &HeaderMap) -> bool {
        match provided_token(headers) {
            Some(token) => !self.secret.is_empty() && token == &*self.secret,
            None => false,
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").field("secret", &"<redacted>").finish()
    }
}

/// Extract the caller's token: a non-empty `Authorization: Bearer` value
/// wins, otherwise a non-empty `x-admin-token`.
pub fn provided_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|t| !t.is_empty())
    })
}

/// Extractor that rejects the request with 401 unless the admin gate passes.
///
/// Runs on request parts only, so a rejected request never reaches the
/// body (and never writes an upload).
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    AdminGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = AdminGate::from_ref(state);
        if gate.authorize(&parts.headers) {
            Ok(RequireAdmin)
        } else {
            warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                "rejected request with missing or invalid admin token"
            );
            Err(CatalogError::Unauthorized.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn bearer_header_is_checked_first() {
        let h = headers(&[("authorization", "Bearer abc"), ("x-admin-token", "xyz")]);
        assert_eq!(provided_token(&h), Some("abc"));
    }

    #[test]
    fn empty_bearer_falls_through_to_admin_header() {
        let h = headers(&[("authorization", "Bearer "), ("x-admin-token", "xyz")]);
        assert_eq!(provided_token(&h), Some("xyz"));

        let h = headers(&[("authorization", "Basic abc"), ("x-admin-token", "xyz")]);
        assert_eq!(provided_token(&h), Some("xyz"));
    }

    #[test]
    fn authorize_requires_exact_match() {
        let gate = AdminGate::new("s3cret");
        assert!(gate.authorize(&headers(&[("x-admin-token", "s3cret")])));
        assert!(gate.authorize(&headers(&[("authorization", "Bearer s3cret")])));
        assert!(!gate.authorize(&headers(&[("x-admin-token", "S3CRET")])));
        assert!(!gate.authorize(&headers(&[("x-admin-token", "s3cret ")])));
        assert!(!gate.authorize(&HeaderMap::new()));
    }

    #[test]
    fn wrong_bearer_is_not_rescued_by_admin_header() {
        let gate = AdminGate::new("s3cret");
        let h = headers(&[("authorization", "Bearer nope"), ("x-admin-token", "s3cret")]);
        assert!(!gate.authorize(&h));
    }

    #[test]
    fn empty_secret_never_authorizes() {
        let gate = AdminGate::new("");
        assert!(!gate.authorize(&headers(&[("x-admin-token", "")])));
        assert!(!gate.authorize(&headers(&[("x-admin-token", "anything")])));
    }

    #[test]
    fn debug_redacts_secret() {
        let gate = AdminGate::new("s3cret");
        assert!(!format!("{gate:?}").contains("s3cret"));
    }
}
