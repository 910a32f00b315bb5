// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token middleware for the manual send route.
//!
//! When no token is configured every request is rejected (fail-closed).

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Authentication configuration for protected routes.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Expected bearer token. `None` disables the protected routes.
    pub bearer_token: Option<String>,
}

impl AuthConfig {
    pub fn new(bearer_token: Option<String>) -> Self {
        Self { bearer_token }
    }

    fn accepts(&self, header: Option<&str>) -> bool {
        match (&self.bearer_token, header.and_then(|v| v.strip_prefix("Bearer "))) {
            (Some(expected), Some(token)) => token == expected,
            _ => false,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Rejects requests without `Authorization: Bearer <token>` matching the
/// configured token.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth.bearer_token.is_none() {
        tracing::warn!("send token not configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let header = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok());

    if auth.accepts(header) {
        Ok(next.run(request).await)
    } else {
        tracing::debug!("bearer token rejected");
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_token_is_accepted() {
        let auth = AuthConfig::new(Some("s3cret".to_string()));
        assert!(auth.accepts(Some("Bearer s3cret")));
    }

    #[test]
    fn wrong_or_missing_token_is_rejected() {
        let auth = AuthConfig::new(Some("s3cret".to_string()));
        assert!(!auth.accepts(Some("Bearer other")));
        assert!(!auth.accepts(Some("s3cret")));
        assert!(!auth.accepts(None));
    }

    #[test]
    fn unconfigured_rejects_everything() {
        let auth = AuthConfig::default();
        assert!(!auth.accepts(Some("Bearer ")));
        assert!(!auth.accepts(None));
    }

    #[test]
    fn debug_redacts_token() {
        let auth = AuthConfig::new(Some("s3cret".to_string()));
        let debug_output = format!("{auth:?}");
        assert!(!debug_output.contains("s3cret"));
        assert!(debug_output.contains("[redacted]"));
    }
}
