use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::config::AccessConfig;

/// Signed-in check in front of the roster API.
///
/// Without a configured token every request is treated as signed in.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    token: Option<Arc<str>>,
}

impl AccessGate {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(Arc::from(token.into())),
        }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        match &config.token {
            Some(token) => Self::with_token(token.clone()),
            None => Self::open(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.token.is_none()
    }

    /// `authorization` is the raw `Authorization` header value.
    pub fn permits(&self, authorization: Option<&str>) -> bool {
        let Some(expected) = self.token.as_deref() else {
            return true;
        };

        authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .is_some_and(|presented| presented == expected)
    }
}

pub async fn require_session(State(gate): State<AccessGate>, req: Request, next: Next) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if gate.permits(authorization) {
        return next.run(req).await;
    }

    warn!(uri = %req.uri(), "rejected request without a valid session token");
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "sign in required" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_gate_permits_everything() {
        let gate = AccessGate::open();
        assert!(gate.is_open());
        assert!(gate.permits(None));
        assert!(gate.permits(Some("Bearer anything")));
    }

    #[test]
    fn token_gate_requires_matching_bearer() {
        let gate = AccessGate::from_config(&AccessConfig {
            token: Some("pab-2025".to_string()),
        });
        assert!(!gate.is_open());
        assert!(gate.permits(Some("Bearer pab-2025")));
        assert!(!gate.permits(Some("Bearer wrong")));
        assert!(!gate.permits(Some("pab-2025")));
        assert!(!gate.permits(None));
    }
}
