//! Session verification and the `Caller` extractor.
//!
//! Session tokens are RS256 JWTs issued by the identity provider. They are
//! verified locally against the provider's PEM public key; no network call.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;

/// Subscription plan of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Free,
    Premium,
}

impl Plan {
    /// Maps the provider's active-plan claim. Both the bare slug and the
    /// user-scoped form (`u:premium`) count as premium.
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim.map(str::trim) {
            Some("premium") | Some("u:premium") => Plan::Premium,
            _ => Plan::Free,
        }
    }

    pub fn is_premium(self) -> bool {
        self == Plan::Premium
    }
}

/// The authenticated user making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub plan: Plan,
}

pub trait SessionVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Caller, AppError>;
}

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    pla: Option<String>,
}

pub struct ClerkSessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl ClerkSessionVerifier {
    pub fn from_pem(pem: &str) -> anyhow::Result<Self> {
        // Keys pasted into a single-line env var usually carry literal "\n".
        let pem = pem.replace("\\n", "\n");
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self { key, validation })
    }
}

impl SessionVerifier for ClerkSessionVerifier {
    fn verify(&self, token: &str) -> Result<Caller, AppError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session: {e}")))?;

        Ok(Caller {
            user_id: data.claims.sub,
            plan: Plan::from_claim(data.claims.pla.as_deref()),
        })
    }
}

/// Extracts the bearer token from an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

        state.sessions.verify(token)
    }
}
