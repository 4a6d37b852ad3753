//! Session verification. A request is authenticated by an HS256 token taken
//! from the session cookie or, failing that, from `Authorization: Bearer`.
use async_trait::async_trait;
use axum::http::request::Parts;
use axum::{extract::FromRequestParts, RequestPartsExt};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use amanah_ledger::OwnerId;

use super::{config::AuthConfig, response::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub exp: u64,
}

/// The verified caller. Its `user_id` scopes every ledger operation.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: OwnerId,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

impl AuthUser {
    /// Name stamped on records this user creates.
    pub fn recorder(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.email
        } else {
            &self.display_name
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: OwnerId::from(claims.sub),
            email: claims.email,
            display_name: claims.name,
            role: claims.role,
        }
    }
}

#[derive(Clone)]
pub struct JwtVerifier {
    inner: Arc<VerifierInner>,
}

struct VerifierInner {
    key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl JwtVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            inner: Arc::new(VerifierInner {
                key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
                validation: Validation::new(Algorithm::HS256),
                cookie_name: config.cookie_name.clone(),
            }),
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let data = decode::<Claims>(token, &self.inner.key, &self.inner.validation).map_err(
            |e| {
                tracing::debug!(error = %e, "rejected session token");
                ApiError::unauthorized("invalid or expired session")
            },
        )?;
        Ok(AuthUser::from(data.claims))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let verifier = parts
            .extensions
            .get::<JwtVerifier>()
            .cloned()
            .ok_or_else(|| ApiError::internal("session verifier not configured"))?;

        let jar = parts
            .extract::<CookieJar>()
            .await
            .map_err(|_| ApiError::unauthorized("missing session"))?;
        if let Some(cookie) = jar.get(&verifier.inner.cookie_name) {
            return verifier.verify(cookie.value());
        }

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::unauthorized("missing session"))?;
        verifier.verify(bearer.token())
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    const SECRET: &str = "test-secret";

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(&AuthConfig {
            jwt_secret: SECRET.to_string(),
            ..Default::default()
        })
    }

    fn token(secret: &str, exp_offset: i64) -> (uuid::Uuid, String) {
        let sub = uuid::Uuid::new_v4();
        let claims = Claims {
            sub,
            email: "takmir@masjid.id".to_string(),
            name: "Takmir".to_string(),
            role: "admin".to_string(),
            exp: (chrono::Utc::now().timestamp() + exp_offset) as u64,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        (sub, token)
    }

    #[test]
    fn valid_token_yields_user() {
        let (sub, token) = token(SECRET, 3600);
        let user = verifier().verify(&token).unwrap();
        assert_eq!(uuid::Uuid::from(user.user_id), sub);
        assert_eq!(user.display_name, "Takmir");
        assert_eq!(user.recorder(), "Takmir");
    }

    #[test]
    fn expired_token_is_rejected() {
        let (_, token) = token(SECRET, -3600);
        let err = verifier().verify(&token).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let (_, token) = token("someone-else", 3600);
        assert!(verifier().verify(&token).is_err());
        assert!(verifier().verify("not-a-jwt").is_err());
    }

    #[test]
    fn recorder_falls_back_to_email() {
        let user = AuthUser {
            user_id: OwnerId::new(),
            email: "bendahara@masjid.id".to_string(),
            display_name: " ".to_string(),
            role: String::new(),
        };
        assert_eq!(user.recorder(), "bendahara@masjid.id");
    }
}
