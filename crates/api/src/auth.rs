//! Bearer-token issuance and verification (spec.md §6 "Bearer token").
//!
//! The token is opaque to clients but is, in fact, a JWT carrying
//! `sub=player_id`, `exp`, and an optional `role` claim. `admin` is the
//! only role the rest of the system inspects (spec.md §4.6 step 3).

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use casino_core::DomainError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub role: Option<String>,
}

/// Signs and verifies the bearer token handed out by the bootstrap
/// endpoint and checked on every subsequent request.
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: jsonwebtoken::Algorithm,
    ttl_seconds: i64,
}

impl JwtCodec {
    pub fn new(signing_key: &[u8], algorithm: jsonwebtoken::Algorithm, ttl_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            algorithm,
            ttl_seconds,
        }
    }

    pub fn issue(&self, player_id: &str, admin: bool) -> Result<String, DomainError> {
        let claims = Claims {
            sub: player_id.to_string(),
            exp: (chrono::Utc::now().timestamp()) + self.ttl_seconds,
            role: admin.then(|| "admin".to_string()),
        };
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|err| DomainError::internal(err.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let validation = Validation::new(self.algorithm);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| DomainError::invalid_credentials())
    }
}

/// The authenticated caller, extracted from `Authorization: Bearer <jwt>`
/// (or the `params` query parameter, per spec.md §6) on every route except
/// the bootstrap endpoint.
#[derive(Debug, Clone)]
pub struct Credential {
    pub player_id: String,
    pub is_admin: bool,
}

impl<S> FromRequestParts<S> for Credential
where
    JwtCodec: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let codec = JwtCodec::from_ref(state);
        let token = bearer_token(parts).ok_or_else(DomainError::invalid_credentials)?;
        let claims = codec.verify(&token)?;
        Ok(Credential {
            player_id: claims.sub,
            is_admin: claims.role.as_deref() == Some("admin"),
        })
    }
}

/// An admin-only credential; rejects with `player_id_mismatch` semantics
/// reused as a 403 for non-admin callers hitting AML routes.
#[derive(Debug, Clone)]
pub struct AdminCredential(pub Credential);

impl<S> FromRequestParts<S> for AdminCredential
where
    JwtCodec: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cred = Credential::from_request_parts(parts, state).await?;
        if !cred.is_admin {
            return Err(ApiError::from(DomainError::player_id_mismatch()));
        }
        Ok(AdminCredential(cred))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    if let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) {
        if let Ok(value) = header.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }
    parts
        .uri
        .query()
        .and_then(|q| url_decode_param(q, "params"))
}

fn url_decode_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| v.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> JwtCodec {
        JwtCodec::new(b"test-signing-key", jsonwebtoken::Algorithm::HS256, 3600)
    }

    #[test]
    fn issue_then_verify_round_trips_player_and_role() {
        let codec = codec();
        let token = codec.issue("player-1", true).expect("issue");
        let claims = codec.verify(&token).expect("verify");
        assert_eq!(claims.sub, "player-1");
        assert_eq!(claims.role.as_deref(), Some("admin"));
    }

    #[test]
    fn issue_without_admin_carries_no_role() {
        let codec = codec();
        let token = codec.issue("player-2", false).expect("issue");
        let claims = codec.verify(&token).expect("verify");
        assert_eq!(claims.role, None);
    }

    #[test]
    fn verify_rejects_token_signed_with_a_different_key() {
        let codec = codec();
        let other = JwtCodec::new(b"other-signing-key", jsonwebtoken::Algorithm::HS256, 3600);
        let token = codec.issue("player-3", false).expect("issue");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn url_decode_param_finds_matching_key() {
        let query = "foo=1&params=abc123&bar=2";
        assert_eq!(url_decode_param(query, "params").as_deref(), Some("abc123"));
    }

    #[test]
    fn url_decode_param_returns_none_when_absent() {
        let query = "foo=1&bar=2";
        assert_eq!(url_decode_param(query, "params"), None);
    }
}
