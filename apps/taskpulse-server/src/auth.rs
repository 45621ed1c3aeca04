//! Session authentication
//!
//! Sessions arrive as HS256 bearer tokens minted by the external
//! identity provider; this module only verifies them and extracts the
//! stable user id from the `sub` claim. Every task route fails closed
//! with 401 when the token is missing or invalid.

use crate::api::{ApiError, AppState};
use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use taskpulse_core::TaskpulseError;

/// JWT claims consumed from the identity provider's tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Stable user identifier; becomes the task owner id
    pub sub: String,
    /// Expiry as a unix timestamp
    pub exp: i64,
}

/// An authenticated session, extracted per request
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::from(TaskpulseError::Unauthorized))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(ApiError::from(TaskpulseError::Unauthorized))?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| ApiError::from(TaskpulseError::Unauthorized))?;

        Ok(Session {
            user_id: data.claims.sub,
        })
    }
}

/// Mint a session token; used by tests and the `token` dev command
///
/// # Errors
/// Returns a configuration error if signing fails
pub fn issue_token(
    secret: &str,
    user_id: &str,
    ttl_hours: i64,
) -> Result<String, TaskpulseError> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TaskpulseError::configuration(format!("failed to sign token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_decode_round_trip() {
        let token = issue_token("secret", "user-42", 1).unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(data.claims.sub, "user-42");
        assert!(data.claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let token = issue_token("secret-a", "user-42", 1).unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token("secret", "user-42", -1).unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }
}
