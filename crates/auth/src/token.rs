use crate::error::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The claims carried by an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user's id.
    pub sub: String,
    /// The authenticated user's display name.
    pub name: String,
    /// Issued-at, seconds since the epoch.
    pub iat: usize,
    /// Expiry, seconds since the epoch.
    pub exp: usize,
}

/// Issues and validates the HS256 tokens used as bearer credentials.
#[derive(Clone)]
pub struct TokenService {
    /// Secret key for signing tokens.
    secret: Arc<String>,
    /// Token TTL in hours.
    ttl_hours: u64,
}

impl TokenService {
    pub fn new(secret: String, ttl_hours: u64) -> Self {
        Self {
            secret: Arc::new(secret),
            ttl_hours,
        }
    }

    /// Generates a signed token for an authenticated user.
    pub fn generate_token(&self, user_id: &str, username: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.ttl_hours as i64);

        let claims = Claims {
            sub: user_id.to_string(),
            name: username.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        let header = Header::default();
        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&header, &claims, &encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode bearer token.");
            AuthError::InvalidToken
        })
    }

    /// Validates a token's signature and expiry and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token validation failed.");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn token_round_trips_through_validation() {
        let service = TokenService::new(SECRET.to_string(), 24);

        let token = service.generate_token("1", "admin").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "1");
        assert_eq!(claims.name, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let service = TokenService::new(SECRET.to_string(), 24);
        let other = TokenService::new("a-completely-different-signing-secret".to_string(), 24);

        let token = other.generate_token("1", "admin").unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let service = TokenService::new(SECRET.to_string(), 24);
        assert!(matches!(
            service.validate_token("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
