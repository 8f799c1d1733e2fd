use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signed token payload: subject email, user id, expiry (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub id: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("token verification failed: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("token expiry out of range")]
    ExpiryOutOfRange,
}

/// HS256 signer/verifier around a process-wide shared secret.
///
/// Rotating the secret invalidates every outstanding token; there is no
/// server-side session state to migrate.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expired means now > exp, with no clock-skew allowance
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn encode(&self, email: &str, user_id: i64, ttl: Duration) -> Result<String, TokenError> {
        self.encode_at(email, user_id, Utc::now(), ttl)
    }

    pub fn encode_at(
        &self,
        email: &str,
        user_id: i64,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        if email.trim().is_empty() {
            return Err(TokenError::EmptyClaim("sub"));
        }

        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;

        let claims = AccessTokenClaims {
            sub: email.to_string(),
            id: user_id,
            exp: expires_at.timestamp(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(TokenError::Sign)
    }

    /// Verify signature and expiry, then the claims this service relies on.
    pub fn decode(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
                .map_err(TokenError::Invalid)?;

        if data.claims.sub.trim().is_empty() {
            return Err(TokenError::EmptyClaim("sub"));
        }

        Ok(data.claims)
    }
}
