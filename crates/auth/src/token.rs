//! HS256 token encoding/verification for [`JwtClaims`].
//!
//! Claim-window checks stay in [`crate::claims`]; this module only deals with
//! signatures and serialization.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{validate_claims, JwtClaims, TokenValidationError};

#[derive(Debug, Error)]
pub enum TokenCodecError {
    #[error("token could not be decoded or its signature is invalid")]
    Malformed(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Symmetric-key JWT codec.
///
/// The claims carry their own `issued_at` / `expires_at` window, so the
/// library's registered-claim validation is disabled and the window is
/// checked deterministically via [`validate_claims`].
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign claims into a compact JWT.
    pub fn encode(&self, claims: &JwtClaims) -> Result<String, TokenCodecError> {
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding,
        )?)
    }

    /// Verify the signature and the claim window, returning the claims.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenCodecError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use chrono::Duration;
    use stockdesk_core::UserId;

    fn claims_valid_for(minutes: i64) -> JwtClaims {
        let now = Utc::now();
        JwtClaims {
            sub: UserId::new(),
            role: Role::new("admin"),
            issued_at: now,
            expires_at: now + Duration::minutes(minutes),
        }
    }

    #[test]
    fn round_trips_signed_claims() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        let claims = claims_valid_for(10);

        let token = codec.encode(&claims).unwrap();
        let decoded = codec.validate(&token, Utc::now()).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_wrong_secret() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        let other = Hs256TokenCodec::new(b"other-secret");
        let token = codec.encode(&claims_valid_for(10)).unwrap();

        assert!(matches!(
            other.validate(&token, Utc::now()),
            Err(TokenCodecError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_expired_window() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        let token = codec.encode(&claims_valid_for(10)).unwrap();

        let later = Utc::now() + Duration::minutes(11);
        assert!(matches!(
            codec.validate(&token, later),
            Err(TokenCodecError::Claims(TokenValidationError::Expired))
        ));
    }

    #[test]
    fn rejects_garbage_tokens() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        assert!(matches!(
            codec.validate("not-a-jwt", Utc::now()),
            Err(TokenCodecError::Malformed(_))
        ));
    }
}
