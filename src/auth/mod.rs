pub mod identity;
pub mod ownership;

pub use identity::{AuthUser, IdentityResolver, Resolution};
pub use ownership::{Entity, OwnershipGuard};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims issued by the identity provider. Only `email` is used to correlate a user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("Invalid JWT token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// HS256 verifier built once at startup from the shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Check signature and expiry, then hand back the claims
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

/// Sign claims with the shared secret. The API never issues tokens itself; this
/// backs local tooling and tests.
pub fn generate_jwt(secret: &str, claims: &Claims) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    let token = encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(email: Option<&str>, exp_offset: Duration) -> Claims {
        let now = Utc::now();
        Claims {
            email: email.map(str::to_string),
            sub: None,
            iss: None,
            exp: (now + exp_offset).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[test]
    fn verifies_signed_token() {
        let token = generate_jwt("secret", &claims(Some("a@b.c"), Duration::hours(1))).unwrap();
        let verifier = TokenVerifier::new("secret", None).unwrap();
        let decoded = verifier.verify(&token).unwrap();
        assert_eq!(decoded.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = generate_jwt("other", &claims(Some("a@b.c"), Duration::hours(1))).unwrap();
        let verifier = TokenVerifier::new("secret", None).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let token = generate_jwt("secret", &claims(Some("a@b.c"), Duration::hours(-2))).unwrap();
        let verifier = TokenVerifier::new("secret", None).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn enforces_configured_issuer() {
        let mut c = claims(Some("a@b.c"), Duration::hours(1));
        c.iss = Some("someone-else".to_string());
        let token = generate_jwt("secret", &c).unwrap();
        let verifier = TokenVerifier::new("secret", Some("babycare-idp")).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(TokenVerifier::new("", None), Err(JwtError::MissingSecret)));
    }
}
