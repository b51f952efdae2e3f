use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::{debug, warn};

use super::TokenVerifier;
use crate::database::manager::DatabaseError;
use crate::database::ports::UserRepository;
use crate::error::ApiError;

/// Caller identity resolved from a verified bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

/// Outcome of resolving a request's credentials
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    Resolved(AuthUser),
    /// No header, no token or a scheme other than Bearer
    MissingCredentials(&'static str),
    /// Signature, expiry or issuer check failed
    InvalidToken,
    /// Token verified but carries no email, or the email has no user row
    UnknownUser,
}

/// Turns an `Authorization` header into a `users.user_id`
pub struct IdentityResolver {
    verifier: TokenVerifier,
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    pub fn new(verifier: TokenVerifier, users: Arc<dyn UserRepository>) -> Self {
        Self { verifier, users }
    }

    /// Not-found conditions come back as variants; only the user lookup can error.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Resolution, DatabaseError> {
        let token = match bearer_token(headers) {
            Ok(token) => token,
            Err(reason) => return Ok(Resolution::MissingCredentials(reason)),
        };

        let claims = match self.verifier.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Rejected bearer token: {}", e);
                return Ok(Resolution::InvalidToken);
            }
        };

        let Some(email) = claims.email.filter(|e| !e.trim().is_empty()) else {
            return Ok(Resolution::UnknownUser);
        };

        match self.users.find_user_id_by_email(&email).await? {
            Some(user_id) => {
                debug!("Resolved user {} from token", user_id);
                Ok(Resolution::Resolved(AuthUser { user_id, email }))
            }
            None => Ok(Resolution::UnknownUser),
        }
    }

    /// 401 for missing/invalid credentials, 404 for an unknown user
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
        match self.resolve(headers).await? {
            Resolution::Resolved(user) => Ok(user),
            Resolution::MissingCredentials(reason) => Err(ApiError::unauthorized(reason)),
            Resolution::InvalidToken => Err(ApiError::unauthorized("Invalid or expired token")),
            Resolution::UnknownUser => Err(ApiError::not_found("User not found")),
        }
    }
}

/// Split `Authorization: Bearer <token>` on whitespace
fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or("Missing Authorization header")?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err("Authorization header must use Bearer token format");
    }
    parts.next().ok_or("Missing bearer token")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{token_for, MemoryStore, TEST_SECRET};
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn resolver(store: &Arc<MemoryStore>) -> IdentityResolver {
        IdentityResolver::new(TokenVerifier::new(TEST_SECRET, None).unwrap(), store.clone())
    }

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(&headers("bearer   abc")), Ok("abc"));
        assert!(bearer_token(&headers("Basic abc")).is_err());
        assert!(bearer_token(&headers("Bearer")).is_err());
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }

    #[tokio::test]
    async fn resolves_known_email() {
        let store = Arc::new(MemoryStore::new());
        let user = store.seed_user("parent@example.com", "parent");
        let resolution = resolver(&store)
            .resolve(&headers(&format!("Bearer {}", token_for("parent@example.com"))))
            .await
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Resolved(AuthUser { user_id: user.user_id, email: "parent@example.com".to_string() })
        );
    }

    #[tokio::test]
    async fn unknown_email_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let err = resolver(&store)
            .authenticate(&headers(&format!("Bearer {}", token_for("ghost@example.com"))))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::not_found("User not found"));
    }

    #[tokio::test]
    async fn forged_token_is_unauthorized() {
        let store = Arc::new(MemoryStore::new());
        store.seed_user("parent@example.com", "parent");
        let err = resolver(&store)
            .authenticate(&headers("Bearer not.a.jwt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = Arc::new(MemoryStore::new());
        store.fail_queries(true);
        let result = resolver(&store)
            .resolve(&headers(&format!("Bearer {}", token_for("parent@example.com"))))
            .await;
        assert!(result.is_err());
    }
}
