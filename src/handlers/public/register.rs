// handlers/public/register.rs - POST /v1/users
//
// Called once after the identity provider signs a user up, so that the token's
// email claim can be correlated with a `users` row.

use axum::extract::State;
use serde::Deserialize;

use crate::api::extract::{non_blank, require, required_text, JsonBody};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{NewUser, Role, User};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl RegisterBody {
    fn validate(self) -> Result<NewUser, ApiError> {
        require(&[
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("role", &self.role),
        ])?;

        let role = Role::parse(self.role.as_deref().unwrap_or_default()).ok_or_else(|| {
            ApiError::bad_request("Invalid role: expected parent, doctor or medical_professional")
        })?;

        let email = required_text(self.email).to_lowercase();
        if !is_plausible_email(&email) {
            return Err(ApiError::bad_request("Invalid email"));
        }

        Ok(NewUser {
            email,
            first_name: required_text(self.first_name),
            last_name: non_blank(self.last_name).unwrap_or_default(),
            role,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace),
        None => false,
    }
}

pub async fn post(State(state): State<AppState>, JsonBody(body): JsonBody<RegisterBody>) -> ApiResult<User> {
    let input = body.validate()?;
    let user = state.repos.users.create_user(input).await?;
    tracing::info!("Registered user {} ({})", user.user_id, user.role);
    Ok(ApiResponse::ok(user).created())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(role: &str, email: &str) -> RegisterBody {
        RegisterBody {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some(email.into()),
            role: Some(role.into()),
        }
    }

    #[test]
    fn validates_role_and_email() {
        assert!(body("parent", "ada@example.com").validate().is_ok());
        assert_eq!(
            body("doctor", "Ada@Example.com").validate().unwrap().email,
            "ada@example.com"
        );
        assert!(body("admin", "ada@example.com").validate().is_err());
        assert!(body("parent", "not-an-email").validate().is_err());
    }

    #[test]
    fn reports_all_missing_fields() {
        let err = RegisterBody { first_name: None, last_name: None, email: None, role: Some("parent".into()) }
            .validate()
            .unwrap_err();
        assert_eq!(err.message(), "Missing required fields: first_name, last_name, email");
    }
}
