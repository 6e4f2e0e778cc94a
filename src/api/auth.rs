//! Login endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ApiClient;
use crate::auth::Session;
use crate::errors::ClientError;

/// Credentials posted to `/auth/login`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

impl ApiClient {
    /// POST /auth/login - Exchange credentials for a session.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ClientError> {
        request.validate()?;
        let response: LoginResponse = self.post_for_data("/auth/login", request).await?;
        let session = Session::from_token(response.token)?;
        tracing::info!(
            email = session.claims().email.as_deref().unwrap_or("-"),
            "Logged in"
        );
        Ok(session)
    }

    /// Same client, now sending the session's bearer token.
    pub fn with_session(&self, session: &Session) -> Self {
        Self {
            token: Some(session.token().to_string()),
            ..self.clone()
        }
    }
}
