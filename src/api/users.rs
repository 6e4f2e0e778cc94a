//! User account endpoints.

use async_trait::async_trait;
use reqwest::Method;
use validator::Validate;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserStatus, UserStatusRequest};
use crate::view::{ListSource, Mutation};

impl ApiClient {
    /// GET /users - List all user accounts.
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.get_list("/users", "users").await
    }

    /// POST /users - Create an account.
    pub async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<Mutation<User>, ClientError> {
        request.validate()?;
        self.mutate(Method::POST, "/users", Some(request)).await
    }

    /// PUT /users/{id} - Update an account.
    pub async fn update_user(
        &self,
        id: &str,
        request: &UpdateUserRequest,
    ) -> Result<Mutation<User>, ClientError> {
        request.validate()?;
        self.mutate(Method::PUT, &format!("/users/{}", id), Some(request))
            .await
    }

    /// PATCH /users/{id}/status - Activate or deactivate an account.
    pub async fn set_user_status(
        &self,
        id: &str,
        status: UserStatus,
    ) -> Result<Mutation<User>, ClientError> {
        self.mutate(
            Method::PATCH,
            &format!("/users/{}/status", id),
            Some(&UserStatusRequest { status }),
        )
        .await
    }
}

#[async_trait]
impl ListSource<User> for ApiClient {
    async fn fetch_all(&self) -> Result<Vec<User>, ClientError> {
        self.list_users().await
    }
}
