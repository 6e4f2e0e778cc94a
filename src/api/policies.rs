//! Part policy endpoints.

use async_trait::async_trait;
use reqwest::Method;
use validator::Validate;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{PartPolicy, PartPolicyRequest, PolicyStatus, PolicyStatusRequest};
use crate::view::{ListSource, Mutation};

impl ApiClient {
    /// GET /part-policies - List all part policies.
    pub async fn list_part_policies(&self) -> Result<Vec<PartPolicy>, ClientError> {
        self.get_list("/part-policies", "partPolicies").await
    }

    /// POST /part-policies - Create a part policy.
    pub async fn create_part_policy(
        &self,
        request: &PartPolicyRequest,
    ) -> Result<Mutation<PartPolicy>, ClientError> {
        request.validate()?;
        self.mutate(Method::POST, "/part-policies", Some(request))
            .await
    }

    /// PUT /part-policies/{id} - Update a part policy.
    pub async fn update_part_policy(
        &self,
        id: &str,
        request: &PartPolicyRequest,
    ) -> Result<Mutation<PartPolicy>, ClientError> {
        request.validate()?;
        self.mutate(Method::PUT, &format!("/part-policies/{}", id), Some(request))
            .await
    }

    /// PATCH /part-policies/{id}/status - Enable or disable a policy.
    pub async fn set_part_policy_status(
        &self,
        id: &str,
        status: PolicyStatus,
    ) -> Result<Mutation<PartPolicy>, ClientError> {
        self.mutate(
            Method::PATCH,
            &format!("/part-policies/{}/status", id),
            Some(&PolicyStatusRequest { status }),
        )
        .await
    }
}

#[async_trait]
impl ListSource<PartPolicy> for ApiClient {
    async fn fetch_all(&self) -> Result<Vec<PartPolicy>, ClientError> {
        self.list_part_policies().await
    }
}
