//! Campaign endpoints.

use async_trait::async_trait;
use reqwest::Method;
use validator::Validate;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{Campaign, CampaignRequest};
use crate::view::{ListSource, Mutation};

impl ApiClient {
    /// GET /campaigns - List all campaigns.
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, ClientError> {
        self.get_list("/campaigns", "campaigns").await
    }

    /// POST /campaigns - Create a campaign.
    pub async fn create_campaign(
        &self,
        request: &CampaignRequest,
    ) -> Result<Mutation<Campaign>, ClientError> {
        request.validate()?;
        self.mutate(Method::POST, "/campaigns", Some(request)).await
    }

    /// PUT /campaigns/{id} - Update a campaign.
    pub async fn update_campaign(
        &self,
        id: &str,
        request: &CampaignRequest,
    ) -> Result<Mutation<Campaign>, ClientError> {
        request.validate()?;
        self.mutate(Method::PUT, &format!("/campaigns/{}", id), Some(request))
            .await
    }
}

#[async_trait]
impl ListSource<Campaign> for ApiClient {
    async fn fetch_all(&self) -> Result<Vec<Campaign>, ClientError> {
        self.list_campaigns().await
    }
}
