//! Part catalog and part request endpoints.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{Part, PartRequest};
use crate::view::{ListSource, Mutation};

impl ApiClient {
    /// GET /parts - List the part catalog.
    pub async fn list_parts(&self) -> Result<Vec<Part>, ClientError> {
        self.get_list("/parts", "parts").await
    }

    /// POST /part-requests - Submit a part request from a service center.
    ///
    /// Lines are checked against `catalog` before anything is sent.
    pub async fn submit_part_request(
        &self,
        request: &PartRequest,
        catalog: &[Part],
    ) -> Result<Mutation<Value>, ClientError> {
        request.validate_against(catalog)?;
        self.mutate(Method::POST, "/part-requests", Some(request))
            .await
    }
}

#[async_trait]
impl ListSource<Part> for ApiClient {
    async fn fetch_all(&self) -> Result<Vec<Part>, ClientError> {
        self.list_parts().await
    }
}
