//! Customer endpoints.

use async_trait::async_trait;
use reqwest::Method;
use validator::Validate;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{Customer, CustomerRequest};
use crate::view::{ListSource, Mutation};

impl ApiClient {
    /// GET /customers - List all customers.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, ClientError> {
        self.get_list("/customers", "customers").await
    }

    /// POST /customers - Create a customer.
    pub async fn create_customer(
        &self,
        request: &CustomerRequest,
    ) -> Result<Mutation<Customer>, ClientError> {
        request.validate()?;
        self.mutate(Method::POST, "/customers", Some(request)).await
    }

    /// PUT /customers/{id} - Update a customer.
    pub async fn update_customer(
        &self,
        id: &str,
        request: &CustomerRequest,
    ) -> Result<Mutation<Customer>, ClientError> {
        request.validate()?;
        self.mutate(Method::PUT, &format!("/customers/{}", id), Some(request))
            .await
    }
}

#[async_trait]
impl ListSource<Customer> for ApiClient {
    async fn fetch_all(&self) -> Result<Vec<Customer>, ClientError> {
        self.list_customers().await
    }
}
