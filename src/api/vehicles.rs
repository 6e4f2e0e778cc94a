//! Vehicle endpoints.

use async_trait::async_trait;
use reqwest::Method;
use validator::Validate;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{Vehicle, VehicleRequest};
use crate::view::{ListSource, Mutation};

impl ApiClient {
    /// GET /vehicles - List all vehicles, registered or not.
    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ClientError> {
        self.get_list("/vehicles", "vehicles").await
    }

    /// POST /vehicles - Register a vehicle to a customer.
    pub async fn register_vehicle(
        &self,
        request: &VehicleRequest,
    ) -> Result<Mutation<Vehicle>, ClientError> {
        request.validate()?;
        self.mutate(Method::POST, "/vehicles", Some(request)).await
    }
}

#[async_trait]
impl ListSource<Vehicle> for ApiClient {
    async fn fetch_all(&self) -> Result<Vec<Vehicle>, ClientError> {
        self.list_vehicles().await
    }
}
