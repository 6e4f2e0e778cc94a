//! Customer model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wire;
use crate::validation::validate_phone;

/// A vehicle owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(deserialize_with = "wire::id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub vehicle_count: Option<u32>,
}

/// Request body for creating or updating a customer.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(custom = "validate_phone")]
    pub phone_number: String,
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
}

impl wire::WireRecord for Customer {
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "name", "phoneNumber", "email"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation() {
        let mut request = CustomerRequest {
            name: "Nguyen Van A".to_string(),
            phone_number: "0901 234 567".to_string(),
            email: "a@example.com".to_string(),
            address: "12 Le Loi".to_string(),
        };
        assert!(request.validate().is_ok());

        request.email = "not-an-email".to_string();
        request.phone_number = "12".to_string();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("phone_number"));
    }
}
