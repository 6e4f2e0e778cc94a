//! Staff user model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wire;
use crate::validation::validate_phone;

/// User role. The single enumeration shared by the create and edit forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    EvmStaff,
    ScStaff,
    ScTechnician,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::EvmStaff,
        Role::ScStaff,
        Role::ScTechnician,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::EvmStaff => "EVM_STAFF",
            Role::ScStaff => "SC_STAFF",
            Role::ScTechnician => "SC_TECHNICIAN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::EvmStaff => "EVM Staff",
            Role::ScStaff => "Service Center Staff",
            Role::ScTechnician => "Service Center Technician",
        }
    }

    /// Service center roles must be attached to a service center.
    pub fn requires_service_center(&self) -> bool {
        matches!(self, Role::ScStaff | Role::ScTechnician)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| format!("unknown role '{}'", s.trim()))
    }
}

/// Account status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(UserStatus::Active),
            "INACTIVE" => Ok(UserStatus::Inactive),
            other => Err(format!("unknown user status '{}'", other)),
        }
    }
}

/// A staff account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "wire::id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "wire::opt_id::deserialize")]
    pub service_center_id: Option<String>,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

/// Request body for creating a user.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_center", skip_on_field_errors = false))]
pub struct CreateUserRequest {
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(custom = "validate_phone")]
    pub phone_number: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_center_id: Option<String>,
}

/// Request body for editing a user. Uses the same [`Role`] as creation.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_center", skip_on_field_errors = false))]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(custom = "validate_phone")]
    pub phone_number: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_center_id: Option<String>,
}

/// Request body for the status toggle endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UserStatusRequest {
    pub status: UserStatus,
}

fn check_center(role: Role, center: &Option<String>) -> Result<(), validator::ValidationError> {
    let has_center = center.as_deref().is_some_and(|c| !c.trim().is_empty());
    if role.requires_service_center() && !has_center {
        return Err(super::campaign::range_error(
            "serviceCenterId",
            "service_center_required",
            "Service center roles need a service center",
        ));
    }
    Ok(())
}

fn validate_create_center(request: &CreateUserRequest) -> Result<(), validator::ValidationError> {
    check_center(request.role, &request.service_center_id)
}

fn validate_update_center(request: &UpdateUserRequest) -> Result<(), validator::ValidationError> {
    check_center(request.role, &request.service_center_id)
}

impl wire::WireRecord for User {
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "email", "name", "role", "status"];
}
