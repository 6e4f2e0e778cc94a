//! Part warranty policy model.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::campaign::range_error;
use super::wire;

/// Stored enablement flag of a policy. Toggled by staff; independent of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Active,
    Inactive,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "ACTIVE",
            PolicyStatus::Inactive => "INACTIVE",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            PolicyStatus::Active => PolicyStatus::Inactive,
            PolicyStatus::Inactive => PolicyStatus::Active,
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(PolicyStatus::Active),
            "INACTIVE" => Ok(PolicyStatus::Inactive),
            other => Err(format!("unknown policy status '{}'", other)),
        }
    }
}

/// Whether the coverage window is still open on the evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coverage {
    Available,
    Expired,
}

impl Coverage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Coverage::Available => "AVAILABLE",
            Coverage::Expired => "EXPIRED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Coverage::Available => "Available",
            Coverage::Expired => "Expired",
        }
    }
}

impl FromStr for Coverage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(Coverage::Available),
            "EXPIRED" => Ok(Coverage::Expired),
            other => Err(format!("unknown coverage '{}'", other)),
        }
    }
}

/// Warranty policy attached to a part.
///
/// `status` says whether the policy is enforced; [`PartPolicy::coverage_on`]
/// says whether its window has lapsed. The two are never combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartPolicy {
    #[serde(deserialize_with = "wire::id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub part_code: Option<String>,
    #[serde(default)]
    pub part_name: Option<String>,
    #[serde(default)]
    pub policy_code: Option<String>,
    #[serde(default, with = "wire::opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "wire::opt_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<PolicyStatus>,
}

impl PartPolicy {
    /// Coverage on `today`: available while `end_date >= today`.
    pub fn coverage_on(&self, today: NaiveDate) -> Option<Coverage> {
        self.end_date.map(|end| {
            if end >= today {
                Coverage::Available
            } else {
                Coverage::Expired
            }
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.status == Some(PolicyStatus::Active)
    }
}

/// Request body for creating or updating a part policy.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_policy_window", skip_on_field_errors = false))]
pub struct PartPolicyRequest {
    #[validate(length(min = 1, message = "Part is required"))]
    pub part_id: String,
    #[validate(length(min = 1, max = 50, message = "Policy code is required"))]
    pub policy_code: String,
    #[serde(with = "wire::opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "wire::opt_date")]
    pub end_date: Option<NaiveDate>,
}

fn validate_policy_window(request: &PartPolicyRequest) -> Result<(), ValidationError> {
    match (request.start_date, request.end_date) {
        (Some(start), Some(end)) if end < start => Err(range_error(
            "endDate",
            "date_range",
            "End date must be on or after the start date",
        )),
        (Some(_), Some(_)) => Ok(()),
        _ => Err(range_error(
            "startDate",
            "date_required",
            "Start and end dates are required",
        )),
    }
}

/// Request body for the status toggle endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyStatusRequest {
    pub status: PolicyStatus,
}

impl wire::WireRecord for PartPolicy {
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "id",
        "partCode",
        "policyCode",
        "startDate",
        "endDate",
        "status",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn policy(end: NaiveDate, status: PolicyStatus) -> PartPolicy {
        PartPolicy {
            id: "p1".to_string(),
            part_code: Some("BAT-01".to_string()),
            part_name: Some("Battery pack".to_string()),
            policy_code: Some("POL-BAT".to_string()),
            start_date: Some(ymd(2023, 1, 1)),
            end_date: Some(end),
            status: Some(status),
        }
    }

    #[test]
    fn test_expired_regardless_of_status() {
        let today = ymd(2024, 6, 1);
        for status in [PolicyStatus::Active, PolicyStatus::Inactive] {
            let p = policy(ymd(2024, 5, 31), status);
            assert_eq!(p.coverage_on(today), Some(Coverage::Expired));
        }
    }

    #[test]
    fn test_available_but_disabled() {
        let today = ymd(2024, 6, 1);
        let p = policy(ymd(2025, 1, 1), PolicyStatus::Inactive);
        assert_eq!(p.coverage_on(today), Some(Coverage::Available));
        assert!(!p.is_enabled());

        let p = policy(ymd(2025, 1, 1), PolicyStatus::Active);
        assert_eq!(p.coverage_on(today), Some(Coverage::Available));
        assert!(p.is_enabled());
    }

    #[test]
    fn test_end_date_today_is_available() {
        let today = ymd(2024, 6, 1);
        let p = policy(today, PolicyStatus::Active);
        assert_eq!(p.coverage_on(today), Some(Coverage::Available));
    }

    #[test]
    fn test_toggle() {
        assert_eq!(PolicyStatus::Active.toggled(), PolicyStatus::Inactive);
        assert_eq!(PolicyStatus::Inactive.toggled(), PolicyStatus::Active);
    }

    #[test]
    fn test_request_requires_window() {
        let request = PartPolicyRequest {
            part_id: "9".to_string(),
            policy_code: "POL-1".to_string(),
            start_date: Some(ymd(2024, 1, 1)),
            end_date: None,
        };
        assert!(request.validate().is_err());
    }
}
