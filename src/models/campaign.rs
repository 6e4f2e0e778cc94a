//! Recall/service campaign model.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::wire;

/// Campaign lifecycle status, derived from the evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Upcoming,
    Active,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Upcoming => "UPCOMING",
            CampaignStatus::Active => "ACTIVE",
            CampaignStatus::Completed => "COMPLETED",
        }
    }

    /// Derive the status for `today` from the campaign window.
    ///
    /// Both bounds are inclusive: a campaign is active on its start and end day.
    pub fn derive(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if today < start {
            CampaignStatus::Upcoming
        } else if today > end {
            CampaignStatus::Completed
        } else {
            CampaignStatus::Active
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UPCOMING" => Ok(CampaignStatus::Upcoming),
            "ACTIVE" => Ok(CampaignStatus::Active),
            "COMPLETED" => Ok(CampaignStatus::Completed),
            other => Err(format!("unknown campaign status '{}'", other)),
        }
    }
}

/// A recall or service campaign targeting vehicles produced in a date range.
///
/// There is deliberately no `status` field: status depends on the current date
/// and is computed through [`Campaign::status_on`] every time it is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(deserialize_with = "wire::id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "wire::opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "wire::opt_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "wire::opt_date")]
    pub produce_date_from: Option<NaiveDate>,
    #[serde(default, with = "wire::opt_date")]
    pub produce_date_to: Option<NaiveDate>,
    #[serde(default)]
    pub total_vehicles: Option<u32>,
}

impl Campaign {
    /// Status as of `today`; `None` when either window bound is missing.
    pub fn status_on(&self, today: NaiveDate) -> Option<CampaignStatus> {
        Some(CampaignStatus::derive(
            self.start_date?,
            self.end_date?,
            today,
        ))
    }
}

/// Request body for creating or updating a campaign.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_campaign_windows", skip_on_field_errors = false))]
pub struct CampaignRequest {
    #[validate(length(min = 1, max = 50, message = "Campaign code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "Campaign name is required"))]
    pub name: String,
    pub description: String,
    #[serde(with = "wire::opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "wire::opt_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(with = "wire::opt_date")]
    pub produce_date_from: Option<NaiveDate>,
    #[serde(with = "wire::opt_date")]
    pub produce_date_to: Option<NaiveDate>,
}

fn validate_campaign_windows(request: &CampaignRequest) -> Result<(), ValidationError> {
    let (Some(start), Some(end)) = (request.start_date, request.end_date) else {
        return Err(range_error(
            "startDate",
            "date_required",
            "Start and end dates are required",
        ));
    };
    if end < start {
        return Err(range_error(
            "endDate",
            "date_range",
            "End date must be on or after the start date",
        ));
    }
    if let (Some(from), Some(to)) = (request.produce_date_from, request.produce_date_to) {
        if to < from {
            return Err(range_error(
                "produceDateTo",
                "date_range",
                "Production range end must be on or after its start",
            ));
        }
    }
    Ok(())
}

/// Struct-level validation error tagged with the field it should be shown on.
pub(crate) fn range_error(
    field: &'static str,
    code: &'static str,
    message: &'static str,
) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error.add_param("field".into(), &field);
    error
}

impl wire::WireRecord for Campaign {
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["id", "code", "name", "startDate", "endDate"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::field_messages;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> Campaign {
        Campaign {
            id: "1".to_string(),
            code: Some("CMP-001".to_string()),
            name: Some("Battery recall".to_string()),
            description: None,
            start_date: Some(ymd(2024, 1, 1)),
            end_date: Some(ymd(2024, 1, 31)),
            produce_date_from: None,
            produce_date_to: None,
            total_vehicles: Some(12),
        }
    }

    #[test]
    fn test_status_derivation() {
        let campaign = january();
        assert_eq!(
            campaign.status_on(ymd(2024, 1, 15)),
            Some(CampaignStatus::Active)
        );
        assert_eq!(
            campaign.status_on(ymd(2023, 12, 1)),
            Some(CampaignStatus::Upcoming)
        );
        assert_eq!(
            campaign.status_on(ymd(2024, 2, 1)),
            Some(CampaignStatus::Completed)
        );
    }

    #[test]
    fn test_status_bounds_are_inclusive() {
        let campaign = january();
        assert_eq!(
            campaign.status_on(ymd(2024, 1, 1)),
            Some(CampaignStatus::Active)
        );
        assert_eq!(
            campaign.status_on(ymd(2024, 1, 31)),
            Some(CampaignStatus::Active)
        );
    }

    #[test]
    fn test_status_missing_window() {
        let mut campaign = january();
        campaign.end_date = None;
        assert_eq!(campaign.status_on(ymd(2024, 1, 15)), None);
    }

    #[test]
    fn test_deserialize_backend_campaign() {
        let campaign: Campaign = serde_json::from_str(
            r#"{
                "id": 42,
                "code": "CMP-042",
                "name": "Inverter firmware",
                "startDate": [2024, 3, 1],
                "endDate": [2024, 4, 30],
                "produceDateFrom": [2022, 1, 1],
                "produceDateTo": [2023, 6, 30],
                "totalVehicles": 120,
                "status": "ACTIVE"
            }"#,
        )
        .unwrap();

        assert_eq!(campaign.id, "42");
        assert_eq!(campaign.start_date, Some(ymd(2024, 3, 1)));
        assert_eq!(campaign.total_vehicles, Some(120));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("active".parse::<CampaignStatus>(), Ok(CampaignStatus::Active));
        assert!("archived".parse::<CampaignStatus>().is_err());
    }

    #[test]
    fn test_request_date_range_validation() {
        let request = CampaignRequest {
            code: "CMP-1".to_string(),
            name: "Recall".to_string(),
            description: String::new(),
            start_date: Some(ymd(2024, 2, 1)),
            end_date: Some(ymd(2024, 1, 1)),
            produce_date_from: None,
            produce_date_to: None,
        };

        let errors = request.validate().unwrap_err();
        let messages = field_messages(&errors);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "endDate");
    }

    #[test]
    fn test_request_valid() {
        let request = CampaignRequest {
            code: "CMP-1".to_string(),
            name: "Recall".to_string(),
            description: String::new(),
            start_date: Some(ymd(2024, 1, 1)),
            end_date: Some(ymd(2024, 1, 1)),
            produce_date_from: Some(ymd(2022, 1, 1)),
            produce_date_to: Some(ymd(2023, 1, 1)),
        };
        assert!(request.validate().is_ok());

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["startDate"], "2024-01-01");
        assert_eq!(body["produceDateTo"], "2023-01-01");
    }
}
