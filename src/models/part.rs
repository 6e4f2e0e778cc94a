//! Parts catalog and part request models.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use super::wire;

/// A catalog part that can be requested by a service center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(deserialize_with = "wire::id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub part_code: Option<String>,
    #[serde(default)]
    pub part_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// One line of a part request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRequestDetail {
    pub part_id: String,
    #[serde(default)]
    pub part_code: Option<String>,
    #[serde(default)]
    pub part_name: Option<String>,
    pub requested_quantity: i64,
}

/// Request body for asking the manufacturer for parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartRequest {
    #[serde(default)]
    pub note: String,
    #[validate(length(min = 1, message = "Add at least one part"))]
    pub details: Vec<PartRequestDetail>,
}

impl PartRequest {
    /// Build a request from `(part_id, quantity)` pairs, filling code and name
    /// from the catalog where the id resolves.
    pub fn from_lines(note: String, lines: &[(String, i64)], catalog: &[Part]) -> Self {
        let details = lines
            .iter()
            .map(|(part_id, quantity)| {
                let part = catalog.iter().find(|p| &p.id == part_id);
                PartRequestDetail {
                    part_id: part_id.clone(),
                    part_code: part.and_then(|p| p.part_code.clone()),
                    part_name: part.and_then(|p| p.part_name.clone()),
                    requested_quantity: *quantity,
                }
            })
            .collect();
        Self { note, details }
    }

    /// Full validation: field rules plus catalog resolution and quantities.
    pub fn validate_against(&self, catalog: &[Part]) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let known: HashSet<&str> = catalog.iter().map(|p| p.id.as_str()).collect();
        for (index, line) in self.details.iter().enumerate() {
            if line.requested_quantity <= 0 {
                let mut error = ValidationError::new("positive_quantity");
                error.message = Some("Quantity must be a positive whole number".into());
                error.add_param("line".into(), &(index + 1));
                errors.add("details", error);
            }
            if !known.contains(line.part_id.as_str()) {
                let mut error = ValidationError::new("unknown_part");
                error.message = Some("Part is not in the loaded catalog".into());
                error.add_param("line".into(), &(index + 1));
                error.add_param("value".into(), &line.part_id);
                errors.add("details", error);
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
