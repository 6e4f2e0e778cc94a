//! Vehicle model and VIN-keyed ownership lookups.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::wire;
use super::Customer;
use crate::validation::validate_vin;

/// Placeholder the backend uses in `customerName` for vehicles with no owner.
const UNREGISTERED_SENTINEL: &str = "N/A";

/// Registered owner of a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub customer_id: Option<String>,
    pub name: String,
}

/// Whether a vehicle has an owner on record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Registration {
    Registered,
    Unregistered,
}

impl Registration {
    pub fn as_str(&self) -> &'static str {
        match self {
            Registration::Registered => "REGISTERED",
            Registration::Unregistered => "UNREGISTERED",
        }
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Registration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REGISTERED" => Ok(Registration::Registered),
            "UNREGISTERED" => Ok(Registration::Unregistered),
            other => Err(format!("unknown registration state '{}'", other)),
        }
    }
}

/// A vehicle, keyed by VIN.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vin: String,
    pub model_name: Option<String>,
    pub product_year: Option<i32>,
    pub license_plate: Option<String>,
    pub owner: Option<Owner>,
}

impl Vehicle {
    pub fn registration(&self) -> Registration {
        if self.owner.is_some() {
            Registration::Registered
        } else {
            Registration::Unregistered
        }
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.name.as_str())
    }
}

/// Shape the backend actually sends.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVehicle {
    vin: String,
    #[serde(default)]
    model_name: Option<String>,
    #[serde(default)]
    product_year: Option<i32>,
    #[serde(default)]
    license_plate: Option<String>,
    #[serde(default)]
    customer_name: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_id::deserialize")]
    customer_id: Option<String>,
}

impl<'de> Deserialize<'de> for Vehicle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = WireVehicle::deserialize(deserializer)?;
        // The sentinel is only meaningful in the owner-name slot; it is
        // translated here and nowhere else.
        let name = raw
            .customer_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty() && n != UNREGISTERED_SENTINEL);
        let owner = match (name, raw.customer_id) {
            (Some(name), customer_id) => Some(Owner { customer_id, name }),
            (None, Some(customer_id)) => Some(Owner {
                customer_id: Some(customer_id),
                name: String::new(),
            }),
            (None, None) => None,
        };

        Ok(Vehicle {
            vin: raw.vin,
            model_name: raw.model_name,
            product_year: raw.product_year,
            license_plate: raw.license_plate,
            owner,
        })
    }
}

/// Request body for registering a vehicle to a customer.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    #[validate(custom = "validate_vin")]
    pub vin: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model_name: String,
    #[validate(range(min = 1990, max = 2100, message = "Production year is out of range"))]
    pub product_year: i32,
    #[validate(length(min = 1, max = 20, message = "License plate is required"))]
    pub license_plate: String,
    #[validate(length(min = 1, message = "Customer is required"))]
    pub customer_id: String,
}

/// VIN-keyed index resolving the customer ↔ vehicle relationship.
pub struct OwnershipIndex<'a> {
    by_vin: HashMap<&'a str, &'a Vehicle>,
}

impl<'a> OwnershipIndex<'a> {
    pub fn build(vehicles: &'a [Vehicle]) -> Self {
        let by_vin = vehicles
            .iter()
            .map(|v| (v.vin.as_str(), v))
            .collect::<HashMap<_, _>>();
        Self { by_vin }
    }

    pub fn vehicle(&self, vin: &str) -> Option<&'a Vehicle> {
        self.by_vin.get(vin).copied()
    }

    /// Vehicles owned by `customer`, matched by id, else by exact name.
    pub fn vehicles_of(&self, customer: &Customer) -> Vec<&'a Vehicle> {
        let mut owned: Vec<&'a Vehicle> = self
            .by_vin
            .values()
            .copied()
            .filter(|v| match &v.owner {
                Some(Owner {
                    customer_id: Some(id),
                    ..
                }) => *id == customer.id,
                Some(owner) => customer.name.as_deref() == Some(owner.name.as_str()),
                None => false,
            })
            .collect();
        owned.sort_by(|a, b| a.vin.cmp(&b.vin));
        owned
    }
}

impl wire::WireRecord for Vehicle {
    const REQUIRED_FIELDS: &'static [&'static str] = &["vin", "modelName", "customerName"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_becomes_none() {
        let v: Vehicle = serde_json::from_str(
            r#"{"vin":"VF1AB000123456789","modelName":"VF8","customerName":"N/A"}"#,
        )
        .unwrap();
        assert!(v.owner.is_none());
        assert_eq!(v.registration(), Registration::Unregistered);

        let v: Vehicle = serde_json::from_str(r#"{"vin":"VF1AB000123456789"}"#).unwrap();
        assert!(v.owner.is_none());
    }

    #[test]
    fn test_sentinel_only_applies_to_owner_name() {
        // A VIN or model that happens to read "N/A" is not an ownership marker.
        let v: Vehicle = serde_json::from_str(
            r#"{"vin":"N/A","modelName":"N/A","customerName":"Tran Thi B","customerId":5}"#,
        )
        .unwrap();
        assert_eq!(v.registration(), Registration::Registered);
        assert_eq!(v.owner_name(), Some("Tran Thi B"));
        assert_eq!(v.owner.unwrap().customer_id.as_deref(), Some("5"));
    }

    #[test]
    fn test_ownership_index() {
        let vehicles: Vec<Vehicle> = serde_json::from_str(
            r#"[
                {"vin":"B2","customerName":"Alice","customerId":"c1"},
                {"vin":"A1","customerName":"Alice","customerId":"c1"},
                {"vin":"C3","customerName":"N/A"},
                {"vin":"D4","customerName":"Bob"}
            ]"#,
        )
        .unwrap();
        let index = OwnershipIndex::build(&vehicles);

        let alice = Customer {
            id: "c1".to_string(),
            name: Some("Alice".to_string()),
            phone_number: None,
            email: None,
            address: None,
            vehicle_count: Some(2),
        };
        let vins: Vec<&str> = index
            .vehicles_of(&alice)
            .iter()
            .map(|v| v.vin.as_str())
            .collect();
        assert_eq!(vins, vec!["A1", "B2"]);

        let bob = Customer {
            id: "c2".to_string(),
            name: Some("Bob".to_string()),
            ..alice
        };
        assert_eq!(index.vehicles_of(&bob).len(), 1);
        assert!(index.vehicle("C3").unwrap().owner.is_none());
    }
}
