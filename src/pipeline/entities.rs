//! Filter fields and sort keys for each list view.

use std::borrow::Cow;

use super::{EvalContext, Filterable, SortValue, Sortable};
use crate::models::{Campaign, Customer, Part, PartPolicy, User, Vehicle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CampaignField {
    /// Derived from the evaluation date.
    Status,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignSortKey {
    StartDate,
    EndDate,
}

impl Filterable for Campaign {
    type Field = CampaignField;

    fn search_fields(&self) -> Vec<&str> {
        [&self.code, &self.name, &self.description]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect()
    }

    fn field_value(&self, field: CampaignField, ctx: &EvalContext) -> Option<Cow<'_, str>> {
        match field {
            CampaignField::Status => self
                .status_on(ctx.today)
                .map(|s| Cow::Borrowed(s.as_str())),
            CampaignField::Code => self.code.as_deref().map(Cow::Borrowed),
        }
    }
}

impl Sortable for Campaign {
    type SortKey = CampaignSortKey;

    fn sort_value(&self, key: CampaignSortKey) -> Option<SortValue<'_>> {
        match key {
            CampaignSortKey::StartDate => self.start_date.map(SortValue::Date),
            CampaignSortKey::EndDate => self.end_date.map(SortValue::Date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PolicyField {
    /// Stored enablement flag.
    Status,
    /// Derived from `end_date` and the evaluation date.
    Coverage,
    PartCode,
    PolicyCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySortKey {
    StartDate,
    EndDate,
}

impl Filterable for PartPolicy {
    type Field = PolicyField;

    fn search_fields(&self) -> Vec<&str> {
        [&self.part_code, &self.part_name, &self.policy_code]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect()
    }

    fn field_value(&self, field: PolicyField, ctx: &EvalContext) -> Option<Cow<'_, str>> {
        match field {
            PolicyField::Status => self.status.map(|s| Cow::Borrowed(s.as_str())),
            PolicyField::Coverage => self
                .coverage_on(ctx.today)
                .map(|c| Cow::Borrowed(c.as_str())),
            PolicyField::PartCode => self.part_code.as_deref().map(Cow::Borrowed),
            PolicyField::PolicyCode => self.policy_code.as_deref().map(Cow::Borrowed),
        }
    }
}

impl Sortable for PartPolicy {
    type SortKey = PolicySortKey;

    fn sort_value(&self, key: PolicySortKey) -> Option<SortValue<'_>> {
        match key {
            PolicySortKey::StartDate => self.start_date.map(SortValue::Date),
            PolicySortKey::EndDate => self.end_date.map(SortValue::Date),
        }
    }
}

/// Customers are only searched; the enum has no variants to filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CustomerField {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerSortKey {
    Name,
    VehicleCount,
}

impl Filterable for Customer {
    type Field = CustomerField;

    fn search_fields(&self) -> Vec<&str> {
        [&self.name, &self.phone_number, &self.email, &self.address]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect()
    }

    fn field_value(&self, field: CustomerField, _ctx: &EvalContext) -> Option<Cow<'_, str>> {
        match field {}
    }
}

impl Sortable for Customer {
    type SortKey = CustomerSortKey;

    fn sort_value(&self, key: CustomerSortKey) -> Option<SortValue<'_>> {
        match key {
            CustomerSortKey::Name => self.name.as_deref().map(SortValue::text),
            CustomerSortKey::VehicleCount => {
                self.vehicle_count.map(|n| SortValue::Number(i64::from(n)))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VehicleField {
    Registration,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleSortKey {
    ProductYear,
    Vin,
}

impl Filterable for Vehicle {
    type Field = VehicleField;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.vin.as_str()];
        fields.extend(
            [self.model_name.as_deref(), self.license_plate.as_deref(), self.owner_name()]
                .into_iter()
                .flatten(),
        );
        fields
    }

    fn field_value(&self, field: VehicleField, _ctx: &EvalContext) -> Option<Cow<'_, str>> {
        match field {
            VehicleField::Registration => Some(Cow::Borrowed(self.registration().as_str())),
            VehicleField::Model => self.model_name.as_deref().map(Cow::Borrowed),
        }
    }
}

impl Sortable for Vehicle {
    type SortKey = VehicleSortKey;

    fn sort_value(&self, key: VehicleSortKey) -> Option<SortValue<'_>> {
        match key {
            VehicleSortKey::ProductYear => {
                self.product_year.map(|y| SortValue::Number(i64::from(y)))
            }
            VehicleSortKey::Vin => Some(SortValue::text(&self.vin)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UserField {
    Role,
    Status,
    ServiceCenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortKey {
    Name,
    Email,
}

impl Filterable for User {
    type Field = UserField;

    fn search_fields(&self) -> Vec<&str> {
        [&self.name, &self.email, &self.phone_number]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect()
    }

    fn field_value(&self, field: UserField, _ctx: &EvalContext) -> Option<Cow<'_, str>> {
        match field {
            UserField::Role => self.role.map(|r| Cow::Borrowed(r.as_str())),
            UserField::Status => self.status.map(|s| Cow::Borrowed(s.as_str())),
            UserField::ServiceCenter => self.service_center_id.as_deref().map(Cow::Borrowed),
        }
    }
}

impl Sortable for User {
    type SortKey = UserSortKey;

    fn sort_value(&self, key: UserSortKey) -> Option<SortValue<'_>> {
        match key {
            UserSortKey::Name => self.name.as_deref().map(SortValue::text),
            UserSortKey::Email => self.email.as_deref().map(SortValue::text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PartField {
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartSortKey {
    Code,
    Name,
}

impl Filterable for Part {
    type Field = PartField;

    fn search_fields(&self) -> Vec<&str> {
        [&self.part_code, &self.part_name, &self.category]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect()
    }

    fn field_value(&self, field: PartField, _ctx: &EvalContext) -> Option<Cow<'_, str>> {
        match field {
            PartField::Category => self.category.as_deref().map(Cow::Borrowed),
        }
    }
}

impl Sortable for Part {
    type SortKey = PartSortKey;

    fn sort_value(&self, key: PartSortKey) -> Option<SortValue<'_>> {
        match key {
            PartSortKey::Code => self.part_code.as_deref().map(SortValue::text),
            PartSortKey::Name => self.part_name.as_deref().map(SortValue::text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{visible_rows, Criteria, SortConfig};
    use chrono::NaiveDate;

    #[test]
    fn test_vehicle_registration_filter() {
        let raw: Vec<Vehicle> = serde_json::from_str(
            r#"[
                {"vin":"AAA","modelName":"VF8","customerName":"Alice"},
                {"vin":"BBB","modelName":"VF9","customerName":"N/A"},
                {"vin":"CCC","modelName":"VF8"}
            ]"#,
        )
        .unwrap();
        let ctx = EvalContext::on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let criteria = Criteria::new().with_filter(VehicleField::Registration, "UNREGISTERED");
        let rows = visible_rows(&raw, &criteria, Some(SortConfig::asc(VehicleSortKey::Vin)), &ctx);
        let vins: Vec<&str> = rows.iter().map(|v| v.vin.as_str()).collect();
        assert_eq!(vins, vec!["BBB", "CCC"]);

        // the owner name is searchable, the sentinel is not
        let rows = visible_rows(&raw, &Criteria::new().with_search("n/a"), None, &ctx);
        assert!(rows.is_empty());
        let rows = visible_rows(&raw, &Criteria::new().with_search("alice"), None, &ctx);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_customer_search_only() {
        let raw: Vec<Customer> = serde_json::from_str(
            r#"[
                {"id":1,"name":"Pham Minh","email":"minh@example.com","vehicleCount":2},
                {"id":2,"name":"Do Lan","phoneNumber":"0911222333","vehicleCount":5}
            ]"#,
        )
        .unwrap();
        let ctx = EvalContext::on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let rows = visible_rows(&raw, &Criteria::new().with_search("0911"), None, &ctx);
        assert_eq!(rows[0].id, "2");

        let rows = visible_rows(
            &raw,
            &Criteria::new(),
            Some(SortConfig::desc(CustomerSortKey::VehicleCount)),
            &ctx,
        );
        assert_eq!(rows[0].id, "2");
    }
}
