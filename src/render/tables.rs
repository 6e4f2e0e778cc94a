//! Row layouts for each list view.

use comfy_table::{Cell, Color};

use super::{badge, text_cell, TableRow, EMPTY_CELL};
use crate::models::wire::format_opt_date;
use crate::models::{
    Campaign, CampaignStatus, Coverage, Customer, Part, PartPolicy, PolicyStatus, Registration,
    User, UserStatus, Vehicle,
};
use crate::pipeline::EvalContext;

fn count_cell(count: Option<impl ToString>) -> Cell {
    count
        .map(|c| Cell::new(c.to_string()))
        .unwrap_or_else(|| Cell::new(EMPTY_CELL))
}

impl TableRow for Campaign {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Code", "Name", "Start", "End", "Status", "Vehicles"]
    }

    fn cells(&self, ctx: &EvalContext) -> Vec<Cell> {
        let status = match self.status_on(ctx.today) {
            Some(s @ CampaignStatus::Upcoming) => badge(s.as_str(), Color::Blue),
            Some(s @ CampaignStatus::Active) => badge(s.as_str(), Color::Green),
            Some(s @ CampaignStatus::Completed) => badge(s.as_str(), Color::DarkGrey),
            None => Cell::new(EMPTY_CELL),
        };
        vec![
            Cell::new(&self.id),
            text_cell(self.code.as_deref()),
            text_cell(self.name.as_deref()),
            Cell::new(format_opt_date(self.start_date)),
            Cell::new(format_opt_date(self.end_date)),
            status,
            count_cell(self.total_vehicles),
        ]
    }
}

impl TableRow for Customer {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Phone", "Email", "Address", "Vehicles"]
    }

    fn cells(&self, _ctx: &EvalContext) -> Vec<Cell> {
        vec![
            Cell::new(&self.id),
            text_cell(self.name.as_deref()),
            text_cell(self.phone_number.as_deref()),
            text_cell(self.email.as_deref()),
            text_cell(self.address.as_deref()),
            count_cell(self.vehicle_count),
        ]
    }
}

impl TableRow for Vehicle {
    fn headers() -> Vec<&'static str> {
        vec!["VIN", "Model", "Year", "Plate", "Owner", "Registration"]
    }

    fn cells(&self, _ctx: &EvalContext) -> Vec<Cell> {
        let registration = match self.registration() {
            r @ Registration::Registered => badge(r.as_str(), Color::Green),
            r @ Registration::Unregistered => badge(r.as_str(), Color::Yellow),
        };
        vec![
            Cell::new(&self.vin),
            text_cell(self.model_name.as_deref()),
            count_cell(self.product_year),
            text_cell(self.license_plate.as_deref()),
            text_cell(self.owner_name()),
            registration,
        ]
    }
}

impl TableRow for PartPolicy {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID", "Policy", "Part code", "Part name", "Start", "End", "Coverage", "Status",
        ]
    }

    fn cells(&self, ctx: &EvalContext) -> Vec<Cell> {
        let coverage = match self.coverage_on(ctx.today) {
            Some(c @ Coverage::Available) => badge(c.label(), Color::Green),
            Some(c @ Coverage::Expired) => badge(c.label(), Color::Red),
            None => Cell::new(EMPTY_CELL),
        };
        let status = match self.status {
            Some(s @ PolicyStatus::Active) => badge(s.as_str(), Color::Green),
            Some(s @ PolicyStatus::Inactive) => badge(s.as_str(), Color::DarkGrey),
            None => Cell::new(EMPTY_CELL),
        };
        vec![
            Cell::new(&self.id),
            text_cell(self.policy_code.as_deref()),
            text_cell(self.part_code.as_deref()),
            text_cell(self.part_name.as_deref()),
            Cell::new(format_opt_date(self.start_date)),
            Cell::new(format_opt_date(self.end_date)),
            coverage,
            status,
        ]
    }
}

impl TableRow for Part {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Code", "Name", "Category"]
    }

    fn cells(&self, _ctx: &EvalContext) -> Vec<Cell> {
        vec![
            Cell::new(&self.id),
            text_cell(self.part_code.as_deref()),
            text_cell(self.part_name.as_deref()),
            text_cell(self.category.as_deref()),
        ]
    }
}

impl TableRow for User {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Email", "Phone", "Role", "Service center", "Status"]
    }

    fn cells(&self, _ctx: &EvalContext) -> Vec<Cell> {
        let status = match self.status {
            Some(s @ UserStatus::Active) => badge(s.as_str(), Color::Green),
            Some(s) => badge(s.as_str(), Color::Red),
            None => Cell::new(EMPTY_CELL),
        };
        vec![
            Cell::new(&self.id),
            text_cell(self.name.as_deref()),
            text_cell(self.email.as_deref()),
            text_cell(self.phone_number.as_deref()),
            text_cell(self.role.map(|r| r.label())),
            text_cell(self.service_center_id.as_deref()),
            status,
        ]
    }
}
