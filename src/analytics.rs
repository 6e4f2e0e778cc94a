//! Dashboard overview counts.
//!
//! Computed client-side from the full collections, with derived fields
//! evaluated for the same date the list views use.

use std::collections::HashMap;

use crate::models::{
    Campaign, CampaignStatus, Coverage, PartPolicy, Registration, Role, User, Vehicle,
};
use crate::pipeline::EvalContext;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignCounts {
    pub upcoming: usize,
    pub active: usize,
    pub completed: usize,
    /// Campaigns missing a start or end date
    pub undated: usize,
}

/// Policies split by coverage and enabled flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyCounts {
    pub available_enabled: usize,
    pub available_disabled: usize,
    pub expired_enabled: usize,
    pub expired_disabled: usize,
    pub undated: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleCounts {
    pub registered: usize,
    pub unregistered: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub campaigns: CampaignCounts,
    pub policies: PolicyCounts,
    pub vehicles: VehicleCounts,
    /// One entry per role in [`Role::ALL`] order
    pub users_by_role: Vec<(Role, usize)>,
    pub users_without_role: usize,
}

impl Overview {
    pub fn compute(
        campaigns: &[Campaign],
        policies: &[PartPolicy],
        vehicles: &[Vehicle],
        users: &[User],
        ctx: &EvalContext,
    ) -> Self {
        let mut campaign_counts = CampaignCounts::default();
        for campaign in campaigns {
            match campaign.status_on(ctx.today) {
                Some(CampaignStatus::Upcoming) => campaign_counts.upcoming += 1,
                Some(CampaignStatus::Active) => campaign_counts.active += 1,
                Some(CampaignStatus::Completed) => campaign_counts.completed += 1,
                None => campaign_counts.undated += 1,
            }
        }

        let mut policy_counts = PolicyCounts::default();
        for policy in policies {
            let slot = match (policy.coverage_on(ctx.today), policy.is_enabled()) {
                (Some(Coverage::Available), true) => &mut policy_counts.available_enabled,
                (Some(Coverage::Available), false) => &mut policy_counts.available_disabled,
                (Some(Coverage::Expired), true) => &mut policy_counts.expired_enabled,
                (Some(Coverage::Expired), false) => &mut policy_counts.expired_disabled,
                (None, _) => &mut policy_counts.undated,
            };
            *slot += 1;
        }

        let mut vehicle_counts = VehicleCounts::default();
        for vehicle in vehicles {
            match vehicle.registration() {
                Registration::Registered => vehicle_counts.registered += 1,
                Registration::Unregistered => vehicle_counts.unregistered += 1,
            }
        }

        let mut by_role: HashMap<Role, usize> = HashMap::new();
        let mut users_without_role = 0;
        for user in users {
            match user.role {
                Some(role) => *by_role.entry(role).or_default() += 1,
                None => users_without_role += 1,
            }
        }
        let users_by_role = Role::ALL
            .iter()
            .map(|role| (*role, by_role.get(role).copied().unwrap_or(0)))
            .collect();

        tracing::debug!(
            campaigns = campaigns.len(),
            policies = policies.len(),
            vehicles = vehicles.len(),
            users = users.len(),
            "Computed overview"
        );

        Self {
            campaigns: campaign_counts,
            policies: policy_counts,
            vehicles: vehicle_counts,
            users_by_role,
            users_without_role,
        }
    }
}
