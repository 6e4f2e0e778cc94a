use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use validator::Validate;

use super::{date_arg, show_page, spin, Context, ListArgs};
use crate::errors::ClientError;
use crate::models::{Coverage, PartPolicy, PartPolicyRequest, PolicyStatus};
use crate::pipeline::{PolicyField, PolicySortKey};
use crate::view::Keyed;

#[derive(Subcommand)]
pub enum PoliciesCommands {
    /// List part policies
    List {
        /// Enablement flag: active or inactive
        #[arg(long)]
        status: Option<PolicyStatus>,
        /// Derived coverage: available or expired
        #[arg(long)]
        coverage: Option<Coverage>,
        #[arg(long)]
        part_code: Option<String>,
        #[arg(long)]
        policy_code: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<PolicySort>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create a part policy
    Create {
        #[command(flatten)]
        form: PolicyForm,
    },
    /// Update a part policy
    Update {
        /// Policy ID to update
        id: String,
        #[command(flatten)]
        form: PolicyForm,
    },
    /// Enable a disabled policy or disable an enabled one
    Toggle {
        /// Policy ID to toggle
        id: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PolicySort {
    Start,
    End,
}

impl From<PolicySort> for PolicySortKey {
    fn from(sort: PolicySort) -> Self {
        match sort {
            PolicySort::Start => PolicySortKey::StartDate,
            PolicySort::End => PolicySortKey::EndDate,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PolicyForm {
    /// Catalog part ID the policy covers
    #[arg(long)]
    pub part_id: String,
    #[arg(long)]
    pub policy_code: String,
    #[arg(long, value_parser = date_arg)]
    pub start: Option<NaiveDate>,
    #[arg(long, value_parser = date_arg)]
    pub end: Option<NaiveDate>,
}

impl From<PolicyForm> for PartPolicyRequest {
    fn from(form: PolicyForm) -> Self {
        PartPolicyRequest {
            part_id: form.part_id.trim().to_string(),
            policy_code: form.policy_code.trim().to_string(),
            start_date: form.start,
            end_date: form.end,
        }
    }
}

pub async fn handle(ctx: &mut Context, command: PoliciesCommands) -> Result<(), ClientError> {
    ctx.require_session()?;
    let mut view = ctx.view::<PartPolicy>("policies");

    match command {
        PoliciesCommands::List {
            status,
            coverage,
            part_code,
            policy_code,
            sort,
            list,
        } => {
            if let Some(status) = status {
                view.set_filter(PolicyField::Status, status.as_str());
            }
            if let Some(coverage) = coverage {
                view.set_filter(PolicyField::Coverage, coverage.as_str());
            }
            if let Some(code) = part_code {
                view.set_filter(PolicyField::PartCode, code);
            }
            if let Some(code) = policy_code {
                view.set_filter(PolicyField::PolicyCode, code);
            }
            list.apply(&mut view, sort.map(Into::into));
            spin("Loading part policies...", view.reload(&ctx.client)).await?;
        }
        PoliciesCommands::Create { form } => {
            let request = PartPolicyRequest::from(form);
            request.validate()?;
            spin("Loading part policies...", view.reload(&ctx.client)).await?;
            spin(
                "Creating part policy...",
                view.create(&ctx.client, ctx.client.create_part_policy(&request)),
            )
            .await?;
            ctx.notifier
                .success(format!("Policy {} created", request.policy_code));
        }
        PoliciesCommands::Update { id, form } => {
            let request = PartPolicyRequest::from(form);
            request.validate()?;
            spin("Loading part policies...", view.reload(&ctx.client)).await?;
            spin(
                "Updating part policy...",
                view.update(&ctx.client, ctx.client.update_part_policy(&id, &request)),
            )
            .await?;
            ctx.notifier
                .success(format!("Policy {} updated", request.policy_code));
        }
        PoliciesCommands::Toggle { id } => {
            spin("Loading part policies...", view.reload(&ctx.client)).await?;
            let current = view
                .rows()
                .iter()
                .find(|p| p.key() == id)
                .ok_or_else(|| ClientError::NotFound(format!("Part policy {}", id)))?;
            // A policy without a status is treated as enabled.
            let next = current.status.unwrap_or(PolicyStatus::Active).toggled();
            spin(
                "Updating policy status...",
                view.toggle(
                    &ctx.client,
                    &id,
                    ctx.client.set_part_policy_status(&id, next),
                    |p: &mut PartPolicy| p.status = Some(next),
                ),
            )
            .await?;
            ctx.notifier
                .success(format!("Policy {} is now {}", id, next.as_str()));
        }
    }

    show_page(ctx, &view)
}
