use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use validator::Validate;

use super::{date_arg, show_page, spin, Context, ListArgs};
use crate::errors::ClientError;
use crate::models::{Campaign, CampaignRequest, CampaignStatus};
use crate::pipeline::{CampaignField, CampaignSortKey};

#[derive(Subcommand)]
pub enum CampaignsCommands {
    /// List campaigns
    List {
        /// Derived status: upcoming, active or completed
        #[arg(long)]
        status: Option<CampaignStatus>,
        /// Exact campaign code
        #[arg(long)]
        code: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<CampaignSort>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create a campaign
    Create {
        #[command(flatten)]
        form: CampaignForm,
    },
    /// Update a campaign
    Update {
        /// Campaign ID to update
        id: String,
        #[command(flatten)]
        form: CampaignForm,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CampaignSort {
    Start,
    End,
}

impl From<CampaignSort> for CampaignSortKey {
    fn from(sort: CampaignSort) -> Self {
        match sort {
            CampaignSort::Start => CampaignSortKey::StartDate,
            CampaignSort::End => CampaignSortKey::EndDate,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CampaignForm {
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, value_parser = date_arg)]
    pub start: Option<NaiveDate>,
    #[arg(long, value_parser = date_arg)]
    pub end: Option<NaiveDate>,
    /// First production date of affected vehicles
    #[arg(long, value_parser = date_arg)]
    pub produce_from: Option<NaiveDate>,
    /// Last production date of affected vehicles
    #[arg(long, value_parser = date_arg)]
    pub produce_to: Option<NaiveDate>,
}

impl From<CampaignForm> for CampaignRequest {
    fn from(form: CampaignForm) -> Self {
        CampaignRequest {
            code: form.code.trim().to_string(),
            name: form.name.trim().to_string(),
            description: form.description,
            start_date: form.start,
            end_date: form.end,
            produce_date_from: form.produce_from,
            produce_date_to: form.produce_to,
        }
    }
}

pub async fn handle(ctx: &mut Context, command: CampaignsCommands) -> Result<(), ClientError> {
    ctx.require_session()?;
    let mut view = ctx.view::<Campaign>("campaigns");

    match command {
        CampaignsCommands::List {
            status,
            code,
            sort,
            list,
        } => {
            if let Some(status) = status {
                view.set_filter(CampaignField::Status, status.as_str());
            }
            if let Some(code) = code {
                view.set_filter(CampaignField::Code, code);
            }
            list.apply(&mut view, sort.map(Into::into));
            spin("Loading campaigns...", view.reload(&ctx.client)).await?;
        }
        CampaignsCommands::Create { form } => {
            let request = CampaignRequest::from(form);
            request.validate()?;
            spin("Loading campaigns...", view.reload(&ctx.client)).await?;
            spin(
                "Creating campaign...",
                view.create(&ctx.client, ctx.client.create_campaign(&request)),
            )
            .await?;
            ctx.notifier
                .success(format!("Campaign {} created", request.code));
        }
        CampaignsCommands::Update { id, form } => {
            let request = CampaignRequest::from(form);
            request.validate()?;
            spin("Loading campaigns...", view.reload(&ctx.client)).await?;
            spin(
                "Updating campaign...",
                view.update(&ctx.client, ctx.client.update_campaign(&id, &request)),
            )
            .await?;
            ctx.notifier
                .success(format!("Campaign {} updated", request.code));
        }
    }

    show_page(ctx, &view)
}
