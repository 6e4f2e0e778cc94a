use clap::{Args, Subcommand, ValueEnum};
use validator::Validate;

use super::{show_page, spin, Context, ListArgs};
use crate::errors::ClientError;
use crate::models::{Registration, Vehicle, VehicleRequest};
use crate::pipeline::{VehicleField, VehicleSortKey};

#[derive(Subcommand)]
pub enum VehiclesCommands {
    /// List vehicles
    List {
        /// registered or unregistered
        #[arg(long)]
        registration: Option<Registration>,
        /// Exact model name
        #[arg(long)]
        model: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<VehicleSort>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Register a vehicle to a customer
    Register {
        #[command(flatten)]
        form: VehicleForm,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum VehicleSort {
    Year,
    Vin,
}

impl From<VehicleSort> for VehicleSortKey {
    fn from(sort: VehicleSort) -> Self {
        match sort {
            VehicleSort::Year => VehicleSortKey::ProductYear,
            VehicleSort::Vin => VehicleSortKey::Vin,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct VehicleForm {
    #[arg(long)]
    pub vin: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub year: i32,
    #[arg(long)]
    pub plate: String,
    /// Owning customer ID
    #[arg(long)]
    pub customer: String,
}

impl From<VehicleForm> for VehicleRequest {
    fn from(form: VehicleForm) -> Self {
        VehicleRequest {
            vin: form.vin.trim().to_ascii_uppercase(),
            model_name: form.model.trim().to_string(),
            product_year: form.year,
            license_plate: form.plate.trim().to_string(),
            customer_id: form.customer.trim().to_string(),
        }
    }
}

pub async fn handle(ctx: &mut Context, command: VehiclesCommands) -> Result<(), ClientError> {
    ctx.require_session()?;
    let mut view = ctx.view::<Vehicle>("vehicles");

    match command {
        VehiclesCommands::List {
            registration,
            model,
            sort,
            list,
        } => {
            if let Some(registration) = registration {
                view.set_filter(VehicleField::Registration, registration.as_str());
            }
            if let Some(model) = model {
                view.set_filter(VehicleField::Model, model);
            }
            list.apply(&mut view, sort.map(Into::into));
            spin("Loading vehicles...", view.reload(&ctx.client)).await?;
        }
        VehiclesCommands::Register { form } => {
            let request = VehicleRequest::from(form);
            request.validate()?;
            spin("Loading vehicles...", view.reload(&ctx.client)).await?;
            spin(
                "Registering vehicle...",
                view.create(&ctx.client, ctx.client.register_vehicle(&request)),
            )
            .await?;
            ctx.notifier
                .success(format!("Vehicle {} registered", request.vin));
        }
    }

    show_page(ctx, &view)
}
