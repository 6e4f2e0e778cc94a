use clap::{Args, Subcommand, ValueEnum};
use validator::Validate;

use super::{show_page, spin, Context, ListArgs};
use crate::errors::ClientError;
use crate::models::{Customer, CustomerRequest, OwnershipIndex, Vehicle};
use crate::pipeline::{paginate, CustomerSortKey};
use crate::render;

#[derive(Subcommand)]
pub enum CustomersCommands {
    /// List customers
    List {
        #[arg(long, value_enum)]
        sort: Option<CustomerSort>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create a customer
    Create {
        #[command(flatten)]
        form: CustomerForm,
    },
    /// Update a customer
    Update {
        /// Customer ID to update
        id: String,
        #[command(flatten)]
        form: CustomerForm,
    },
    /// List the vehicles registered to a customer
    Vehicles {
        /// Customer ID
        id: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CustomerSort {
    Name,
    Vehicles,
}

impl From<CustomerSort> for CustomerSortKey {
    fn from(sort: CustomerSort) -> Self {
        match sort {
            CustomerSort::Name => CustomerSortKey::Name,
            CustomerSort::Vehicles => CustomerSortKey::VehicleCount,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CustomerForm {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub address: String,
}

impl From<CustomerForm> for CustomerRequest {
    fn from(form: CustomerForm) -> Self {
        CustomerRequest {
            name: form.name.trim().to_string(),
            phone_number: form.phone.trim().to_string(),
            email: form.email.trim().to_string(),
            address: form.address.trim().to_string(),
        }
    }
}

pub async fn handle(ctx: &mut Context, command: CustomersCommands) -> Result<(), ClientError> {
    ctx.require_session()?;
    let mut view = ctx.view::<Customer>("customers");

    match command {
        CustomersCommands::List { sort, list } => {
            list.apply(&mut view, sort.map(Into::into));
            spin("Loading customers...", view.reload(&ctx.client)).await?;
        }
        CustomersCommands::Create { form } => {
            let request = CustomerRequest::from(form);
            request.validate()?;
            spin("Loading customers...", view.reload(&ctx.client)).await?;
            spin(
                "Creating customer...",
                view.create(&ctx.client, ctx.client.create_customer(&request)),
            )
            .await?;
            ctx.notifier
                .success(format!("Customer {} created", request.name));
        }
        CustomersCommands::Update { id, form } => {
            let request = CustomerRequest::from(form);
            request.validate()?;
            spin("Loading customers...", view.reload(&ctx.client)).await?;
            spin(
                "Updating customer...",
                view.update(&ctx.client, ctx.client.update_customer(&id, &request)),
            )
            .await?;
            ctx.notifier
                .success(format!("Customer {} updated", request.name));
        }
        CustomersCommands::Vehicles { id } => return show_owned_vehicles(ctx, &id).await,
    }

    show_page(ctx, &view)
}

async fn show_owned_vehicles(ctx: &Context, id: &str) -> Result<(), ClientError> {
    let (customers, vehicles): (Vec<Customer>, Vec<Vehicle>) = spin(
        "Loading customers and vehicles...",
        async { tokio::try_join!(ctx.client.list_customers(), ctx.client.list_vehicles()) },
    )
    .await?;

    let customer = customers
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| ClientError::NotFound(format!("Customer {}", id)))?;

    let index = OwnershipIndex::build(&vehicles);
    let owned = index.vehicles_of(customer);
    println!(
        "Vehicles of {}",
        customer.name.as_deref().unwrap_or(customer.id.as_str())
    );

    let eval = ctx.eval;
    let out = render::guarded("customer vehicles", || {
        let count = owned.len();
        render::render_page(&paginate(owned, count, 1), &eval)
    })?;
    println!("{}", out);
    Ok(())
}
