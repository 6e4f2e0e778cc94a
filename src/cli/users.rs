use clap::{Args, Subcommand, ValueEnum};
use validator::Validate;

use super::{show_page, spin, Context, ListArgs};
use crate::errors::ClientError;
use crate::models::{CreateUserRequest, Role, UpdateUserRequest, User, UserStatus};
use crate::pipeline::{UserField, UserSortKey};
use crate::view::Keyed;

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List user accounts
    List {
        /// admin, evm-staff, sc-staff or sc-technician
        #[arg(long)]
        role: Option<Role>,
        /// active or inactive
        #[arg(long)]
        status: Option<UserStatus>,
        #[arg(long)]
        service_center: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<UserSort>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create an account
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[command(flatten)]
        form: UserForm,
    },
    /// Update an account
    Update {
        /// User ID to update
        id: String,
        #[command(flatten)]
        form: UserForm,
    },
    /// Activate an inactive account or deactivate an active one
    Toggle {
        /// User ID to toggle
        id: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum UserSort {
    Name,
    Email,
}

impl From<UserSort> for UserSortKey {
    fn from(sort: UserSort) -> Self {
        match sort {
            UserSort::Name => UserSortKey::Name,
            UserSort::Email => UserSortKey::Email,
        }
    }
}

/// Fields shared by the create and edit forms.
#[derive(Args, Debug, Clone)]
pub struct UserForm {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub role: Role,
    /// Required for service center roles
    #[arg(long)]
    pub service_center: Option<String>,
}

fn center(value: Option<String>) -> Option<String> {
    value
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

pub async fn handle(ctx: &mut Context, command: UsersCommands) -> Result<(), ClientError> {
    ctx.require_session()?;
    let mut view = ctx.view::<User>("users");

    match command {
        UsersCommands::List {
            role,
            status,
            service_center,
            sort,
            list,
        } => {
            if let Some(role) = role {
                view.set_filter(UserField::Role, role.as_str());
            }
            if let Some(status) = status {
                view.set_filter(UserField::Status, status.as_str());
            }
            if let Some(center) = service_center {
                view.set_filter(UserField::ServiceCenter, center);
            }
            list.apply(&mut view, sort.map(Into::into));
            spin("Loading users...", view.reload(&ctx.client)).await?;
        }
        UsersCommands::Create {
            email,
            password,
            form,
        } => {
            let request = CreateUserRequest {
                email: email.trim().to_string(),
                password,
                name: form.name.trim().to_string(),
                phone_number: form.phone.trim().to_string(),
                role: form.role,
                service_center_id: center(form.service_center),
            };
            request.validate()?;
            spin("Loading users...", view.reload(&ctx.client)).await?;
            spin(
                "Creating account...",
                view.create(&ctx.client, ctx.client.create_user(&request)),
            )
            .await?;
            ctx.notifier
                .success(format!("Account {} created", request.email));
        }
        UsersCommands::Update { id, form } => {
            let request = UpdateUserRequest {
                name: form.name.trim().to_string(),
                phone_number: form.phone.trim().to_string(),
                role: form.role,
                service_center_id: center(form.service_center),
            };
            request.validate()?;
            spin("Loading users...", view.reload(&ctx.client)).await?;
            spin(
                "Updating account...",
                view.update(&ctx.client, ctx.client.update_user(&id, &request)),
            )
            .await?;
            ctx.notifier.success(format!("Account {} updated", id));
        }
        UsersCommands::Toggle { id } => {
            spin("Loading users...", view.reload(&ctx.client)).await?;
            let current = view
                .rows()
                .iter()
                .find(|u| u.key() == id)
                .ok_or_else(|| ClientError::NotFound(format!("User {}", id)))?;
            let next = current.status.unwrap_or(UserStatus::Active).toggled();
            spin(
                "Updating account status...",
                view.toggle(
                    &ctx.client,
                    &id,
                    ctx.client.set_user_status(&id, next),
                    |u: &mut User| u.status = Some(next),
                ),
            )
            .await?;
            ctx.notifier
                .success(format!("Account {} is now {}", id, next.as_str()));
        }
    }

    show_page(ctx, &view)
}
