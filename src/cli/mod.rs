//! Command-line surface of `evw-admin`.
//!
//! Every list command loads the full collection into a [`ListView`], applies
//! the search/filter/sort/page flags and prints one page. Mutating commands go
//! through the view's reconciler and print the reconciled first page.

mod campaigns;
mod customers;
mod parts;
mod policies;
mod session;
mod users;
mod vehicles;

pub use campaigns::CampaignsCommands;
pub use customers::CustomersCommands;
pub use parts::PartsCommands;
pub use policies::PoliciesCommands;
pub use users::UsersCommands;
pub use vehicles::VehiclesCommands;

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::ApiClient;
use crate::auth::Session;
use crate::config::Config;
use crate::errors::ClientError;
use crate::models::wire::parse_date;
use crate::notify::{self, NoticeFeed, NoticeLevel, Notifier};
use crate::pipeline::{EvalContext, Filterable, SortConfig, SortDirection, Sortable};
use crate::render::{self, TableRow};
use crate::view::{Keyed, ListView};

#[derive(Parser)]
#[command(name = "evw-admin")]
#[command(about = "Admin client for the EV warranty management backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Remove the stored session
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Dashboard counts across all collections
    Overview,
    /// Recall and service campaigns
    #[command(subcommand)]
    Campaigns(CampaignsCommands),
    /// Vehicle owners
    #[command(subcommand)]
    Customers(CustomersCommands),
    /// Vehicles and their registration
    #[command(subcommand)]
    Vehicles(VehiclesCommands),
    /// Part warranty policies
    #[command(subcommand)]
    Policies(PoliciesCommands),
    /// Part catalog and part requests
    #[command(subcommand)]
    Parts(PartsCommands),
    /// Staff accounts
    #[command(subcommand)]
    Users(UsersCommands),
}

/// Flags shared by every list command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Case-insensitive text search
    #[arg(short, long)]
    pub search: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Page to show, clamped to the last page
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Rows per page, defaults to EVW_PAGE_SIZE
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl ListArgs {
    /// Apply search, sort and paging. Filters must already be set, since every
    /// criteria change resets the page.
    pub fn apply<T>(&self, view: &mut ListView<T>, sort: Option<T::SortKey>)
    where
        T: Filterable + Sortable + Keyed + Send,
    {
        if let Some(search) = &self.search {
            view.set_search(search.as_str());
        }
        if let Some(page_size) = self.page_size {
            view.set_page_size(page_size);
        }
        if let Some(key) = sort {
            let direction = if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            view.set_sort(Some(SortConfig { key, direction }));
        }
        view.go_to_page(self.page);
    }
}

/// Everything a command needs: config, client, session and the notice feed.
pub struct Context {
    pub config: Config,
    pub client: ApiClient,
    pub session: Option<Session>,
    pub notifier: Notifier,
    pub feed: NoticeFeed,
    pub eval: EvalContext,
}

impl Context {
    pub async fn load(config: Config) -> Result<Self, ClientError> {
        let session = Session::load(&config.session_path).await?;
        let client = ApiClient::new(&config, session.as_ref())?;
        let (notifier, feed) = notify::channel();
        Ok(Self {
            config,
            client,
            session,
            notifier,
            feed,
            eval: EvalContext::now(),
        })
    }

    /// The current session, or an error telling the operator to log in.
    pub fn require_session(&self) -> Result<&Session, ClientError> {
        let session = self.session.as_ref().ok_or_else(|| {
            ClientError::Session("Not logged in. Run `evw-admin login` first.".to_string())
        })?;
        if session.claims().is_expired(chrono::Utc::now()) {
            return Err(ClientError::Session(
                "Session has expired. Run `evw-admin login` again.".to_string(),
            ));
        }
        Ok(session)
    }

    /// A fresh view wired to this context's notifier and config.
    pub fn view<T>(&self, name: &'static str) -> ListView<T>
    where
        T: Filterable + Sortable + Keyed + Send,
    {
        ListView::new(name, self.config.page_size, self.notifier.clone())
            .with_refetch_interval(self.config.refetch_interval)
    }

    /// Print queued notices. Returns whether any of them was an error.
    pub fn print_notices(&mut self) -> bool {
        let mut had_error = false;
        for notice in self.feed.drain() {
            match notice.level {
                NoticeLevel::Success => println!("{} {}", "✓".green().bold(), notice.message),
                NoticeLevel::Info => println!("{} {}", "i".cyan().bold(), notice.message),
                NoticeLevel::Error => {
                    had_error = true;
                    eprintln!("{} {}", "✗".red().bold(), notice.message.red());
                }
            }
        }
        had_error
    }
}

/// Run a command to completion, printing notices and any unreported error.
pub async fn run(cli: Cli, config: Config) -> Result<(), ClientError> {
    let mut ctx = Context::load(config).await?;
    let result = dispatch(&mut ctx, cli.command).await;
    let reported = ctx.print_notices();
    if let Err(e) = &result {
        if !reported {
            eprintln!("{} {}", "✗".red().bold(), e.user_message().red());
        }
    }
    result
}

async fn dispatch(ctx: &mut Context, command: Commands) -> Result<(), ClientError> {
    match command {
        Commands::Login { email, password } => session::login(ctx, email, password).await,
        Commands::Logout => session::logout(ctx).await,
        Commands::Whoami => session::whoami(ctx),
        Commands::Overview => session::overview(ctx).await,
        Commands::Campaigns(command) => campaigns::handle(ctx, command).await,
        Commands::Customers(command) => customers::handle(ctx, command).await,
        Commands::Vehicles(command) => vehicles::handle(ctx, command).await,
        Commands::Policies(command) => policies::handle(ctx, command).await,
        Commands::Parts(command) => parts::handle(ctx, command).await,
        Commands::Users(command) => users::handle(ctx, command).await,
    }
}

/// Await `fut` behind a terminal spinner.
pub(crate) async fn spin<F: Future>(message: &str, fut: F) -> F::Output {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    pb.finish_and_clear();
    out
}

/// Print the current page of `view`.
pub(crate) fn show_page<T>(ctx: &Context, view: &ListView<T>) -> Result<(), ClientError>
where
    T: TableRow + Filterable + Sortable + Keyed + Send,
{
    let eval = ctx.eval;
    let out = render::guarded(view.name(), || {
        render::render_page(&view.visible(&eval), &eval)
    })?;
    println!("{}", out);
    Ok(())
}

/// Clap parser for dates in either wire or display format.
pub(crate) fn date_arg(input: &str) -> Result<NaiveDate, String> {
    parse_date(input)
        .ok_or_else(|| format!("'{}' is not a date (yyyy-mm-dd or dd/mm/yyyy)", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_flags() {
        let cli = Cli::try_parse_from([
            "evw-admin",
            "campaigns",
            "list",
            "--status",
            "active",
            "--sort",
            "end",
            "--desc",
            "--page",
            "2",
        ])
        .unwrap();
        let Commands::Campaigns(CampaignsCommands::List { list, .. }) = cli.command else {
            panic!("expected campaigns list");
        };
        assert!(list.desc);
        assert_eq!(list.page, 2);
        assert_eq!(list.page_size, None);
    }

    #[test]
    fn test_date_arg_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(date_arg("2024-01-31"), Ok(expected));
        assert_eq!(date_arg("31/01/2024"), Ok(expected));
        assert!(date_arg("January").is_err());
    }

    #[test]
    fn test_unknown_role_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["evw-admin", "users", "list", "--role", "manager"]);
        assert!(result.is_err());
    }
}
