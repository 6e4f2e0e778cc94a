use colored::*;

use super::{spin, Context};
use crate::analytics::Overview;
use crate::api::LoginRequest;
use crate::auth::Session;
use crate::errors::ClientError;
use crate::render;

pub async fn login(ctx: &mut Context, email: String, password: String) -> Result<(), ClientError> {
    let request = LoginRequest {
        email: email.trim().to_string(),
        password,
    };
    let session = spin("Logging in...", ctx.client.login(&request)).await?;
    session.save(&ctx.config.session_path).await?;

    let name = session
        .claims()
        .name
        .clone()
        .unwrap_or_else(|| request.email.clone());
    ctx.client = ctx.client.with_session(&session);
    ctx.session = Some(session);
    ctx.notifier.success(format!("Logged in as {}", name));
    Ok(())
}

pub async fn logout(ctx: &mut Context) -> Result<(), ClientError> {
    if Session::clear(&ctx.config.session_path).await? {
        ctx.notifier.success("Logged out");
    } else {
        ctx.notifier.info("No active session");
    }
    ctx.session = None;
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<(), ClientError> {
    let claims = ctx.require_session()?.claims();
    let dash = || "-".to_string();

    println!("{}", "Logged-in account".blue().bold());
    println!("  Email:          {}", claims.email.clone().unwrap_or_else(dash));
    println!("  Name:           {}", claims.name.clone().unwrap_or_else(dash));
    println!(
        "  Role:           {}",
        claims.role.map(|r| r.label().to_string()).unwrap_or_else(dash)
    );
    println!(
        "  Service center: {}",
        claims.service_center_id.clone().unwrap_or_else(dash)
    );
    println!(
        "  Expires:        {}",
        claims
            .expires_at()
            .map(|at| at.format("%d/%m/%Y %H:%M UTC").to_string())
            .unwrap_or_else(dash)
    );
    Ok(())
}

pub async fn overview(ctx: &Context) -> Result<(), ClientError> {
    ctx.require_session()?;
    let client = &ctx.client;
    let (campaigns, policies, vehicles, users) = spin("Loading overview...", async {
        tokio::try_join!(
            client.list_campaigns(),
            client.list_part_policies(),
            client.list_vehicles(),
            client.list_users(),
        )
    })
    .await?;

    let overview = Overview::compute(&campaigns, &policies, &vehicles, &users, &ctx.eval);
    let out = render::guarded("overview", || render::render_overview(&overview))?;
    println!("{}", "Warranty overview".blue().bold());
    println!("{}", out);
    Ok(())
}
