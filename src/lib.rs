//! EV warranty admin client.
//!
//! Talks to the warranty REST backend and keeps list views of campaigns,
//! customers, vehicles, part policies, parts and users. Lists are fetched
//! whole; search, filtering, sorting and paging run client-side, and mutations
//! are reconciled into the held collections.

pub mod analytics;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod render;
pub mod validation;
pub mod view;
