//! Data models for the EV warranty backend.
//!
//! Records are mirrored verbatim from the backend; derived fields (campaign
//! status, policy coverage, vehicle registration) are methods, never stored.

mod campaign;
mod customer;
mod part;
mod part_policy;
mod user;
mod vehicle;
pub mod wire;

pub use campaign::*;
pub use customer::*;
pub use part::*;
pub use part_policy::*;
pub use user::*;
pub use vehicle::*;
