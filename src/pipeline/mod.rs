//! Client-side list pipeline: filter, then sort, then page.
//!
//! Lists are fetched whole from the backend; search, filtering, ordering and
//! pagination all happen here over the in-memory collection.

mod entities;
mod filter;
mod pager;
mod sort;

pub use entities::*;
pub use filter::*;
pub use pager::*;
pub use sort::*;

use chrono::{Local, NaiveDate};

/// Evaluation context for derived fields.
///
/// Derived values (campaign status, policy coverage) depend on the date they
/// are read on, so every pipeline run carries it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    pub today: NaiveDate,
}

impl EvalContext {
    /// Context for the local wall-clock date.
    pub fn now() -> Self {
        Self {
            today: Local::now().date_naive(),
        }
    }

    pub fn on(today: NaiveDate) -> Self {
        Self { today }
    }
}

/// Apply criteria then sort, returning references into `raw`.
///
/// Pure: the same inputs always produce the same output, and the output only
/// ever contains items of `raw`.
pub fn visible_rows<'a, T>(
    raw: &'a [T],
    criteria: &Criteria<T::Field>,
    sort: Option<SortConfig<T::SortKey>>,
    ctx: &EvalContext,
) -> Vec<&'a T>
where
    T: Filterable + Sortable,
{
    let mut rows: Vec<&T> = raw
        .iter()
        .filter(|item| criteria.matches(*item, ctx))
        .collect();
    if let Some(config) = sort {
        sort_rows(&mut rows, config);
    }
    rows
}
