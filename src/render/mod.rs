//! Terminal rendering of list pages and the overview.
//!
//! Tables are built with comfy-table. All rendering goes through [`guarded`],
//! which turns a panic inside a renderer into [`ClientError::Render`] so one
//! broken row cannot take the process down.

mod tables;

pub use tables::*;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::analytics::Overview;
use crate::errors::ClientError;
use crate::pipeline::{EvalContext, Page};

/// Placeholder for missing values.
pub const EMPTY_CELL: &str = "-";

/// A record that can be shown as one table row.
pub trait TableRow {
    fn headers() -> Vec<&'static str>;

    fn cells(&self, ctx: &EvalContext) -> Vec<Cell>;
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render one page of a list view, with a position footer.
pub fn render_page<T: TableRow>(page: &Page<&T>, ctx: &EvalContext) -> String {
    if page.items.is_empty() {
        return "No records found".to_string();
    }

    let mut table = new_table();
    table.set_header(T::headers());
    for item in &page.items {
        table.add_row(item.cells(ctx));
    }

    format!(
        "{}\nPage {} of {} ({} records)",
        table, page.current_page, page.total_pages, page.total_items
    )
}

/// Render the overview counts as a two-column table.
pub fn render_overview(overview: &Overview) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Count"]);

    let c = &overview.campaigns;
    let p = &overview.policies;
    let v = &overview.vehicles;
    let mut rows: Vec<(String, usize)> = vec![
        ("Campaigns upcoming".to_string(), c.upcoming),
        ("Campaigns active".to_string(), c.active),
        ("Campaigns completed".to_string(), c.completed),
        ("Policies available, enabled".to_string(), p.available_enabled),
        ("Policies available, disabled".to_string(), p.available_disabled),
        ("Policies expired, enabled".to_string(), p.expired_enabled),
        ("Policies expired, disabled".to_string(), p.expired_disabled),
        ("Vehicles registered".to_string(), v.registered),
        ("Vehicles unregistered".to_string(), v.unregistered),
    ];
    for (role, count) in &overview.users_by_role {
        rows.push((format!("Users: {}", role.label()), *count));
    }
    if overview.users_without_role > 0 {
        rows.push(("Users without role".to_string(), overview.users_without_role));
    }

    for (label, count) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    table.to_string()
}

/// Serializes swaps of the process-wide panic hook.
static PANIC_HOOK: Mutex<()> = Mutex::new(());

/// Run a renderer, reporting a panic as [`ClientError::Render`].
///
/// The default panic hook is silenced for the duration, so the operator sees
/// only the render error and not the raw panic message on stderr.
pub fn guarded<F>(view: &str, render: F) -> Result<String, ClientError>
where
    F: FnOnce() -> String,
{
    let result = {
        let _lock = PANIC_HOOK.lock().unwrap_or_else(|e| e.into_inner());
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let result = panic::catch_unwind(AssertUnwindSafe(render));
        panic::set_hook(previous);
        result
    };
    result.map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::error!(view, "Renderer panicked: {}", reason);
        ClientError::Render(format!("{} view: {}", view, reason))
    })
}

pub(crate) fn text_cell(value: Option<&str>) -> Cell {
    match value {
        Some(v) if !v.trim().is_empty() => Cell::new(v),
        _ => Cell::new(EMPTY_CELL),
    }
}

/// Coloured status badge.
pub(crate) fn badge(label: &str, color: Color) -> Cell {
    Cell::new(label).fg(color)
}
