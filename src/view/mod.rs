//! List view state: the held collection plus its UI criteria.
//!
//! A [`ListView`] owns the raw collection fetched from the backend, the
//! search/filter/sort selections and the current page. Rendering runs the
//! pipeline over the raw rows every time; mutations go through the reconciler
//! in [`reconcile`].

mod reconcile;

pub use reconcile::*;

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::errors::ClientError;
use crate::models::{Campaign, Customer, Part, PartPolicy, User, Vehicle};
use crate::notify::Notifier;
use crate::pipeline::{
    paginate, visible_rows, Criteria, EvalContext, Filterable, Page, SortConfig, Sortable,
};

/// Default minimum age of a load before a navigation refresh refetches.
pub const DEFAULT_REFETCH_INTERVAL: Duration = Duration::from_millis(1000);

/// Stable identity of a record within its collection.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Campaign {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Customer {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Vehicle {
    fn key(&self) -> &str {
        &self.vin
    }
}

impl Keyed for PartPolicy {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Part {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Where a view gets its full collection from.
#[async_trait]
pub trait ListSource<T: Send>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<T>, ClientError>;
}

/// Load state of a view, for loading indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    /// Last load failed; rows are whatever was loaded before.
    Failed,
}

/// A list view over one entity type.
pub struct ListView<T: Filterable + Sortable> {
    name: &'static str,
    rows: Vec<T>,
    criteria: Criteria<T::Field>,
    sort: Option<SortConfig<T::SortKey>>,
    page: usize,
    page_size: usize,
    state: LoadState,
    last_loaded: Option<Instant>,
    refetch_interval: Duration,
    notifier: Notifier,
}

impl<T> ListView<T>
where
    T: Filterable + Sortable + Keyed + Send,
{
    pub fn new(name: &'static str, page_size: usize, notifier: Notifier) -> Self {
        Self {
            name,
            rows: Vec::new(),
            criteria: Criteria::default(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
            state: LoadState::Idle,
            last_loaded: None,
            refetch_interval: DEFAULT_REFETCH_INTERVAL,
            notifier,
        }
    }

    pub fn with_refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = interval;
        self
    }

    pub fn with_sort(mut self, sort: SortConfig<T::SortKey>) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn criteria(&self) -> &Criteria<T::Field> {
        &self.criteria
    }

    pub fn sort(&self) -> Option<SortConfig<T::SortKey>> {
        self.sort
    }

    /// Requested page; the rendered page may be clamped lower.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.set_search(search);
        self.page = 1;
    }

    pub fn set_filter(&mut self, field: T::Field, value: impl Into<String>) {
        self.criteria.set_filter(field, value);
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<SortConfig<T::SortKey>>) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Advance one page, stopping at the last one.
    pub fn next_page(&mut self, ctx: &EvalContext) {
        let current = self.visible(ctx);
        if current.has_next() {
            self.page = current.current_page + 1;
        } else {
            self.page = current.current_page;
        }
    }

    pub fn previous_page(&mut self, ctx: &EvalContext) {
        let current = self.visible(ctx);
        self.page = current.current_page.saturating_sub(1).max(1);
    }

    /// All rows passing the current criteria, in display order.
    pub fn filtered(&self, ctx: &EvalContext) -> Vec<&T> {
        visible_rows(&self.rows, &self.criteria, self.sort, ctx)
    }

    /// The page currently on screen.
    pub fn visible(&self, ctx: &EvalContext) -> Page<&T> {
        paginate(self.filtered(ctx), self.page_size, self.page)
    }

    /// Replace the held rows with a collection loaded elsewhere.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.state = LoadState::Loaded;
        self.last_loaded = Some(Instant::now());
    }

    /// Navigation-triggered refresh.
    ///
    /// Skipped when the previous load is younger than the refetch interval, so
    /// rapid back-and-forth navigation does not stack duplicate fetches.
    /// Returns whether a fetch was made.
    pub async fn refresh(&mut self, source: &dyn ListSource<T>) -> Result<bool, ClientError> {
        if self.state == LoadState::Loaded {
            if let Some(loaded_at) = self.last_loaded {
                if loaded_at.elapsed() < self.refetch_interval {
                    tracing::debug!(view = self.name, "Skipping refresh, data is fresh");
                    return Ok(false);
                }
            }
        }
        self.reload(source).await.map(|()| true)
    }

    /// Fetch the full collection unconditionally.
    ///
    /// On failure the held rows are left as they were.
    pub async fn reload(&mut self, source: &dyn ListSource<T>) -> Result<(), ClientError> {
        self.state = LoadState::Loading;
        match source.fetch_all().await {
            Ok(rows) => {
                tracing::info!(view = self.name, count = rows.len(), "Loaded collection");
                self.set_rows(rows);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(view = self.name, "Failed to load collection: {}", e);
                self.state = LoadState::Failed;
                self.notifier.error(e.user_message());
                Err(e)
            }
        }
    }
}
