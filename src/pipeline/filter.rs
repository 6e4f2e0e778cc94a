//! Filter predicates: free-text search plus discrete field equality.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Debug;

use super::EvalContext;

/// An entity that can be narrowed by search text and discrete filters.
pub trait Filterable {
    /// Discrete fields a view can filter on.
    type Field: Copy + Ord + Debug;

    /// Values the free-text search looks at. Missing fields are simply absent.
    fn search_fields(&self) -> Vec<&str>;

    /// Current value of a discrete field, `None` when the item has no value.
    ///
    /// Derived fields are computed from `ctx` here, at read time.
    fn field_value(&self, field: Self::Field, ctx: &EvalContext) -> Option<Cow<'_, str>>;
}

/// Search text and discrete filter selections for one list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria<F: Ord> {
    search: String,
    filters: BTreeMap<F, String>,
}

impl<F: Ord> Default for Criteria<F> {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
        }
    }
}

impl<F: Copy + Ord + Debug> Criteria<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.set_search(search);
        self
    }

    pub fn with_filter(mut self, field: F, value: impl Into<String>) -> Self {
        self.set_filter(field, value);
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self, field: F) -> Option<&str> {
        self.filters.get(&field).map(String::as_str)
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Set a discrete filter. An empty value clears it.
    pub fn set_filter(&mut self, field: F, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.filters.remove(&field);
        } else {
            self.filters.insert(field, value);
        }
    }

    pub fn clear_filter(&mut self, field: F) {
        self.filters.remove(&field);
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.filters.clear();
    }

    /// True when no predicate is active.
    pub fn is_pass_through(&self) -> bool {
        self.search.trim().is_empty() && self.filters.is_empty()
    }

    /// Every active predicate holds for `item`.
    pub fn matches<T>(&self, item: &T, ctx: &EvalContext) -> bool
    where
        T: Filterable<Field = F>,
    {
        matches_search(item, &self.search)
            && self
                .filters
                .iter()
                .all(|(field, wanted)| matches_field(item, *field, wanted, ctx))
    }
}

/// Case-insensitive substring match over the item's searchable fields.
pub fn matches_search<T: Filterable>(item: &T, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .into_iter()
        .any(|value| value.to_lowercase().contains(&needle))
}

/// Equality against one discrete field; a missing value never matches.
pub fn matches_field<T: Filterable>(
    item: &T,
    field: T::Field,
    wanted: &str,
    ctx: &EvalContext,
) -> bool {
    if wanted.trim().is_empty() {
        return true;
    }
    item.field_value(field, ctx)
        .is_some_and(|value| value.as_ref() == wanted)
}
