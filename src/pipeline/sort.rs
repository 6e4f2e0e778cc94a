//! Sort comparator keyed by `{field, direction}`.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// Which field to sort by and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K> SortConfig<K> {
    pub fn asc(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }
}

/// A comparable value extracted from an entity for sorting.
///
/// Values for one key always use the same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Date(NaiveDate),
    Number(i64),
    /// Lower-cased text, so ordering ignores case.
    Text(Cow<'a, str>),
}

impl<'a> SortValue<'a> {
    pub fn text(value: &'a str) -> Self {
        if value.chars().any(char::is_uppercase) {
            SortValue::Text(Cow::Owned(value.to_lowercase()))
        } else {
            SortValue::Text(Cow::Borrowed(value))
        }
    }
}

/// An entity that can be ordered by a closed set of keys.
pub trait Sortable {
    type SortKey: Copy + fmt::Debug;

    fn sort_value(&self, key: Self::SortKey) -> Option<SortValue<'_>>;
}

/// Compare two items under `config`.
///
/// Missing values order before present ones when ascending. Descending flips
/// the comparison only, so equal keys still compare `Equal` and a stable sort
/// keeps them in their original relative order.
pub fn compare<T: Sortable>(a: &T, b: &T, config: SortConfig<T::SortKey>) -> Ordering {
    let left = a.sort_value(config.key);
    let right = b.sort_value(config.key);
    match config.direction {
        SortDirection::Asc => left.cmp(&right),
        SortDirection::Desc => right.cmp(&left),
    }
}

/// Stable sort of references by `config`.
pub fn sort_rows<T: Sortable>(rows: &mut [&T], config: SortConfig<T::SortKey>) {
    // `sort_by` is a stable merge sort.
    rows.sort_by(|a, b| compare(*a, *b, config));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Key {
        Date,
    }

    #[derive(Debug, PartialEq)]
    struct Row {
        id: u32,
        date: Option<NaiveDate>,
    }

    impl Sortable for Row {
        type SortKey = Key;

        fn sort_value(&self, key: Key) -> Option<SortValue<'_>> {
            match key {
                Key::Date => self.date.map(SortValue::Date),
            }
        }
    }

    fn row(id: u32, day: Option<u32>) -> Row {
        Row {
            id,
            date: day.map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap()),
        }
    }

    fn ids(rows: &[&Row]) -> Vec<u32> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_sort_by_date_both_directions() {
        let data = vec![row(1, Some(3)), row(2, Some(1)), row(3, Some(2))];

        let mut rows: Vec<&Row> = data.iter().collect();
        sort_rows(&mut rows, SortConfig::asc(Key::Date));
        assert_eq!(ids(&rows), vec![2, 3, 1]);

        sort_rows(&mut rows, SortConfig::desc(Key::Date));
        assert_eq!(ids(&rows), vec![1, 3, 2]);
    }

    #[test]
    fn test_ties_keep_original_order_in_both_directions() {
        let data = vec![
            row(1, Some(5)),
            row(2, Some(1)),
            row(3, Some(5)),
            row(4, Some(5)),
        ];

        let mut rows: Vec<&Row> = data.iter().collect();
        sort_rows(&mut rows, SortConfig::asc(Key::Date));
        assert_eq!(ids(&rows), vec![2, 1, 3, 4]);

        let mut rows: Vec<&Row> = data.iter().collect();
        sort_rows(&mut rows, SortConfig::desc(Key::Date));
        assert_eq!(ids(&rows), vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_missing_values_first_when_ascending() {
        let data = vec![row(1, Some(2)), row(2, None), row(3, Some(1))];
        let mut rows: Vec<&Row> = data.iter().collect();
        sort_rows(&mut rows, SortConfig::asc(Key::Date));
        assert_eq!(ids(&rows), vec![2, 3, 1]);
    }

    #[test]
    fn test_text_values_ignore_case() {
        assert!(SortValue::text("alpha") < SortValue::text("Beta"));
        assert_eq!(SortValue::text("ABC"), SortValue::text("abc"));
    }
}
