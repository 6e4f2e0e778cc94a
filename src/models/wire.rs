//! Serde adapters for the backend's wire formats.
//!
//! The backend sends dates as `[year, month, day]` triples (sometimes with a
//! time part appended) and occasionally as ISO strings; identifiers arrive as
//! either numbers or strings. Everything is normalized here so the rest of the
//! crate deals only in `NaiveDate` and `String`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::{Map, Value};

/// Display format for every date shown to the user.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Wire format used when sending dates to the backend.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date as `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Format an optional date, using a dash for missing values.
pub fn format_opt_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "-".to_string())
}

/// A record the backend may echo back from a mutation.
///
/// Every non-key field deserializes with a default, so a partial reply such
/// as `{"id": 1, "status": "INACTIVE"}` would still parse. A reply only
/// counts as the full record when it carries every field a list row needs.
pub trait WireRecord {
    /// Wire names that must be present, possibly `null`.
    const REQUIRED_FIELDS: &'static [&'static str];

    fn is_complete(object: &Map<String, Value>) -> bool {
        Self::REQUIRED_FIELDS
            .iter()
            .all(|field| object.contains_key(*field))
    }
}

/// Free-form replies, e.g. a submitted part request.
impl WireRecord for Value {
    const REQUIRED_FIELDS: &'static [&'static str] = &[];
}

/// Parse a user-entered date in either `yyyy-mm-dd` or `dd/mm/yyyy` form.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    let head = input.get(..10).unwrap_or(input);
    NaiveDate::parse_from_str(head, WIRE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, DISPLAY_DATE_FORMAT))
        .ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireDate {
    Parts(Vec<i64>),
    Text(String),
}

impl WireDate {
    fn into_date(self) -> Option<NaiveDate> {
        match self {
            WireDate::Parts(parts) => match parts.as_slice() {
                [y, m, d, ..] => NaiveDate::from_ymd_opt(
                    i32::try_from(*y).ok()?,
                    u32::try_from(*m).ok()?,
                    u32::try_from(*d).ok()?,
                ),
                _ => None,
            },
            WireDate::Text(text) => parse_date(&text),
        }
    }
}

/// `Option<NaiveDate>` adapter: accepts triples, ISO strings or null.
///
/// Malformed values deserialize to `None` rather than failing the whole
/// collection.
pub mod opt_date {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<WireDate>::deserialize(deserializer).unwrap_or(None);
        Ok(raw.and_then(WireDate::into_date))
    }

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(WIRE_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

/// Identifier adapter: numbers and strings both become `String`.
pub mod id {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match WireId::deserialize(deserializer)? {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        })
    }
}

/// Optional identifier adapter.
pub mod opt_id {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(
            Option::<WireId>::deserialize(deserializer)?.and_then(|id| match id {
                WireId::Number(n) => Some(n.to_string()),
                WireId::Text(s) if s.trim().is_empty() => None,
                WireId::Text(s) => Some(s),
            }),
        )
    }
}
