//! List request and page envelope types shared by the query layer and the HTTP boundary.
//!
//! Parsing of query parameters belongs to the API layer; turning these types into SQL
//! belongs to `modkit-db`. Everything here is pure: values are validated when they are
//! constructed so that downstream builders can match exhaustively without re-checking.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod page;
pub use page::{Page, PageMeta, Pageable, SortMeta};

#[cfg(test)]
mod tests;

/* ---------- errors ---------- */

/// Coarse classification used by the HTTP boundary to pick a status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something unusable.
    Validation,
    /// The store failed while counting or fetching.
    Query,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid filter on field '{field}': {reason}")]
    InvalidFilter { field: String, reason: String },

    #[error("unsupported sort field: {0}")]
    InvalidSortField(String),

    #[error("search term may only contain letters, digits and whitespace")]
    InvalidSearch,

    #[error("invalid '{param}' parameter: {reason}")]
    InvalidParam { param: &'static str, reason: String },

    #[error("database error: {0}")]
    Db(String),

    #[error("list request cancelled")]
    Cancelled,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Db(_) | Error::Cancelled => ErrorKind::Query,
            _ => ErrorKind::Validation,
        }
    }

    /// Field the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::UnknownField(f) | Error::InvalidSortField(f) => Some(f),
            Error::InvalidFilter { field, .. } => Some(field),
            _ => None,
        }
    }

    fn filter(field: &str, reason: impl Into<String>) -> Self {
        Error::InvalidFilter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/* ---------- sort ---------- */

/// One ORDER BY request. Position in the list gives precedence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Sort item as it arrives in `_sort`: `{"id": "name", "desc": true}`.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WireSort {
    pub id: String,
    #[serde(default)]
    pub desc: bool,
}

impl From<WireSort> for SortSpec {
    fn from(w: WireSort) -> Self {
        Self {
            field: w.id,
            descending: w.desc,
        }
    }
}

/* ---------- filter ---------- */

#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMode {
    Contains,
    Between,
    Equals,
    Not,
    LessThan,
    GreaterThan,
}

/// Declared (client-side) data type of a filter value.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Text,
    Number,
    Date,
    Boolean,
}

/// How a filter joins the predicate accumulated from the filters before it.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    #[default]
    And,
    Or,
}

/// Filter item as it arrives in `_filter`.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFilter {
    pub id: String,
    #[serde(default)]
    #[cfg_attr(feature = "with-utoipa", schema(value_type = Object))]
    pub value: serde_json::Value,
    pub match_mode: MatchMode,
    pub data_type: DataType,
    #[serde(default)]
    pub mode: Combinator,
}

/// Typed filter operand. Ranges only exist for BETWEEN.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
    NumberRange(f64, f64),
    DateRange(NaiveDateTime, NaiveDateTime),
}

impl FilterValue {
    pub fn data_type(&self) -> DataType {
        match self {
            FilterValue::Text(_) => DataType::Text,
            FilterValue::Number(_) | FilterValue::NumberRange(..) => DataType::Number,
            FilterValue::Bool(_) => DataType::Boolean,
            FilterValue::Date(_) | FilterValue::DateRange(..) => DataType::Date,
        }
    }
}

/// A validated filter predicate.
///
/// Construct through [`FilterSpec::from_wire`] (or [`FilterSpec::new`]); both reject match
/// mode / data type combinations that cannot be rendered, so every `FilterSpec` in
/// circulation is well formed.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSpec {
    field: String,
    value: FilterValue,
    match_mode: MatchMode,
    combinator: Combinator,
}

impl FilterSpec {
    pub fn new(
        field: impl Into<String>,
        match_mode: MatchMode,
        value: FilterValue,
        combinator: Combinator,
    ) -> Result<Self> {
        let field = field.into();
        check_mode(&field, match_mode, &value)?;
        Ok(Self {
            field,
            value,
            match_mode,
            combinator,
        })
    }

    /// Decode the loosely typed wire value according to the declared `dataType`.
    pub fn from_wire(w: WireFilter) -> Result<Self> {
        let value = decode_value(&w.id, w.match_mode, w.data_type, &w.value)?;
        Self::new(w.id, w.match_mode, value, w.mode)
    }

    pub fn field(&self) -> &str {
        &self.field
    }
    pub fn value(&self) -> &FilterValue {
        &self.value
    }
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }
    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }
}

fn check_mode(field: &str, mode: MatchMode, value: &FilterValue) -> Result<()> {
    use FilterValue as V;
    use MatchMode as M;

    match (mode, value) {
        (M::Contains, V::Text(_)) => Ok(()),
        (M::Contains, _) => Err(Error::filter(field, "CONTAINS requires dataType TEXT")),

        (M::Between, V::NumberRange(lo, hi)) if lo > hi => {
            Err(Error::filter(field, "BETWEEN lower bound exceeds upper bound"))
        }
        (M::Between, V::DateRange(lo, hi)) if lo > hi => {
            Err(Error::filter(field, "BETWEEN lower bound exceeds upper bound"))
        }
        (M::Between, V::NumberRange(..) | V::DateRange(..)) => Ok(()),
        (M::Between, _) => Err(Error::filter(
            field,
            "BETWEEN requires dataType NUMBER or DATE with two bounds",
        )),

        (M::LessThan | M::GreaterThan, V::Number(_) | V::Date(_)) => Ok(()),
        (M::LessThan | M::GreaterThan, _) => Err(Error::filter(
            field,
            format!("{mode:?} requires dataType NUMBER or DATE"),
        )),

        (M::Equals | M::Not, V::NumberRange(..) | V::DateRange(..)) => {
            Err(Error::filter(field, "ranges are only valid with BETWEEN"))
        }
        (M::Equals | M::Not, _) => Ok(()),
    }
}

fn decode_value(
    field: &str,
    mode: MatchMode,
    data_type: DataType,
    raw: &serde_json::Value,
) -> Result<FilterValue> {
    use serde_json::Value as J;

    if mode == MatchMode::Between {
        let bounds = match raw {
            J::Array(items) if items.len() == 2 => items,
            _ => {
                return Err(Error::filter(
                    field,
                    "BETWEEN value must be an array of exactly two bounds",
                ))
            }
        };
        return match data_type {
            DataType::Number => Ok(FilterValue::NumberRange(
                decode_number(field, &bounds[0])?,
                decode_number(field, &bounds[1])?,
            )),
            DataType::Date => Ok(FilterValue::DateRange(
                decode_date(field, &bounds[0], false)?,
                decode_date(field, &bounds[1], true)?,
            )),
            other => Err(Error::filter(
                field,
                format!("BETWEEN is not supported for dataType {other:?}"),
            )),
        };
    }

    Ok(match data_type {
        DataType::Text => FilterValue::Text(match raw {
            J::String(s) => s.clone(),
            J::Number(n) => n.to_string(),
            J::Bool(b) => b.to_string(),
            _ => return Err(Error::filter(field, "expected a text value")),
        }),
        DataType::Number => FilterValue::Number(decode_number(field, raw)?),
        DataType::Boolean => FilterValue::Bool(match raw {
            J::Bool(b) => *b,
            J::String(s) if s.eq_ignore_ascii_case("true") => true,
            J::String(s) if s.eq_ignore_ascii_case("false") => false,
            _ => return Err(Error::filter(field, "expected a boolean value")),
        }),
        DataType::Date => FilterValue::Date(decode_date(field, raw, false)?),
    })
}

fn decode_number(field: &str, raw: &serde_json::Value) -> Result<f64> {
    let n = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|f| f.is_finite())
        .ok_or_else(|| Error::filter(field, "expected a numeric value"))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and bare `YYYY-MM-DD`.
/// A bare date used as an upper bound covers the whole day.
fn decode_date(field: &str, raw: &serde_json::Value, upper: bool) -> Result<NaiveDateTime> {
    let s = match raw {
        serde_json::Value::String(s) => s.trim(),
        _ => return Err(Error::filter(field, "expected a date string")),
    };
    parse_date(s, upper).ok_or_else(|| Error::filter(field, format!("unparseable date '{s}'")))
}

pub fn parse_date(s: &str, end_of_day: bool) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    let d = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let t = if end_of_day {
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?
    } else {
        NaiveTime::MIN
    };
    Some(d.and_time(t))
}

/* ---------- search ---------- */

static SEARCH_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\s]+$").expect("static search regex"));

/// Reject search terms with anything but ASCII letters, digits and whitespace.
/// An empty term is allowed and means "no search".
pub fn validate_search_term(term: &str) -> Result<()> {
    if term.is_empty() || SEARCH_TERM.is_match(term) {
        Ok(())
    } else {
        Err(Error::InvalidSearch)
    }
}

/* ---------- query ---------- */

/// Everything a list request asks for, already decoded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListQuery {
    /// Zero-based page index.
    pub page: u64,
    /// Requested page size; `None` means "use the endpoint default".
    pub size: Option<u64>,
    pub sort: Vec<SortSpec>,
    pub filter: Vec<FilterSpec>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_sort(mut self, sort: Vec<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_filter(mut self, filter: Vec<FilterSpec>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Result<Self> {
        let term = term.into();
        validate_search_term(&term)?;
        self.search = (!term.trim().is_empty()).then_some(term);
        Ok(self)
    }

    /// Build from the raw JSON strings carried in `_sort` / `_filter`.
    pub fn from_raw(
        page: u64,
        size: Option<u64>,
        sort_json: &str,
        filter_json: &str,
        search: Option<&str>,
    ) -> Result<Self> {
        let sort: Vec<WireSort> =
            serde_json::from_str(sort_json).map_err(|e| Error::InvalidParam {
                param: "_sort",
                reason: e.to_string(),
            })?;
        let filter: Vec<WireFilter> =
            serde_json::from_str(filter_json).map_err(|e| Error::InvalidParam {
                param: "_filter",
                reason: e.to_string(),
            })?;
        let filter = filter
            .into_iter()
            .map(FilterSpec::from_wire)
            .collect::<Result<Vec<_>>>()?;

        let q = Self {
            page,
            size,
            sort: sort.into_iter().map(SortSpec::from).collect(),
            filter,
            search: None,
        };
        match search {
            Some(term) => q.with_search(term),
            None => Ok(q),
        }
    }
}
