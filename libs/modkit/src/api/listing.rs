use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use page_core::{Error as ListError, ListQuery};
use serde::Deserialize;

use crate::api::operation_builder::{HandlerSlot, OperationBuilder, ParamLocation, ParamSpec};
use crate::api::problem::ProblemResponse;

pub mod error;
pub use error::list_error_to_problem;

/// Raw list parameters exactly as they arrive on the query string.
#[derive(Deserialize, Default, Debug)]
pub struct RawListParams {
    #[serde(rename = "_page")]
    pub page: Option<String>,
    #[serde(rename = "_size")]
    pub size: Option<String>,
    #[serde(rename = "_sort")]
    pub sort: Option<String>,
    #[serde(rename = "_filter")]
    pub filter: Option<String>,
    #[serde(rename = "_q")]
    pub q: Option<String>,
}

pub const MAX_SORT_LEN: usize = 1024;
pub const MAX_FILTER_LEN: usize = 8 * 1024;
pub const MAX_SORT_FIELDS: usize = 10;
pub const MAX_FILTERS: usize = 50;

fn parse_index(param: &'static str, raw: Option<&str>) -> Result<Option<u64>, ListError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<u64>().map(Some).map_err(|_| ListError::InvalidParam {
            param,
            reason: format!("'{s}' is not a non-negative integer"),
        }),
    }
}

fn json_or_empty(raw: Option<&str>) -> &str {
    match raw.map(str::trim) {
        None | Some("") => "[]",
        Some(s) => s,
    }
}

fn too_long(param: &'static str, max: usize) -> ListError {
    ListError::InvalidParam {
        param,
        reason: format!("longer than {max} bytes"),
    }
}

/// Decode and validate `_page`, `_size`, `_sort`, `_filter` and `_q`.
///
/// Missing `_page` means page 0; missing `_size` is left to the endpoint default.
/// `_sort` and `_filter` default to `[]`. A blank `_q` is the same as no search.
pub fn parse_list_params(raw: &RawListParams) -> Result<ListQuery, ListError> {
    let page = parse_index("_page", raw.page.as_deref())?.unwrap_or(0);
    let size = parse_index("_size", raw.size.as_deref())?;

    let sort = json_or_empty(raw.sort.as_deref());
    if sort.len() > MAX_SORT_LEN {
        return Err(too_long("_sort", MAX_SORT_LEN));
    }
    let filter = json_or_empty(raw.filter.as_deref());
    if filter.len() > MAX_FILTER_LEN {
        return Err(too_long("_filter", MAX_FILTER_LEN));
    }

    let q = ListQuery::from_raw(page, size, sort, filter, raw.q.as_deref())?;

    if q.sort.len() > MAX_SORT_FIELDS {
        return Err(ListError::InvalidParam {
            param: "_sort",
            reason: format!("at most {MAX_SORT_FIELDS} sort fields"),
        });
    }
    if q.filter.len() > MAX_FILTERS {
        return Err(ListError::InvalidParam {
            param: "_filter",
            reason: format!("at most {MAX_FILTERS} filters"),
        });
    }
    Ok(q)
}

/// Axum extractor for list endpoints. Rejects with `application/problem+json`.
///
/// ```ignore
/// async fn list_roles(ListParams(q): ListParams, /* ... */) { /* use `q` */ }
/// ```
#[derive(Debug, Clone)]
pub struct ListParams(pub ListQuery);

impl ListParams {
    #[inline]
    pub fn into_inner(self) -> ListQuery {
        self.0
    }
}

impl std::ops::Deref for ListParams {
    type Target = ListQuery;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let instance = parts.uri.path().to_string();
        let Query(raw) = Query::<RawListParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| crate::api::problem::bad_request(e.body_text()))?;

        parse_list_params(&raw)
            .map(ListParams)
            .map_err(|e| list_error_to_problem(&e, &instance))
    }
}

/// Documents the list query parameters on an operation.
pub trait OperationBuilderListExt {
    /// `fields` names the filterable/sortable fields for the parameter descriptions.
    fn with_list_params(self, fields: &[&str]) -> Self;
}

impl<H, R, S> OperationBuilderListExt for OperationBuilder<H, R, S>
where
    H: HandlerSlot<S>,
{
    fn with_list_params(self, fields: &[&str]) -> Self {
        let allowed = fields.join(", ");
        let query = |name: &str, ty: &str, desc: String| ParamSpec {
            name: name.to_string(),
            location: ParamLocation::Query,
            required: false,
            description: Some(desc),
            param_type: ty.to_string(),
        };
        self.param(query("_page", "integer", "Zero-based page index (default 0)".into()))
            .param(query("_size", "integer", "Page size".into()))
            .param(query(
                "_sort",
                "string",
                format!(r#"JSON array of {{"id","desc"}}. Fields: {allowed}"#),
            ))
            .param(query(
                "_filter",
                "string",
                format!(
                    r#"JSON array of {{"id","value","matchMode","dataType","mode"}}. Fields: {allowed}"#
                ),
            ))
            .param(query(
                "_q",
                "string",
                "Case-insensitive search over text fields; letters, digits and spaces".into(),
            ))
    }
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod listing_tests;
