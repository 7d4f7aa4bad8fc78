//! # ModKit - HTTP boundary helpers
//!
//! Shared pieces every REST module needs:
//!
//! - [`api::OperationBuilder`]: type-state route builder that records an OpenAPI operation
//!   for every route it mounts.
//! - [`api::listing::ListParams`]: extractor for the `_page/_size/_sort/_filter/_q` quintet.
//! - [`api::problem`]: RFC 9457 Problem Details.
//! - [`api::response`]: the `{path, timestamp, status, message, data}` success envelope.

pub use anyhow::Result;

pub mod api;
pub use api::{ApiError, ApiResult, OpenApiRegistry, OperationBuilder};
pub use api::problem::{
    bad_request, conflict, internal_error, not_found, Problem, ProblemResponse, ValidationError,
};
pub use api::response::Envelope;
pub use page_core::{ListQuery, Page};
