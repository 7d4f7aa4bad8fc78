//! Type-safe API operation builder with compile-time guarantees, plus the request and
//! response shapes shared by REST modules.

pub mod error;
pub mod listing;
pub mod operation_builder;
pub mod problem;
pub mod response;

pub use error::{ApiError, ApiResult};
pub use listing::{list_error_to_problem, ListParams, OperationBuilderListExt};
pub use operation_builder::{
    ensure_schema, state, Missing, OpenApiRegistry, OperationBuilder, OperationSpec,
    ParamLocation, ParamSpec, Present, RequestBodySpec, ResponseSpec,
};
pub use problem::{bad_request, conflict, internal_error, not_found};
