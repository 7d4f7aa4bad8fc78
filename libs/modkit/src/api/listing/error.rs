use crate::api::problem::{Problem, ProblemResponse, ValidationError};
use axum::http::StatusCode;
use page_core::Error as ListError;

fn pointer_for(e: &ListError) -> Option<ValidationError> {
    let pointer = match e {
        ListError::InvalidPageSize => "/_size".to_string(),
        ListError::InvalidSortField(_) => "/_sort".to_string(),
        ListError::UnknownField(_) | ListError::InvalidFilter { .. } => "/_filter".to_string(),
        ListError::InvalidSearch => "/_q".to_string(),
        ListError::InvalidParam { param, .. } => format!("/{param}"),
        ListError::Db(_) | ListError::Cancelled => return None,
    };
    Some(ValidationError {
        detail: e.to_string(),
        pointer,
    })
}

/// Map list errors to RFC 9457 Problem responses.
///
/// Validation problems echo the offending field back to the caller. Store failures are
/// logged here and answered with a redacted 500.
pub fn list_error_to_problem(e: &ListError, instance: &str) -> ProblemResponse {
    let (status, title, code) = match e {
        ListError::InvalidPageSize => (StatusCode::BAD_REQUEST, "Invalid page size", "LIST_INVALID_SIZE"),
        ListError::UnknownField(_) => (StatusCode::BAD_REQUEST, "Unknown field", "LIST_UNKNOWN_FIELD"),
        ListError::InvalidFilter { .. } => (StatusCode::BAD_REQUEST, "Filter error", "LIST_FILTER_INVALID"),
        // A sort key naming no column is caller input: reported as a validation problem
        // (400), not as a failed query (500).
        ListError::InvalidSortField(_) => (
            StatusCode::BAD_REQUEST,
            "Unsupported sort field",
            "LIST_UNSUPPORTED_SORT_FIELD",
        ),
        ListError::InvalidSearch => (StatusCode::BAD_REQUEST, "Invalid search term", "LIST_SEARCH_INVALID"),
        ListError::InvalidParam { .. } => (StatusCode::BAD_REQUEST, "Invalid parameter", "LIST_PARAM_INVALID"),
        ListError::Db(_) => {
            tracing::error!(error = %e, instance, "list query failed");
            return Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
                "An internal database error occurred",
            )
            .with_type("https://errors.example.com/INTERNAL_DB")
            .with_code("INTERNAL_DB")
            .with_instance(instance)
            .with_current_span()
            .into();
        }
        ListError::Cancelled => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Request cancelled",
            "LIST_CANCELLED",
        ),
    };

    let mut problem = Problem::new(status, title, e.to_string())
        .with_type(format!("https://errors.example.com/{code}"))
        .with_code(code)
        .with_instance(instance)
        .with_current_span();
    if let Some(err) = pointer_for(e) {
        problem = problem.with_errors(vec![err]);
    }
    problem.into()
}
