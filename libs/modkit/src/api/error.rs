use crate::api::problem::ProblemResponse;
use axum::response::IntoResponse;
use page_core::Error as ListError;

/// Unified API error type at the HTTP boundary.
///
/// Handlers return `ApiResult<T, D>` and use `?` on both list-layer and domain errors;
/// each side knows how to become an RFC 9457 response. `D` is the module's domain error.
#[derive(thiserror::Error, Debug)]
pub enum ApiError<D> {
    /// Malformed list request or a failed count/fetch.
    #[error("{source}")]
    List { source: ListError, instance: String },

    /// Domain business logic errors
    #[error(transparent)]
    Domain(D),
}

impl<D> ApiError<D> {
    pub fn from_list(e: ListError, instance: impl Into<String>) -> Self {
        ApiError::List {
            source: e,
            instance: instance.into(),
        }
    }

    pub fn from_domain(e: D) -> Self {
        ApiError::Domain(e)
    }
}

impl<D> From<ListError> for ApiError<D> {
    fn from(e: ListError) -> Self {
        Self::from_list(e, "/")
    }
}

impl<D> IntoResponse for ApiError<D>
where
    D: Into<ProblemResponse>,
{
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::List { source, instance } => {
                crate::api::listing::list_error_to_problem(&source, &instance).into_response()
            }
            ApiError::Domain(e) => e.into().into_response(),
        }
    }
}

/// Each module typically defines its own alias: `type MasterResult<T> = ApiResult<T, DomainError>;`
pub type ApiResult<T, D> = Result<T, ApiError<D>>;
