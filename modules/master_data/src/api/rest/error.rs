use modkit::api::problem::{ProblemResponse, ValidationError};
use modkit::ApiError;

use crate::domain::error::DomainError;
use crate::errors::ErrorCode;

/// Handler result: list failures and domain failures both end up as Problem Details.
pub type MasterResult<T> = modkit::ApiResult<T, ProblemResponse>;

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::NotFound { .. } => {
            ErrorCode::master_data_record_not_found_v1.respond(e.to_string(), instance)
        }
        DomainError::AlreadyExists { .. } => {
            ErrorCode::master_data_record_conflict_v1.respond(e.to_string(), instance)
        }
        DomainError::Validation { field, message } => {
            let ProblemResponse(problem) =
                ErrorCode::master_data_record_validation_v1.respond(e.to_string(), instance);
            problem
                .with_errors(vec![ValidationError {
                    detail: message.clone(),
                    pointer: format!("/{field}"),
                }])
                .into()
        }
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            ErrorCode::master_data_internal_database_v1
                .respond("An internal database error occurred", instance)
        }
        DomainError::Internal { .. } => {
            tracing::error!(error = ?e, "Internal error occurred");
            ErrorCode::master_data_internal_database_v1
                .respond("An internal error occurred", instance)
        }
    }
}

pub fn domain_error(e: &DomainError, instance: &str) -> ApiError<ProblemResponse> {
    ApiError::from_domain(map_domain_error(e, instance))
}
