use thiserror::Error;

use crate::contract::error::MasterDataError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: &'static str, id: i64 },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn already_exists(kind: &'static str, id: i64) -> Self {
        Self::AlreadyExists { kind, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<DomainError> for MasterDataError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { kind, id } => Self::not_found(kind, id),
            DomainError::AlreadyExists { kind, id } => Self::conflict(kind, id),
            DomainError::Validation { field, message } => {
                Self::validation(format!("{field}: {message}"))
            }
            DomainError::Database { .. } | DomainError::Internal { .. } => Self::internal(),
        }
    }
}

impl From<page_core::Error> for MasterDataError {
    fn from(e: page_core::Error) -> Self {
        match e.kind() {
            page_core::ErrorKind::Validation => Self::validation(e.to_string()),
            page_core::ErrorKind::Query => Self::internal(),
        }
    }
}
