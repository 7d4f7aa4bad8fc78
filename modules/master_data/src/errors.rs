//! Error catalog of the master_data module.

use modkit::api::problem::{Problem, ProblemResponse};
use modkit_errors::{err_def, ErrDef};

const NOT_FOUND: ErrDef = err_def!(404, "Record Not Found", "master_data.record.not_found.v1");
const CONFLICT: ErrDef = err_def!(409, "Record Already Exists", "master_data.record.conflict.v1");
const VALIDATION: ErrDef = err_def!(400, "Validation Error", "master_data.record.validation.v1");
const INTERNAL_DB: ErrDef = err_def!(500, "Internal Error", "master_data.internal.database.v1");

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    master_data_record_not_found_v1,
    master_data_record_conflict_v1,
    master_data_record_validation_v1,
    master_data_internal_database_v1,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 4] = [
        ErrorCode::master_data_record_not_found_v1,
        ErrorCode::master_data_record_conflict_v1,
        ErrorCode::master_data_record_validation_v1,
        ErrorCode::master_data_internal_database_v1,
    ];

    pub const fn def(self) -> ErrDef {
        match self {
            ErrorCode::master_data_record_not_found_v1 => NOT_FOUND,
            ErrorCode::master_data_record_conflict_v1 => CONFLICT,
            ErrorCode::master_data_record_validation_v1 => VALIDATION,
            ErrorCode::master_data_internal_database_v1 => INTERNAL_DB,
        }
    }

    pub fn status(self) -> u16 {
        self.def().status
    }

    pub fn to_problem(self, detail: impl Into<String>) -> Problem {
        self.def().to_problem(detail)
    }

    pub fn respond(self, detail: impl Into<String>, instance: &str) -> ProblemResponse {
        self.def().respond(detail, instance)
    }
}
