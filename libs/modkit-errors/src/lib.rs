//! Static error catalog entries and their rendering into Problem Details.
use http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse};

/// Declare a catalog entry; the `type` URL is derived from the code.
///
/// ```
/// use modkit_errors::{err_def, ErrDef};
/// const ROLE_NOT_FOUND: ErrDef = err_def!(404, "Not Found", "MASTER_NOT_FOUND");
/// assert_eq!(ROLE_NOT_FOUND.type_url, "https://errors.example.com/MASTER_NOT_FOUND");
/// ```
#[macro_export]
macro_rules! err_def {
    ($status:expr, $title:expr, $code:literal) => {
        $crate::ErrDef {
            status: $status,
            title: $title,
            code: $code,
            type_url: concat!("https://errors.example.com/", $code),
        }
    };
}

/// One static catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    #[inline]
    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(self.status_code(), self.title, detail.into())
            .with_code(self.code)
            .with_type(self.type_url)
    }

    /// Problem for a concrete request path, tagged with the current span.
    pub fn respond(&self, detail: impl Into<String>, instance: &str) -> ProblemResponse {
        self.to_problem(detail)
            .with_instance(instance)
            .with_current_span()
            .into()
    }
}
