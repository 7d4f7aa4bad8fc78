//! Problem Details produced by the ingress itself, and request id stamping for the ones
//! produced by modules.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};

use crate::request_id::XRequestId;

/// Problem bodies larger than this are passed through untouched.
const MAX_PROBLEM_BODY: usize = 64 * 1024;

/// 404 for requests that match no route.
pub async fn route_not_found(uri: Uri, rid: Option<Extension<XRequestId>>) -> ProblemResponse {
    let mut problem = Problem::new(
        StatusCode::NOT_FOUND,
        "Not Found",
        format!("No route for {}", uri.path()),
    )
    .with_code("api_ingress.route.not_found.v1")
    .with_instance(uri.path());
    if let Some(Extension(XRequestId(id))) = rid {
        problem = problem.with_request_id(id);
    }
    problem.into()
}

/// Sets `request_id` on every `application/problem+json` response that lacks one.
pub async fn stamp_problem_request_id(req: Request, next: Next) -> Response {
    let rid = req.extensions().get::<XRequestId>().cloned();
    let response = next.run(req).await;

    let Some(XRequestId(rid)) = rid else {
        return response;
    };
    let is_problem = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes() == APPLICATION_PROBLEM_JSON.as_bytes());
    if !is_problem {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_PROBLEM_BODY).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = %e, "problem body could not be buffered");
            return (StatusCode::INTERNAL_SERVER_ERROR, "response body error").into_response();
        }
    };
    match serde_json::from_slice::<Problem>(&bytes) {
        Ok(problem) if problem.request_id.is_none() => {
            // status and headers stay as the module set them
            let body = ProblemResponse(problem.with_request_id(rid)).into_response().into_body();
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, body)
        }
        _ => Response::from_parts(parts, Body::from(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_route_is_a_problem() {
        let resp = route_not_found(
            Uri::from_static("/nope"),
            Some(Extension(XRequestId("rid-1".into()))),
        )
        .await;
        assert_eq!(resp.0.status, 404);
        assert_eq!(resp.0.instance, "/nope");
        assert_eq!(resp.0.request_id.as_deref(), Some("rid-1"));
    }
}
