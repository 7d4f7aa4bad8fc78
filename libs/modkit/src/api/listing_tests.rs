use super::*;
use axum::http::{Request, StatusCode};
use axum::{body::Body, routing::get, Router};
use page_core::{Combinator, FilterValue, MatchMode};
use tower::ServiceExt;

fn raw(pairs: &[(&str, &str)]) -> RawListParams {
    let mut r = RawListParams::default();
    for (k, v) in pairs {
        let v = Some(v.to_string());
        match *k {
            "_page" => r.page = v,
            "_size" => r.size = v,
            "_sort" => r.sort = v,
            "_filter" => r.filter = v,
            "_q" => r.q = v,
            _ => {}
        }
    }
    r
}

#[test]
fn defaults_when_nothing_is_sent() {
    let q = parse_list_params(&RawListParams::default()).unwrap();
    assert_eq!(q.page, 0);
    assert_eq!(q.size, None);
    assert!(q.sort.is_empty());
    assert!(q.filter.is_empty());
    assert_eq!(q.search, None);
}

#[test]
fn full_quintet_is_decoded() {
    let q = parse_list_params(&raw(&[
        ("_page", "2"),
        ("_size", "25"),
        ("_sort", r#"[{"id":"name","desc":true},{"id":"level"}]"#),
        (
            "_filter",
            r#"[{"id":"level","value":[1,5],"matchMode":"BETWEEN","dataType":"NUMBER"},
                {"id":"name","value":"adm","matchMode":"CONTAINS","dataType":"TEXT","mode":"OR"}]"#,
        ),
        ("_q", "super admin"),
    ]))
    .unwrap();

    assert_eq!(q.page, 2);
    assert_eq!(q.size, Some(25));
    assert_eq!(q.sort.len(), 2);
    assert!(q.sort[0].descending);
    assert!(!q.sort[1].descending);
    assert_eq!(q.filter[0].match_mode(), MatchMode::Between);
    assert_eq!(q.filter[0].value(), &FilterValue::NumberRange(1.0, 5.0));
    assert_eq!(q.filter[1].combinator(), Combinator::Or);
    assert_eq!(q.search.as_deref(), Some("super admin"));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let q = parse_list_params(&raw(&[("_page", ""), ("_sort", " "), ("_q", "   ")])).unwrap();
    assert_eq!(q.page, 0);
    assert!(q.sort.is_empty());
    assert_eq!(q.search, None);
}

#[test]
fn negative_page_and_size_are_rejected() {
    let err = parse_list_params(&raw(&[("_page", "-1")])).unwrap_err();
    assert!(matches!(err, ListError::InvalidParam { param: "_page", .. }));

    let err = parse_list_params(&raw(&[("_size", "-5")])).unwrap_err();
    assert!(matches!(err, ListError::InvalidParam { param: "_size", .. }));
}

#[test]
fn zero_size_is_passed_through_for_the_engine_to_reject() {
    let q = parse_list_params(&raw(&[("_size", "0")])).unwrap();
    assert_eq!(q.size, Some(0));
}

#[test]
fn malformed_json_names_the_parameter() {
    let err = parse_list_params(&raw(&[("_filter", "{not json")])).unwrap_err();
    assert!(matches!(err, ListError::InvalidParam { param: "_filter", .. }));
}

#[test]
fn injection_looking_search_is_rejected() {
    let err = parse_list_params(&raw(&[("_q", "x' OR '1'='1")])).unwrap_err();
    assert_eq!(err, ListError::InvalidSearch);
}

#[test]
fn size_limits_are_enforced() {
    let many: Vec<String> = (0..=MAX_SORT_FIELDS)
        .map(|i| format!(r#"{{"id":"f{i}"}}"#))
        .collect();
    let sort = format!("[{}]", many.join(","));
    let err = parse_list_params(&raw(&[("_sort", &sort)])).unwrap_err();
    assert!(matches!(err, ListError::InvalidParam { param: "_sort", .. }));

    let huge = "x".repeat(MAX_FILTER_LEN + 1);
    let err = parse_list_params(&raw(&[("_filter", &huge)])).unwrap_err();
    assert!(matches!(err, ListError::InvalidParam { param: "_filter", .. }));
}

async fn echo(ListParams(q): ListParams) -> String {
    format!("{}:{:?}", q.page, q.size)
}

#[tokio::test]
async fn extractor_accepts_and_rejects_over_http() {
    let app = Router::new().route("/m-role", get(echo));

    let ok = app
        .clone()
        .oneshot(
            Request::get("/m-role?_page=3&_size=7&_sort=%5B%5D")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    let body = axum::body::to_bytes(ok.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"3:Some(7)");

    let bad = app
        .oneshot(Request::get("/m-role?_q=%25%25").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    let ct = bad
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(ct, crate::api::problem::APPLICATION_PROBLEM_JSON);
    let body = axum::body::to_bytes(bad.into_body(), usize::MAX).await.unwrap();
    let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["code"], "LIST_SEARCH_INVALID");
    assert_eq!(v["instance"], "/m-role");
}
