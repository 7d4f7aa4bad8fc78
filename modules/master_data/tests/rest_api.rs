//! End-to-end HTTP behavior of the master resources.

mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use modkit_db::{ConnectOpts, DbHandle};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use master_data::config::MasterDataConfig;
use master_data::MasterData;

use common::MockOpenApiRegistry;

async fn create_test_router() -> Result<Router> {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
    let module = MasterData::new();
    module.migrate(&db).await?;
    module.init(&MasterDataConfig::default(), &db, CancellationToken::new())?;
    module.register_rest(Router::new(), &MockOpenApiRegistry)
}

/// Percent-encode everything except unreserved characters.
fn enc(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, content_type, value)
}

async fn create_role(app: &Router, name: &str, code: &str, level: i64) -> i64 {
    let (status, _, body) = call(
        app,
        Method::POST,
        "/m-role",
        Some(json!({ "name": name, "code": code, "level": level })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn create_wraps_the_record_in_the_envelope() -> Result<()> {
    let app = create_test_router().await?;

    let (status, _, body) = call(
        &app,
        Method::POST,
        "/m-role",
        Some(json!({ "name": "Administrator", "code": "ADM", "level": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    assert_eq!(body["message"], "success");
    assert_eq!(body["path"], "/m-role");
    let data = &body["data"];
    assert!(data["id"].as_i64().unwrap() > 0);
    assert_eq!(data["name"], "Administrator");
    assert_eq!(data["createdBy"], 0);
    assert_eq!(data["isDelete"], false);
    assert!(data["modifiedOn"].is_null());
    assert_eq!(data["createdOn"].as_str().unwrap().len(), 19);
    Ok(())
}

#[tokio::test]
async fn duplicate_id_is_a_conflict() -> Result<()> {
    let app = create_test_router().await?;
    let id = create_role(&app, "Admin", "ADM", 1).await;

    let (status, content_type, body) = call(
        &app,
        Method::POST,
        "/m-role",
        Some(json!({ "id": id, "name": "Other", "code": "OTH" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(content_type, "application/problem+json");
    assert_eq!(body["code"], "master_data.record.conflict.v1");
    assert_eq!(body["instance"], "/m-role");
    Ok(())
}

#[tokio::test]
async fn validation_problem_names_the_field() -> Result<()> {
    let app = create_test_router().await?;

    let (status, _, body) = call(
        &app,
        Method::POST,
        "/m-role",
        Some(json!({ "name": " ", "code": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "master_data.record.validation.v1");
    assert_eq!(body["errors"][0]["pointer"], "/name");

    let (status, _, body) = call(
        &app,
        Method::POST,
        "/m-user",
        Some(json!({ "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["pointer"], "/email");
    Ok(())
}

#[tokio::test]
async fn get_update_and_delete_lifecycle() -> Result<()> {
    let app = create_test_router().await?;
    let id = create_role(&app, "Admin", "ADM", 1).await;
    let item = format!("/m-role/{id}");

    let (status, _, body) = call(&app, Method::GET, &item, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], "ADM");

    let (status, _, body) = call(&app, Method::PUT, &item, Some(json!({ "level": 7 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["level"], 7);
    assert_eq!(body["data"]["name"], "Admin");
    assert_eq!(body["data"]["modifiedBy"], 0);

    let (status, _, body) = call(&app, Method::DELETE, &item, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _, body) = call(&app, Method::GET, &item, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "master_data.record.not_found.v1");

    let (status, _, _) = call(&app, Method::DELETE, &item, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_with_is_delete_hides_the_record() -> Result<()> {
    let app = create_test_router().await?;
    let (_, _, body) = call(&app, Method::POST, "/m-module", Some(json!({ "name": "Reports" }))).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, _, body) = call(
        &app,
        Method::PUT,
        &format!("/m-module/{id}"),
        Some(json!({ "isDelete": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isDelete"], true);
    assert_eq!(body["data"]["deletedBy"], 0);

    let (_, _, body) = call(&app, Method::GET, "/m-module", None).await;
    assert_eq!(body["data"]["totalElements"], 0);
    Ok(())
}

#[tokio::test]
async fn list_returns_a_sorted_page() -> Result<()> {
    let app = create_test_router().await?;
    for i in 1..=5 {
        create_role(&app, &format!("Role {i}"), &format!("R{i}"), i).await;
    }

    let sort = enc(r#"[{"id":"level","desc":true}]"#);
    let (status, _, body) = call(
        &app,
        Method::GET,
        &format!("/m-role?_page=0&_size=2&_sort={sort}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "/m-role");
    let page = &body["data"];
    assert_eq!(page["totalElements"], 5);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["size"], 2);
    assert_eq!(page["first"], true);
    assert_eq!(page["last"], false);
    assert_eq!(page["sort"]["sorted"], true);
    assert_eq!(page["pageable"]["pageNumber"], 0);
    assert_eq!(page["content"][0]["level"], 5);
    assert_eq!(page["content"][1]["level"], 4);
    Ok(())
}

#[tokio::test]
async fn list_filters_and_searches() -> Result<()> {
    let app = create_test_router().await?;
    for (name, phone) in [("Ali Baba", "0811"), ("Budi", "0812")] {
        let (status, _, _) = call(
            &app,
            Method::POST,
            "/m-biodata",
            Some(json!({ "fullname": name, "mobilePhone": phone })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, _, body) = call(&app, Method::GET, "/m-biodata?_q=ali", None).await;
    assert_eq!(body["data"]["totalElements"], 1);
    assert_eq!(body["data"]["content"][0]["fullname"], "Ali Baba");

    let filter = enc(
        r#"[{"id":"mobilePhone","value":"0812","matchMode":"EQUALS","dataType":"TEXT"}]"#,
    );
    let (_, _, body) = call(&app, Method::GET, &format!("/m-biodata?_filter={filter}"), None).await;
    assert_eq!(body["data"]["totalElements"], 1);
    assert_eq!(body["data"]["content"][0]["fullname"], "Budi");
    Ok(())
}

#[tokio::test]
async fn bad_list_parameters_are_problems() -> Result<()> {
    let app = create_test_router().await?;

    let (status, content_type, body) =
        call(&app, Method::GET, &format!("/m-role?_filter={}", enc("{oops")), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "application/problem+json");
    assert_eq!(body["instance"], "/m-role");

    let sort = enc(r#"[{"id":"password"}]"#);
    let (status, _, _) = call(&app, Method::GET, &format!("/m-role?_sort={sort}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = call(&app, Method::GET, "/m-role?_size=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let filter = enc(r#"[{"id":"level","value":"high","matchMode":"EQUALS","dataType":"TEXT"}]"#);
    let (status, _, _) = call(&app, Method::GET, &format!("/m-role?_filter={filter}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn page_offset_beyond_the_signed_range_is_a_bad_request() -> Result<()> {
    let app = create_test_router().await?;
    create_role(&app, "Admin", "ADM", 1).await;

    let (status, content_type, body) =
        call(&app, Method::GET, "/m-role?_page=9223372036854775808&_size=1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "application/problem+json");
    assert_eq!(body["errors"][0]["pointer"], "/_page");

    let (status, _, _) = call(&app, Method::GET, "/m-role?_page=4611686018427387904&_size=2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = call(&app, Method::GET, "/m-role?_page=0&_size=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalElements"], 1);
    Ok(())
}

#[tokio::test]
async fn user_password_is_write_only() -> Result<()> {
    let app = create_test_router().await?;

    let (status, _, body) = call(
        &app,
        Method::POST,
        "/m-user",
        Some(json!({ "email": "ali@x.io", "password": "tiger-lily-42" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["data"].get("password").is_none());
    assert!(!body.to_string().contains("argon2"));
    let item = format!("/m-user/{}", body["data"]["id"]);

    let (status, _, body) = call(&app, Method::GET, &item, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("password").is_none());

    let (_, _, body) = call(&app, Method::GET, "/m-user", None).await;
    assert_eq!(body["data"]["totalElements"], 1);
    assert!(body["data"]["content"][0].get("password").is_none());

    for term in ["tiger", "argon2"] {
        let (status, _, body) = call(&app, Method::GET, &format!("/m-user?_q={term}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalElements"], 0, "{term}");
    }

    let filter = enc(
        r#"[{"id":"password","value":"tiger","matchMode":"CONTAINS","dataType":"TEXT"}]"#,
    );
    let (status, _, body) = call(&app, Method::GET, &format!("/m-user?_filter={filter}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["pointer"], "/_filter");

    let sort = enc(r#"[{"id":"password"}]"#);
    let (status, _, _) = call(&app, Method::GET, &format!("/m-user?_sort={sort}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = call(
        &app,
        Method::PUT,
        &item,
        Some(json!({ "password": "second-tiger" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"].get("password").is_none());

    let (status, _, body) = call(
        &app,
        Method::PUT,
        &item,
        Some(json!({ "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.to_string().contains("second-tiger"));
    Ok(())
}

#[tokio::test]
async fn biodata_image_travels_as_base64() -> Result<()> {
    let app = create_test_router().await?;

    let (status, _, body) = call(
        &app,
        Method::POST,
        "/m-biodata",
        Some(json!({ "fullname": "Citra", "image": "aGVsbG8=" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["image"], "aGVsbG8=");

    let (status, _, body) = call(
        &app,
        Method::POST,
        "/m-biodata",
        Some(json!({ "fullname": "Dewi", "image": "***" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["pointer"], "/image");
    Ok(())
}
