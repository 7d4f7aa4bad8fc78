//! The ingress serving routes registered through `OperationBuilder`.

use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    Json, Router,
};
use modkit::api::{Missing, OpenApiRegistry, OperationBuilder};
use serde::{Deserialize, Serialize};
use tower::util::ServiceExt;
use utoipa::ToSchema;

use api_ingress::{ApiIngress, ApiIngressConfig};

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct Module {
    pub id: i64,
    pub name: String,
}

async fn get_module(Path(id): Path<i64>) -> Json<Module> {
    Json(Module {
        id,
        name: "Dashboard".to_string(),
    })
}

fn register(router: Router, openapi: &dyn OpenApiRegistry) -> Router {
    OperationBuilder::<Missing, Missing, ()>::get("/m-module/{id}")
        .operation_id("master_data.module.get")
        .summary("Get module by id")
        .tag("modules")
        .path_param("id", "Record id")
        .handler(get_module)
        .json_response_with_schema::<Module>(openapi, 200, "Record found")
        .problem_response(openapi, 404, "Not Found")
        .register(router, openapi)
}

fn ingress(enable_docs: bool) -> ApiIngress {
    ApiIngress::new(ApiIngressConfig {
        enable_docs,
        ..Default::default()
    })
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or_default())
}

#[tokio::test]
async fn registered_routes_are_served() {
    let ingress = ingress(false);
    let app = ingress
        .finalize_router(register(Router::new(), &ingress))
        .unwrap();

    let (status, body) = get(&app, "/m-module/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 7);

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn openapi_is_served_only_with_docs_enabled() {
    let without = ingress(false);
    let app = without
        .finalize_router(register(Router::new(), &without))
        .unwrap();
    let (status, _) = get(&app, "/openapi.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let with = ingress(true);
    let app = with.finalize_router(register(Router::new(), &with)).unwrap();
    let (status, doc) = get(&app, "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["openapi"], "3.0.3");
    let op = &doc["paths"]["/m-module/{id}"]["get"];
    assert_eq!(op["operationId"], "master_data.module.get");
    assert_eq!(op["tags"][0], "modules");
    assert_eq!(
        op["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/Module"
    );
    assert!(doc["components"]["schemas"]["Module"].is_object());
}

#[test]
fn schemas_are_registered_once() {
    let ingress = ingress(true);
    let _ = register(Router::new(), &ingress);
    assert!(ingress.has_schema("Module"));
    assert!(ingress.has_schema("Problem"));
    assert_eq!(ingress.operation_count(), 1);
}
