//! HTTP host: owns the server, the middleware stack and the OpenAPI document that modules
//! fill in through [`OpenApiRegistry`].

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use axum::http::{header, Method};
use axum::response::IntoResponse;
use axum::{middleware::from_fn, routing::get, Router};
use dashmap::DashMap;
use modkit::api::operation_builder::SchemaCollection;
use modkit::api::{OpenApiRegistry, OperationSpec, ParamLocation};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod error;
mod model;
pub mod openapi;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;
use model::ComponentsRegistry;

/// Collects typed operation specs from modules and serves them behind one router.
pub struct ApiIngress {
    // Lock-free config using arc-swap for read-mostly access
    config: ArcSwap<ApiIngressConfig>,
    // Copy-on-write component schemas
    components_registry: ArcSwap<ComponentsRegistry>,
    // Serializes copy-on-write updates of the components
    components_write: Mutex<()>,

    // Duplicate detection (per (method, path) and per handler id)
    registered_routes: DashMap<(Method, String), ()>,
    registered_handlers: DashMap<String, ()>,

    // Store operation specs for OpenAPI generation
    operation_specs: DashMap<String, OperationSpec>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            components_registry: ArcSwap::from_pointee(ComponentsRegistry::default()),
            components_write: Mutex::new(()),
            registered_routes: DashMap::new(),
            registered_handlers: DashMap::new(),
            operation_specs: DashMap::new(),
        }
    }

    /// Get the current configuration (cheap clone from ArcSwap)
    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    pub fn operation_count(&self) -> usize {
        self.operation_specs.len()
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.components_registry.load().has_schema(name)
    }

    /// Wrap module routes with the ingress endpoints and middleware stack.
    ///
    /// Call after every module has registered its routes, so `/openapi.json` sees them all.
    pub fn finalize_router(&self, routes: Router) -> Result<Router> {
        let config = self.get_config();
        let mut router = routes
            .route("/health", get(web::health_check))
            .fallback(error::route_not_found);

        if config.enable_docs {
            // Build once, serve as static JSON (no per-request work)
            let doc = Arc::new(serde_json::to_value(self.build_openapi()?)?);
            tracing::info!(
                operations = self.operation_count(),
                "Serving OpenAPI document at /openapi.json"
            );
            router = router
                .route(
                    "/openapi.json",
                    get(move || {
                        let doc = doc.clone();
                        async move {
                            ([(header::CACHE_CONTROL, "no-store")], axum::Json((*doc).clone()))
                                .into_response()
                        }
                    }),
                )
                .route("/docs", get(web::serve_docs));
        }

        // Layers run outermost-last-added:
        // PropagateRequestId -> SetRequestId -> push_req_id_to_extensions -> Trace
        //   -> stamp_problem_request_id -> Timeout -> CORS -> BodyLimit -> handler
        let x_request_id = request_id::header();
        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));
        if config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router = router
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(from_fn(error::stamp_problem_request_id))
            .layer(request_id::create_trace_layer())
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                request_id::MakeReqId,
            ))
            .layer(PropagateRequestIdLayer::new(x_request_id));

        Ok(router)
    }

    /// Build OpenAPI specification from registered operations and components.
    pub fn build_openapi(&self) -> Result<openapi::OpenApi> {
        let components = self.components_registry.load();
        tracing::info!(
            "Building OpenAPI: found {} registered operations",
            self.operation_specs.len()
        );

        let mut paths: std::collections::BTreeMap<String, Map<String, Value>> =
            std::collections::BTreeMap::new();
        for entry in self.operation_specs.iter() {
            let spec = entry.value();
            paths
                .entry(spec.path.clone())
                .or_default()
                .insert(spec.method.as_str().to_lowercase(), operation_json(spec, &components));
        }

        Ok(openapi::OpenApi {
            openapi: "3.0.3",
            info: openapi::OpenApiInfo {
                title: "Master Data API",
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some("CRUD and dynamic listing of master data"),
            },
            paths: serde_json::to_value(paths)?,
            components: Some(openapi::OpenApiComponents::from_registry(&components)),
        })
    }

    /// Bind, serve until `cancel` fires, then drain in-flight requests.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let cfg = self.get_config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", cfg.bind_addr))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("cannot bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")
    }
}

/// `$ref` to a registered component, or a minimal inline schema by content type.
fn schema_json(components: &ComponentsRegistry, content_type: &str, name: Option<&str>) -> Value {
    if let Some(name) = name.filter(|n| components.has_schema(n)) {
        return json!({ "$ref": format!("#/components/schemas/{name}") });
    }
    match content_type {
        "application/json" => json!({ "type": "object" }),
        "text/plain" | "text/html" => json!({ "type": "string" }),
        _ => json!({}),
    }
}

fn content_json(components: &ComponentsRegistry, content_type: &str, name: Option<&str>) -> Value {
    json!({ (content_type): { "schema": schema_json(components, content_type, name) } })
}

fn operation_json(spec: &OperationSpec, components: &ComponentsRegistry) -> Value {
    let mut op = Map::new();
    // Prefer explicit operation_id, fallback to handler_id
    let op_id = spec.operation_id.as_ref().unwrap_or(&spec.handler_id);
    op.insert("operationId".into(), json!(op_id));
    if let Some(summary) = &spec.summary {
        op.insert("summary".into(), json!(summary));
    }
    if let Some(description) = &spec.description {
        op.insert("description".into(), json!(description));
    }
    if !spec.tags.is_empty() {
        op.insert("tags".into(), json!(spec.tags));
    }

    if !spec.params.is_empty() {
        let params: Vec<Value> = spec
            .params
            .iter()
            .map(|p| {
                let location = match p.location {
                    ParamLocation::Path => "path",
                    ParamLocation::Query => "query",
                    ParamLocation::Header => "header",
                };
                let mut param = json!({
                    "name": p.name,
                    "in": location,
                    // OpenAPI requires all path params to be required.
                    "required": p.location == ParamLocation::Path || p.required,
                    "schema": { "type": p.param_type },
                });
                if let Some(d) = &p.description {
                    param["description"] = json!(d);
                }
                param
            })
            .collect();
        op.insert("parameters".into(), Value::Array(params));
    }

    if let Some(req) = &spec.request_body {
        let mut body = json!({
            "required": req.required,
            "content": content_json(components, req.content_type, req.schema_name.as_deref()),
        });
        if let Some(d) = &req.description {
            body["description"] = json!(d);
        }
        op.insert("requestBody".into(), body);
    }

    let mut responses = Map::new();
    for r in &spec.responses {
        let mut resp = json!({ "description": r.description });
        // 204 carries no body
        if r.status != 204 {
            resp["content"] = content_json(components, r.content_type, r.schema_name.as_deref());
        }
        responses.insert(r.status.to_string(), resp);
    }
    op.insert("responses".into(), Value::Object(responses));

    Value::Object(op)
}

impl OpenApiRegistry for ApiIngress {
    fn register_operation(&self, spec: &OperationSpec) {
        // Reject duplicates with "first wins" policy (second registration = programmer error).
        if self
            .registered_handlers
            .insert(spec.handler_id.clone(), ())
            .is_some()
        {
            tracing::error!(
                handler_id = %spec.handler_id,
                method = %spec.method.as_str(),
                path = %spec.path,
                "Duplicate handler_id detected; ignoring subsequent registration"
            );
            return;
        }

        let route_key = (spec.method.clone(), spec.path.clone());
        if self.registered_routes.insert(route_key, ()).is_some() {
            tracing::error!(
                method = %spec.method.as_str(),
                path = %spec.path,
                "Duplicate (method, path) detected; ignoring subsequent registration"
            );
            return;
        }

        let operation_key = format!("{}:{}", spec.method.as_str(), spec.path);
        self.operation_specs.insert(operation_key, spec.clone());
        tracing::debug!(
            handler_id = %spec.handler_id,
            method = %spec.method.as_str(),
            path = %spec.path,
            total_operations = self.operation_specs.len(),
            "Registered API operation"
        );
    }

    fn ensure_schema_raw(&self, name: &str, schemas: SchemaCollection) -> String {
        let _guard = self.components_write.lock();
        let mut reg = (**self.components_registry.load()).clone();
        reg.register_all(schemas);
        self.components_registry.store(Arc::new(reg));
        name.to_string()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
