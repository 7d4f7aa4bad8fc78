//! Type-safe API operation builder with compile-time guarantees
//!
//! `register()` only exists once a handler is set *and* at least one response is declared.
//! Each registered route also hands its [`OperationSpec`] to an [`OpenApiRegistry`], so the
//! served document can never drift from the mounted routes.

use axum::{handler::Handler, routing::MethodRouter, Router};
use http::Method;
use std::marker::PhantomData;

use crate::api::problem::{self, Problem};

/// Type alias for schema collections used in API operations.
pub type SchemaCollection = Vec<(
    String,
    utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>,
)>;

/// Type-state markers for compile-time enforcement
pub mod state {
    #[derive(Debug, Clone, Copy)]
    pub struct Missing;

    #[derive(Debug, Clone, Copy)]
    pub struct Present;
}

pub use state::{Missing, Present};

mod sealed {
    pub trait Sealed {}
}

/// Maps handler state to the concrete router slot: nothing while `Missing`,
/// a `MethodRouter<S>` once `Present`.
pub trait HandlerSlot<S>: sealed::Sealed {
    type Slot;
}

impl sealed::Sealed for Missing {}
impl sealed::Sealed for Present {}

impl<S> HandlerSlot<S> for Missing {
    type Slot = ();
}
impl<S> HandlerSlot<S> for Present {
    type Slot = MethodRouter<S>;
}

#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub description: Option<String>,
    /// JSON Schema type (string, integer, ...)
    pub param_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
}

#[derive(Clone, Debug)]
pub struct RequestBodySpec {
    pub content_type: &'static str,
    pub description: Option<String>,
    /// Registered component name, referenced by `$ref`.
    pub schema_name: Option<String>,
    pub required: bool,
}

#[derive(Clone, Debug)]
pub struct ResponseSpec {
    pub status: u16,
    pub content_type: &'static str,
    pub description: String,
    pub schema_name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct OperationSpec {
    pub method: Method,
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub params: Vec<ParamSpec>,
    pub request_body: Option<RequestBodySpec>,
    pub responses: Vec<ResponseSpec>,
    /// Stable id derived from method + path; used for duplicate detection.
    pub handler_id: String,
}

/// Collects operations and component schemas for the OpenAPI document.
pub trait OpenApiRegistry {
    fn register_operation(&self, spec: &OperationSpec);

    /// Insert `schemas` under components and return the canonical name for `$ref`.
    /// Type-erased so the trait stays object safe.
    fn ensure_schema_raw(&self, name: &str, schemas: SchemaCollection) -> String;

    fn as_any(&self) -> &dyn std::any::Any;
}

/// Register `T` and everything it references; returns `T`'s component name.
pub fn ensure_schema<T: utoipa::ToSchema + utoipa::PartialSchema + 'static>(
    registry: &dyn OpenApiRegistry,
) -> String {
    use utoipa::PartialSchema;

    let root_name = T::name().to_string();
    // T's own schema goes first so the component is the object itself, not a ref to it.
    let mut collected: SchemaCollection = vec![(root_name.clone(), <T as PartialSchema>::schema())];
    T::schemas(&mut collected);
    registry.ensure_schema_raw(&root_name, collected)
}

/// Generic parameters:
/// - `H`: handler state (`Missing` | `Present`)
/// - `R`: response state (`Missing` | `Present`)
/// - `S`: router state type
pub struct OperationBuilder<H, R, S>
where
    H: HandlerSlot<S>,
{
    spec: OperationSpec,
    method_router: <H as HandlerSlot<S>>::Slot,
    _has_handler: PhantomData<H>,
    _has_response: PhantomData<R>,
    _state: PhantomData<fn() -> S>,
}

// -------------------------------------------------------------------------------------------------
// Constructors
// -------------------------------------------------------------------------------------------------
impl<S> OperationBuilder<Missing, Missing, S> {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let handler_id = format!(
            "{}:{}",
            method.as_str().to_lowercase(),
            path.replace(['/', '{', '}'], "_")
        );
        Self {
            spec: OperationSpec {
                method,
                path,
                operation_id: None,
                summary: None,
                description: None,
                tags: Vec::new(),
                params: Vec::new(),
                request_body: None,
                responses: Vec::new(),
                handler_id,
            },
            method_router: (),
            _has_handler: PhantomData,
            _has_response: PhantomData,
            _state: PhantomData,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }
}

// -------------------------------------------------------------------------------------------------
// Descriptive methods, available at any stage
// -------------------------------------------------------------------------------------------------
impl<H, R, S> OperationBuilder<H, R, S>
where
    H: HandlerSlot<S>,
{
    pub fn spec(&self) -> &OperationSpec {
        &self.spec
    }

    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.spec.operation_id = Some(id.into());
        self
    }

    pub fn summary(mut self, text: impl Into<String>) -> Self {
        self.spec.summary = Some(text.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.spec.description = Some(text.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.spec.tags.push(tag.into());
        self
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.spec.params.push(param);
        self
    }

    pub fn path_param(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(ParamSpec {
            name: name.into(),
            location: ParamLocation::Path,
            required: true,
            description: Some(description.into()),
            param_type: "integer".to_string(),
        })
    }

    pub fn query_param_typed(
        self,
        name: impl Into<String>,
        required: bool,
        description: impl Into<String>,
        param_type: impl Into<String>,
    ) -> Self {
        self.param(ParamSpec {
            name: name.into(),
            location: ParamLocation::Query,
            required,
            description: Some(description.into()),
            param_type: param_type.into(),
        })
    }

    pub fn json_request<T>(mut self, registry: &dyn OpenApiRegistry, desc: impl Into<String>) -> Self
    where
        T: utoipa::ToSchema + utoipa::PartialSchema + 'static,
    {
        self.spec.request_body = Some(RequestBodySpec {
            content_type: "application/json",
            description: Some(desc.into()),
            schema_name: Some(ensure_schema::<T>(registry)),
            required: true,
        });
        self
    }
}

// -------------------------------------------------------------------------------------------------
// Handler: Missing -> Present
// -------------------------------------------------------------------------------------------------
impl<R, S> OperationBuilder<Missing, R, S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn handler<F, T>(self, h: F) -> OperationBuilder<Present, R, S>
    where
        F: Handler<T, S> + Clone + Send + 'static,
        T: 'static,
    {
        let method_router = match self.spec.method {
            Method::GET => axum::routing::get(h),
            Method::POST => axum::routing::post(h),
            Method::PUT => axum::routing::put(h),
            Method::DELETE => axum::routing::delete(h),
            Method::PATCH => axum::routing::patch(h),
            _ => axum::routing::any(|| async { axum::http::StatusCode::METHOD_NOT_ALLOWED }),
        };
        OperationBuilder {
            spec: self.spec,
            method_router,
            _has_handler: PhantomData,
            _has_response: self._has_response,
            _state: self._state,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Responses: the first one moves R to Present, later ones keep it there
// -------------------------------------------------------------------------------------------------
impl<H, R, S> OperationBuilder<H, R, S>
where
    H: HandlerSlot<S>,
{
    pub fn response(mut self, resp: ResponseSpec) -> OperationBuilder<H, Present, S> {
        self.spec.responses.push(resp);
        OperationBuilder {
            spec: self.spec,
            method_router: self.method_router,
            _has_handler: self._has_handler,
            _has_response: PhantomData,
            _state: self._state,
        }
    }

    /// Body-less response such as `204 No Content`.
    pub fn empty_response(
        self,
        status: u16,
        description: impl Into<String>,
    ) -> OperationBuilder<H, Present, S> {
        self.response(ResponseSpec {
            status,
            content_type: "application/json",
            description: description.into(),
            schema_name: None,
        })
    }

    pub fn json_response_with_schema<T>(
        self,
        registry: &dyn OpenApiRegistry,
        status: u16,
        description: impl Into<String>,
    ) -> OperationBuilder<H, Present, S>
    where
        T: utoipa::ToSchema + utoipa::PartialSchema + 'static,
    {
        let name = ensure_schema::<T>(registry);
        self.response(ResponseSpec {
            status,
            content_type: "application/json",
            description: description.into(),
            schema_name: Some(name),
        })
    }

    pub fn problem_response(
        self,
        registry: &dyn OpenApiRegistry,
        status: u16,
        description: impl Into<String>,
    ) -> OperationBuilder<H, Present, S> {
        let name = ensure_schema::<Problem>(registry);
        self.response(ResponseSpec {
            status,
            content_type: problem::APPLICATION_PROBLEM_JSON,
            description: description.into(),
            schema_name: Some(name),
        })
    }
}

// -------------------------------------------------------------------------------------------------
// Registration: only with both handler AND response present
// -------------------------------------------------------------------------------------------------
impl<S> OperationBuilder<Present, Present, S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn register(self, router: Router<S>, openapi: &dyn OpenApiRegistry) -> Router<S> {
        openapi.register_operation(&self.spec);
        router.route(&self.spec.path, self.method_router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockRegistry {
        operations: Mutex<Vec<OperationSpec>>,
        schemas: Mutex<Vec<String>>,
    }

    impl OpenApiRegistry for MockRegistry {
        fn register_operation(&self, spec: &OperationSpec) {
            self.operations.lock().unwrap().push(spec.clone());
        }

        fn ensure_schema_raw(&self, name: &str, _schemas: SchemaCollection) -> String {
            self.schemas.lock().unwrap().push(name.to_string());
            name.to_string()
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    async fn list_handler() -> Json<serde_json::Value> {
        Json(serde_json::json!({ "content": [] }))
    }

    #[test]
    fn descriptive_methods_fill_the_spec() {
        let b = OperationBuilder::<Missing, Missing, ()>::get("/m-role/{id}")
            .operation_id("master_data.get_role")
            .summary("Get role")
            .tag("role")
            .path_param("id", "Role id");

        assert_eq!(b.spec().method, Method::GET);
        assert_eq!(b.spec().handler_id, "get:_m-role__id_");
        assert_eq!(b.spec().operation_id.as_deref(), Some("master_data.get_role"));
        assert_eq!(b.spec().tags, vec!["role"]);
        assert_eq!(b.spec().params[0].location, ParamLocation::Path);
        assert!(b.spec().params[0].required);
    }

    #[test]
    fn register_records_operation_and_problem_schema() {
        let registry = MockRegistry::default();

        let _router = OperationBuilder::<Missing, Missing, ()>::get("/m-role")
            .summary("List roles")
            .handler(list_handler)
            .empty_response(200, "Page of roles")
            .problem_response(&registry, 400, "Bad Request")
            .register(Router::new(), &registry);

        let ops = registry.operations.lock().unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].responses.len(), 2);
        assert_eq!(ops[0].responses[1].content_type, problem::APPLICATION_PROBLEM_JSON);
        assert_eq!(*registry.schemas.lock().unwrap(), vec!["Problem".to_string()]);
    }

    #[test]
    fn response_can_precede_handler() {
        let registry = MockRegistry::default();
        let b = OperationBuilder::<Missing, Missing, ()>::delete("/m-module/{id}")
            .empty_response(204, "Deleted")
            .handler(list_handler);
        let _router = b.register(Router::new(), &registry);
        assert_eq!(registry.operations.lock().unwrap()[0].method, Method::DELETE);
    }
}
