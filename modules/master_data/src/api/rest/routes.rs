use std::sync::Arc;

use axum::{Extension, Router};
use modkit::api::{Missing, OpenApiRegistry, OperationBuilder, OperationBuilderListExt};

use crate::api::rest::handlers;
use crate::api::rest::resource::RestResource;
use crate::contract::model::{Biodata, Module, Role, User};
use crate::domain::service::Service;

/// Services for every master resource, in route order.
#[derive(Clone)]
pub struct Services {
    pub roles: Arc<Service<Role>>,
    pub biodata: Arc<Service<Biodata>>,
    pub users: Arc<Service<User>>,
    pub modules: Arc<Service<Module>>,
}

pub fn register_routes(
    router: Router,
    openapi: &dyn OpenApiRegistry,
    services: &Services,
) -> anyhow::Result<Router> {
    let router = register_resource(router, openapi, services.roles.clone());
    let router = register_resource(router, openapi, services.biodata.clone());
    let router = register_resource(router, openapi, services.users.clone());
    let router = register_resource(router, openapi, services.modules.clone());
    Ok(router)
}

/// CRUD + list routes for one resource. The service is attached to these routes only.
pub fn register_resource<T: RestResource>(
    router: Router,
    openapi: &dyn OpenApiRegistry,
    service: Arc<Service<T>>,
) -> Router {
    let collection = T::PATH;
    let item = format!("{}/{{id}}", T::PATH);
    let op_id = |action: &str| format!("master_data.{}.{action}", T::KIND);
    let mut routes = Router::new();

    // GET /m-<kind> - list
    routes = OperationBuilder::<Missing, Missing, ()>::get(collection)
        .operation_id(op_id("list"))
        .summary(format!("List {} records", T::KIND))
        .description(
            "Paginated list of live records. The body is the success envelope with a page \
             whose `content` holds items of the referenced schema.",
        )
        .tag(T::TAG)
        .with_list_params(&T::fields())
        .handler(handlers::list::<T>)
        .json_response_with_schema::<T::Dto>(openapi, 200, "Page of records")
        .problem_response(openapi, 400, "Bad Request")
        .problem_response(openapi, 500, "Internal Server Error")
        .problem_response(openapi, 503, "Service Unavailable")
        .register(routes, openapi);

    // GET /m-<kind>/{id} - get
    routes = OperationBuilder::<Missing, Missing, ()>::get(item.clone())
        .operation_id(op_id("get"))
        .summary(format!("Get {} by id", T::KIND))
        .tag(T::TAG)
        .path_param("id", "Record id")
        .handler(handlers::get::<T>)
        .json_response_with_schema::<T::Dto>(openapi, 200, "Record found")
        .problem_response(openapi, 404, "Not Found")
        .problem_response(openapi, 500, "Internal Server Error")
        .register(routes, openapi);

    // POST /m-<kind> - create
    routes = OperationBuilder::<Missing, Missing, ()>::post(collection)
        .operation_id(op_id("create"))
        .summary(format!("Create {}", T::KIND))
        .tag(T::TAG)
        .json_request::<T::CreateReq>(openapi, "Record data")
        .handler(handlers::create::<T>)
        .json_response_with_schema::<T::Dto>(openapi, 201, "Created record")
        .problem_response(openapi, 400, "Bad Request")
        .problem_response(openapi, 409, "Conflict")
        .problem_response(openapi, 500, "Internal Server Error")
        .register(routes, openapi);

    // PUT /m-<kind>/{id} - update
    routes = OperationBuilder::<Missing, Missing, ()>::put(item.clone())
        .operation_id(op_id("update"))
        .summary(format!("Update {}", T::KIND))
        .description("Partial update. `isDelete: true` soft-deletes the record.")
        .tag(T::TAG)
        .path_param("id", "Record id")
        .json_request::<T::UpdateReq>(openapi, "Fields to change")
        .handler(handlers::update::<T>)
        .json_response_with_schema::<T::Dto>(openapi, 200, "Updated record")
        .problem_response(openapi, 400, "Bad Request")
        .problem_response(openapi, 404, "Not Found")
        .problem_response(openapi, 500, "Internal Server Error")
        .register(routes, openapi);

    // DELETE /m-<kind>/{id} - soft delete
    routes = OperationBuilder::<Missing, Missing, ()>::delete(item)
        .operation_id(op_id("delete"))
        .summary(format!("Delete {}", T::KIND))
        .tag(T::TAG)
        .path_param("id", "Record id")
        .handler(handlers::delete::<T>)
        .empty_response(204, "Record deleted")
        .problem_response(openapi, 404, "Not Found")
        .problem_response(openapi, 500, "Internal Server Error")
        .register(routes, openapi);

    router.merge(routes.layer(Extension(service)))
}
