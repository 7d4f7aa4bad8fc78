//! Handlers shared by every master resource; `T` picks the entity.

use std::sync::Arc;

use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    Extension, Json,
};
use modkit::api::listing::ListParams;
use modkit::api::response::{created_json, ok_json, JsonPage};
use modkit::{ApiError, Envelope};
use tracing::{error, info};

use crate::api::rest::error::{domain_error, MasterResult};
use crate::api::rest::resource::RestResource;
use crate::domain::service::Service;

/// One page of live rows, filtered, searched and sorted as requested.
pub async fn list<T: RestResource>(
    Extension(svc): Extension<Arc<Service<T>>>,
    ListParams(query): ListParams,
    uri: Uri,
) -> MasterResult<JsonPage<T::Dto>> {
    info!(kind = T::KIND, ?query, "Listing records");

    match svc.list(query).await {
        Ok(page) => Ok(ok_json(uri.path(), page.map_items(T::Dto::from))),
        Err(e) => {
            error!(kind = T::KIND, "Failed to list records: {}", e);
            Err(ApiError::from_list(e, uri.path()))
        }
    }
}

pub async fn get<T: RestResource>(
    Extension(svc): Extension<Arc<Service<T>>>,
    Path(id): Path<i64>,
    uri: Uri,
) -> MasterResult<Envelope<T::Dto>> {
    info!(kind = T::KIND, id, "Getting record");

    match svc.get(id).await {
        Ok(rec) => Ok(ok_json(uri.path(), T::Dto::from(rec))),
        Err(e) => {
            error!(kind = T::KIND, "Failed to get record {}: {}", id, e);
            Err(domain_error(&e, uri.path()))
        }
    }
}

pub async fn create<T: RestResource>(
    uri: Uri,
    Extension(svc): Extension<Arc<Service<T>>>,
    Json(req_body): Json<T::CreateReq>,
) -> MasterResult<Envelope<T::Dto>> {
    info!(kind = T::KIND, "Creating record");

    let created = match T::new_from(req_body) {
        Ok(new) => svc.create(new).await,
        Err(e) => Err(e),
    };
    match created {
        Ok(rec) => Ok(created_json(uri.path(), T::Dto::from(rec))),
        Err(e) => {
            error!(kind = T::KIND, "Failed to create record: {}", e);
            Err(domain_error(&e, uri.path()))
        }
    }
}

/// Partial update; `isDelete: true` in the body soft-deletes the row.
pub async fn update<T: RestResource>(
    uri: Uri,
    Extension(svc): Extension<Arc<Service<T>>>,
    Path(id): Path<i64>,
    Json(req_body): Json<T::UpdateReq>,
) -> MasterResult<Envelope<T::Dto>> {
    info!(kind = T::KIND, id, "Updating record");

    let updated = match T::patch_from(req_body) {
        Ok(patch) => svc.update(id, patch).await,
        Err(e) => Err(e),
    };
    match updated {
        Ok(rec) => Ok(ok_json(uri.path(), T::Dto::from(rec))),
        Err(e) => {
            error!(kind = T::KIND, "Failed to update record {}: {}", id, e);
            Err(domain_error(&e, uri.path()))
        }
    }
}

pub async fn delete<T: RestResource>(
    Extension(svc): Extension<Arc<Service<T>>>,
    Path(id): Path<i64>,
    uri: Uri,
) -> MasterResult<StatusCode> {
    info!(kind = T::KIND, id, "Deleting record");

    match svc.delete(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!(kind = T::KIND, "Failed to delete record {}: {}", id, e);
            Err(domain_error(&e, uri.path()))
        }
    }
}
