use std::sync::Arc;

use async_trait::async_trait;
use page_core::{ListQuery, Page};

use crate::contract::{client::MasterDataApi, error::MasterDataError};
use crate::domain::{record::Record, service::Service};

/// Local implementation of `MasterDataApi` that delegates to the domain service.
pub struct LocalClient<T: Record> {
    service: Arc<Service<T>>,
}

impl<T: Record> LocalClient<T> {
    pub fn new(service: Arc<Service<T>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<T: Record> MasterDataApi<T> for LocalClient<T> {
    async fn get(&self, id: i64) -> Result<T, MasterDataError> {
        self.service.get(id).await.map_err(Into::into)
    }

    async fn list(&self, query: ListQuery) -> Result<Page<T>, MasterDataError> {
        self.service.list(query).await.map_err(Into::into)
    }

    async fn create(&self, new: T::New) -> Result<T, MasterDataError> {
        self.service.create(new).await.map_err(Into::into)
    }

    async fn update(&self, id: i64, patch: T::Patch) -> Result<T, MasterDataError> {
        self.service.update(id, patch).await.map_err(Into::into)
    }

    async fn delete(&self, id: i64) -> Result<(), MasterDataError> {
        self.service.delete(id).await.map_err(Into::into)
    }
}
