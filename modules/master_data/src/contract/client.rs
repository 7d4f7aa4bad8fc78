use async_trait::async_trait;
use page_core::{ListQuery, Page};

use crate::contract::error::MasterDataError;
use crate::domain::record::Record;

/// In-process API over one master entity, e.g. `MasterDataApi<Role>`.
#[async_trait]
pub trait MasterDataApi<T: Record>: Send + Sync {
    async fn get(&self, id: i64) -> Result<T, MasterDataError>;

    /// One page of live rows.
    async fn list(&self, query: ListQuery) -> Result<Page<T>, MasterDataError>;

    async fn create(&self, new: T::New) -> Result<T, MasterDataError>;

    async fn update(&self, id: i64, patch: T::Patch) -> Result<T, MasterDataError>;

    /// Soft delete.
    async fn delete(&self, id: i64) -> Result<(), MasterDataError>;
}
