use async_trait::async_trait;
use page_core::{ListQuery, Page};

use crate::domain::record::Record;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Load a row that has not been soft deleted.
    async fn find_live(&self, id: i64) -> anyhow::Result<Option<T>>;
    /// True if any row, deleted or not, has this id.
    async fn exists(&self, id: i64) -> anyhow::Result<bool>;
    /// Persist a new row and return it with its assigned id.
    async fn insert(&self, rec: T) -> anyhow::Result<T>;
    /// Overwrite an existing row (by `rec.id()`).
    async fn update(&self, rec: T) -> anyhow::Result<()>;
    /// One page of live rows.
    async fn list_page(&self, query: &ListQuery) -> Result<Page<T>, page_core::Error>;
}
