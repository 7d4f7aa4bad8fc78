use std::sync::Arc;

use chrono::NaiveDateTime;
use page_core::{ListQuery, Page};
use tracing::{debug, info, instrument};

use crate::contract::model::AuditInfo;
use crate::domain::error::DomainError;
use crate::domain::record::Record;
use crate::domain::repo::Repository;

/// Acting user id for every write. Requests are not authenticated.
pub const SYSTEM_ACTOR: i64 = 0;

/// Domain service for one master entity.
/// Depends only on the repository port, not on infra types.
pub struct Service<T: Record> {
    repo: Arc<dyn Repository<T>>,
}

impl<T: Record> Clone for Service<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

impl<T: Record> Service<T> {
    pub fn new(repo: Arc<dyn Repository<T>>) -> Self {
        Self { repo }
    }

    #[instrument(name = "master_data.service.get", skip(self), fields(kind = T::KIND))]
    pub async fn get(&self, id: i64) -> Result<T, DomainError> {
        debug!("Getting record by id");
        self.load_live(id).await
    }

    #[instrument(name = "master_data.service.list", skip(self, query), fields(kind = T::KIND))]
    pub async fn list(&self, query: ListQuery) -> Result<Page<T>, page_core::Error> {
        debug!(page = query.page, size = ?query.size, "Listing records");
        let page = self.repo.list_page(&query).await?;
        debug!(
            returned = page.number_of_elements,
            total = page.total_elements,
            "Listed records"
        );
        Ok(page)
    }

    #[instrument(name = "master_data.service.create", skip(self, new), fields(kind = T::KIND))]
    pub async fn create(&self, new: T::New) -> Result<T, DomainError> {
        info!("Creating record");
        T::validate_new(&new)?;

        if let Some(id) = T::requested_id(&new) {
            if self.repo.exists(id).await.map_err(db)? {
                return Err(DomainError::already_exists(T::KIND, id));
            }
        }

        let rec = T::create(new, AuditInfo::created(SYSTEM_ACTOR, now()))?;
        let stored = self.repo.insert(rec).await.map_err(db)?;

        info!(id = stored.id(), "Created record");
        Ok(stored)
    }

    #[instrument(name = "master_data.service.update", skip(self, patch), fields(kind = T::KIND))]
    pub async fn update(&self, id: i64, patch: T::Patch) -> Result<T, DomainError> {
        info!("Updating record");
        T::validate_patch(&patch)?;

        let mut current = self.load_live(id).await?;
        let deletes = T::patch_deletes(&patch);
        let at = now();

        current.apply(patch)?;
        current.audit_mut().touch(SYSTEM_ACTOR, at);
        if deletes {
            current.audit_mut().mark_deleted(SYSTEM_ACTOR, at);
        }

        self.repo.update(current.clone()).await.map_err(db)?;
        info!(deleted = deletes, "Updated record");
        Ok(current)
    }

    /// Soft delete: the row stays, flagged and stamped.
    #[instrument(name = "master_data.service.delete", skip(self), fields(kind = T::KIND))]
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting record");

        let mut current = self.load_live(id).await?;
        current.audit_mut().mark_deleted(SYSTEM_ACTOR, now());
        self.repo.update(current).await.map_err(db)?;

        info!("Deleted record");
        Ok(())
    }

    async fn load_live(&self, id: i64) -> Result<T, DomainError> {
        self.repo
            .find_live(id)
            .await
            .map_err(db)?
            .ok_or_else(|| DomainError::not_found(T::KIND, id))
    }
}

fn db(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
