//! SeaORM-backed repository implementation for the domain port.
//!
//! One generic type serves every master table: [`MasterEntity`] ties a SeaORM entity to its
//! domain record. The repository is generic over `C: ConnectionTrait`, so it can run on a
//! `DatabaseConnection` **or** a transaction.

use std::marker::PhantomData;

use anyhow::Context;
use async_trait::async_trait;
use modkit_db::listing::{paginate, ListOptions};
use modkit_db::{LimitCfg, Listable};
use page_core::{ListQuery, Page};
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend,
    DatabaseTransaction, EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::domain::record::Record;
use crate::domain::repo::Repository;

/// A listable SeaORM entity that stores one kind of [`Record`].
pub trait MasterEntity: Listable + Send + Sync + 'static {
    type Record: Record;
    type Active: ActiveModelTrait<Entity = Self> + Send + 'static;

    fn col_id() -> Self::Column;
    fn col_is_delete() -> Self::Column;

    fn to_record(m: Self::Model) -> Self::Record;
    /// `id` stays unset for records that were never stored (`id() == 0`).
    fn to_active(rec: Self::Record) -> Self::Active;
}

/// List-path settings shared by every repository of a module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListSettings {
    pub limits: LimitCfg,
    /// Count and fetch inside one read transaction.
    pub consistent_reads: bool,
}

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmRepository<E, C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
    settings: ListSettings,
    cancel: Option<CancellationToken>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, C> SeaOrmRepository<E, C>
where
    E: MasterEntity,
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C, settings: ListSettings) -> Self {
        Self {
            conn,
            settings,
            cancel: None,
            _entity: PhantomData,
        }
    }

    /// Abort in-flight list queries once `token` fires (e.g. on shutdown).
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn list_options(&self) -> ListOptions {
        let opts = ListOptions::new(self.settings.limits);
        match &self.cancel {
            Some(token) => opts.with_cancel(token.clone()),
            None => opts,
        }
    }

    /// Postgres gets a repeatable-read snapshot; SQLite transactions are serializable already.
    async fn begin_read(&self) -> Result<DatabaseTransaction, sea_orm::DbErr> {
        match self.conn.get_database_backend() {
            DatabaseBackend::Postgres => {
                self.conn
                    .begin_with_config(
                        Some(IsolationLevel::RepeatableRead),
                        Some(AccessMode::ReadOnly),
                    )
                    .await
            }
            _ => self.conn.begin().await,
        }
    }
}

#[async_trait]
impl<E, C> Repository<E::Record> for SeaOrmRepository<E, C>
where
    E: MasterEntity,
    E::Model: Send + Sync,
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_live(&self, id: i64) -> anyhow::Result<Option<E::Record>> {
        let found = E::find()
            .filter(E::col_id().eq(id))
            .filter(E::col_is_delete().eq(false))
            .one(&self.conn)
            .await
            .context("find_live failed")?;
        Ok(found.map(E::to_record))
    }

    async fn exists(&self, id: i64) -> anyhow::Result<bool> {
        let count = E::find()
            .filter(E::col_id().eq(id))
            .count(&self.conn)
            .await
            .context("exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, rec: E::Record) -> anyhow::Result<E::Record> {
        let res = E::insert(E::to_active(rec))
            .exec(&self.conn)
            .await
            .context("insert failed")?;
        let stored = E::find_by_id(res.last_insert_id)
            .one(&self.conn)
            .await
            .context("reload after insert failed")?
            .context("inserted row not found")?;
        Ok(E::to_record(stored))
    }

    async fn update(&self, rec: E::Record) -> anyhow::Result<()> {
        let id = rec.id();
        let res = E::update_many()
            .set(E::to_active(rec))
            .filter(E::col_id().eq(id))
            .exec(&self.conn)
            .await
            .context("update failed")?;
        if res.rows_affected == 0 {
            anyhow::bail!("update matched no row for id {id}");
        }
        Ok(())
    }

    #[instrument(
        name = "master_data.repo.list_page",
        skip_all,
        fields(kind = <E::Record as Record>::KIND, consistent = self.settings.consistent_reads)
    )]
    async fn list_page(&self, query: &ListQuery) -> Result<Page<E::Record>, page_core::Error> {
        let live = E::find().filter(E::col_is_delete().eq(false));
        let opts = self.list_options();

        if !self.settings.consistent_reads {
            return paginate(live, &self.conn, query, E::field_map(), &opts, E::to_record).await;
        }

        let txn = self
            .begin_read()
            .await
            .map_err(|e| page_core::Error::Db(e.to_string()))?;
        let page = paginate(live, &txn, query, E::field_map(), &opts, E::to_record).await?;
        txn.commit()
            .await
            .map_err(|e| page_core::Error::Db(e.to_string()))?;
        Ok(page)
    }
}
