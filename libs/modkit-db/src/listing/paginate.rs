//! Count pass + bounded fetch + page assembly.
//!
//! The count and the fetch are two independent statements. Writes committed between them can
//! make `totalElements` disagree with the rows returned; callers that need the two to agree
//! pass a transaction as the connection.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use page_core::{Error, ListQuery, Page, PageMeta};
use sea_orm::{
    ConnectionTrait, DbErr, EntityName, EntityTrait, PaginatorTrait, QuerySelect,
};
use tokio_util::sync::CancellationToken;

use super::{FieldMap, FilterExt, SearchExt, SortExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimitCfg {
    pub default: u64,
    pub max: u64,
}

impl Default for LimitCfg {
    fn default() -> Self {
        Self {
            default: 10,
            max: 1000,
        }
    }
}

/// Requested size, or the default. Zero is rejected; anything above `max` is clamped.
pub fn resolve_page_size(req: Option<u64>, cfg: LimitCfg) -> Result<u64, Error> {
    match req.unwrap_or(cfg.default) {
        0 => Err(Error::InvalidPageSize),
        n => Ok(n.min(cfg.max.max(1))),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListStage {
    Count,
    Fetch,
}

impl ListStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ListStage::Count => "count",
            ListStage::Fetch => "fetch",
        }
    }
}

/// Instrumentation hooks around the two database round trips of a list request.
pub trait ListObserver: Send + Sync {
    fn started(&self, _entity: &str, _stage: ListStage) {}
    fn finished(&self, _entity: &str, _stage: ListStage, _rows: u64, _elapsed: Duration) {}
    fn failed(&self, _entity: &str, _stage: ListStage, _err: &Error) {}
}

/// Default observer: structured `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ListObserver for TracingObserver {
    fn started(&self, entity: &str, stage: ListStage) {
        tracing::debug!(entity, stage = stage.as_str(), "list query started");
    }

    fn finished(&self, entity: &str, stage: ListStage, rows: u64, elapsed: Duration) {
        tracing::debug!(
            entity,
            stage = stage.as_str(),
            rows,
            elapsed_ms = elapsed.as_millis() as u64,
            "list query finished"
        );
    }

    fn failed(&self, entity: &str, stage: ListStage, err: &Error) {
        match err {
            Error::Cancelled => tracing::info!(entity, stage = stage.as_str(), "list query cancelled"),
            _ => tracing::error!(entity, stage = stage.as_str(), error = %err, "list query failed"),
        }
    }
}

#[derive(Clone)]
pub struct ListOptions {
    pub limits: LimitCfg,
    pub observer: Arc<dyn ListObserver>,
    /// When set, a cancelled token aborts whichever round trip is in flight.
    pub cancel: Option<CancellationToken>,
}

impl ListOptions {
    pub fn new(limits: LimitCfg) -> Self {
        Self {
            limits,
            observer: Arc::new(TracingObserver),
            cancel: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ListObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::new(LimitCfg::default())
    }
}

impl std::fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListOptions")
            .field("limits", &self.limits)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

async fn observed<T, Fut>(
    opts: &ListOptions,
    entity: &str,
    stage: ListStage,
    fut: Fut,
    rows: impl Fn(&T) -> u64,
) -> Result<T, Error>
where
    Fut: Future<Output = Result<T, DbErr>>,
{
    opts.observer.started(entity, stage);
    let started = Instant::now();

    let res = match &opts.cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Cancelled),
            r = fut => r.map_err(|e| Error::Db(e.to_string())),
        },
        None => fut.await.map_err(|e| Error::Db(e.to_string())),
    };

    match &res {
        Ok(v) => opts
            .observer
            .finished(entity, stage, rows(v), started.elapsed()),
        Err(e) => opts.observer.failed(entity, stage, e),
    }
    res
}

/// One-shot list combiner: filter → search → (count) → sort → offset/limit → assemble.
///
/// Every field reference is validated before the first round trip, so a bad request never
/// reaches the database.
pub async fn paginate<E, C, D, F>(
    select: sea_orm::Select<E>,
    conn: &C,
    q: &ListQuery,
    fmap: &FieldMap<E>,
    opts: &ListOptions,
    model_to_domain: F,
) -> Result<Page<D>, Error>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    C: ConnectionTrait,
    F: FnMut(E::Model) -> D,
{
    let size = resolve_page_size(q.size, opts.limits)?;
    let offset = PageMeta::offset_of(q.page, size)?;

    let filtered = select
        .apply_filters(&q.filter, fmap)?
        .apply_search(q.search.as_deref(), fmap)?;
    let ordered = filtered.clone().apply_sort(&q.sort, fmap)?;

    let e = E::default();
    let entity = e.table_name();

    let total = observed(opts, entity, ListStage::Count, filtered.count(conn), |n: &u64| *n).await?;
    let meta = PageMeta::compute(q.page, size, i64::try_from(total).unwrap_or(i64::MAX))?;

    let rows = observed(
        opts,
        entity,
        ListStage::Fetch,
        ordered.offset(offset).limit(size).all(conn),
        |rows: &Vec<E::Model>| rows.len() as u64,
    )
    .await?;

    Ok(Page::assemble(
        rows.into_iter().map(model_to_domain).collect(),
        meta,
        !q.sort.is_empty(),
    ))
}
