use std::sync::Arc;

use anyhow::{ensure, Context};
use arc_swap::ArcSwapOption;
use axum::Router;
use modkit::api::OpenApiRegistry;
use modkit_db::{DbHandle, LimitCfg};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api::rest::routes::{register_routes, Services};
use crate::config::MasterDataConfig;
use crate::contract::client::MasterDataApi;
use crate::domain::record::Record;
use crate::domain::service::Service;
use crate::gateways::local::LocalClient;
use crate::infra::storage::entity::{biodata, module, role, user};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{ListSettings, MasterEntity, SeaOrmRepository};

/// Master data module: roles, biodata, users and modules behind one REST surface.
///
/// Lifecycle: [`MasterData::migrate`], then [`MasterData::init`], then
/// [`MasterData::register_rest`].
#[derive(Default)]
pub struct MasterData {
    services: ArcSwapOption<Services>,
}

impl MasterData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the master tables if they are missing.
    pub async fn migrate(&self, db: &DbHandle) -> anyhow::Result<()> {
        info!("Running master_data database migrations");
        let conn = db.sea();
        Migrator::up(&conn, None)
            .await
            .context("master_data migrations failed")?;
        info!("master_data database migrations completed");
        Ok(())
    }

    /// Build repositories and services. `cancel` aborts in-flight list queries on shutdown.
    pub fn init(
        &self,
        cfg: &MasterDataConfig,
        db: &DbHandle,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        ensure!(
            cfg.default_page_size > 0 && cfg.default_page_size <= cfg.max_page_size,
            "default_page_size must be between 1 and max_page_size ({})",
            cfg.max_page_size
        );
        info!(?cfg, "Initializing master_data module");

        let settings = ListSettings {
            limits: LimitCfg {
                default: cfg.default_page_size,
                max: cfg.max_page_size,
            },
            consistent_reads: cfg.consistent_reads,
        };
        let conn = db.sea();
        let services = Services {
            roles: service::<role::Entity>(&conn, settings, &cancel),
            biodata: service::<biodata::Entity>(&conn, settings, &cancel),
            users: service::<user::Entity>(&conn, settings, &cancel),
            modules: service::<module::Entity>(&conn, settings, &cancel),
        };
        self.services.store(Some(Arc::new(services)));
        Ok(())
    }

    /// Mount every master resource on `router` and document it in `openapi`.
    pub fn register_rest(
        &self,
        router: Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<Router> {
        let services = self.services()?;
        let router = register_routes(router, openapi, &services)?;
        info!("master_data REST routes registered");
        Ok(router)
    }

    /// In-process client for one resource, e.g. `client::<Role>()`.
    pub fn client<T>(&self) -> anyhow::Result<Arc<dyn MasterDataApi<T>>>
    where
        T: Record,
        Services: ServiceOf<T>,
    {
        let services = self.services()?;
        Ok(Arc::new(LocalClient::new(services.service_of())))
    }

    fn services(&self) -> anyhow::Result<Arc<Services>> {
        self.services
            .load_full()
            .context("master_data is not initialized")
    }
}

/// Picks the service of one record kind out of [`Services`].
pub trait ServiceOf<T: Record> {
    fn service_of(&self) -> Arc<Service<T>>;
}

macro_rules! service_of {
    ($record:ty, $field:ident) => {
        impl ServiceOf<$record> for Services {
            fn service_of(&self) -> Arc<Service<$record>> {
                self.$field.clone()
            }
        }
    };
}

service_of!(crate::contract::model::Role, roles);
service_of!(crate::contract::model::Biodata, biodata);
service_of!(crate::contract::model::User, users);
service_of!(crate::contract::model::Module, modules);

fn service<E>(
    conn: &DatabaseConnection,
    settings: ListSettings,
    cancel: &CancellationToken,
) -> Arc<Service<E::Record>>
where
    E: MasterEntity,
    E::Model: Send + Sync,
{
    let repo = SeaOrmRepository::<E, _>::new(conn.clone(), settings).with_cancel(cancel.clone());
    Arc::new(Service::new(Arc::new(repo)))
}
