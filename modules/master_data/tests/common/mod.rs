#![allow(dead_code)]

use std::sync::Arc;

use modkit::api::operation_builder::SchemaCollection;
use modkit::api::{OpenApiRegistry, OperationSpec};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use master_data::domain::service::Service;
use master_data::infra::storage::migrations::Migrator;
use master_data::infra::storage::{ListSettings, MasterEntity, SeaOrmRepository};

/// Fresh in-memory database with the master tables.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn service_on<E>(db: &DatabaseConnection, settings: ListSettings) -> Arc<Service<E::Record>>
where
    E: MasterEntity,
    E::Model: Send + Sync,
{
    let repo = SeaOrmRepository::<E, _>::new(db.clone(), settings);
    Arc::new(Service::new(Arc::new(repo)))
}

/// Mock OpenAPI registry for testing
pub struct MockOpenApiRegistry;

impl OpenApiRegistry for MockOpenApiRegistry {
    fn register_operation(&self, _spec: &OperationSpec) {
        // No-op for tests
    }

    fn ensure_schema_raw(&self, name: &str, _schemas: SchemaCollection) -> String {
        name.to_string()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
