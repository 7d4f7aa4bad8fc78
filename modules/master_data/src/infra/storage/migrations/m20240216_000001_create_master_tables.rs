use sea_orm::{EntityName, EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::infra::storage::entity::{biodata, module, role, user};

/// Tables are derived from the entities so the two cannot drift apart.
#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create_table_of<E: EntityTrait>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr> {
    let schema = Schema::new(manager.get_database_backend());
    manager
        .create_table(schema.create_table_from_entity(entity).if_not_exists().to_owned())
        .await?;
    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name(format!("idx_{}_is_delete", entity.table_name()))
                .table(entity)
                .col(Alias::new("is_delete"))
                .to_owned(),
        )
        .await
}

async fn drop_table_of<E: EntityTrait>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_table_of(manager, role::Entity).await?;
        create_table_of(manager, biodata::Entity).await?;
        create_table_of(manager, user::Entity).await?;
        create_table_of(manager, module::Entity).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table_of(manager, module::Entity).await?;
        drop_table_of(manager, user::Entity).await?;
        drop_table_of(manager, biodata::Entity).await?;
        drop_table_of(manager, role::Entity).await
    }
}
