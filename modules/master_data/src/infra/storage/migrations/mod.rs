use sea_orm_migration::prelude::*;

mod m20240216_000001_create_master_tables;
mod m20240301_000001_add_user_password;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240216_000001_create_master_tables::Migration),
            Box::new(m20240301_000001_add_user_password::Migration),
        ]
    }
}
