use modkit_db::{FieldMap, Listable};
use once_cell::sync::Lazy;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "m_role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub code: String,
    pub level: i16,
    pub created_by: i64,
    pub created_on: DateTime,
    pub modified_by: Option<i64>,
    pub modified_on: Option<DateTime>,
    pub deleted_by: Option<i64>,
    pub deleted_on: Option<DateTime>,
    pub is_delete: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Listable for Entity {
    fn field_map() -> &'static FieldMap<Self> {
        static FIELDS: Lazy<FieldMap<Entity>> = Lazy::new(FieldMap::reflect);
        &FIELDS
    }
}
