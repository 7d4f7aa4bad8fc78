use modkit_db::{FieldMap, Listable};
use once_cell::sync::Lazy;
use sea_orm::entity::prelude::*;

/// `image` is binary and therefore never filterable or searchable.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "m_biodata")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub fullname: String,
    #[sea_orm(column_type = "String(StringLen::N(15))")]
    pub mobile_phone: String,
    pub image: Option<Vec<u8>>,
    #[sea_orm(column_type = "String(StringLen::N(255))", nullable)]
    pub image_path: Option<String>,
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
