//! SeaORM entities, one table per master entity. Every table carries the same audit columns.

pub mod biodata;
pub mod module;
pub mod role;
pub mod user;
