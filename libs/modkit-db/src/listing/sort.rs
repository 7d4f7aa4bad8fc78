use page_core::{Error, SortSpec};
use sea_orm::{sea_query::Order, EntityTrait, QueryOrder};

use super::FieldMap;

/// Resolve sort keys to `(column, direction)` pairs in request order.
/// Duplicated keys are kept; the database ignores the redundant clause.
pub fn sort_clauses<E: EntityTrait>(
    sort: &[SortSpec],
    fmap: &FieldMap<E>,
) -> Result<Vec<(E::Column, Order)>, Error> {
    sort.iter()
        .map(|s| {
            let field = fmap
                .get(&s.field)
                .ok_or_else(|| Error::InvalidSortField(s.field.clone()))?;
            let dir = if s.descending { Order::Desc } else { Order::Asc };
            Ok((field.col, dir))
        })
        .collect()
}

pub trait SortExt<E: EntityTrait>: Sized {
    fn apply_sort(self, sort: &[SortSpec], fmap: &FieldMap<E>) -> Result<Self, Error>;
}

impl<E: EntityTrait> SortExt<E> for sea_orm::Select<E> {
    fn apply_sort(self, sort: &[SortSpec], fmap: &FieldMap<E>) -> Result<Self, Error> {
        Ok(sort_clauses(sort, fmap)?
            .into_iter()
            .fold(self, |q, (col, dir)| q.order_by(col, dir)))
    }
}
