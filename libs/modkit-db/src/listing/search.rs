use page_core::Error;
use sea_orm::{sea_query::Expr, Condition, EntityTrait, QueryFilter};

use super::{contains_ci, FieldMap};

/// Disjunction of case-insensitive "contains" over the text columns only; numbers, dates
/// and booleans never take part in global search.
///
/// A blank term yields `None`. An entity without text columns matches nothing.
/// The term is always bound as a parameter, whatever upstream validation let through.
pub fn build_search<E: EntityTrait>(term: &str, fmap: &FieldMap<E>) -> Option<Condition> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let fields = fmap.text_fields();
    if fields.is_empty() {
        return Some(Condition::all().add(Expr::cust("1=0")));
    }
    Some(
        fields
            .into_iter()
            .fold(Condition::any(), |c, f| c.add(contains_ci(f.col, term))),
    )
}

pub trait SearchExt<E: EntityTrait>: Sized {
    fn apply_search(self, term: Option<&str>, fmap: &FieldMap<E>) -> Result<Self, Error>;
}

impl<E: EntityTrait> SearchExt<E> for sea_orm::Select<E> {
    fn apply_search(self, term: Option<&str>, fmap: &FieldMap<E>) -> Result<Self, Error> {
        if let Some(t) = term {
            page_core::validate_search_term(t)?;
        }
        Ok(match term.and_then(|t| build_search(t, fmap)) {
            Some(cond) => self.filter(cond),
            None => self,
        })
    }
}
