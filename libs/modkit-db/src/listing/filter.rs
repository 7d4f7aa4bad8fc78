//! `FilterSpec` list → `sea_orm::Condition`.
//!
//! Each spec's combinator joins it to everything before it, so
//! `[A, B(OR), C(AND)]` renders as `((A OR B) AND C)`. The first spec's combinator only
//! matters for the specs that follow it: it has nothing to join.

use chrono::NaiveDateTime;
use page_core::{Combinator, Error, FilterSpec, FilterValue, MatchMode};
use sea_orm::{
    sea_query::{Expr, SimpleExpr},
    Condition, EntityTrait, QueryFilter,
};

use super::{contains_ci, Field, FieldKind, FieldMap};

/// Integers above this lose precision as `f64`; bind them as doubles instead.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn number_value(kind: FieldKind, n: f64) -> sea_orm::Value {
    if kind == FieldKind::I64 && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT {
        sea_orm::Value::BigInt(Some(n as i64))
    } else {
        sea_orm::Value::Double(Some(n))
    }
}

fn date_value(kind: FieldKind, dt: NaiveDateTime) -> sea_orm::Value {
    match kind {
        FieldKind::DateTimeUtc => sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(dt.and_utc()))),
        FieldKind::Date => sea_orm::Value::ChronoDate(Some(Box::new(dt.date()))),
        FieldKind::Time => sea_orm::Value::ChronoTime(Some(Box::new(dt.time()))),
        _ => sea_orm::Value::ChronoDateTime(Some(Box::new(dt))),
    }
}

/// Scalar operand bound for the column kind. Ranges are split by the caller.
fn scalar(kind: FieldKind, v: &FilterValue) -> Option<sea_orm::Value> {
    Some(match v {
        FilterValue::Text(s) => sea_orm::Value::String(Some(Box::new(s.clone()))),
        FilterValue::Number(n) => number_value(kind, *n),
        FilterValue::Bool(b) => sea_orm::Value::Bool(Some(*b)),
        FilterValue::Date(dt) => date_value(kind, *dt),
        FilterValue::NumberRange(..) | FilterValue::DateRange(..) => return None,
    })
}

fn range(kind: FieldKind, v: &FilterValue) -> Option<(sea_orm::Value, sea_orm::Value)> {
    match v {
        FilterValue::NumberRange(lo, hi) => Some((number_value(kind, *lo), number_value(kind, *hi))),
        FilterValue::DateRange(lo, hi) => Some((date_value(kind, *lo), date_value(kind, *hi))),
        _ => None,
    }
}

fn mismatch(spec: &FilterSpec, reason: impl Into<String>) -> Error {
    Error::InvalidFilter {
        field: spec.field().to_string(),
        reason: reason.into(),
    }
}

/// Render one spec against its resolved column.
fn predicate<E: EntityTrait>(spec: &FilterSpec, f: &Field<E>) -> Result<SimpleExpr, Error> {
    let declared = spec.data_type();
    let actual = f.kind.data_type();
    if declared != actual {
        return Err(mismatch(
            spec,
            format!("field is {actual:?} but the filter declares {declared:?}"),
        ));
    }

    let col = f.col;
    let bad_operand = || mismatch(spec, "operand does not fit the match mode");

    Ok(match spec.match_mode() {
        MatchMode::Contains => match spec.value() {
            FilterValue::Text(s) => contains_ci(col, s),
            _ => return Err(bad_operand()),
        },
        MatchMode::Equals => Expr::col(col).eq(scalar(f.kind, spec.value()).ok_or_else(bad_operand)?),
        MatchMode::Not => Expr::col(col).ne(scalar(f.kind, spec.value()).ok_or_else(bad_operand)?),
        MatchMode::LessThan => Expr::col(col).lt(scalar(f.kind, spec.value()).ok_or_else(bad_operand)?),
        MatchMode::GreaterThan => {
            Expr::col(col).gt(scalar(f.kind, spec.value()).ok_or_else(bad_operand)?)
        }
        MatchMode::Between => {
            let (lo, hi) = range(f.kind, spec.value()).ok_or_else(bad_operand)?;
            Expr::col(col).between(lo, hi)
        }
    })
}

/// Left-fold the specs into one condition. `Ok(None)` for an empty list.
pub fn build_filter<E: EntityTrait>(
    filters: &[FilterSpec],
    fmap: &FieldMap<E>,
) -> Result<Option<Condition>, Error> {
    let mut acc: Option<Condition> = None;
    for spec in filters {
        let field = fmap
            .get(spec.field())
            .ok_or_else(|| Error::UnknownField(spec.field().to_string()))?;
        let p = predicate(spec, field)?;

        acc = Some(match (acc, spec.combinator()) {
            (None, _) => Condition::all().add(p),
            (Some(prev), Combinator::And) => Condition::all().add(prev).add(p),
            (Some(prev), Combinator::Or) => Condition::any().add(prev).add(p),
        });
    }
    Ok(acc)
}

pub trait FilterExt<E: EntityTrait>: Sized {
    fn apply_filters(self, filters: &[FilterSpec], fmap: &FieldMap<E>) -> Result<Self, Error>;
}

impl<E: EntityTrait> FilterExt<E> for sea_orm::Select<E> {
    fn apply_filters(self, filters: &[FilterSpec], fmap: &FieldMap<E>) -> Result<Self, Error> {
        Ok(match build_filter(filters, fmap)? {
            Some(cond) => self.filter(cond),
            None => self,
        })
    }
}
