//! List query layer: `page_core::ListQuery` → one composed `sea_orm::Select<E>` → `Page<T>`.
//!
//! Request parsing belongs to the API layer. This module consumes already validated
//! `SortSpec`/`FilterSpec` values and resolves their field names through a [`FieldMap`]
//! built by reflecting over the entity's columns.
//!
//! Layout:
//! - [`FieldMap`] / [`FieldKind`]: external name → column + coarse type.
//! - [`sort`]: ORDER BY clauses.
//! - [`filter`]: left-folded AND/OR predicate tree.
//! - [`search`]: case-insensitive "contains" over every text column.
//! - [`paginate`]: count pass + bounded fetch + page assembly.

use std::collections::HashMap;

use convert_case::{Case, Casing};
use page_core::DataType;
use sea_orm::{
    sea_query::{ColumnType, Expr, Func, LikeExpr, SimpleExpr},
    ColumnTrait, EntityTrait, IdenStatic, Iterable,
};

pub mod filter;
pub mod paginate;
pub mod search;
pub mod sort;

pub use filter::{build_filter, FilterExt};
pub use paginate::{
    paginate, resolve_page_size, LimitCfg, ListObserver, ListOptions, ListStage, TracingObserver,
};
pub use search::{build_search, SearchExt};
pub use sort::{sort_clauses, SortExt};


/// Physical kind of a listable column; decides how filter operands are bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    I64,
    F64,
    Bool,
    DateTime,
    DateTimeUtc,
    Date,
    Time,
}

impl FieldKind {
    /// Classify a SeaORM column type. Binary, JSON, UUID and other shapes that have no
    /// sensible text/number/date/boolean reading return `None` and are left out of the map.
    pub fn classify(ct: &ColumnType) -> Option<Self> {
        use ColumnType as C;
        Some(match ct {
            C::Char(_) | C::String(_) | C::Text => FieldKind::String,
            C::TinyInteger
            | C::SmallInteger
            | C::Integer
            | C::BigInteger
            | C::TinyUnsigned
            | C::SmallUnsigned
            | C::Unsigned
            | C::BigUnsigned => FieldKind::I64,
            C::Float | C::Double | C::Decimal(_) | C::Money(_) => FieldKind::F64,
            C::Boolean => FieldKind::Bool,
            C::DateTime | C::Timestamp => FieldKind::DateTime,
            C::TimestampWithTimeZone => FieldKind::DateTimeUtc,
            C::Date => FieldKind::Date,
            C::Time => FieldKind::Time,
            _ => return None,
        })
    }

    pub fn data_type(self) -> DataType {
        match self {
            FieldKind::String => DataType::Text,
            FieldKind::I64 | FieldKind::F64 => DataType::Number,
            FieldKind::Bool => DataType::Boolean,
            FieldKind::DateTime | FieldKind::DateTimeUtc | FieldKind::Date | FieldKind::Time => {
                DataType::Date
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Field<E: EntityTrait> {
    /// Name as the client spells it (camelCase).
    pub name: String,
    pub col: E::Column,
    pub kind: FieldKind,
}

/// External field name → column. Lookups are case-insensitive.
#[derive(Clone, Debug)]
pub struct FieldMap<E: EntityTrait> {
    map: HashMap<String, Field<E>>,
}

impl<E: EntityTrait> Default for FieldMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> FieldMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(mut self, api_name: impl Into<String>, col: E::Column, kind: FieldKind) -> Self {
        let name = api_name.into();
        self.map
            .insert(name.to_lowercase(), Field { name, col, kind });
        self
    }

    /// Walk every column of `E` once. The external name is the camelCase form of the
    /// column name (`mobile_phone` → `mobilePhone`); unclassifiable columns are skipped.
    pub fn reflect() -> Self {
        E::Column::iter().fold(Self::new(), |acc, col| {
            match FieldKind::classify(col.def().get_column_type()) {
                Some(kind) => acc.insert(col.as_str().to_case(Case::Camel), col, kind),
                None => {
                    tracing::trace!(column = col.as_str(), "column not listable, skipped");
                    acc
                }
            }
        })
    }

    /// Drop a column that must stay out of sort, filter and search (credentials, blobs).
    pub fn without(mut self, col: E::Column) -> Self {
        let name = col.as_str().to_case(Case::Camel).to_lowercase();
        self.map.remove(&name);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field<E>> {
        self.map.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field<E>> {
        self.map.values()
    }

    /// External names in a stable (name) order.
    pub fn names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.map.values().map(|f| f.name.as_str()).collect();
        out.sort_unstable();
        out
    }

    /// Text columns in a stable (name) order.
    pub fn text_fields(&self) -> Vec<&Field<E>> {
        let mut out: Vec<_> = self
            .map
            .values()
            .filter(|f| f.kind == FieldKind::String)
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }
}

/// Entities that can be listed. Implementors cache their reflected map:
///
/// ```ignore
/// impl Listable for Entity {
///     fn field_map() -> &'static FieldMap<Self> {
///         static FIELDS: Lazy<FieldMap<Entity>> = Lazy::new(FieldMap::reflect);
///         &FIELDS
///     }
/// }
/// ```
pub trait Listable: EntityTrait {
    fn field_map() -> &'static FieldMap<Self>;
}

/* ---------- LIKE helpers ---------- */

const LIKE_ESCAPE: char = '!';

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | LIKE_ESCAPE => {
                out.push(LIKE_ESCAPE);
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

fn like_contains(s: &str) -> String {
    format!("%{}%", like_escape(s))
}

/// `LOWER(col) LIKE '%term%' ESCAPE '!'` with the pattern bound as a parameter.
pub(crate) fn contains_ci<C: ColumnTrait>(col: C, term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col)))
        .like(LikeExpr::new(like_contains(&term.to_lowercase())).escape(LIKE_ESCAPE))
}
