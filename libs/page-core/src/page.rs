use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortMeta {
    pub empty: bool,
    pub sorted: bool,
    pub unsorted: bool,
}

/// Page request echoed back to the client.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    pub offset: u64,
    pub page_number: u64,
    pub page_size: u64,
    pub paged: bool,
    pub un_paged: bool,
    pub sort: SortMeta,
}

/// Numeric side of a page, derived from the requested page/size and the row count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMeta {
    pub number: u64,
    pub size: u64,
    pub offset: u64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl PageMeta {
    /// Offset of the first row of `page`, or `InvalidPageSize` for a zero size.
    ///
    /// SQL binds OFFSET/LIMIT as signed 64-bit integers, so both must fit in `i64`.
    pub fn offset_of(page: u64, size: u64) -> Result<u64> {
        if size == 0 {
            return Err(Error::InvalidPageSize);
        }
        if i64::try_from(size).is_err() {
            return Err(Error::InvalidParam {
                param: "_size",
                reason: "page size is out of range".to_string(),
            });
        }
        page.checked_mul(size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or(Error::InvalidParam {
                param: "_page",
                reason: "page offset is out of range".to_string(),
            })
    }

    /// `last` is literally `number == total_pages - 1`: a page past the end is not last,
    /// and neither is page 0 of an empty result.
    pub fn compute(page: u64, size: u64, total_elements: i64) -> Result<Self> {
        let offset = Self::offset_of(page, size)?;
        let total = total_elements.max(0);
        let size_i = i64::try_from(size).unwrap_or(i64::MAX);
        let total_pages = total / size_i + i64::from(total % size_i != 0);

        Ok(Self {
            number: page,
            size,
            offset,
            total_elements,
            total_pages,
            first: page == 0,
            last: i64::try_from(page).is_ok_and(|p| p == total_pages - 1),
            empty: total_elements <= 0,
        })
    }
}

/// List response body.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Pageable,
    pub sort: SortMeta,
    pub total_pages: i64,
    pub total_elements: i64,
    pub size: u64,
    pub number: u64,
    pub number_of_elements: u64,
    pub last: bool,
    pub first: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    /// Compose rows, page arithmetic and sort metadata. `sorted` reflects whether the
    /// request carried any sort keys.
    pub fn assemble(content: Vec<T>, meta: PageMeta, sorted: bool) -> Self {
        let sort = SortMeta {
            empty: meta.empty,
            sorted,
            unsorted: !sorted,
        };
        Self {
            number_of_elements: content.len() as u64,
            content,
            pageable: Pageable {
                offset: meta.offset,
                page_number: meta.number,
                page_size: meta.size,
                paged: true,
                un_paged: false,
                sort,
            },
            sort,
            total_pages: meta.total_pages,
            total_elements: meta.total_elements,
            size: meta.size,
            number: meta.number,
            last: meta.last,
            first: meta.first,
            empty: meta.empty,
        }
    }

    /// Map items while preserving the envelope (Domain->DTO mapping convenience)
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            pageable: self.pageable,
            sort: self.sort,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            size: self.size,
            number: self.number,
            number_of_elements: self.number_of_elements,
            last: self.last,
            first: self.first,
            empty: self.empty,
        }
    }
}
