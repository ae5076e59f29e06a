//! Paged result envelope

use std::collections::BTreeMap;

use serde::Serialize;

use crate::request::SearchRequest;

/// One page of results plus the pagination metadata derived from the
/// total match count
///
/// Construction computes every derived field; the only mutation allowed
/// afterwards is the link builder filling in [`links`](Self::links).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PagedResult<T> {
    /// Items on the current page, already ordered
    pub items: Vec<T>,
    /// 1-based page number
    pub page: i64,
    /// Items per page
    pub page_size: i64,
    /// Total matches across all pages, not just this one
    pub total_count: i64,
    /// Ceiling of `total_count / page_size`; zero when nothing matched
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    /// Navigation links keyed by relation name (self, next, create, ...)
    pub links: BTreeMap<String, String>,
}

impl<T> PagedResult<T> {
    /// Assemble an envelope from one page of items and the total count
    ///
    /// `page` and `page_size` are expected to be normalized already
    /// (see [`SearchRequest::normalize`]); `total_count` must count the
    /// full filtered set, pre-pagination.
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total_count: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_count + page_size - 1) / page_size
        } else {
            0
        };

        Self {
            items,
            page,
            page_size,
            total_count,
            total_pages,
            has_previous_page: page > 1,
            has_next_page: page < total_pages,
            links: BTreeMap::new(),
        }
    }

    /// Assemble an envelope using the pagination half of a filter
    pub fn from_request(items: Vec<T>, request: &SearchRequest, total_count: i64) -> Self {
        Self::new(items, request.page, request.page_size, total_count)
    }

    /// Convert the item type while keeping all metadata and links
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
            links: self.links,
        }
    }
}
