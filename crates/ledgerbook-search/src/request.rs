//! Search request normalization
//!
//! Raw pagination parameters arrive straight from query strings and are
//! allowed to be nonsense. [`SearchRequest::normalize`] silently clamps
//! them into the supported window instead of rejecting the request - a
//! deliberate accommodation so that hand-typed URLs always return a page.

use serde::{Deserialize, Serialize};

/// First page, 1-based
pub const DEFAULT_PAGE: i64 = 1;
/// Page size applied when the caller sends none (or a non-positive one)
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on page size; larger requests are clamped, not rejected
pub const MAX_PAGE_SIZE: i64 = 100;

/// Direction applied when ordering search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a raw direction string, falling back to ascending on
    /// anything that is not (case-insensitively) `desc`
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Invalid sort order: {s}")),
        }
    }
}

/// Pagination and ordering directives shared by every resource filter
///
/// Field names mirror the wire protocol (`page`, `pageSize`, `sortBy`,
/// `sortOrder`). Invariants after [`normalize`](Self::normalize):
/// `page >= 1`, `1 <= page_size <= 100`, `sort_order` is `"asc"` or
/// `"desc"` (lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// 1-based page number
    pub page: i64,
    /// Items per page
    pub page_size: i64,
    /// Field to order by; unrecognized names fall back to the
    /// resource-specific default sort
    pub sort_by: Option<String>,
    /// `"asc"` or `"desc"`, case-insensitive on input
    pub sort_order: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: SortOrder::Asc.as_str().to_string(),
        }
    }
}

impl SearchRequest {
    /// Build an already-normalized request from raw query parameters
    pub fn new(
        page: Option<i64>,
        page_size: Option<i64>,
        sort_by: Option<String>,
        sort_order: Option<String>,
    ) -> Self {
        let mut request = Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            sort_by,
            sort_order: sort_order.unwrap_or_else(|| SortOrder::Asc.as_str().to_string()),
        };
        request.normalize();
        request
    }

    /// Clamp out-of-range values and default the sort direction
    ///
    /// Never fails: `page < 1` becomes 1, `page_size < 1` becomes 10,
    /// `page_size > 100` becomes 100, and any blank or unrecognized sort
    /// order becomes `"asc"`. Idempotent - normalizing twice yields the
    /// same request as normalizing once.
    pub fn normalize(&mut self) {
        if self.page < DEFAULT_PAGE {
            self.page = DEFAULT_PAGE;
        }

        if self.page_size < 1 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }

        if self.page_size > MAX_PAGE_SIZE {
            self.page_size = MAX_PAGE_SIZE;
        }

        self.sort_order = SortOrder::parse_lenient(self.sort_order.trim())
            .as_str()
            .to_string();

        if self
            .sort_by
            .as_deref()
            .is_some_and(|field| field.trim().is_empty())
        {
            self.sort_by = None;
        }
    }

    /// Parsed sort direction (ascending unless explicitly `desc`)
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::parse_lenient(&self.sort_order)
    }

    pub fn is_descending(&self) -> bool {
        self.sort_order().is_descending()
    }

    /// Row offset for the current page, `(page - 1) * page_size`
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Row limit for the current page
    pub const fn limit(&self) -> i64 {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(page: i64, page_size: i64, sort_order: &str) -> SearchRequest {
        SearchRequest {
            page,
            page_size,
            sort_by: None,
            sort_order: sort_order.to_string(),
        }
    }

    #[test]
    fn clamps_page_and_page_size_into_range() {
        let mut request = raw(-3, 0, "asc");
        request.normalize();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 10);

        let mut request = raw(1, 500, "asc");
        request.normalize();
        assert_eq!(request.page_size, 100);
    }

    #[test]
    fn invalid_sort_order_defaults_to_asc() {
        for bad in ["", "  ", "sideways", "ASCENDING"] {
            let mut request = raw(1, 10, bad);
            request.normalize();
            assert_eq!(request.sort_order, "asc");
        }
    }

    #[test]
    fn sort_order_is_case_insensitive() {
        let mut request = raw(1, 10, "DESC");
        request.normalize();
        assert_eq!(request.sort_order, "desc");
        assert!(request.is_descending());
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut request = raw(-7, 9999, "Desc");
        request.normalize();
        let once = request.clone();
        request.normalize();
        assert_eq!(request, once);
    }

    #[test]
    fn blank_sort_by_becomes_none() {
        let mut request = SearchRequest {
            sort_by: Some("   ".to_string()),
            ..SearchRequest::default()
        };
        request.normalize();
        assert_eq!(request.sort_by, None);
    }

    #[test]
    fn offset_follows_page_arithmetic() {
        let request = SearchRequest::new(Some(3), Some(25), None, None);
        assert_eq!(request.offset(), 50);
        assert_eq!(request.limit(), 25);
    }

    #[test]
    fn new_applies_defaults_for_missing_values() {
        let request = SearchRequest::new(None, None, None, None);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 10);
        assert_eq!(request.sort_order(), SortOrder::Asc);
    }
}
