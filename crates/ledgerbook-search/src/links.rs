//! HATEOAS link construction
//!
//! Links are built purely from an already-assembled [`PagedResult`] and
//! the filter's serialized query pairs - the builder never goes back to
//! storage. Page navigation links re-emit every non-pagination filter
//! field so that following `next` repeats the exact same search.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::page::PagedResult;

/// Relation names used in link maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkRelation {
    SelfRel,
    First,
    Prev,
    Next,
    Last,
    Create,
    Update,
    Delete,
    Collection,
    Search,
}

impl LinkRelation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelfRel => "self",
            Self::First => "first",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Last => "last",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Collection => "collection",
            Self::Search => "search",
        }
    }
}

impl std::fmt::Display for LinkRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single hypermedia link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Link {
    /// Relation to the current resource (self, update, delete, ...)
    pub rel: String,
    /// Absolute URL
    pub href: String,
    /// HTTP method, GET unless stated otherwise
    pub method: String,
}

impl Link {
    /// Create a GET link
    pub fn new(rel: LinkRelation, href: impl Into<String>) -> Self {
        Self::with_method(rel, href, "GET")
    }

    /// Create a link with an explicit HTTP method
    pub fn with_method(rel: LinkRelation, href: impl Into<String>, method: &str) -> Self {
        Self {
            rel: rel.as_str().to_string(),
            href: href.into(),
            method: method.to_string(),
        }
    }
}

/// Percent-encode filter pairs and append the pagination parameters
fn query_string(page: i64, page_size: i64, filter_pairs: &[(&str, String)]) -> String {
    let mut parts = vec![format!("page={page}"), format!("pageSize={page_size}")];
    parts.extend(
        filter_pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value))),
    );
    parts.join("&")
}

impl<T> PagedResult<T> {
    /// Populate the navigation link map in place
    ///
    /// `filter_pairs` carries every filter field except `page`/`pageSize`
    /// (sort directives included), already stringified. Emits `self`
    /// always, `first`/`prev` only past the first page, `next` only when
    /// a next page exists, `last` only when the current page is not
    /// already the last of a multi-page set, and `create` pointing at the
    /// resource's collection endpoint. Returns `&mut self` for chaining.
    pub fn add_links(
        &mut self,
        base_url: &str,
        resource: &str,
        filter_pairs: &[(&str, String)],
    ) -> &mut Self {
        let search_route = format!("{base_url}/search/{resource}");
        let page_size = self.page_size;
        let url_for =
            |page: i64| format!("{search_route}?{}", query_string(page, page_size, filter_pairs));

        self.links
            .insert(LinkRelation::SelfRel.as_str().to_string(), url_for(self.page));

        if self.page > 1 {
            self.links
                .insert(LinkRelation::First.as_str().to_string(), url_for(1));
            self.links.insert(
                LinkRelation::Prev.as_str().to_string(),
                url_for(self.page.saturating_sub(1)),
            );
        }

        if self.has_next_page {
            self.links.insert(
                LinkRelation::Next.as_str().to_string(),
                url_for(self.page.saturating_add(1)),
            );
        }

        if self.page < self.total_pages && self.total_pages > 1 {
            self.links.insert(
                LinkRelation::Last.as_str().to_string(),
                url_for(self.total_pages),
            );
        }

        self.links.insert(
            LinkRelation::Create.as_str().to_string(),
            format!("{base_url}/{resource}"),
        );

        self
    }
}

/// Build the link map attached to a single resource representation
///
/// `include_delete` lets callers hide the delete link for resources that
/// must not be removed through the API.
pub fn resource_links(
    base_url: &str,
    resource: &str,
    id: i32,
    include_delete: bool,
) -> BTreeMap<String, Link> {
    let collection_route = format!("{base_url}/{resource}");
    let detail_route = format!("{collection_route}/{id}");

    let mut links = BTreeMap::new();
    links.insert(
        LinkRelation::SelfRel.as_str().to_string(),
        Link::new(LinkRelation::SelfRel, detail_route.clone()),
    );
    links.insert(
        LinkRelation::Update.as_str().to_string(),
        Link::with_method(LinkRelation::Update, detail_route.clone(), "PUT"),
    );
    if include_delete {
        links.insert(
            LinkRelation::Delete.as_str().to_string(),
            Link::with_method(LinkRelation::Delete, detail_route, "DELETE"),
        );
    }
    links.insert(
        LinkRelation::Collection.as_str().to_string(),
        Link::new(LinkRelation::Collection, collection_route),
    );
    links.insert(
        LinkRelation::Search.as_str().to_string(),
        Link::new(LinkRelation::Search, format!("{base_url}/search/{resource}")),
    );

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:3000";

    fn paged(page: i64, page_size: i64, total_count: i64) -> PagedResult<u8> {
        PagedResult::new(Vec::new(), page, page_size, total_count)
    }

    #[test]
    fn first_page_emits_self_next_last_create() {
        let mut result = paged(1, 10, 42);
        result.add_links(BASE, "clients", &[]);

        assert_eq!(
            result.links.get("self"),
            Some(&format!("{BASE}/search/clients?page=1&pageSize=10"))
        );
        assert_eq!(
            result.links.get("next"),
            Some(&format!("{BASE}/search/clients?page=2&pageSize=10"))
        );
        assert_eq!(
            result.links.get("last"),
            Some(&format!("{BASE}/search/clients?page=5&pageSize=10"))
        );
        assert_eq!(result.links.get("create"), Some(&format!("{BASE}/clients")));
        assert!(!result.links.contains_key("first"));
        assert!(!result.links.contains_key("prev"));
    }

    #[test]
    fn last_page_emits_first_and_prev_but_no_next_or_last() {
        let mut result = paged(5, 10, 42);
        result.add_links(BASE, "clients", &[]);

        assert_eq!(
            result.links.get("first"),
            Some(&format!("{BASE}/search/clients?page=1&pageSize=10"))
        );
        assert_eq!(
            result.links.get("prev"),
            Some(&format!("{BASE}/search/clients?page=4&pageSize=10"))
        );
        assert!(!result.links.contains_key("next"));
        assert!(!result.links.contains_key("last"));
    }

    #[test]
    fn single_page_only_navigates_to_itself() {
        let mut result = paged(1, 10, 3);
        result.add_links(BASE, "accounts", &[]);

        assert!(result.links.contains_key("self"));
        assert!(result.links.contains_key("create"));
        assert!(!result.links.contains_key("first"));
        assert!(!result.links.contains_key("prev"));
        assert!(!result.links.contains_key("next"));
        assert!(!result.links.contains_key("last"));
    }

    #[test]
    fn filter_pairs_survive_into_every_navigation_link() {
        let mut result = paged(2, 10, 42);
        let pairs = [
            ("name", "Alpha".to_string()),
            ("sortBy", "name".to_string()),
            ("sortOrder", "desc".to_string()),
        ];
        result.add_links(BASE, "clients", &pairs);

        for rel in ["self", "first", "prev", "next", "last"] {
            let href = result.links.get(rel).unwrap_or_else(|| panic!("missing {rel}"));
            assert!(href.contains("name=Alpha"), "{rel} lost the filter: {href}");
            assert!(href.contains("sortOrder=desc"), "{rel} lost the sort: {href}");
        }
    }

    #[test]
    fn filter_values_are_percent_encoded() {
        let mut result = paged(1, 10, 1);
        result.add_links(BASE, "clients", &[("name", "Silva & Sons".to_string())]);

        let href = result.links.get("self").expect("self link");
        assert!(href.contains("name=Silva%20%26%20Sons"));
    }

    #[test]
    fn add_links_never_touches_envelope_math() {
        let mut result = paged(2, 10, 42);
        result.add_links(BASE, "sales", &[]);
        assert_eq!(result.total_pages, 5);
        assert_eq!(result.total_count, 42);
        assert!(result.has_next_page);
    }

    #[test]
    fn resource_links_cover_the_crud_surface() {
        let links = resource_links(BASE, "cost-centers", 7, true);

        assert_eq!(
            links.get("self").map(|l| l.href.as_str()),
            Some("http://localhost:3000/cost-centers/7")
        );
        assert_eq!(links.get("update").map(|l| l.method.as_str()), Some("PUT"));
        assert_eq!(links.get("delete").map(|l| l.method.as_str()), Some("DELETE"));
        assert_eq!(
            links.get("collection").map(|l| l.href.as_str()),
            Some("http://localhost:3000/cost-centers")
        );
        assert_eq!(
            links.get("search").map(|l| l.href.as_str()),
            Some("http://localhost:3000/search/cost-centers")
        );
    }

    #[test]
    fn delete_link_can_be_withheld() {
        let links = resource_links(BASE, "clients", 1, false);
        assert!(!links.contains_key("delete"));
        assert!(links.contains_key("update"));
    }
}
