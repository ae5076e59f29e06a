//! Paginated search primitives shared by all ledgerbook resources
//!
//! Every searchable resource goes through the same three-step pipeline:
//! a [`SearchRequest`] is normalized (page/size clamped, sort direction
//! defaulted), the storage layer produces one page of matches plus the
//! total match count, and the pair is wrapped into a [`PagedResult`]
//! envelope which the link builder decorates with HATEOAS navigation
//! links. Nothing in this crate touches storage - it is pure request and
//! response shaping.

pub mod links;
pub mod page;
pub mod request;

pub use links::{Link, LinkRelation, resource_links};
pub use page::PagedResult;
pub use request::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SearchRequest, SortOrder};
