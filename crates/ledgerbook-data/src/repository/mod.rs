//! `PostgreSQL` repositories
//!
//! One repository per entity, all following the same shape: static SQL
//! for the CRUD paths, and a `QueryBuilder` for the search path so the
//! count query and the page query are always assembled from the same
//! predicate function and can never disagree.

pub mod accounts;
pub mod clients;
pub mod cost_centers;
pub mod ledger_entries;
pub mod sales;

pub use accounts::PgAccountRepository;
pub use clients::PgClientRepository;
pub use cost_centers::PgCostCenterRepository;
pub use ledger_entries::PgLedgerEntryRepository;
pub use sales::PgSaleRepository;

use ledgerbook_search::SortOrder;

/// Escape LIKE wildcards so user input matches literally
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Substring pattern for a case-sensitive contains match
fn contains_pattern(raw: &str) -> String {
    format!("%{}%", escape_like(raw))
}

/// ORDER BY direction keyword
const fn sql_direction(order: SortOrder) -> &'static str {
    if order.is_descending() { "DESC" } else { "ASC" }
}
