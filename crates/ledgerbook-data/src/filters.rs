//! Per-entity search filters
//!
//! Every filter couples the shared pagination/sort directives with the
//! entity's optional predicates. Predicates combine conjunctively: a
//! record matches only when every supplied predicate holds. String
//! predicates are case-sensitive substring matches, id and enum
//! predicates are exact, and ranges are inclusive on both ends.
//!
//! Pagination stays clamp-only (see `SearchRequest::normalize`), but a
//! contradictory range (`min > max`) or a non-positive id is rejected
//! with a [`FilterError`] rather than silently adjusted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use ledgerbook_search::SearchRequest;

use crate::models::AccountKind;

/// Validation failures for filter predicates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("{field} must be greater than zero")]
    NonPositiveId { field: &'static str },

    #[error("{min_field} must be less than or equal to {max_field}")]
    InvalidRange {
        min_field: &'static str,
        max_field: &'static str,
    },

    #[error("{field} must not be negative")]
    NegativeAmount { field: &'static str },
}

fn check_id(field: &'static str, value: Option<i32>) -> Result<(), FilterError> {
    match value {
        Some(id) if id <= 0 => Err(FilterError::NonPositiveId { field }),
        _ => Ok(()),
    }
}

/// Append the shared sort directives to a filter's query pairs
fn push_sort_pairs(pairs: &mut Vec<(&'static str, String)>, search: &SearchRequest) {
    if let Some(sort_by) = &search.sort_by {
        pairs.push(("sortBy", sort_by.clone()));
    }
    pairs.push(("sortOrder", search.sort_order.clone()));
}

/// Filter for client searches
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub search: SearchRequest,
    /// Substring match on the client name
    pub name: Option<String>,
    /// Exact match on the tax identifier
    pub tax_id: Option<String>,
    /// Exact match on the active flag
    pub active: Option<bool>,
    /// Substring match on the email address
    pub email: Option<String>,
}

impl ClientFilter {
    pub fn normalize(&mut self) {
        self.search.normalize();
    }

    /// Check predicate consistency
    ///
    /// # Errors
    ///
    /// Never fails today - clients carry no range predicates - but kept
    /// so all five filters share the same call shape.
    pub fn validate(&self) -> Result<(), FilterError> {
        Ok(())
    }

    /// Non-pagination fields as wire-format query pairs
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(tax_id) = &self.tax_id {
            pairs.push(("taxId", tax_id.clone()));
        }
        if let Some(active) = self.active {
            pairs.push(("active", active.to_string()));
        }
        if let Some(email) = &self.email {
            pairs.push(("email", email.clone()));
        }
        push_sort_pairs(&mut pairs, &self.search);
        pairs
    }
}

/// Filter for account searches
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub search: SearchRequest,
    /// Substring match on the account name
    pub name: Option<String>,
    /// Exact match on the ledger side
    pub kind: Option<AccountKind>,
    /// Exact match on the owning client
    pub client_id: Option<i32>,
}

impl AccountFilter {
    pub fn normalize(&mut self) {
        self.search.normalize();
    }

    /// Check predicate consistency
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::NonPositiveId`] when `client_id <= 0`.
    pub fn validate(&self) -> Result<(), FilterError> {
        check_id("clientId", self.client_id)
    }

    /// Non-pagination fields as wire-format query pairs
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(kind) = self.kind {
            pairs.push(("kind", kind.to_string()));
        }
        if let Some(client_id) = self.client_id {
            pairs.push(("clientId", client_id.to_string()));
        }
        push_sort_pairs(&mut pairs, &self.search);
        pairs
    }
}

/// Filter for cost center searches
#[derive(Debug, Clone, Default)]
pub struct CostCenterFilter {
    pub search: SearchRequest,
    /// Substring match on the cost center name
    pub name: Option<String>,
}

impl CostCenterFilter {
    pub fn normalize(&mut self) {
        self.search.normalize();
    }

    /// Check predicate consistency
    ///
    /// # Errors
    ///
    /// Never fails today; kept for uniformity with the other filters.
    pub fn validate(&self) -> Result<(), FilterError> {
        Ok(())
    }

    /// Non-pagination fields as wire-format query pairs
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        push_sort_pairs(&mut pairs, &self.search);
        pairs
    }
}

/// Filter for ledger entry searches
#[derive(Debug, Clone, Default)]
pub struct LedgerEntryFilter {
    pub search: SearchRequest,
    /// Inclusive lower bound on the amount
    pub amount_min: Option<Decimal>,
    /// Inclusive upper bound on the amount
    pub amount_max: Option<Decimal>,
    /// Exact match on the account
    pub account_id: Option<i32>,
    /// Exact match on the cost center
    pub cost_center_id: Option<i32>,
    /// Inclusive lower bound on the creation date
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation date
    pub created_to: Option<DateTime<Utc>>,
}

impl LedgerEntryFilter {
    pub fn normalize(&mut self) {
        self.search.normalize();
    }

    /// Check predicate consistency
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] for a negative `amount_min`, a
    /// non-positive id, or an inverted amount/date range.
    pub fn validate(&self) -> Result<(), FilterError> {
        if let Some(min) = self.amount_min
            && min < Decimal::ZERO
        {
            return Err(FilterError::NegativeAmount {
                field: "amountMin",
            });
        }
        if let (Some(min), Some(max)) = (self.amount_min, self.amount_max)
            && min > max
        {
            return Err(FilterError::InvalidRange {
                min_field: "amountMin",
                max_field: "amountMax",
            });
        }
        if let (Some(from), Some(to)) = (self.created_from, self.created_to)
            && from > to
        {
            return Err(FilterError::InvalidRange {
                min_field: "createdFrom",
                max_field: "createdTo",
            });
        }
        check_id("accountId", self.account_id)?;
        check_id("costCenterId", self.cost_center_id)?;
        Ok(())
    }

    /// Non-pagination fields as wire-format query pairs
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(min) = self.amount_min {
            pairs.push(("amountMin", min.to_string()));
        }
        if let Some(max) = self.amount_max {
            pairs.push(("amountMax", max.to_string()));
        }
        if let Some(account_id) = self.account_id {
            pairs.push(("accountId", account_id.to_string()));
        }
        if let Some(cost_center_id) = self.cost_center_id {
            pairs.push(("costCenterId", cost_center_id.to_string()));
        }
        if let Some(from) = self.created_from {
            pairs.push(("createdFrom", from.to_rfc3339()));
        }
        if let Some(to) = self.created_to {
            pairs.push(("createdTo", to.to_rfc3339()));
        }
        push_sort_pairs(&mut pairs, &self.search);
        pairs
    }
}

/// Filter for sale searches
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    pub search: SearchRequest,
    /// Exact match on the client
    pub client_id: Option<i32>,
    /// Exact match on the ledger entry
    pub ledger_entry_id: Option<i32>,
    /// Exact match on the external sales event
    pub sale_event_id: Option<i64>,
}

impl SaleFilter {
    pub fn normalize(&mut self) {
        self.search.normalize();
    }

    /// Check predicate consistency
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::NonPositiveId`] for a non-positive client
    /// or ledger entry id.
    pub fn validate(&self) -> Result<(), FilterError> {
        check_id("clientId", self.client_id)?;
        check_id("ledgerEntryId", self.ledger_entry_id)?;
        Ok(())
    }

    /// Non-pagination fields as wire-format query pairs
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(client_id) = self.client_id {
            pairs.push(("clientId", client_id.to_string()));
        }
        if let Some(ledger_entry_id) = self.ledger_entry_id {
            pairs.push(("ledgerEntryId", ledger_entry_id.to_string()));
        }
        if let Some(sale_event_id) = self.sale_event_id {
            pairs.push(("saleEventId", sale_event_id.to_string()));
        }
        push_sort_pairs(&mut pairs, &self.search);
        pairs
    }
}
