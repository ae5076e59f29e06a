//! Request payload validation
//!
//! Field-level rules carried over from the domain: bounded names, a
//! plausibility check on emails, positive ids, and the ledger amount
//! window. Failures become 400s with the offending field named.

use ledgerbook_common::CorrelationId;
use rust_decimal::Decimal;

use crate::error::{ApiError, ApiResult};

/// Largest amount a ledger entry may carry (NUMERIC(9,2) ceiling)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Require a non-blank string no longer than `max_len` characters
///
/// # Errors
///
/// Returns a validation error naming the field when the value is blank
/// or too long
pub fn require_bounded_text(
    value: &str,
    field: &str,
    max_len: usize,
    correlation_id: &CorrelationId,
) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation_field(
            format!("{field} must not be blank"),
            field,
            correlation_id.clone(),
        ));
    }
    if value.chars().count() > max_len {
        return Err(ApiError::validation_field(
            format!("{field} must be at most {max_len} characters"),
            field,
            correlation_id.clone(),
        ));
    }
    Ok(())
}

/// Require a plausible email address
///
/// # Errors
///
/// Returns a validation error when the value is blank, too long, or has
/// no `@` separating two non-empty parts
pub fn require_email(
    value: &str,
    field: &str,
    correlation_id: &CorrelationId,
) -> ApiResult<()> {
    require_bounded_text(value, field, 100, correlation_id)?;
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() {
        return Err(ApiError::validation_field(
            format!("{field} must be a valid email address"),
            field,
            correlation_id.clone(),
        ));
    }
    Ok(())
}

/// Require a positive id
///
/// # Errors
///
/// Returns a validation error when the id is zero or negative
pub fn require_positive_id(
    value: i32,
    field: &str,
    correlation_id: &CorrelationId,
) -> ApiResult<()> {
    if value <= 0 {
        return Err(ApiError::validation_field(
            format!("{field} must be greater than zero"),
            field,
            correlation_id.clone(),
        ));
    }
    Ok(())
}

/// Require a ledger amount inside the supported window
///
/// # Errors
///
/// Returns a validation error when the amount is not positive or
/// exceeds 999999.99
pub fn require_amount_in_range(
    amount: Decimal,
    field: &str,
    correlation_id: &CorrelationId,
) -> ApiResult<()> {
    if amount <= Decimal::ZERO {
        return Err(ApiError::validation_field(
            format!("{field} must be greater than zero"),
            field,
            correlation_id.clone(),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(ApiError::validation_field(
            format!("{field} must not exceed {MAX_AMOUNT}"),
            field,
            correlation_id.clone(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_oversized_text_is_rejected() {
        let id = CorrelationId::new();
        assert!(require_bounded_text("  ", "name", 70, &id).is_err());
        assert!(require_bounded_text(&"x".repeat(71), "name", 70, &id).is_err());
        assert!(require_bounded_text("Operations", "name", 70, &id).is_ok());
    }

    #[test]
    fn email_needs_both_halves() {
        let id = CorrelationId::new();
        assert!(require_email("no-at-sign", "email", &id).is_err());
        assert!(require_email("@example.com", "email", &id).is_err());
        assert!(require_email("user@", "email", &id).is_err());
        assert!(require_email("user@example.com", "email", &id).is_ok());
    }

    #[test]
    fn amount_window_matches_the_column_type() {
        let id = CorrelationId::new();
        assert!(require_amount_in_range(Decimal::ZERO, "amount", &id).is_err());
        assert!(require_amount_in_range(Decimal::new(-100, 2), "amount", &id).is_err());
        assert!(require_amount_in_range(MAX_AMOUNT, "amount", &id).is_ok());
        assert!(
            require_amount_in_range(MAX_AMOUNT + Decimal::new(1, 2), "amount", &id).is_err()
        );
    }
}
