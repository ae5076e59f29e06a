//! Common utilities shared across Ledgerbook crates
//!
//! This crate provides the small pieces every other component needs:
//! request correlation IDs and process-level environment initialization.

pub mod init;

pub use init::initialize_environment;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation ID type for tracking operations across service boundaries
///
/// Uses UUID v4 for guaranteed uniqueness across distributed systems
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a new correlation ID using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        Uuid::try_parse(id).map_or_else(|_| Self(Uuid::new_v4()), Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_ids_are_unique() {
        assert_ne!(CorrelationId::new(), CorrelationId::new());
    }

    #[test]
    fn parses_valid_uuid_strings() {
        let id = CorrelationId::new();
        let reparsed = CorrelationId::from(id.to_string().as_str());
        assert_eq!(id, reparsed);
    }

    #[test]
    fn invalid_uuid_strings_get_a_fresh_id() {
        // Must not panic, must still produce a usable ID
        let id = CorrelationId::from("not-a-uuid");
        assert!(!id.to_string().is_empty());
    }
}
