//! Structured API error handling
//!
//! Every error carries a correlation ID linking it to the request trace,
//! maps to a deliberate HTTP status, and serializes into a stable JSON
//! body. Internal detail (SQL, constraint internals) stays in the logs;
//! API consumers get an actionable message and a reference id.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledgerbook_common::CorrelationId;
use ledgerbook_data::DatabaseError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// API error types with correlation IDs for request tracking
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request payload or filter failed validation
    #[error("Validation failed: {message} (correlation: {correlation_id})")]
    Validation {
        message: String,
        field: Option<String>,
        correlation_id: CorrelationId,
    },

    /// The requested resource does not exist
    #[error("{resource} {id} not found (correlation: {correlation_id})")]
    NotFound {
        resource: &'static str,
        id: i32,
        correlation_id: CorrelationId,
    },

    /// The request conflicts with existing state (uniqueness rules)
    #[error("Conflict: {message} (correlation: {correlation_id})")]
    Conflict {
        message: String,
        correlation_id: CorrelationId,
    },

    /// Database operation failed; not recoverable at this layer
    #[error("Database error during {operation} (correlation: {correlation_id})")]
    Database {
        operation: String,
        correlation_id: CorrelationId,
    },

    /// Internal server error the caller cannot fix
    #[error("Internal server error (correlation: {correlation_id})")]
    Internal { correlation_id: CorrelationId },
}

impl ApiError {
    /// Get the correlation ID from any error variant
    pub const fn correlation_id(&self) -> &CorrelationId {
        match self {
            Self::Validation { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Conflict { correlation_id, .. }
            | Self::Database { correlation_id, .. }
            | Self::Internal { correlation_id } => correlation_id,
        }
    }

    /// Get the HTTP status code for this error
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Create a validation error without a field reference
    pub fn validation(message: impl Into<String>, correlation_id: CorrelationId) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
            correlation_id,
        }
    }

    /// Create a validation error pointing at a specific field
    pub fn validation_field(
        message: impl Into<String>,
        field: &str,
        correlation_id: CorrelationId,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.to_string()),
            correlation_id,
        }
    }

    /// Classify a repository error
    ///
    /// Unique violations become conflicts and foreign key violations
    /// become validation errors (the caller referenced something that
    /// does not exist); everything else is a server-side database error.
    pub fn from_db(err: DatabaseError, correlation_id: CorrelationId) -> Self {
        match err {
            DatabaseError::UniqueViolation { constraint, .. } => Self::Conflict {
                message: conflict_message(&constraint),
                correlation_id,
            },
            DatabaseError::ForeignKeyViolation { constraint, .. } => Self::Validation {
                message: reference_message(&constraint),
                field: None,
                correlation_id,
            },
            other => Self::Database {
                operation: other.operation().to_string(),
                correlation_id,
            },
        }
    }
}

/// Human-readable message for a unique-constraint conflict
fn conflict_message(constraint: &str) -> String {
    match constraint {
        "clients_tax_id_key" => "a client with this tax id already exists".to_string(),
        "clients_email_key" => "a client with this email already exists".to_string(),
        "accounts_name_key" => "an account with this name already exists".to_string(),
        other => format!("value conflicts with existing data ({other})"),
    }
}

/// Human-readable message for a dangling foreign key reference
fn reference_message(constraint: &str) -> String {
    let target = if constraint.contains("client") {
        "client"
    } else if constraint.contains("ledger_entry") {
        "ledger entry"
    } else if constraint.contains("account") {
        "account"
    } else if constraint.contains("cost_center") {
        "cost center"
    } else {
        "referenced resource"
    };
    format!("{target} does not exist")
}

/// Error response sent to API clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Stable error code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Correlation ID for tracking and support
    pub correlation_id: CorrelationId,
    /// Field the error refers to, when it refers to one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let correlation_id = self.correlation_id().clone();

        match &self {
            Self::Database { .. } | Self::Internal { .. } => {
                error!(
                    correlation_id = %correlation_id,
                    error = %self,
                    "Server error"
                );
            }
            _ => {
                warn!(
                    correlation_id = %correlation_id,
                    error = %self,
                    "Client error"
                );
            }
        }

        let (code, field) = match &self {
            Self::Validation { field, .. } => ("VALIDATION", field.clone()),
            Self::NotFound { .. } => ("NOT_FOUND", None),
            Self::Conflict { .. } => ("CONFLICT", None),
            Self::Database { .. } => ("DATABASE", None),
            Self::Internal { .. } => ("INTERNAL", None),
        };

        let body = ApiErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
            correlation_id: correlation_id.clone(),
            field,
        };

        let mut response = (status, Json(body)).into_response();

        // Add correlation ID to response headers for client tracking
        if let Ok(header_value) = correlation_id.to_string().parse() {
            response
                .headers_mut()
                .insert("X-Correlation-ID", header_value);
        }

        response
    }
}

/// Result type for API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerbook_data::DatabaseOperation;

    #[test]
    fn status_codes_follow_rest_conventions() {
        let id = CorrelationId::new();
        assert_eq!(
            ApiError::validation("bad", id.clone()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound {
                resource: "client",
                id: 1,
                correlation_id: id.clone()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict {
                message: "dup".to_string(),
                correlation_id: id
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn unique_violations_become_conflicts() {
        let err = DatabaseError::UniqueViolation {
            constraint: "clients_email_key".to_string(),
            operation: Box::new(DatabaseOperation::Create { entity: "client" }),
            correlation_id: None,
        };
        let api_err = ApiError::from_db(err, CorrelationId::new());
        assert!(matches!(api_err, ApiError::Conflict { .. }));
        assert!(api_err.to_string().contains("email"));
    }

    #[test]
    fn foreign_key_violations_become_validation_errors() {
        let err = DatabaseError::ForeignKeyViolation {
            constraint: "sales_client_id_fkey".to_string(),
            operation: Box::new(DatabaseOperation::Create { entity: "sale" }),
            correlation_id: None,
        };
        let api_err = ApiError::from_db(err, CorrelationId::new());
        assert!(matches!(api_err, ApiError::Validation { .. }));
        assert_eq!(api_err.status_code(), StatusCode::BAD_REQUEST);
    }
}
