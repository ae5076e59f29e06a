//! Database error types with operation context
//!
//! Every repository call tags its failure with the [`DatabaseOperation`]
//! it was performing, so a log line can say *what* was being attempted
//! without the caller threading strings around. Constraint violations
//! are picked apart from the raw driver error so the API layer can turn
//! them into client-facing conflicts instead of opaque 500s.

use ledgerbook_common::CorrelationId;
use thiserror::Error;

/// The database operation being performed when an error occurred
#[derive(Debug, Clone)]
pub enum DatabaseOperation {
    List { entity: &'static str },
    Get { entity: &'static str, id: i32 },
    Create { entity: &'static str },
    Update { entity: &'static str, id: i32 },
    Delete { entity: &'static str, id: i32 },
    Search { entity: &'static str },
    Count { entity: &'static str },
    Query { description: String },
}

impl std::fmt::Display for DatabaseOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List { entity } => write!(f, "list {entity}"),
            Self::Get { entity, id } => write!(f, "get {entity} {id}"),
            Self::Create { entity } => write!(f, "create {entity}"),
            Self::Update { entity, id } => write!(f, "update {entity} {id}"),
            Self::Delete { entity, id } => write!(f, "delete {entity} {id}"),
            Self::Search { entity } => write!(f, "search {entity}"),
            Self::Count { entity } => write!(f, "count {entity}"),
            Self::Query { description } => write!(f, "query: {description}"),
        }
    }
}

/// Errors surfaced by the repository layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Query execution failed for a reason other than a constraint
    #[error("Database query failed during {operation}: {source}")]
    QueryFailed {
        operation: Box<DatabaseOperation>,
        #[source]
        source: sqlx::Error,
        correlation_id: Option<CorrelationId>,
    },

    /// A unique constraint rejected the write
    #[error("Unique constraint '{constraint}' violated during {operation}")]
    UniqueViolation {
        constraint: String,
        operation: Box<DatabaseOperation>,
        correlation_id: Option<CorrelationId>,
    },

    /// A foreign key constraint rejected the write
    #[error("Foreign key constraint '{constraint}' violated during {operation}")]
    ForeignKeyViolation {
        constraint: String,
        operation: Box<DatabaseOperation>,
        correlation_id: Option<CorrelationId>,
    },

    /// The database returned something the code cannot make sense of
    #[error("Unexpected state during {operation}: {message}")]
    UnexpectedState {
        operation: Box<DatabaseOperation>,
        message: String,
        correlation_id: Option<CorrelationId>,
    },
}

impl DatabaseError {
    /// Classify a raw sqlx error under the given operation
    pub fn from_sqlx(
        error: sqlx::Error,
        operation: DatabaseOperation,
        correlation_id: Option<CorrelationId>,
    ) -> Self {
        if let sqlx::Error::Database(db_err) = &error {
            let constraint = db_err.constraint().map(str::to_string);
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    return Self::UniqueViolation {
                        constraint: constraint.unwrap_or_else(|| "unknown".to_string()),
                        operation: Box::new(operation),
                        correlation_id,
                    };
                }
                // foreign_key_violation
                Some("23503") => {
                    return Self::ForeignKeyViolation {
                        constraint: constraint.unwrap_or_else(|| "unknown".to_string()),
                        operation: Box::new(operation),
                        correlation_id,
                    };
                }
                _ => {}
            }
        }

        Self::QueryFailed {
            operation: Box::new(operation),
            source: error,
            correlation_id,
        }
    }

    /// The operation this error occurred in
    pub fn operation(&self) -> &DatabaseOperation {
        match self {
            Self::QueryFailed { operation, .. }
            | Self::UniqueViolation { operation, .. }
            | Self::ForeignKeyViolation { operation, .. }
            | Self::UnexpectedState { operation, .. } => operation,
        }
    }
}

/// Extension trait attaching operation context to sqlx results
pub trait DatabaseErrorExt<T> {
    /// Map a raw sqlx error into a [`DatabaseError`] with context
    ///
    /// # Errors
    ///
    /// Returns the classified [`DatabaseError`] when the underlying
    /// result is an error
    fn map_db_err(
        self,
        operation: DatabaseOperation,
        correlation_id: Option<CorrelationId>,
    ) -> DatabaseResult<T>;
}

impl<T> DatabaseErrorExt<T> for Result<T, sqlx::Error> {
    fn map_db_err(
        self,
        operation: DatabaseOperation,
        correlation_id: Option<CorrelationId>,
    ) -> DatabaseResult<T> {
        self.map_err(|e| DatabaseError::from_sqlx(e, operation, correlation_id))
    }
}

/// Result type for repository operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
