pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod validation;

// Export structured error types
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use middleware::{RequestContext, correlation_id_middleware};
pub use routes::create_router;
pub use state::AppState;
