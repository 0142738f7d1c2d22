//! Buddhimatta API crate - axum HTTP server and route handlers.
//!
//! Exposes the question endpoint (multipart or URL-encoded form), the
//! feedback endpoint, a welcome payload and a health check.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
