//! # Profile API
//! 
//! HTTP handlers, middleware, DTOs, and routing for member profiles.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
