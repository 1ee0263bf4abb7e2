//! # Profile Shared
//! 
//! Shared configuration, pagination types, and telemetry for the member profile application.

pub mod constants;
pub mod types;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
