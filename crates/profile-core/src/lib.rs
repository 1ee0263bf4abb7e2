//! # Profile Core
//! 
//! Member and photo entities, the profile service, and the repository and
//! photo storage traits it is composed from.

pub mod domain;
pub mod error;
pub mod identity;
pub mod ports;
pub mod repositories;
pub mod services;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
pub use identity::{resolve_member_id, CallerContext};
