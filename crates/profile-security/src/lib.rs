//! # Profile Security
//! 
//! Bearer token issuing and validation.

pub mod jwt;

pub use jwt::{Claims, JwtError, JwtService};
