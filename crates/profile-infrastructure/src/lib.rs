//! # Profile Infrastructure
//! 
//! Database and photo storage implementations (adapters).

pub mod database;
pub mod storage;

pub use database::{create_pool, PgMemberRepository};
pub use storage::CloudinaryPhotoStore;
