//! Domain services (business logic)

pub mod profile_service;

pub use profile_service::ProfileService;
