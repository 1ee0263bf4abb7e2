//! Request extractors and middleware

pub mod activity;
pub mod auth;

pub use activity::log_user_activity;
pub use auth::{AuthMember, OptionalCaller};
