//! # Profile Core - Domain Module
//! 
//! Domain entities for the member profile application.

pub mod app_user;
pub mod member;
pub mod member_params;
pub mod member_update;
pub mod photo;

// Re-export all entities and enums
pub use app_user::AppUser;
pub use member::{Member, MemberRecord};
pub use member_params::{MemberOrder, MemberParams};
pub use member_update::MemberUpdate;
pub use photo::Photo;
