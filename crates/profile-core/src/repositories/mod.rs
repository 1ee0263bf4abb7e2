//! Repository traits (ports) and the in-memory implementation

pub mod in_memory;
pub mod member_repository;
pub mod tracked;

pub use in_memory::InMemoryMemberRepository;
pub use member_repository::MemberRepository;
pub use tracked::{MemberChanges, Tracked};
