//! PostgreSQL repository implementations

pub mod member_repo_impl;

pub use member_repo_impl::PgMemberRepository;
