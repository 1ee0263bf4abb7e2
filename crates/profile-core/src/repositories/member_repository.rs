//! Member repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use profile_shared::PaginatedResult;

use super::Tracked;
use crate::domain::{Member, MemberParams, Photo};
use crate::error::DomainError;

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Filtered page of members in a deterministic order, with total-count metadata.
    async fn list_members(&self, params: &MemberParams) -> Result<PaginatedResult<Member>, DomainError>;

    /// Read-only projection. Unknown ids are `Ok(None)`.
    async fn get_member_by_id(&self, id: &str) -> Result<Option<Member>, DomainError>;

    /// Member graph (profile, owning user, photos) tracked for [`MemberRepository::save_all`].
    async fn get_member_for_update(&self, id: &str) -> Result<Option<Tracked<Member>>, DomainError>;

    async fn get_photos_for_member(&self, member_id: &str) -> Result<Vec<Photo>, DomainError>;

    /// Commits every change made to `member` since it was loaded or last
    /// committed, all or nothing. `Ok(false)` means nothing was persisted.
    /// On success new photos carry their assigned ids and the tracker is reset.
    async fn save_all(&self, member: &mut Tracked<Member>) -> Result<bool, DomainError>;

    /// Sets only `last_active`, without touching the rest of the graph.
    /// `Ok(false)` when the member does not exist.
    async fn touch_last_active(&self, member_id: &str, at: DateTime<Utc>) -> Result<bool, DomainError>;
}
