//! In-memory member repository
//!
//! Process-local store with the same observable semantics as the PostgreSQL
//! repository. Used for local development (`database.backend = "memory"`) and
//! in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use profile_shared::PaginatedResult;

use super::{MemberRepository, Tracked};
use crate::domain::{Member, MemberOrder, MemberParams, Photo};
use crate::error::DomainError;

pub struct InMemoryMemberRepository {
    members: RwLock<HashMap<String, Member>>,
    next_photo_id: AtomicI32,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
            next_photo_id: AtomicI32::new(1),
        }
    }

    fn next_photo_ids(&self, count: usize) -> Vec<i32> {
        (0..count)
            .map(|_| self.next_photo_id.fetch_add(1, Ordering::SeqCst))
            .collect()
    }

    /// Store a member as-is, e.g. at registration or when seeding. Photos
    /// without an id get one.
    pub fn insert_member(&self, member: Member) -> Member {
        let mut tracked = Tracked::new(member);
        let pending = tracked.photos().iter().filter(|p| !p.is_persisted()).count();
        let ids = self.next_photo_ids(pending);
        tracked.accept_changes(&ids);

        let member = tracked.into_inner();
        self.members
            .write()
            .insert(member.id().to_string(), member.clone());
        member
    }

    /// Drop a member together with all of its photos.
    pub fn remove_member(&self, id: &str) -> Option<Member> {
        self.members.write().remove(id)
    }

    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }
}

impl Default for InMemoryMemberRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn list_members(&self, params: &MemberParams) -> Result<PaginatedResult<Member>, DomainError> {
        let (oldest, youngest) = params.date_of_birth_range(Utc::now().date_naive());
        let members = self.members.read();

        let mut matched: Vec<&Member> = members
            .values()
            .filter(|m| params.current_member_id.as_deref() != Some(m.id()))
            .filter(|m| params.gender.as_ref().map_or(true, |g| &m.record().gender == g))
            .filter(|m| {
                let dob = m.record().date_of_birth;
                dob >= oldest && dob <= youngest
            })
            .collect();

        matched.sort_by(|a, b| {
            let (ka, kb) = match params.order_by {
                MemberOrder::LastActive => (a.record().last_active, b.record().last_active),
                MemberOrder::Created => (a.record().created, b.record().created),
            };
            kb.cmp(&ka).then_with(|| a.id().cmp(b.id()))
        });

        let total = matched.len() as u64;
        let pagination = params.pagination;
        let items = matched
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(pagination.page_size as usize)
            .cloned()
            .collect();

        Ok(PaginatedResult::new(items, pagination, total))
    }

    async fn get_member_by_id(&self, id: &str) -> Result<Option<Member>, DomainError> {
        Ok(self.members.read().get(id).cloned())
    }

    async fn get_member_for_update(&self, id: &str) -> Result<Option<Tracked<Member>>, DomainError> {
        Ok(self.members.read().get(id).cloned().map(Tracked::new))
    }

    async fn get_photos_for_member(&self, member_id: &str) -> Result<Vec<Photo>, DomainError> {
        Ok(self
            .members
            .read()
            .get(member_id)
            .map(|m| m.photos().to_vec())
            .unwrap_or_default())
    }

    async fn save_all(&self, member: &mut Tracked<Member>) -> Result<bool, DomainError> {
        let changes = member.changes();
        if changes.is_empty() {
            debug!("No pending changes for member {}", member.id());
            return Ok(false);
        }

        let mut members = self.members.write();
        let Some(stored) = members.get_mut(member.id()) else {
            debug!("Member {} no longer exists, nothing saved", member.id());
            return Ok(false);
        };

        let ids = self.next_photo_ids(changes.added_photos.len());
        stored.apply_committed(&**member, &changes, &ids);
        member.accept_changes(&ids);

        Ok(true)
    }

    async fn touch_last_active(&self, member_id: &str, at: DateTime<Utc>) -> Result<bool, DomainError> {
        match self.members.write().get_mut(member_id) {
            Some(member) => {
                member.touch(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
