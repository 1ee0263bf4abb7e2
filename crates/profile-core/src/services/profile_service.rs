// ============================================================================
// Profile Core - Profile Service
// File: crates/profile-core/src/services/profile_service.rs
// ============================================================================
//! Member profile and photo management

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use validator::Validate;

use profile_shared::PaginatedResult;

use crate::domain::{Member, MemberParams, MemberUpdate, Photo};
use crate::error::DomainError;
use crate::identity::{resolve_member_id, CallerContext};
use crate::ports::{PhotoStore, PhotoUpload};
use crate::repositories::{MemberRepository, Tracked};

/// Profile service composing the member repository and the photo store.
///
/// Every mutation loads one tracked member graph, changes it in memory and
/// commits it with a single `save_all`, so the member and its owning user are
/// always written together. Remote storage calls happen before the local
/// change they correspond to.
pub struct ProfileService<R: MemberRepository + ?Sized, S: PhotoStore + ?Sized> {
    member_repo: Arc<R>,
    photo_store: Arc<S>,
}

impl<R: MemberRepository + ?Sized, S: PhotoStore + ?Sized> ProfileService<R, S> {
    pub fn new(member_repo: Arc<R>, photo_store: Arc<S>) -> Self {
        Self {
            member_repo,
            photo_store,
        }
    }

    pub async fn list_members(&self, params: &MemberParams) -> Result<PaginatedResult<Member>, DomainError> {
        params.validate()?;
        self.member_repo.list_members(params).await
    }

    pub async fn get_member(&self, id: &str) -> Result<Member, DomainError> {
        self.member_repo
            .get_member_by_id(id)
            .await?
            .ok_or_else(|| DomainError::MemberNotFound(id.to_string()))
    }

    pub async fn get_member_photos(&self, member_id: &str) -> Result<Vec<Photo>, DomainError> {
        self.member_repo.get_photos_for_member(member_id).await
    }

    /// Partial profile update for the caller's own member.
    pub async fn update_profile(&self, caller: &CallerContext, update: MemberUpdate) -> Result<(), DomainError> {
        update.validate()?;
        let mut member = self.load_for_update(caller).await?;

        member.apply_update(&update);

        self.commit(&mut member, "Failed to update member").await?;
        info!("Profile updated for member {}", member.id());
        Ok(())
    }

    /// Upload a photo and attach it to the caller's member. Returns the
    /// committed photo.
    pub async fn add_photo(&self, caller: &CallerContext, upload: PhotoUpload) -> Result<Photo, DomainError> {
        let mut member = self.load_for_update(caller).await?;

        let uploaded = self.photo_store.upload(upload).await.map_err(|e| {
            error!("Photo upload failed for member {}: {}", member.id(), e);
            e
        })?;

        let promoted = !member.has_main_photo();
        member.add_photo(uploaded.url, uploaded.public_id);

        self.commit(&mut member, "Problem adding photo").await?;

        let photo = member
            .photos()
            .last()
            .cloned()
            .ok_or_else(|| DomainError::InternalError("added photo missing after commit".to_string()))?;

        info!(
            "Photo {} added for member {} (main: {})",
            photo.id,
            member.id(),
            promoted
        );
        Ok(photo)
    }

    pub async fn set_main_photo(&self, caller: &CallerContext, photo_id: i32) -> Result<(), DomainError> {
        let mut member = self.load_for_update(caller).await?;

        if let Err(e) = member.set_main_photo(photo_id) {
            warn!("Rejected main photo {} for member {}: {}", photo_id, member.id(), e);
            return Err(e);
        }

        self.commit(&mut member, "Problem setting main photo").await?;
        info!("Main photo set to {} for member {}", photo_id, member.id());
        Ok(())
    }

    pub async fn delete_photo(&self, caller: &CallerContext, photo_id: i32) -> Result<(), DomainError> {
        let mut member = self.load_for_update(caller).await?;

        let photo = match member.photo_for_deletion(photo_id) {
            Ok(photo) => photo.clone(),
            Err(e) => {
                warn!("Rejected deletion of photo {} for member {}: {}", photo_id, member.id(), e);
                return Err(e);
            }
        };

        if let Some(public_id) = &photo.public_id {
            self.photo_store.delete(public_id).await.map_err(|e| {
                error!("Remote deletion of {} failed for member {}: {}", public_id, member.id(), e);
                e
            })?;
        }

        member.remove_photo(photo_id)?;

        self.commit(&mut member, "Problem deleting the photo").await?;
        info!("Photo {} deleted for member {}", photo_id, member.id());
        Ok(())
    }

    /// Stamp the caller's member as active now.
    pub async fn record_activity(&self, caller: &CallerContext) -> Result<(), DomainError> {
        let member_id = resolve_member_id(caller)?;
        if self.member_repo.touch_last_active(&member_id, Utc::now()).await? {
            Ok(())
        } else {
            Err(DomainError::MemberNotFound(member_id))
        }
    }

    async fn load_for_update(&self, caller: &CallerContext) -> Result<Tracked<Member>, DomainError> {
        let member_id = resolve_member_id(caller)?;
        self.member_repo
            .get_member_for_update(&member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(member_id))
    }

    async fn commit(&self, member: &mut Tracked<Member>, failure: &str) -> Result<(), DomainError> {
        if self.member_repo.save_all(member).await? {
            Ok(())
        } else {
            warn!("Nothing persisted for member {}: {}", member.id(), failure);
            Err(DomainError::PersistenceError(failure.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AppUser;
    use crate::ports::{MockPhotoStore, UploadedPhoto};
    use crate::repositories::InMemoryMemberRepository;
    use bytes::Bytes;
    use chrono::NaiveDate;

    type Service = ProfileService<InMemoryMemberRepository, MockPhotoStore>;

    fn new_member(id: &str) -> Member {
        Member::new(
            AppUser::new(id, "Lisa", format!("{}@test.com", id)),
            NaiveDate::from_ymd_opt(1995, 4, 12).unwrap(),
            "female",
            "Paris",
            "France",
        )
    }

    fn upload() -> PhotoUpload {
        PhotoUpload {
            file_name: "me.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: Bytes::from_static(b"\xFF\xD8\xFF"),
        }
    }

    /// Member "m" with P1 main ("a", "pub1") and P2 ("b", "pub2").
    fn two_photo_member(repo: &InMemoryMemberRepository) -> (i32, i32) {
        let mut member = new_member("m");
        member.add_photo("a", Some("pub1".to_string()));
        member.add_photo("b", Some("pub2".to_string()));
        let stored = repo.insert_member(member);
        (stored.photos()[0].id, stored.photos()[1].id)
    }

    fn service(repo: Arc<InMemoryMemberRepository>, store: MockPhotoStore) -> Service {
        ProfileService::new(repo, Arc::new(store))
    }

    #[tokio::test]
    async fn test_first_photo_becomes_main() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        repo.insert_member(new_member("m"));

        let mut store = MockPhotoStore::new();
        store.expect_upload().times(1).returning(|_| {
            Ok(UploadedPhoto {
                url: "x".to_string(),
                public_id: Some("pub-x".to_string()),
            })
        });

        let svc = service(repo.clone(), store);
        let photo = svc.add_photo(&CallerContext::for_member("m"), upload()).await.unwrap();
        assert!(photo.is_persisted());
        assert_eq!(photo.url, "x");

        let member = repo.get_member_by_id("m").await.unwrap().unwrap();
        assert_eq!(member.photos().len(), 1);
        assert_eq!(member.image_url(), Some("x"));
        assert_eq!(member.user().image_url.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_second_photo_does_not_change_main() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        two_photo_member(&repo);

        let mut store = MockPhotoStore::new();
        store.expect_upload().returning(|_| {
            Ok(UploadedPhoto {
                url: "c".to_string(),
                public_id: None,
            })
        });

        let svc = service(repo.clone(), store);
        svc.add_photo(&CallerContext::for_member("m"), upload()).await.unwrap();

        let member = repo.get_member_by_id("m").await.unwrap().unwrap();
        assert_eq!(member.photos().len(), 3);
        assert_eq!(member.image_url(), Some("a"));
        assert_eq!(member.user().image_url.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_upload_failure_creates_nothing() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        repo.insert_member(new_member("m"));

        let mut store = MockPhotoStore::new();
        store
            .expect_upload()
            .returning(|_| Err(DomainError::StorageError("Invalid image file".to_string())));

        let svc = service(repo.clone(), store);
        let err = svc.add_photo(&CallerContext::for_member("m"), upload()).await.unwrap_err();
        assert_eq!(err, DomainError::StorageError("Invalid image file".to_string()));

        let member = repo.get_member_by_id("m").await.unwrap().unwrap();
        assert!(member.photos().is_empty());
        assert!(member.image_url().is_none());
    }

    #[tokio::test]
    async fn test_add_photo_unknown_member_never_uploads() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let mut store = MockPhotoStore::new();
        store.expect_upload().never();

        let svc = service(repo, store);
        let err = svc.add_photo(&CallerContext::for_member("ghost"), upload()).await.unwrap_err();
        assert_eq!(err, DomainError::MemberNotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_anonymous_caller_is_unauthenticated() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let svc = service(repo, MockPhotoStore::new());

        let err = svc
            .update_profile(&CallerContext::anonymous(), MemberUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_deleting_main_photo_is_rejected() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let (p1, _) = two_photo_member(&repo);

        let mut store = MockPhotoStore::new();
        store.expect_delete().never();

        let svc = service(repo.clone(), store);
        let err = svc.delete_photo(&CallerContext::for_member("m"), p1).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperation(_)));

        let member = repo.get_member_by_id("m").await.unwrap().unwrap();
        assert_eq!(member.photos().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_non_main_photo_removes_remote_then_local() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let (_, p2) = two_photo_member(&repo);

        let mut store = MockPhotoStore::new();
        store
            .expect_delete()
            .withf(|public_id: &str| public_id == "pub2")
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(repo.clone(), store);
        svc.delete_photo(&CallerContext::for_member("m"), p2).await.unwrap();

        let member = repo.get_member_by_id("m").await.unwrap().unwrap();
        assert_eq!(member.photos().len(), 1);
        assert!(member.find_photo(p2).is_none());
        assert_eq!(member.image_url(), Some("a"));
    }

    #[tokio::test]
    async fn test_storage_delete_failure_keeps_photo() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let (_, p2) = two_photo_member(&repo);

        let mut store = MockPhotoStore::new();
        store
            .expect_delete()
            .returning(|_| Err(DomainError::StorageError("not found".to_string())));

        let svc = service(repo.clone(), store);
        let err = svc.delete_photo(&CallerContext::for_member("m"), p2).await.unwrap_err();
        assert_eq!(err, DomainError::StorageError("not found".to_string()));

        let member = repo.get_member_by_id("m").await.unwrap().unwrap();
        assert!(member.find_photo(p2).is_some());
    }

    #[tokio::test]
    async fn test_delete_photo_without_public_id_skips_storage() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let mut member = new_member("m");
        member.add_photo("seed-main", None);
        member.add_photo("seed-extra", None);
        let stored = repo.insert_member(member);
        let extra = stored.photos()[1].id;

        let mut store = MockPhotoStore::new();
        store.expect_delete().never();

        let svc = service(repo.clone(), store);
        svc.delete_photo(&CallerContext::for_member("m"), extra).await.unwrap();

        let photos = repo.get_photos_for_member("m").await.unwrap();
        assert_eq!(photos.len(), 1);
    }

    #[tokio::test]
    async fn test_set_main_photo_mirrors_url() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let (_, p2) = two_photo_member(&repo);

        let svc = service(repo.clone(), MockPhotoStore::new());
        svc.set_main_photo(&CallerContext::for_member("m"), p2).await.unwrap();

        let member = repo.get_member_by_id("m").await.unwrap().unwrap();
        assert_eq!(member.image_url(), Some("b"));
        assert_eq!(member.user().image_url.as_deref(), Some("b"));
        assert_eq!(member.main_photo().map(|p| p.id), Some(p2));
    }

    #[tokio::test]
    async fn test_set_main_photo_rejects_current_main() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let (p1, _) = two_photo_member(&repo);

        let svc = service(repo, MockPhotoStore::new());
        let err = svc.set_main_photo(&CallerContext::for_member("m"), p1).await.unwrap_err();
        assert_eq!(err, DomainError::InvalidOperation("Cannot use this as main image".to_string()));
    }

    #[tokio::test]
    async fn test_set_main_photo_rejects_other_members_photo() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let (_, foreign) = two_photo_member(&repo);
        repo.insert_member(new_member("other"));

        let svc = service(repo.clone(), MockPhotoStore::new());
        let err = svc
            .set_main_photo(&CallerContext::for_member("other"), foreign)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperation(_)));

        let other = repo.get_member_by_id("other").await.unwrap().unwrap();
        assert!(other.image_url().is_none());
    }

    #[tokio::test]
    async fn test_update_with_only_description() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        repo.insert_member(new_member("m"));

        let svc = service(repo.clone(), MockPhotoStore::new());
        svc.update_profile(
            &CallerContext::for_member("m"),
            MemberUpdate {
                description: Some("Coffee and mountains".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let member = repo.get_member_by_id("m").await.unwrap().unwrap();
        assert_eq!(member.record().description.as_deref(), Some("Coffee and mountains"));
        assert_eq!(member.display_name(), "Lisa");
        assert_eq!(member.record().city, "Paris");
        assert_eq!(member.record().country, "France");
    }

    #[tokio::test]
    async fn test_display_name_update_reaches_user() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        repo.insert_member(new_member("m"));

        let svc = service(repo.clone(), MockPhotoStore::new());
        svc.update_profile(
            &CallerContext::for_member("m"),
            MemberUpdate {
                display_name: Some("Lise".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let member = repo.get_member_by_id("m").await.unwrap().unwrap();
        assert_eq!(member.user().display_name, "Lise");
    }

    #[tokio::test]
    async fn test_update_without_changes_is_persistence_error() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        repo.insert_member(new_member("m"));

        let svc = service(repo, MockPhotoStore::new());
        let err = svc
            .update_profile(&CallerContext::for_member("m"), MemberUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PersistenceError(_)));
    }

    #[tokio::test]
    async fn test_get_unknown_member_is_not_found() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let svc = service(repo, MockPhotoStore::new());

        assert_eq!(
            svc.get_member("nobody").await.unwrap_err(),
            DomainError::MemberNotFound("nobody".to_string())
        );
        assert!(svc.get_member_photos("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_activity_moves_last_active() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let mut member = new_member("m");
        member.touch(Utc::now() - chrono::Duration::days(3));
        let before = repo.insert_member(member).record().last_active;

        let svc = service(repo.clone(), MockPhotoStore::new());
        svc.record_activity(&CallerContext::for_member("m")).await.unwrap();

        let after = repo.get_member_by_id("m").await.unwrap().unwrap().record().last_active;
        assert!(after > before);
    }

    #[tokio::test]
    async fn test_record_activity_keeps_photo_committed_meanwhile() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        repo.insert_member(new_member("m"));

        let mut store = MockPhotoStore::new();
        store.expect_upload().times(1).returning(|_| {
            Ok(UploadedPhoto {
                url: "x".to_string(),
                public_id: Some("pub-x".to_string()),
            })
        });
        let svc = service(repo.clone(), store);

        let caller = CallerContext::for_member("m");
        svc.add_photo(&caller, upload()).await.unwrap();
        svc.record_activity(&caller).await.unwrap();

        let member = repo.get_member_by_id("m").await.unwrap().unwrap();
        assert_eq!(member.photos().len(), 1);
        assert_eq!(member.image_url(), Some("x"));
        assert_eq!(member.user().image_url.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_record_activity_for_unknown_member() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let svc = service(repo, MockPhotoStore::new());

        assert_eq!(
            svc.record_activity(&CallerContext::for_member("ghost")).await.unwrap_err(),
            DomainError::MemberNotFound("ghost".to_string())
        );
        assert_eq!(
            svc.record_activity(&CallerContext::anonymous()).await.unwrap_err(),
            DomainError::Unauthenticated
        );
    }
}
