// ============================================================================
// Profile Core - Member Entity
// File: crates/profile-core/src/domain/member.rs
// Description: Member profile aggregate (profile fields, photos, owning user)
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AppUser, MemberUpdate, Photo};
use crate::error::DomainError;
use crate::repositories::MemberChanges;

/// Scalar columns of a member profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    pub display_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub created: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub description: Option<String>,
    pub city: String,
    pub country: String,
    pub image_url: Option<String>,
}

/// Member aggregate.
///
/// The main photo URL is stored twice, on the member and on the owning
/// [`AppUser`]. Every method that changes it writes both, and there is no
/// other way to reach either field mutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    record: MemberRecord,
    user: AppUser,
    photos: Vec<Photo>,
}

impl Member {
    /// New profile for a freshly registered user, without photos.
    pub fn new(
        mut user: AppUser,
        date_of_birth: NaiveDate,
        gender: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        user.image_url = None;
        Self {
            record: MemberRecord {
                id: user.id.clone(),
                display_name: user.display_name.clone(),
                date_of_birth,
                gender: gender.into(),
                created: now,
                last_active: now,
                description: None,
                city: city.into(),
                country: country.into(),
                image_url: None,
            },
            user,
            photos: Vec::new(),
        }
    }

    /// Rebuild a member from stored state.
    pub fn restore(record: MemberRecord, user: AppUser, photos: Vec<Photo>) -> Self {
        Self { record, user, photos }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn record(&self) -> &MemberRecord {
        &self.record
    }

    pub fn user(&self) -> &AppUser {
        &self.user
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn display_name(&self) -> &str {
        &self.record.display_name
    }

    pub fn image_url(&self) -> Option<&str> {
        self.record.image_url.as_deref()
    }

    pub fn has_main_photo(&self) -> bool {
        self.record.image_url.is_some()
    }

    pub fn main_photo(&self) -> Option<&Photo> {
        let url = self.image_url()?;
        self.photos.iter().find(|p| p.url == url)
    }

    pub fn find_photo(&self, photo_id: i32) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == photo_id)
    }

    fn is_main(&self, photo: &Photo) -> bool {
        self.image_url() == Some(photo.url.as_str())
    }

    /// Apply a patch: each present field overwrites, absent fields are kept.
    /// A display name change is mirrored onto the owning user.
    pub fn apply_update(&mut self, update: &MemberUpdate) {
        if let Some(display_name) = &update.display_name {
            self.record.display_name = display_name.clone();
            self.user.display_name = display_name.clone();
        }
        if let Some(description) = &update.description {
            self.record.description = Some(description.clone());
        }
        if let Some(city) = &update.city {
            self.record.city = city.clone();
        }
        if let Some(country) = &update.country {
            self.record.country = country.clone();
        }
    }

    /// Append an uploaded photo. The first photo of a member without a main
    /// photo is promoted to main.
    pub fn add_photo(&mut self, url: impl Into<String>, public_id: Option<String>) -> &Photo {
        let photo = Photo::new(url, public_id, self.record.id.clone());
        if !self.has_main_photo() {
            self.set_image_url(Some(photo.url.clone()));
        }
        self.photos.push(photo);
        &self.photos[self.photos.len() - 1]
    }

    /// Promote one of this member's own photos to main. A missing photo and a
    /// photo that is already main are the same rejection.
    pub fn set_main_photo(&mut self, photo_id: i32) -> Result<&Photo, DomainError> {
        let url = match self.find_photo(photo_id) {
            Some(photo) if !self.is_main(photo) => photo.url.clone(),
            _ => {
                return Err(DomainError::InvalidOperation(
                    "Cannot use this as main image".to_string(),
                ))
            }
        };

        self.set_image_url(Some(url));
        self.find_photo(photo_id)
            .ok_or_else(|| DomainError::InternalError(format!("photo {} vanished", photo_id)))
    }

    /// The photo that would be removed by [`Member::remove_photo`], checked
    /// against the same rules. Lets callers perform remote cleanup first.
    pub fn photo_for_deletion(&self, photo_id: i32) -> Result<&Photo, DomainError> {
        match self.find_photo(photo_id) {
            Some(photo) if !self.is_main(photo) => Ok(photo),
            _ => Err(DomainError::InvalidOperation(
                "This photo cannot be deleted".to_string(),
            )),
        }
    }

    pub fn remove_photo(&mut self, photo_id: i32) -> Result<Photo, DomainError> {
        self.photo_for_deletion(photo_id)?;
        let index = self
            .photos
            .iter()
            .position(|p| p.id == photo_id)
            .ok_or_else(|| DomainError::InternalError(format!("photo {} vanished", photo_id)))?;
        Ok(self.photos.remove(index))
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.record.last_active = at;
    }

    /// Hands out committed ids to uncommitted photos, in insertion order.
    pub(crate) fn assign_photo_ids(&mut self, ids: &[i32]) {
        let pending = self.photos.iter_mut().filter(|p| !p.is_persisted());
        for (photo, id) in pending.zip(ids) {
            photo.id = *id;
        }
    }

    /// Applies a committed change set from `source` onto this stored copy,
    /// the same rows a database commit would touch. Profile and user columns
    /// are written together so the image URL pair cannot drift; photos are
    /// removed and appended individually, leaving others untouched.
    pub(crate) fn apply_committed(&mut self, source: &Member, changes: &MemberChanges, new_photo_ids: &[i32]) {
        if changes.member_changed || changes.user_changed {
            self.record = source.record.clone();
            self.user.display_name = source.user.display_name.clone();
            self.user.image_url = source.user.image_url.clone();
        }

        self.photos.retain(|p| !changes.removed_photo_ids.contains(&p.id));
        for (photo, id) in changes.added_photos.iter().zip(new_photo_ids) {
            let mut photo = photo.clone();
            photo.id = *id;
            self.photos.push(photo);
        }
    }

    /// Age in whole years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.record.date_of_birth).unwrap_or(0)
    }

    fn set_image_url(&mut self, url: Option<String>) {
        self.record.image_url = url.clone();
        self.user.image_url = url;
    }
}
