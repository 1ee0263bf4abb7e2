//! Change tracking for entities loaded for update

use std::ops::{Deref, DerefMut};

use crate::domain::{Member, Photo};

/// An entity together with the state it had when it was loaded (or last
/// committed). Repositories diff the two to decide what to write.
#[derive(Debug, Clone)]
pub struct Tracked<T: Clone> {
    original: T,
    current: T,
}

impl<T: Clone> Tracked<T> {
    pub fn new(value: T) -> Self {
        Self {
            original: value.clone(),
            current: value,
        }
    }

    pub fn original(&self) -> &T {
        &self.original
    }

    pub fn into_inner(self) -> T {
        self.current
    }
}

impl<T: Clone> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.current
    }
}

impl<T: Clone> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.current
    }
}

/// Pending writes for a tracked member graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberChanges {
    pub member_changed: bool,
    pub user_changed: bool,
    /// Uncommitted photos, in insertion order.
    pub added_photos: Vec<Photo>,
    pub removed_photo_ids: Vec<i32>,
}

impl MemberChanges {
    pub fn is_empty(&self) -> bool {
        !self.member_changed
            && !self.user_changed
            && self.added_photos.is_empty()
            && self.removed_photo_ids.is_empty()
    }
}

impl Tracked<Member> {
    pub fn changes(&self) -> MemberChanges {
        let original = &self.original;
        let current = &self.current;

        let added_photos = current
            .photos()
            .iter()
            .filter(|p| !p.is_persisted())
            .cloned()
            .collect();

        let removed_photo_ids = original
            .photos()
            .iter()
            .filter(|p| p.is_persisted() && current.find_photo(p.id).is_none())
            .map(|p| p.id)
            .collect();

        MemberChanges {
            member_changed: original.record() != current.record(),
            user_changed: original.user() != current.user(),
            added_photos,
            removed_photo_ids,
        }
    }

    /// Record a successful commit: give new photos their ids (in insertion
    /// order) and make the current state the new baseline.
    pub fn accept_changes(&mut self, new_photo_ids: &[i32]) {
        self.current.assign_photo_ids(new_photo_ids);
        self.original = self.current.clone();
    }
}
