//! Photo entity

use serde::{Deserialize, Serialize};

/// Photo owned by exactly one member. An id of `0` marks a photo that has
/// not been committed yet; repositories assign the real id on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i32,
    pub url: String,
    pub public_id: Option<String>,
    pub member_id: String,
}

impl Photo {
    pub fn new(url: impl Into<String>, public_id: Option<String>, member_id: impl Into<String>) -> Self {
        Self {
            id: 0,
            url: url.into(),
            public_id,
            member_id: member_id.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}
