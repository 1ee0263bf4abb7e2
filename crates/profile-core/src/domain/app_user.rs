//! Identity record that owns a member profile

use serde::{Deserialize, Serialize};

/// Authentication-side user record. Only `display_name` and `image_url` are
/// ever written by the profile service, and only through [`crate::Member`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUser {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub image_url: Option<String>,
}

impl AppUser {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: email.into(),
            image_url: None,
        }
    }
}
