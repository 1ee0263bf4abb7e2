//! Partial profile update

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile patch. A `None` field means "keep the current value"; there is no
/// way to clear a field through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    #[validate(length(min = 1, max = 50, message = "Display name must be between 1 and 50 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "City must be between 1 and 100 characters"))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Country must be between 1 and 100 characters"))]
    pub country: Option<String>,
}

impl MemberUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.description.is_none()
            && self.city.is_none()
            && self.country.is_none()
    }
}
