//! Request and response payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use profile_core::{Member, MemberOrder, MemberParams, Photo};
use profile_shared::{PageLimits, PaginatedResult, Pagination, PaginationMetadata};

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub id: String,
    pub date_of_birth: NaiveDate,
    pub age: u32,
    pub image_url: Option<String>,
    pub display_name: String,
    pub created: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub gender: String,
    pub description: Option<String>,
    pub city: String,
    pub country: String,
}

impl From<&Member> for MemberDto {
    fn from(member: &Member) -> Self {
        let record = member.record();
        Self {
            id: record.id.clone(),
            date_of_birth: record.date_of_birth,
            age: member.age_on(Utc::now().date_naive()),
            image_url: record.image_url.clone(),
            display_name: record.display_name.clone(),
            created: record.created,
            last_active: record.last_active,
            gender: record.gender.clone(),
            description: record.description.clone(),
            city: record.city.clone(),
            country: record.country.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDto {
    pub id: i32,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    pub member_id: String,
}

impl From<Photo> for PhotoDto {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            url: photo.url,
            public_id: photo.public_id,
            member_id: photo.member_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub metadata: PaginationMetadata,
    pub items: Vec<T>,
}

impl From<PaginatedResult<Member>> for PaginatedResponse<MemberDto> {
    fn from(result: PaginatedResult<Member>) -> Self {
        Self {
            metadata: result.metadata,
            items: result.items.iter().map(MemberDto::from).collect(),
        }
    }
}

/// Query string for `GET /api/members`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    #[serde(alias = "page")]
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub gender: Option<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub order_by: Option<String>,
}

impl MemberQuery {
    pub fn into_params(self, limits: PageLimits, current_member_id: Option<String>) -> Result<MemberParams, ApiError> {
        let defaults = MemberParams::default();
        let order_by = match self.order_by.as_deref() {
            None | Some("") => MemberOrder::default(),
            Some(value) => value.parse::<MemberOrder>()?,
        };

        Ok(MemberParams {
            pagination: Pagination::normalize(self.page_number, self.page_size, limits),
            gender: self.gender.filter(|g| !g.is_empty()),
            min_age: self.min_age.unwrap_or(defaults.min_age),
            max_age: self.max_age.unwrap_or(defaults.max_age),
            order_by,
            current_member_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let params = MemberQuery::default()
            .into_params(PageLimits { default_page_size: 10, max_page_size: 50 }, None)
            .unwrap();
        assert_eq!(params.pagination.page_number, 1);
        assert_eq!(params.pagination.page_size, 10);
        assert_eq!(params.order_by, MemberOrder::LastActive);
        assert_eq!(params.min_age, 18);
    }

    #[test]
    fn test_query_caps_page_size_and_rejects_unknown_order() {
        let query = MemberQuery {
            page_size: Some(1000),
            ..Default::default()
        };
        let params = query.into_params(PageLimits::default(), Some("me".into())).unwrap();
        assert_eq!(params.pagination.page_size, PageLimits::default().max_page_size);
        assert_eq!(params.current_member_id.as_deref(), Some("me"));

        let bad = MemberQuery {
            order_by: Some("height".into()),
            ..Default::default()
        };
        assert!(bad.into_params(PageLimits::default(), None).is_err());
    }
}
