//! Member listing filter

use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use profile_shared::constants::{DEFAULT_MAX_AGE, DEFAULT_MIN_AGE};
use profile_shared::Pagination;

use crate::error::DomainError;

/// Sort key for member listings. Always descending, ties broken by id ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberOrder {
    #[default]
    LastActive,
    Created,
}

impl MemberOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberOrder::LastActive => "lastActive",
            MemberOrder::Created => "created",
        }
    }
}

impl FromStr for MemberOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lastactive" | "last_active" => Ok(MemberOrder::LastActive),
            "created" => Ok(MemberOrder::Created),
            _ => Err(DomainError::ValidationError(format!("Unknown orderBy value: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberParams {
    pub pagination: Pagination,
    pub gender: Option<String>,
    pub min_age: u32,
    pub max_age: u32,
    pub order_by: MemberOrder,
    /// Member excluded from the listing (the caller, when known).
    pub current_member_id: Option<String>,
}

impl Default for MemberParams {
    fn default() -> Self {
        Self {
            pagination: Pagination::default(),
            gender: None,
            min_age: DEFAULT_MIN_AGE,
            max_age: DEFAULT_MAX_AGE,
            order_by: MemberOrder::default(),
            current_member_id: None,
        }
    }
}

impl MemberParams {
    pub fn with_pagination(pagination: Pagination) -> Self {
        Self {
            pagination,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.min_age > self.max_age {
            return Err(DomainError::ValidationError(format!(
                "minAge ({}) cannot be greater than maxAge ({})",
                self.min_age, self.max_age
            )));
        }
        Ok(())
    }

    /// Inclusive date-of-birth bounds matching `min_age..=max_age` on `today`.
    pub fn date_of_birth_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let oldest = today
            .checked_sub_months(Months::new(self.max_age.saturating_add(1).saturating_mul(12)))
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .unwrap_or(NaiveDate::MIN);
        let youngest = today
            .checked_sub_months(Months::new(self.min_age.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN);
        (oldest, youngest)
    }
}
