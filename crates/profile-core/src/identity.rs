//! Caller identity resolution

use crate::error::DomainError;

/// Identity of the caller after the transport layer has verified it.
/// `subject` is the member id carried by the verified credentials, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    subject: Option<String>,
}

impl CallerContext {
    pub fn new(subject: Option<String>) -> Self {
        Self { subject }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_member(member_id: impl Into<String>) -> Self {
        Self {
            subject: Some(member_id.into()),
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

/// Member id of the caller, or `Unauthenticated` when the context carries no
/// usable subject.
pub fn resolve_member_id(caller: &CallerContext) -> Result<String, DomainError> {
    match caller.subject() {
        Some(subject) if !subject.trim().is_empty() => Ok(subject.to_string()),
        _ => Err(DomainError::Unauthenticated),
    }
}
