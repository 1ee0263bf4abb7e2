use std::sync::Arc;

use profile_core::ports::PhotoStore;
use profile_core::repositories::MemberRepository;
use profile_core::services::ProfileService;
use profile_security::JwtService;
use profile_shared::PageLimits;

pub type SharedProfileService = ProfileService<dyn MemberRepository, dyn PhotoStore>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub profile_service: Arc<SharedProfileService>,
    pub jwt: Arc<JwtService>,
    pub page_limits: PageLimits,
}

impl AppState {
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        photo_store: Arc<dyn PhotoStore>,
        jwt: JwtService,
        page_limits: PageLimits,
    ) -> Self {
        Self {
            profile_service: Arc::new(ProfileService::new(member_repo, photo_store)),
            jwt: Arc::new(jwt),
            page_limits,
        }
    }
}
