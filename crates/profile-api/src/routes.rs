use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use profile_shared::constants::MAX_PHOTO_UPLOAD_BYTES;

use crate::handlers::{health, members};
use crate::middleware::log_user_activity;
use crate::state::AppState;

// Multipart framing on top of the image itself.
const UPLOAD_BODY_LIMIT: usize = MAX_PHOTO_UPLOAD_BYTES + 64 * 1024;

pub fn router(state: AppState) -> Router {
    let member_routes = Router::new()
        .route("/api/members", get(members::list_members).put(members::update_member))
        .route("/api/members/{id}", get(members::get_member))
        .route("/api/members/{id}/photos", get(members::get_member_photos))
        .route(
            "/api/members/add-photo",
            post(members::add_photo).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/members/set-main-photo/{photo_id}", put(members::set_main_photo))
        .route("/api/members/delete-photo/{photo_id}", delete(members::delete_photo))
        .route_layer(from_fn_with_state(state.clone(), log_user_activity));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(member_routes)
        .with_state(state)
}
