//! Last-active tracking

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::auth::caller_from_headers;
use crate::state::AppState;

/// After a successful request from an authenticated caller, stamp the
/// caller's member as active. Failures are logged and never change the
/// response.
pub async fn log_user_activity(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let caller = caller_from_headers(request.headers(), &state.jwt).ok().flatten();

    let response = next.run(request).await;

    if let Some(caller) = caller {
        if response.status().is_success() {
            if let Err(e) = state.profile_service.record_activity(&caller).await {
                warn!("Could not record activity for {:?}: {}", caller.subject(), e);
            }
        }
    }

    response
}
