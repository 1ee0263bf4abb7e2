// ============================================================================
// Profile API - Member Handlers
// File: crates/profile-api/src/handlers/members.rs
// ============================================================================
//! Member listing, profile edits and photo management

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{debug, info};

use profile_core::ports::PhotoUpload;
use profile_core::MemberUpdate;
use profile_shared::constants::{MAX_PHOTO_UPLOAD_BYTES, PAGINATION_HEADER};

use crate::dto::{MemberDto, MemberQuery, PaginatedResponse, PhotoDto};
use crate::error::ApiError;
use crate::middleware::{AuthMember, OptionalCaller};
use crate::state::AppState;

static PAGINATION: HeaderName = HeaderName::from_static(PAGINATION_HEADER);

/// GET /api/members
///
/// The page metadata is also sent as JSON in the `Pagination` header.
pub async fn list_members(
    State(state): State<AppState>,
    OptionalCaller(caller): OptionalCaller,
    Query(query): Query<MemberQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let params = query.into_params(state.page_limits, caller.subject().map(str::to_string))?;
    let page = state.profile_service.list_members(&params).await?;

    let response = PaginatedResponse::<MemberDto>::from(page);
    let metadata = serde_json::to_string(&response.metadata)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode pagination: {}", e)))?;
    let metadata = HeaderValue::from_str(&metadata)
        .map_err(|e| ApiError::InternalError(format!("Invalid pagination header: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(PAGINATION.clone(), metadata);
    Ok((headers, Json(response)))
}

/// GET /api/members/{id}
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MemberDto>, ApiError> {
    let member = state.profile_service.get_member(&id).await?;
    Ok(Json(MemberDto::from(&member)))
}

/// GET /api/members/{id}/photos
pub async fn get_member_photos(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PhotoDto>>, ApiError> {
    let photos = state.profile_service.get_member_photos(&id).await?;
    Ok(Json(photos.into_iter().map(PhotoDto::from).collect()))
}

/// PUT /api/members
pub async fn update_member(
    State(state): State<AppState>,
    auth: AuthMember,
    Json(update): Json<MemberUpdate>,
) -> Result<StatusCode, ApiError> {
    state
        .profile_service
        .update_profile(&auth.caller, update)
        .await
        .map_err(ApiError::for_mutation)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/members/add-photo
///
/// Expects a multipart body with an image in the `file` field.
pub async fn add_photo(
    State(state): State<AppState>,
    auth: AuthMember,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut upload: Option<PhotoUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = match field.content_type() {
            Some(ct) if ct.starts_with("image/") => ct.to_string(),
            Some(ct) => return Err(ApiError::BadRequest(format!("Unsupported content type: {}", ct))),
            None => return Err(ApiError::BadRequest("Missing content type for file".to_string())),
        };

        let file_name = field.file_name().unwrap_or("photo").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }
        if bytes.len() > MAX_PHOTO_UPLOAD_BYTES {
            return Err(ApiError::BadRequest("Uploaded file is too large".to_string()));
        }

        upload = Some(PhotoUpload {
            file_name,
            content_type: Some(content_type),
            bytes,
        });
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::BadRequest("file required".to_string()))?;
    debug!("Photo upload of {} bytes from {}", upload.bytes.len(), auth.member_id);

    let photo = state
        .profile_service
        .add_photo(&auth.caller, upload)
        .await
        .map_err(ApiError::for_mutation)?;

    let location = format!("/api/members/{}/photos", photo.member_id);
    let location = HeaderValue::from_str(&location)
        .map_err(|e| ApiError::InternalError(format!("Invalid location header: {}", e)))?;

    info!("Photo {} created for {}", photo.id, auth.member_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(PhotoDto::from(photo)),
    ))
}

/// PUT /api/members/set-main-photo/{photo_id}
pub async fn set_main_photo(
    State(state): State<AppState>,
    auth: AuthMember,
    Path(photo_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .profile_service
        .set_main_photo(&auth.caller, photo_id)
        .await
        .map_err(ApiError::for_mutation)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/members/delete-photo/{photo_id}
pub async fn delete_photo(
    State(state): State<AppState>,
    auth: AuthMember,
    Path(photo_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .profile_service
        .delete_photo(&auth.caller, photo_id)
        .await
        .map_err(ApiError::for_mutation)?;
    Ok(StatusCode::OK)
}
