// src/handlers/announcement.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::announcement::{Announcement, AnnouncementListParams, CreateAnnouncementRequest},
    store::AnnouncementStore,
    utils::{jwt::Claims, sanitized_json::SanitizedJson},
};

/// Post an announcement to a course.
/// Requires: Instructor or Admin role.
///
/// The body arrives already sanitized: `title` and `course` escaped as text,
/// `body` cleaned as rich text.
pub async fn create_announcement(
    State(store): State<AnnouncementStore>,
    Extension(claims): Extension<Claims>,
    SanitizedJson(payload): SanitizedJson<CreateAnnouncementRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.body.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Body is empty after sanitization".to_string(),
        ));
    }

    let announcement = Announcement {
        id: Uuid::new_v4(),
        course: payload.course,
        title: payload.title,
        body: payload.body,
        author_id: claims.sub,
        created_at: Utc::now(),
    };

    store.insert(announcement.clone()).await;
    tracing::info!(id = %announcement.id, course = %announcement.course, "announcement created");

    Ok((StatusCode::CREATED, Json(announcement)))
}

/// List announcements (newest first), optionally for one course.
pub async fn list_announcements(
    State(store): State<AnnouncementStore>,
    Query(params): Query<AnnouncementListParams>,
) -> Result<impl IntoResponse, AppError> {
    let items = store.list(params.course.as_deref()).await;
    Ok(Json(items))
}

/// Get a single announcement by ID.
pub async fn get_announcement(
    State(store): State<AnnouncementStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let announcement = store
        .get(id)
        .await
        .ok_or(AppError::NotFound("Announcement not found".to_string()))?;

    Ok(Json(announcement))
}

/// Delete an announcement.
/// Requires: Admin role.
pub async fn delete_announcement(
    State(store): State<AnnouncementStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    store
        .remove(id)
        .await
        .ok_or(AppError::NotFound("Announcement not found".to_string()))?;

    tracing::info!(%id, "announcement deleted");
    Ok(StatusCode::NO_CONTENT)
}
