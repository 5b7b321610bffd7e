use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_role, CurrentUser};
use crate::api::pagination::PaginatedResponse;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{PaperStatus, UserRole};
use crate::repositories;
use crate::schemas::moderation::ModerationRecordResponse;
use crate::schemas::paper::{
    PaperCreate, PaperDetailResponse, PaperExportResponse, PaperResponse, PaperStatusResponse,
    PaperUpdate,
};
use crate::schemas::question::QuestionResponse;
use crate::services::paper_lifecycle;

use super::helpers;
use super::queries::ListPapersQuery;

pub(super) async fn create_paper(
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Json(payload): Json<PaperCreate>,
) -> Result<(StatusCode, Json<PaperResponse>), ApiError> {
    require_role(&user, UserRole::Instructor)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = repositories::courses::find_by_id(state.db(), &payload.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    let Some(course) = course else {
        return Err(ApiError::NotFound("Course not found".to_string()));
    };

    if !course.is_active {
        return Err(ApiError::BadRequest("Course is not active".to_string()));
    }

    let now = primitive_now_utc();
    let paper = repositories::papers::create(
        state.db(),
        repositories::papers::CreatePaper {
            id: &Uuid::new_v4().to_string(),
            course_id: &course.id,
            title: payload.title.trim(),
            author_id: &user.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create paper"))?;

    tracing::info!(
        author_id = %user.id,
        paper_id = %paper.id,
        course_id = %course.id,
        action = "paper_create",
        "Paper created"
    );

    Ok((StatusCode::CREATED, Json(PaperResponse::from_db(paper))))
}

pub(super) async fn list_papers(
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Query(params): Query<ListPapersQuery>,
) -> Result<Json<PaginatedResponse<PaperResponse>>, ApiError> {
    let filter = match user.role {
        UserRole::Admin => repositories::papers::PaperFilter {
            author_id: None,
            course_id: params.course_id,
            status: params.status,
        },
        UserRole::Instructor => repositories::papers::PaperFilter {
            author_id: Some(user.id.clone()),
            course_id: params.course_id,
            status: params.status,
        },
        UserRole::Moderator => {
            return Err(ApiError::Forbidden("Moderators use the moderation queue"));
        }
    };

    let papers = repositories::papers::list(state.db(), &filter, params.skip, params.limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list papers"))?;

    let total_count = repositories::papers::count(state.db(), &filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count papers"))?;

    Ok(Json(PaginatedResponse {
        items: papers.into_iter().map(PaperResponse::from_db).collect(),
        total_count,
        skip: params.skip,
        limit: params.limit,
    }))
}

pub(super) async fn get_paper(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<Json<PaperDetailResponse>, ApiError> {
    let paper = helpers::fetch_paper(&state, &paper_id).await?;
    helpers::ensure_read_access(&user, &paper)?;

    Ok(Json(helpers::paper_detail(&state, paper).await?))
}

pub(super) async fn update_paper(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Json(payload): Json<PaperUpdate>,
) -> Result<Json<PaperResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let paper = helpers::fetch_paper(&state, &paper_id).await?;
    helpers::ensure_author_edit(&user, &paper)?;

    repositories::papers::update_title(
        state.db(),
        &paper_id,
        payload.title.trim(),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update paper"))?;

    let updated = repositories::papers::fetch_one_by_id(state.db(), &paper_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated paper"))?;

    Ok(Json(PaperResponse::from_db(updated)))
}

pub(super) async fn delete_paper(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<StatusCode, ApiError> {
    let paper = helpers::fetch_paper(&state, &paper_id).await?;

    if user.role != UserRole::Admin {
        if paper.author_id != user.id {
            return Err(ApiError::Forbidden("Only the paper's author may do this"));
        }
        // Once submitted, the paper belongs to the moderation trail.
        if paper.status != PaperStatus::Draft {
            return Err(ApiError::Forbidden("Submitted papers cannot be deleted by their author"));
        }
    }

    repositories::papers::delete_by_id(state.db(), &paper_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete paper"))?;

    tracing::info!(
        actor_id = %user.id,
        paper_id = %paper_id,
        action = "paper_delete",
        "Paper deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn submit_paper(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<Json<PaperResponse>, ApiError> {
    let paper = paper_lifecycle::submit_paper(state.db(), &paper_id, &user).await?;
    Ok(Json(PaperResponse::from_db(paper)))
}

pub(super) async fn paper_status(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<Json<PaperStatusResponse>, ApiError> {
    let paper = helpers::fetch_paper(&state, &paper_id).await?;
    helpers::ensure_read_access(&user, &paper)?;

    let summary = paper_lifecycle::review_summary(state.db(), &paper).await?;

    Ok(Json(PaperStatusResponse::from_summary(paper.id, summary)))
}

pub(super) async fn paper_records(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<Json<Vec<ModerationRecordResponse>>, ApiError> {
    let paper = helpers::fetch_paper(&state, &paper_id).await?;
    helpers::ensure_read_access(&user, &paper)?;

    let records = repositories::moderation_records::records_for_paper(state.db(), &paper_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch moderation records"))?;

    Ok(Json(records.into_iter().map(ModerationRecordResponse::from_db).collect()))
}

/// Projection for the external PDF renderer: metadata plus the finalized,
/// ordered question list. Only available once the paper has been submitted.
pub(super) async fn export_paper(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<Json<PaperExportResponse>, ApiError> {
    let paper = helpers::fetch_paper(&state, &paper_id).await?;
    helpers::ensure_read_access(&user, &paper)?;

    if paper.status == PaperStatus::Draft {
        return Err(ApiError::BadRequest(
            "Paper must be submitted before it can be exported".to_string(),
        ));
    }

    let course = repositories::courses::fetch_one_by_id(state.db(), &paper.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    let author_name = repositories::users::find_name_by_id(state.db(), &paper.author_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch author"))?
        .unwrap_or_else(|| paper.author_id.clone());

    let questions = repositories::questions::list_active_by_paper(state.db(), &paper_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch questions"))?;

    Ok(Json(PaperExportResponse {
        paper_id: paper.id,
        title: paper.title,
        status: paper.status,
        course_code: course.code,
        course_title: course.title,
        author_name,
        submitted_at: paper.submitted_at.map(crate::core::time::format_primitive),
        questions: questions.into_iter().map(QuestionResponse::from_db).collect(),
    }))
}
