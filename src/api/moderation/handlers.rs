use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::{require_role, CurrentUser};
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::core::state::AppState;
use crate::db::types::{ModerationTarget, RecordStatus, UserRole};
use crate::repositories;
use crate::schemas::moderation::{ApproveRequest, ModerationRecordResponse, RejectRequest};
use crate::schemas::paper::PaperResponse;
use crate::services::{claims, paper_lifecycle};

#[derive(Debug, Deserialize)]
pub(super) struct QueueQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct ClaimsQuery {
    #[serde(default)]
    status: Option<RecordStatus>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RecordsQuery {
    #[serde(alias = "targetType")]
    target_type: ModerationTarget,
    #[serde(alias = "targetId")]
    target_id: String,
}

pub(super) async fn queue(
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Query(params): Query<QueueQuery>,
) -> Result<Json<PaginatedResponse<PaperResponse>>, ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let papers = repositories::papers::list_submitted(state.db(), params.skip, params.limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submitted papers"))?;

    let total_count = repositories::papers::count_submitted(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count submitted papers"))?;

    Ok(Json(PaginatedResponse {
        items: papers.into_iter().map(PaperResponse::from_db).collect(),
        total_count,
        skip: params.skip,
        limit: params.limit,
    }))
}

pub(super) async fn my_claims(
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Query(params): Query<ClaimsQuery>,
) -> Result<Json<Vec<ModerationRecordResponse>>, ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let records =
        repositories::moderation_records::claims_by_moderator(state.db(), &user.id, params.status)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list moderation records"))?;

    Ok(Json(records.into_iter().map(ModerationRecordResponse::from_db).collect()))
}

pub(super) async fn records(
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<Vec<ModerationRecordResponse>>, ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let records = repositories::moderation_records::records_for_target(
        state.db(),
        params.target_type,
        &params.target_id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to fetch moderation records"))?;

    Ok(Json(records.into_iter().map(ModerationRecordResponse::from_db).collect()))
}

pub(super) async fn claim_paper(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<(StatusCode, Json<ModerationRecordResponse>), ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let record = claims::claim_paper(state.db(), &paper_id, &user.id).await?;

    Ok((StatusCode::CREATED, Json(ModerationRecordResponse::from_db(record))))
}

pub(super) async fn approve_paper(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    payload: Option<Json<ApproveRequest>>,
) -> Result<Json<PaperResponse>, ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let comments = payload.as_ref().and_then(|Json(body)| body.comments.as_deref());
    let paper = paper_lifecycle::approve_paper(state.db(), &paper_id, &user, comments).await?;

    Ok(Json(PaperResponse::from_db(paper)))
}

pub(super) async fn reject_paper(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<PaperResponse>, ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let paper =
        paper_lifecycle::reject_paper(state.db(), &paper_id, &user, &payload.comments).await?;

    Ok(Json(PaperResponse::from_db(paper)))
}

pub(super) async fn release_paper(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<Json<ModerationRecordResponse>, ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let record =
        claims::release_claim(state.db(), ModerationTarget::Paper, &paper_id, &user.id).await?;

    Ok(Json(ModerationRecordResponse::from_db(record)))
}

pub(super) async fn claim_question(
    Path((paper_id, question_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<(StatusCode, Json<ModerationRecordResponse>), ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let record = claims::claim_question(state.db(), &paper_id, &question_id, &user.id).await?;

    Ok((StatusCode::CREATED, Json(ModerationRecordResponse::from_db(record))))
}

pub(super) async fn approve_question(
    Path((paper_id, question_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    payload: Option<Json<ApproveRequest>>,
) -> Result<Json<ModerationRecordResponse>, ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let comments = payload.as_ref().and_then(|Json(body)| body.comments.as_deref());
    let record =
        paper_lifecycle::approve_question(state.db(), &paper_id, &question_id, &user, comments)
            .await?;

    Ok(Json(ModerationRecordResponse::from_db(record)))
}

pub(super) async fn reject_question(
    Path((paper_id, question_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<ModerationRecordResponse>, ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let record = paper_lifecycle::reject_question(
        state.db(),
        &paper_id,
        &question_id,
        &user,
        &payload.comments,
    )
    .await?;

    Ok(Json(ModerationRecordResponse::from_db(record)))
}

pub(super) async fn release_question(
    Path((_paper_id, question_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<Json<ModerationRecordResponse>, ApiError> {
    require_role(&user, UserRole::Moderator)?;

    let record =
        claims::release_claim(state.db(), ModerationTarget::Question, &question_id, &user.id)
            .await?;

    Ok(Json(ModerationRecordResponse::from_db(record)))
}
