use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::McqOption;
use crate::repositories;
use crate::schemas::question::{
    QuestionCreate, QuestionReorderRequest, QuestionResponse, QuestionUpdate,
};
use crate::services::workflow;

use super::helpers;

pub(super) async fn add_question(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Json(payload): Json<QuestionCreate>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    let paper = helpers::fetch_paper(&state, &paper_id).await?;
    helpers::ensure_author_edit(&user, &paper)?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let options: Vec<McqOption> =
        payload.options.into_iter().map(|option| option.into_db()).collect();
    workflow::validate_options(payload.question_type, &options).map_err(ApiError::BadRequest)?;

    if let Some(co_id) = payload.co_id.as_deref() {
        ensure_outcome_in_course(&state, &paper.course_id, co_id).await?;
    }

    let now = primitive_now_utc();
    let question = repositories::questions::create(
        state.db(),
        repositories::questions::CreateQuestion {
            id: &Uuid::new_v4().to_string(),
            paper_id: &paper_id,
            content: &payload.content,
            question_type: payload.question_type,
            marks: payload.marks,
            co_id: payload.co_id.as_deref(),
            options,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from_db(question))))
}

pub(super) async fn update_question(
    Path((paper_id, question_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Json(payload): Json<QuestionUpdate>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let paper = helpers::fetch_paper(&state, &paper_id).await?;
    helpers::ensure_author_edit(&user, &paper)?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let existing = repositories::questions::find_active_by_id(state.db(), &paper_id, &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    // Validate the question as it will look after the update.
    let effective_type = payload.question_type.unwrap_or(existing.question_type);
    let new_options: Option<Vec<McqOption>> = payload
        .options
        .map(|options| options.into_iter().map(|option| option.into_db()).collect());
    let effective_options = new_options.as_deref().unwrap_or(&existing.options.0);
    workflow::validate_options(effective_type, effective_options).map_err(ApiError::BadRequest)?;

    if let Some(co_id) = payload.co_id.as_deref() {
        ensure_outcome_in_course(&state, &paper.course_id, co_id).await?;
    }

    let marks = if payload.clear_marks {
        Some(None)
    } else {
        payload.marks.map(Some)
    };
    let co_id = if payload.clear_co_id {
        Some(None)
    } else {
        payload.co_id.map(Some)
    };

    let updated = repositories::questions::update(
        state.db(),
        &paper_id,
        &question_id,
        repositories::questions::UpdateQuestion {
            content: payload.content,
            question_type: payload.question_type,
            marks,
            co_id,
            options: new_options,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update question"))?;

    if !updated {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    let question = repositories::questions::find_active_by_id(state.db(), &paper_id, &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated question"))?
        .ok_or_else(|| ApiError::Internal("Question missing after update".to_string()))?;

    Ok(Json(QuestionResponse::from_db(question)))
}

pub(super) async fn delete_question(
    Path((paper_id, question_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<StatusCode, ApiError> {
    let paper = helpers::fetch_paper(&state, &paper_id).await?;
    helpers::ensure_author_edit(&user, &paper)?;

    let deleted =
        repositories::questions::soft_delete(state.db(), &paper_id, &question_id, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;

    if !deleted {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    tracing::info!(
        actor_id = %user.id,
        paper_id = %paper_id,
        question_id = %question_id,
        action = "question_delete",
        "Question soft-deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn reorder_questions(
    Path(paper_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Json(payload): Json<QuestionReorderRequest>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    let paper = helpers::fetch_paper(&state, &paper_id).await?;
    helpers::ensure_author_edit(&user, &paper)?;

    let current_ids = repositories::questions::list_active_ids(state.db(), &paper_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question ids"))?;

    let mut expected = current_ids.clone();
    expected.sort();
    let mut provided = payload.question_ids.clone();
    provided.sort();
    if expected != provided {
        return Err(ApiError::BadRequest(
            "question_ids must be a permutation of the paper's active questions".to_string(),
        ));
    }

    repositories::questions::reorder(
        state.db(),
        &paper_id,
        &payload.question_ids,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to reorder questions"))?;

    let questions = repositories::questions::list_active_by_paper(state.db(), &paper_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch questions"))?;

    Ok(Json(questions.into_iter().map(QuestionResponse::from_db).collect()))
}

async fn ensure_outcome_in_course(
    state: &AppState,
    course_id: &str,
    co_id: &str,
) -> Result<(), ApiError> {
    let outcome = repositories::course_outcomes::find_by_id(state.db(), course_id, co_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course outcome"))?;

    if outcome.is_none() {
        return Err(ApiError::BadRequest(
            "co_id does not reference an outcome of the paper's course".to_string(),
        ));
    }

    Ok(())
}
