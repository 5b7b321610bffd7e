use crate::api::errors::ApiError;
use crate::api::guards::is_moderator;
use crate::core::state::AppState;
use crate::db::models::{Paper, User};
use crate::db::types::{PaperStatus, UserRole};
use crate::repositories;
use crate::schemas::paper::{PaperDetailResponse, PaperResponse};
use crate::schemas::question::QuestionResponse;
use crate::services::workflow;

pub(super) async fn fetch_paper(state: &AppState, paper_id: &str) -> Result<Paper, ApiError> {
    repositories::papers::find_by_id(state.db(), paper_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch paper"))?
        .ok_or_else(|| ApiError::NotFound("Paper not found".to_string()))
}

/// Authors and admins always see a paper; moderators only once it has left
/// the author's desk.
pub(super) fn ensure_read_access(user: &User, paper: &Paper) -> Result<(), ApiError> {
    if user.id == paper.author_id || user.role == UserRole::Admin {
        return Ok(());
    }

    if is_moderator(user) && paper.status != PaperStatus::Draft {
        return Ok(());
    }

    Err(ApiError::Forbidden("Access denied"))
}

/// Structural edits are author-only (admin override) and require the paper
/// to be in an editable status.
pub(super) fn ensure_author_edit(user: &User, paper: &Paper) -> Result<(), ApiError> {
    if user.id != paper.author_id && user.role != UserRole::Admin {
        return Err(ApiError::Forbidden("Only the paper's author may do this"));
    }

    if !workflow::author_may_edit(paper.status) {
        return Err(ApiError::BadRequest("Paper is not editable in its current status".to_string()));
    }

    Ok(())
}

pub(super) async fn paper_detail(
    state: &AppState,
    paper: Paper,
) -> Result<PaperDetailResponse, ApiError> {
    let questions = repositories::questions::list_active_by_paper(state.db(), &paper.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch questions"))?;

    Ok(PaperDetailResponse {
        paper: PaperResponse::from_db(paper),
        questions: questions.into_iter().map(QuestionResponse::from_db).collect(),
    })
}
