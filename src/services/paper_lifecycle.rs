use sqlx::PgPool;

use crate::core::time::primitive_now_utc;
use crate::db::models::{ModerationRecord, Paper, User};
use crate::db::types::{ModerationTarget, PaperStatus, RecordStatus, UserRole};
use crate::repositories;
use crate::services::workflow::{
    aggregate_outcome, ensure_submittable, require_comments, WorkflowError,
};

/// Live review projection for a paper. The coarse status is the stored one;
/// question-level sub-status is always derived from the ledger, never cached.
#[derive(Debug)]
pub(crate) struct ReviewSummary {
    pub(crate) status: PaperStatus,
    pub(crate) active_claim: Option<ModerationRecord>,
    pub(crate) total_questions: i64,
    pub(crate) approved_questions: i64,
    pub(crate) rejected_questions: i64,
    pub(crate) claimed_questions: i64,
}

pub(crate) async fn submit_paper(
    pool: &PgPool,
    paper_id: &str,
    actor: &User,
) -> Result<Paper, WorkflowError> {
    let paper = repositories::papers::find_by_id(pool, paper_id)
        .await?
        .ok_or(WorkflowError::NotFound("Paper"))?;

    if paper.author_id != actor.id && actor.role != UserRole::Admin {
        return Err(WorkflowError::NotAuthor);
    }

    ensure_submittable(paper.status)?;

    let now = primitive_now_utc();
    let submitted = repositories::papers::submit(pool, paper_id, now).await?;

    if !submitted {
        // The guarded update also fails when the status moved underneath us;
        // classify against the fresh row before blaming the question set.
        let current = repositories::papers::fetch_one_by_id(pool, paper_id).await?;
        ensure_submittable(current.status)?;
        return Err(WorkflowError::EmptyPaper);
    }

    tracing::info!(
        actor_id = %actor.id,
        paper_id = %paper_id,
        action = "paper_submit",
        "Paper submitted for moderation"
    );

    Ok(repositories::papers::fetch_one_by_id(pool, paper_id).await?)
}

pub(crate) async fn approve_paper(
    pool: &PgPool,
    paper_id: &str,
    moderator: &User,
    comments: Option<&str>,
) -> Result<Paper, WorkflowError> {
    let paper = repositories::papers::find_by_id(pool, paper_id)
        .await?
        .ok_or(WorkflowError::NotFound("Paper"))?;

    let claim = require_paper_claim(pool, &paper, moderator).await?;

    let now = primitive_now_utc();
    repositories::moderation_records::resolve(
        pool,
        &claim.id,
        RecordStatus::Approved,
        comments.map(str::trim).filter(|value| !value.is_empty()),
        now,
    )
    .await?
    .ok_or(WorkflowError::AlreadyResolved)?;

    repositories::moderation_records::release_question_claims(
        pool,
        paper_id,
        &moderator.id,
        now,
    )
    .await?;

    // A standing question-level rejection from this cycle dominates the
    // paper-level approval.
    let since = paper.submitted_at.unwrap_or(claim.claimed_at);
    let outcomes =
        repositories::moderation_records::question_outcomes_since(pool, paper_id, since).await?;
    let rejected =
        outcomes.iter().filter(|(_, status)| *status == RecordStatus::Rejected).count() as i64;

    let final_status = aggregate_outcome(rejected);
    repositories::papers::finish_review(pool, paper_id, final_status, now).await?;

    tracing::info!(
        moderator_id = %moderator.id,
        paper_id = %paper_id,
        outcome = ?final_status,
        action = "paper_approve",
        "Paper review resolved"
    );

    Ok(repositories::papers::fetch_one_by_id(pool, paper_id).await?)
}

pub(crate) async fn reject_paper(
    pool: &PgPool,
    paper_id: &str,
    moderator: &User,
    comments: &str,
) -> Result<Paper, WorkflowError> {
    let comments = require_comments(comments)?;

    let paper = repositories::papers::find_by_id(pool, paper_id)
        .await?
        .ok_or(WorkflowError::NotFound("Paper"))?;

    let claim = require_paper_claim(pool, &paper, moderator).await?;

    let now = primitive_now_utc();
    repositories::moderation_records::resolve(
        pool,
        &claim.id,
        RecordStatus::Rejected,
        Some(comments),
        now,
    )
    .await?
    .ok_or(WorkflowError::AlreadyResolved)?;

    repositories::moderation_records::release_question_claims(
        pool,
        paper_id,
        &moderator.id,
        now,
    )
    .await?;

    repositories::papers::finish_review(pool, paper_id, PaperStatus::ChangeRequested, now).await?;

    tracing::info!(
        moderator_id = %moderator.id,
        paper_id = %paper_id,
        action = "paper_reject",
        "Paper returned to author with changes requested"
    );

    Ok(repositories::papers::fetch_one_by_id(pool, paper_id).await?)
}

pub(crate) async fn approve_question(
    pool: &PgPool,
    paper_id: &str,
    question_id: &str,
    moderator: &User,
    comments: Option<&str>,
) -> Result<ModerationRecord, WorkflowError> {
    resolve_question(
        pool,
        paper_id,
        question_id,
        moderator,
        RecordStatus::Approved,
        comments.map(str::trim).filter(|value| !value.is_empty()),
    )
    .await
}

pub(crate) async fn reject_question(
    pool: &PgPool,
    paper_id: &str,
    question_id: &str,
    moderator: &User,
    comments: &str,
) -> Result<ModerationRecord, WorkflowError> {
    let comments = require_comments(comments)?;
    resolve_question(pool, paper_id, question_id, moderator, RecordStatus::Rejected, Some(comments))
        .await
}

pub(crate) async fn review_summary(
    pool: &PgPool,
    paper: &Paper,
) -> Result<ReviewSummary, WorkflowError> {
    let active_claim = repositories::moderation_records::active_claim_for(
        pool,
        ModerationTarget::Paper,
        &paper.id,
    )
    .await?;

    let total_questions = repositories::questions::count_active(pool, &paper.id).await?;
    let claimed_questions =
        repositories::moderation_records::count_active_question_claims(pool, &paper.id).await?;

    let (approved_questions, rejected_questions) = match paper.submitted_at {
        Some(since) => {
            let outcomes =
                repositories::moderation_records::question_outcomes_since(pool, &paper.id, since)
                    .await?;
            let approved =
                outcomes.iter().filter(|(_, status)| *status == RecordStatus::Approved).count();
            let rejected =
                outcomes.iter().filter(|(_, status)| *status == RecordStatus::Rejected).count();
            (approved as i64, rejected as i64)
        }
        None => (0, 0),
    };

    Ok(ReviewSummary {
        status: paper.status,
        active_claim,
        total_questions,
        approved_questions,
        rejected_questions,
        claimed_questions,
    })
}

async fn require_paper_claim(
    pool: &PgPool,
    paper: &Paper,
    moderator: &User,
) -> Result<ModerationRecord, WorkflowError> {
    if paper.status == PaperStatus::Approved {
        return Err(WorkflowError::PaperFinalized);
    }

    let claim = repositories::moderation_records::active_claim_for(
        pool,
        ModerationTarget::Paper,
        &paper.id,
    )
    .await?
    .ok_or(WorkflowError::NotClaimedByModerator)?;

    if claim.moderator_id != moderator.id {
        return Err(WorkflowError::NotClaimedByModerator);
    }

    Ok(claim)
}

async fn resolve_question(
    pool: &PgPool,
    paper_id: &str,
    question_id: &str,
    moderator: &User,
    outcome: RecordStatus,
    comments: Option<&str>,
) -> Result<ModerationRecord, WorkflowError> {
    repositories::papers::find_by_id(pool, paper_id)
        .await?
        .ok_or(WorkflowError::NotFound("Paper"))?;

    repositories::questions::find_active_by_id(pool, paper_id, question_id)
        .await?
        .ok_or(WorkflowError::NotFound("Question"))?;

    let claim = repositories::moderation_records::active_claim_for(
        pool,
        ModerationTarget::Question,
        question_id,
    )
    .await?
    .ok_or(WorkflowError::NotClaimedByModerator)?;

    if claim.moderator_id != moderator.id {
        return Err(WorkflowError::NotClaimedByModerator);
    }

    let resolved = repositories::moderation_records::resolve(
        pool,
        &claim.id,
        outcome,
        comments,
        primitive_now_utc(),
    )
    .await?
    .ok_or(WorkflowError::AlreadyResolved)?;

    tracing::info!(
        moderator_id = %moderator.id,
        paper_id = %paper_id,
        question_id = %question_id,
        outcome = ?outcome,
        action = "question_resolve",
        "Question review resolved"
    );

    Ok(resolved)
}
