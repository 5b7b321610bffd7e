use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::ModerationRecord;
use crate::db::types::{ModerationTarget, PaperStatus};
use crate::repositories;
use crate::services::workflow::{ensure_claimable, WorkflowError};

/// Takes exclusive moderation custody of a paper. Re-claiming a paper the
/// caller already holds is idempotent; a claim held by someone else is the
/// routine `AlreadyClaimed` outcome, never retried here.
pub(crate) async fn claim_paper(
    pool: &PgPool,
    paper_id: &str,
    moderator_id: &str,
) -> Result<ModerationRecord, WorkflowError> {
    let paper = repositories::papers::find_by_id(pool, paper_id)
        .await?
        .ok_or(WorkflowError::NotFound("Paper"))?;

    ensure_claimable(paper.status)?;

    let now = primitive_now_utc();
    let inserted = repositories::moderation_records::create_claim(
        pool,
        repositories::moderation_records::CreateClaim {
            id: &Uuid::new_v4().to_string(),
            target_type: ModerationTarget::Paper,
            target_id: paper_id,
            paper_id,
            moderator_id,
            claimed_at: now,
        },
    )
    .await;

    let record = match inserted {
        Ok(record) => record,
        Err(err) if repositories::moderation_records::is_unique_violation(&err) => {
            return match holder_of(pool, ModerationTarget::Paper, paper_id).await? {
                Some(existing) if existing.moderator_id == moderator_id => Ok(existing),
                Some(existing) => {
                    Err(WorkflowError::AlreadyClaimed { by: holder_name(pool, &existing).await })
                }
                None => Err(WorkflowError::AlreadyClaimed { by: "another moderator".to_string() }),
            };
        }
        Err(err) => return Err(err.into()),
    };

    repositories::papers::mark_under_review(pool, paper_id, now).await?;

    tracing::info!(
        moderator_id = %moderator_id,
        paper_id = %paper_id,
        action = "paper_claim",
        "Paper claimed for review"
    );

    Ok(record)
}

/// Sub-delegation within an already-claimed paper: the caller must hold the
/// active paper claim before claiming one of its questions.
pub(crate) async fn claim_question(
    pool: &PgPool,
    paper_id: &str,
    question_id: &str,
    moderator_id: &str,
) -> Result<ModerationRecord, WorkflowError> {
    let paper = repositories::papers::find_by_id(pool, paper_id)
        .await?
        .ok_or(WorkflowError::NotFound("Paper"))?;

    if paper.status == PaperStatus::Approved {
        return Err(WorkflowError::PaperFinalized);
    }

    let paper_claim = holder_of(pool, ModerationTarget::Paper, paper_id).await?;
    match paper_claim {
        Some(claim) if claim.moderator_id == moderator_id => {}
        _ => return Err(WorkflowError::PaperNotClaimedByModerator),
    }

    repositories::questions::find_active_by_id(pool, paper_id, question_id)
        .await?
        .ok_or(WorkflowError::NotFound("Question"))?;

    let inserted = repositories::moderation_records::create_claim(
        pool,
        repositories::moderation_records::CreateClaim {
            id: &Uuid::new_v4().to_string(),
            target_type: ModerationTarget::Question,
            target_id: question_id,
            paper_id,
            moderator_id,
            claimed_at: primitive_now_utc(),
        },
    )
    .await;

    match inserted {
        Ok(record) => Ok(record),
        Err(err) if repositories::moderation_records::is_unique_violation(&err) => {
            match holder_of(pool, ModerationTarget::Question, question_id).await? {
                Some(existing) if existing.moderator_id == moderator_id => Ok(existing),
                Some(existing) => {
                    Err(WorkflowError::AlreadyClaimed { by: holder_name(pool, &existing).await })
                }
                None => Err(WorkflowError::AlreadyClaimed { by: "another moderator".to_string() }),
            }
        }
        Err(err) => Err(err.into()),
    }
}

/// Voluntary abandonment without a verdict. The slot is freed for another
/// claim; the released record stays out of approval/rejection statistics.
pub(crate) async fn release_claim(
    pool: &PgPool,
    target_type: ModerationTarget,
    target_id: &str,
    moderator_id: &str,
) -> Result<ModerationRecord, WorkflowError> {
    let claim = holder_of(pool, target_type, target_id)
        .await?
        .ok_or(WorkflowError::NotFound("Active claim"))?;

    if claim.moderator_id != moderator_id {
        return Err(WorkflowError::NotOwner);
    }

    let now = primitive_now_utc();
    let released = repositories::moderation_records::resolve(
        pool,
        &claim.id,
        crate::db::types::RecordStatus::Released,
        None,
        now,
    )
    .await?
    .ok_or(WorkflowError::AlreadyResolved)?;

    if target_type == ModerationTarget::Paper {
        repositories::moderation_records::release_question_claims(
            pool,
            target_id,
            moderator_id,
            now,
        )
        .await?;
        repositories::papers::finish_review(pool, target_id, PaperStatus::Submitted, now).await?;
    }

    tracing::info!(
        moderator_id = %moderator_id,
        target_id = %target_id,
        action = "claim_release",
        "Moderation claim released"
    );

    Ok(released)
}

async fn holder_of(
    pool: &PgPool,
    target_type: ModerationTarget,
    target_id: &str,
) -> Result<Option<ModerationRecord>, WorkflowError> {
    Ok(repositories::moderation_records::active_claim_for(pool, target_type, target_id).await?)
}

async fn holder_name(pool: &PgPool, claim: &ModerationRecord) -> String {
    repositories::users::find_name_by_id(pool, &claim.moderator_id)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| claim.moderator_id.clone())
}
