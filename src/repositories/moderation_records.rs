use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::ModerationRecord;
use crate::db::types::{ModerationTarget, QuestionStatus, RecordStatus};

const COLUMNS: &str = "\
    id, target_type, target_id, paper_id, moderator_id, status, comments, \
    claimed_at, resolved_at";

/// The partial unique index on (target_type, target_id) WHERE status = 'claimed'
/// rejects a second unresolved claim; callers match on this to turn the
/// violation into a routine conflict.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some("23505"),
        _ => false,
    }
}

pub(crate) struct CreateClaim<'a> {
    pub id: &'a str,
    pub target_type: ModerationTarget,
    pub target_id: &'a str,
    pub paper_id: &'a str,
    pub moderator_id: &'a str,
    pub claimed_at: PrimitiveDateTime,
}

pub(crate) async fn create_claim(
    pool: &PgPool,
    params: CreateClaim<'_>,
) -> Result<ModerationRecord, sqlx::Error> {
    sqlx::query_as::<_, ModerationRecord>(&format!(
        "INSERT INTO moderation_records (
            id, target_type, target_id, paper_id, moderator_id, status, claimed_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.target_type)
    .bind(params.target_id)
    .bind(params.paper_id)
    .bind(params.moderator_id)
    .bind(RecordStatus::Claimed)
    .bind(params.claimed_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<ModerationRecord>, sqlx::Error> {
    sqlx::query_as::<_, ModerationRecord>(&format!(
        "SELECT {COLUMNS} FROM moderation_records WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn active_claim_for(
    pool: &PgPool,
    target_type: ModerationTarget,
    target_id: &str,
) -> Result<Option<ModerationRecord>, sqlx::Error> {
    sqlx::query_as::<_, ModerationRecord>(&format!(
        "SELECT {COLUMNS} FROM moderation_records
         WHERE target_type = $1 AND target_id = $2 AND status = $3"
    ))
    .bind(target_type)
    .bind(target_id)
    .bind(RecordStatus::Claimed)
    .fetch_optional(pool)
    .await
}

/// Resolves a claimed record to a terminal status. Resolved records are
/// immutable; the status guard means a second resolution affects zero rows.
pub(crate) async fn resolve(
    pool: &PgPool,
    id: &str,
    status: RecordStatus,
    comments: Option<&str>,
    resolved_at: PrimitiveDateTime,
) -> Result<Option<ModerationRecord>, sqlx::Error> {
    sqlx::query_as::<_, ModerationRecord>(&format!(
        "UPDATE moderation_records
         SET status = $1, comments = COALESCE($2, comments), resolved_at = $3
         WHERE id = $4 AND status = $5
         RETURNING {COLUMNS}",
    ))
    .bind(status)
    .bind(comments)
    .bind(resolved_at)
    .bind(id)
    .bind(RecordStatus::Claimed)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn records_for_target(
    pool: &PgPool,
    target_type: ModerationTarget,
    target_id: &str,
) -> Result<Vec<ModerationRecord>, sqlx::Error> {
    sqlx::query_as::<_, ModerationRecord>(&format!(
        "SELECT {COLUMNS} FROM moderation_records
         WHERE target_type = $1 AND target_id = $2
         ORDER BY claimed_at DESC"
    ))
    .bind(target_type)
    .bind(target_id)
    .fetch_all(pool)
    .await
}

/// Full history for a paper: paper-level records plus question-level records
/// for its questions, newest first.
pub(crate) async fn records_for_paper(
    pool: &PgPool,
    paper_id: &str,
) -> Result<Vec<ModerationRecord>, sqlx::Error> {
    sqlx::query_as::<_, ModerationRecord>(&format!(
        "SELECT {COLUMNS} FROM moderation_records
         WHERE paper_id = $1
         ORDER BY claimed_at DESC"
    ))
    .bind(paper_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn claims_by_moderator(
    pool: &PgPool,
    moderator_id: &str,
    status: Option<RecordStatus>,
) -> Result<Vec<ModerationRecord>, sqlx::Error> {
    let mut builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(format!(
        "SELECT {COLUMNS} FROM moderation_records WHERE moderator_id = "
    ));
    builder.push_bind(moderator_id);

    if let Some(status) = status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }

    builder.push(" ORDER BY claimed_at DESC");

    builder.build_query_as::<ModerationRecord>().fetch_all(pool).await
}

/// Frees every question claim a moderator still holds on a paper, as part of
/// resolving or releasing the paper-level claim.
pub(crate) async fn release_question_claims(
    pool: &PgPool,
    paper_id: &str,
    moderator_id: &str,
    now: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE moderation_records
         SET status = $1, resolved_at = $2
         WHERE paper_id = $3
           AND moderator_id = $4
           AND target_type = $5
           AND status = $6",
    )
    .bind(RecordStatus::Released)
    .bind(now)
    .bind(paper_id)
    .bind(moderator_id)
    .bind(ModerationTarget::Question)
    .bind(RecordStatus::Claimed)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Latest resolved outcome per active question of the paper within the
/// current review cycle (records resolved at or after `since`). Superseded
/// outcomes and outcomes for soft-deleted questions are excluded.
pub(crate) async fn question_outcomes_since(
    pool: &PgPool,
    paper_id: &str,
    since: PrimitiveDateTime,
) -> Result<Vec<(String, RecordStatus)>, sqlx::Error> {
    sqlx::query_as::<_, (String, RecordStatus)>(
        "SELECT latest.target_id, latest.status
         FROM (
             SELECT DISTINCT ON (r.target_id) r.target_id, r.status
             FROM moderation_records r
             JOIN questions q ON q.id = r.target_id AND q.status = $4
             WHERE r.paper_id = $1
               AND r.target_type = $2
               AND r.status IN ($5, $6)
               AND r.resolved_at >= $3
             ORDER BY r.target_id, r.resolved_at DESC
         ) latest",
    )
    .bind(paper_id)
    .bind(ModerationTarget::Question)
    .bind(since)
    .bind(QuestionStatus::Active)
    .bind(RecordStatus::Approved)
    .bind(RecordStatus::Rejected)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_active_question_claims(
    pool: &PgPool,
    paper_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM moderation_records r
         JOIN questions q ON q.id = r.target_id AND q.status = $3
         WHERE r.paper_id = $1 AND r.target_type = $2 AND r.status = $4",
    )
    .bind(paper_id)
    .bind(ModerationTarget::Question)
    .bind(QuestionStatus::Active)
    .bind(RecordStatus::Claimed)
    .fetch_one(pool)
    .await
}
