use sqlx::PgPool;
use sqlx::{Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::Paper;
use crate::db::types::PaperStatus;

const COLUMNS: &str = "\
    id, course_id, title, author_id, status, submitted_at, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Paper>, sqlx::Error> {
    sqlx::query_as::<_, Paper>(&format!("SELECT {COLUMNS} FROM papers WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<Paper, sqlx::Error> {
    sqlx::query_as::<_, Paper>(&format!("SELECT {COLUMNS} FROM papers WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) struct CreatePaper<'a> {
    pub id: &'a str,
    pub course_id: &'a str,
    pub title: &'a str,
    pub author_id: &'a str,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreatePaper<'_>) -> Result<Paper, sqlx::Error> {
    sqlx::query_as::<_, Paper>(&format!(
        "INSERT INTO papers (id, course_id, title, author_id, status, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.author_id)
    .bind(PaperStatus::Draft)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update_title(
    pool: &PgPool,
    id: &str,
    title: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE papers SET title = $1, updated_at = $2 WHERE id = $3")
        .bind(title)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM papers WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}

/// Single-statement submit: only fires for an editable paper that still has
/// at least one active question. Zero rows affected means the caller must
/// re-fetch and classify the failure.
pub(crate) async fn submit(
    pool: &PgPool,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE papers
         SET status = $1, submitted_at = $2, updated_at = $2
         WHERE id = $3
           AND status IN ($4, $5)
           AND EXISTS (
               SELECT 1 FROM questions
               WHERE paper_id = $3 AND status = $6
           )",
    )
    .bind(PaperStatus::Submitted)
    .bind(now)
    .bind(id)
    .bind(PaperStatus::Draft)
    .bind(PaperStatus::ChangeRequested)
    .bind(crate::db::types::QuestionStatus::Active)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn mark_under_review(
    pool: &PgPool,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE papers SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
    )
    .bind(PaperStatus::UnderReview)
    .bind(now)
    .bind(id)
    .bind(PaperStatus::Submitted)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn finish_review(
    pool: &PgPool,
    id: &str,
    status: PaperStatus,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE papers SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .bind(PaperStatus::UnderReview)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[derive(Debug, Default)]
pub(crate) struct PaperFilter {
    pub author_id: Option<String>,
    pub course_id: Option<String>,
    pub status: Option<PaperStatus>,
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &PaperFilter,
    skip: i64,
    limit: i64,
) -> Result<Vec<Paper>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM papers WHERE TRUE"));
    push_filter(&mut builder, filter);

    builder.push(" ORDER BY created_at DESC OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<Paper>().fetch_all(pool).await
}

pub(crate) async fn count(pool: &PgPool, filter: &PaperFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM papers WHERE TRUE");
    push_filter(&mut builder, filter);

    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PaperFilter) {
    if let Some(author_id) = &filter.author_id {
        builder.push(" AND author_id = ");
        builder.push_bind(author_id.clone());
    }
    if let Some(course_id) = &filter.course_id {
        builder.push(" AND course_id = ");
        builder.push_bind(course_id.clone());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }
}

/// Moderation queue: submitted papers, oldest submission first.
pub(crate) async fn list_submitted(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Paper>, sqlx::Error> {
    sqlx::query_as::<_, Paper>(&format!(
        "SELECT {COLUMNS} FROM papers
         WHERE status = $1
         ORDER BY submitted_at ASC
         OFFSET $2 LIMIT $3",
    ))
    .bind(PaperStatus::Submitted)
    .bind(skip.max(0))
    .bind(limit.clamp(1, 1000))
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_submitted(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM papers WHERE status = $1")
        .bind(PaperStatus::Submitted)
        .fetch_one(pool)
        .await
}
