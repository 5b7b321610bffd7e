use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{McqOption, Question};
use crate::db::types::{QuestionStatus, QuestionType};

const COLUMNS: &str = "\
    id, paper_id, content, question_type, marks, co_id, status, sequence_number, \
    options, created_at, updated_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    paper_id: &str,
    id: &str,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions WHERE paper_id = $1 AND id = $2"
    ))
    .bind(paper_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_active_by_id(
    pool: &PgPool,
    paper_id: &str,
    id: &str,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions WHERE paper_id = $1 AND id = $2 AND status = $3"
    ))
    .bind(paper_id)
    .bind(id)
    .bind(QuestionStatus::Active)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_active_by_paper(
    pool: &PgPool,
    paper_id: &str,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions
         WHERE paper_id = $1 AND status = $2
         ORDER BY sequence_number, created_at"
    ))
    .bind(paper_id)
    .bind(QuestionStatus::Active)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_active(pool: &PgPool, paper_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE paper_id = $1 AND status = $2")
        .bind(paper_id)
        .bind(QuestionStatus::Active)
        .fetch_one(pool)
        .await
}

pub(crate) struct CreateQuestion<'a> {
    pub id: &'a str,
    pub paper_id: &'a str,
    pub content: &'a str,
    pub question_type: QuestionType,
    pub marks: Option<i32>,
    pub co_id: Option<&'a str>,
    pub options: Vec<McqOption>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateQuestion<'_>,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (
            id, paper_id, content, question_type, marks, co_id, status, sequence_number,
            options, created_at, updated_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7,
            (SELECT COALESCE(MAX(sequence_number), 0) + 1 FROM questions WHERE paper_id = $2),
            $8, $9, $10
        )
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.paper_id)
    .bind(params.content)
    .bind(params.question_type)
    .bind(params.marks)
    .bind(params.co_id)
    .bind(QuestionStatus::Active)
    .bind(Json(params.options))
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateQuestion {
    pub content: Option<String>,
    pub question_type: Option<QuestionType>,
    pub marks: Option<Option<i32>>,
    pub co_id: Option<Option<String>>,
    pub options: Option<Vec<McqOption>>,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    paper_id: &str,
    id: &str,
    params: UpdateQuestion,
) -> Result<bool, sqlx::Error> {
    // Double-optional fields distinguish "leave as is" from "set to null".
    let result = sqlx::query(
        "UPDATE questions SET
            content = COALESCE($1, content),
            question_type = COALESCE($2, question_type),
            marks = CASE WHEN $3 THEN $4 ELSE marks END,
            co_id = CASE WHEN $5 THEN $6 ELSE co_id END,
            options = COALESCE($7, options),
            updated_at = $8
         WHERE paper_id = $9 AND id = $10 AND status = $11",
    )
    .bind(params.content)
    .bind(params.question_type)
    .bind(params.marks.is_some())
    .bind(params.marks.flatten())
    .bind(params.co_id.is_some())
    .bind(params.co_id.flatten())
    .bind(params.options.map(Json))
    .bind(params.updated_at)
    .bind(paper_id)
    .bind(id)
    .bind(QuestionStatus::Active)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn soft_delete(
    pool: &PgPool,
    paper_id: &str,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE questions SET status = $1, updated_at = $2
         WHERE paper_id = $3 AND id = $4 AND status = $5",
    )
    .bind(QuestionStatus::Deleted)
    .bind(now)
    .bind(paper_id)
    .bind(id)
    .bind(QuestionStatus::Active)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_active_ids(
    pool: &PgPool,
    paper_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT id FROM questions WHERE paper_id = $1 AND status = $2 ORDER BY sequence_number",
    )
    .bind(paper_id)
    .bind(QuestionStatus::Active)
    .fetch_all(pool)
    .await
}

pub(crate) async fn reorder(
    pool: &PgPool,
    paper_id: &str,
    ordered_ids: &[String],
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE questions AS q
         SET sequence_number = u.ord::int, updated_at = $3
         FROM UNNEST($2::text[]) WITH ORDINALITY AS u(id, ord)
         WHERE q.paper_id = $1 AND q.id = u.id",
    )
    .bind(paper_id)
    .bind(ordered_ids)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}
