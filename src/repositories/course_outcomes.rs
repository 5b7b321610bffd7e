use sqlx::PgPool;

use crate::db::models::CourseOutcome;

const COLUMNS: &str = "id, course_id, code, description, created_at, updated_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    course_id: &str,
    id: &str,
) -> Result<Option<CourseOutcome>, sqlx::Error> {
    sqlx::query_as::<_, CourseOutcome>(&format!(
        "SELECT {COLUMNS} FROM course_outcomes WHERE course_id = $1 AND id = $2"
    ))
    .bind(course_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<CourseOutcome>, sqlx::Error> {
    sqlx::query_as::<_, CourseOutcome>(&format!(
        "SELECT {COLUMNS} FROM course_outcomes WHERE course_id = $1 ORDER BY code"
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateCourseOutcome<'a> {
    pub id: &'a str,
    pub course_id: &'a str,
    pub code: &'a str,
    pub description: &'a str,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateCourseOutcome<'_>,
) -> Result<CourseOutcome, sqlx::Error> {
    sqlx::query_as::<_, CourseOutcome>(&format!(
        "INSERT INTO course_outcomes (id, course_id, code, description, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.code)
    .bind(params.description)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateCourseOutcome {
    pub code: Option<String>,
    pub description: Option<String>,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    course_id: &str,
    id: &str,
    params: UpdateCourseOutcome,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE course_outcomes SET
            code = COALESCE($1, code),
            description = COALESCE($2, description),
            updated_at = $3
         WHERE course_id = $4 AND id = $5",
    )
    .bind(params.code)
    .bind(params.description)
    .bind(params.updated_at)
    .bind(course_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, course_id: &str, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM course_outcomes WHERE course_id = $1 AND id = $2")
        .bind(course_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
