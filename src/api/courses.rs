use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_role, CurrentAdmin, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::course::{
    CourseCreate, CourseOutcomeCreate, CourseOutcomeResponse, CourseOutcomeUpdate, CourseResponse,
    CourseUpdate,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:course_id", axum::routing::patch(update_course).delete(delete_course))
        .route("/:course_id/outcomes", get(list_outcomes).post(create_outcome))
        .route(
            "/:course_id/outcomes/:outcome_id",
            axum::routing::patch(update_outcome).delete(delete_outcome),
        )
}

async fn create_course(
    CurrentAdmin(admin): CurrentAdmin,
    state: State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let code = payload.code.trim();
    let existing = repositories::courses::exists_by_code(state.db(), code)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing course"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Course with this code already exists".to_string()));
    }

    let now = primitive_now_utc();
    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            code,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            is_active: true,
            created_by: &admin.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn list_courses(
    CurrentUser(_user): CurrentUser,
    state: State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list_active(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn update_course(
    Path(course_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    state: State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    if course.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    repositories::courses::update(
        state.db(),
        &course_id,
        repositories::courses::UpdateCourse {
            title: payload.title,
            description: payload.description,
            is_active: payload.is_active,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course"))?;

    let updated = repositories::courses::fetch_one_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated course"))?;

    Ok(Json(CourseResponse::from_db(updated)))
}

async fn delete_course(
    Path(course_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    state: State<AppState>,
) -> Result<StatusCode, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    if course.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let deleted = repositories::courses::delete(state.db(), &course_id).await.map_err(|e| {
        if is_foreign_key_violation(&e) {
            ApiError::Conflict("Cannot delete course due dependent records".to_string())
        } else {
            ApiError::internal(e, "Failed to delete course")
        }
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    tracing::info!(
        admin_id = %admin.id,
        course_id = %course_id,
        action = "course_delete",
        "Admin deleted course"
    );

    Ok(StatusCode::NO_CONTENT)
}

async fn list_outcomes(
    Path(course_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    state: State<AppState>,
) -> Result<Json<Vec<CourseOutcomeResponse>>, ApiError> {
    let outcomes = repositories::course_outcomes::list_for_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list course outcomes"))?;

    Ok(Json(outcomes.into_iter().map(CourseOutcomeResponse::from_db).collect()))
}

async fn create_outcome(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Json(payload): Json<CourseOutcomeCreate>,
) -> Result<(StatusCode, Json<CourseOutcomeResponse>), ApiError> {
    require_role(&user, UserRole::Instructor)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    if course.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let now = primitive_now_utc();
    let outcome = repositories::course_outcomes::create(
        state.db(),
        repositories::course_outcomes::CreateCourseOutcome {
            id: &Uuid::new_v4().to_string(),
            course_id: &course_id,
            code: payload.code.trim(),
            description: payload.description.trim(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Course outcome with this code already exists".to_string())
        } else {
            ApiError::internal(e, "Failed to create course outcome")
        }
    })?;

    Ok((StatusCode::CREATED, Json(CourseOutcomeResponse::from_db(outcome))))
}

async fn update_outcome(
    Path((course_id, outcome_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
    Json(payload): Json<CourseOutcomeUpdate>,
) -> Result<Json<CourseOutcomeResponse>, ApiError> {
    require_role(&user, UserRole::Instructor)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let outcome = repositories::course_outcomes::find_by_id(state.db(), &course_id, &outcome_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course outcome"))?;

    if outcome.is_none() {
        return Err(ApiError::NotFound("Course outcome not found".to_string()));
    }

    repositories::course_outcomes::update(
        state.db(),
        &course_id,
        &outcome_id,
        repositories::course_outcomes::UpdateCourseOutcome {
            code: payload.code,
            description: payload.description,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course outcome"))?;

    let updated = repositories::course_outcomes::find_by_id(state.db(), &course_id, &outcome_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated course outcome"))?
        .ok_or_else(|| ApiError::Internal("Course outcome missing after update".to_string()))?;

    Ok(Json(CourseOutcomeResponse::from_db(updated)))
}

async fn delete_outcome(
    Path((course_id, outcome_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    state: State<AppState>,
) -> Result<StatusCode, ApiError> {
    require_role(&user, UserRole::Instructor)?;

    let deleted = repositories::course_outcomes::delete(state.db(), &course_id, &outcome_id)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                ApiError::Conflict("Course outcome is referenced by questions".to_string())
            } else {
                ApiError::internal(e, "Failed to delete course outcome")
            }
        })?;

    if !deleted {
        return Err(ApiError::NotFound("Course outcome not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some("23503"),
        _ => false,
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some("23505"),
        _ => false,
    }
}
