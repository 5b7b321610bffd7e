use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{
    ModerationTarget, PaperStatus, QuestionStatus, QuestionType, RecordStatus, UserRole,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) hashed_password: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) code: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_by: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseOutcome {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) code: String,
    pub(crate) description: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Paper {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) author_id: String,
    pub(crate) status: PaperStatus,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct McqOption {
    pub(crate) text: String,
    pub(crate) is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: String,
    pub(crate) paper_id: String,
    pub(crate) content: String,
    pub(crate) question_type: QuestionType,
    pub(crate) marks: Option<i32>,
    pub(crate) co_id: Option<String>,
    pub(crate) status: QuestionStatus,
    pub(crate) sequence_number: i32,
    pub(crate) options: Json<Vec<McqOption>>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ModerationRecord {
    pub(crate) id: String,
    pub(crate) target_type: ModerationTarget,
    pub(crate) target_id: String,
    pub(crate) paper_id: String,
    pub(crate) moderator_id: String,
    pub(crate) status: RecordStatus,
    pub(crate) comments: Option<String>,
    pub(crate) claimed_at: PrimitiveDateTime,
    pub(crate) resolved_at: Option<PrimitiveDateTime>,
}
