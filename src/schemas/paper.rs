use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Paper;
use crate::db::types::PaperStatus;
use crate::schemas::moderation::ModerationRecordResponse;
use crate::schemas::question::QuestionResponse;
use crate::services::paper_lifecycle::ReviewSummary;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PaperCreate {
    #[serde(alias = "courseId")]
    pub(crate) course_id: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PaperUpdate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaperResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) author_id: String,
    pub(crate) status: PaperStatus,
    pub(crate) submitted_at: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl PaperResponse {
    pub(crate) fn from_db(paper: Paper) -> Self {
        Self {
            id: paper.id,
            course_id: paper.course_id,
            title: paper.title,
            author_id: paper.author_id,
            status: paper.status,
            submitted_at: paper.submitted_at.map(format_primitive),
            created_at: format_primitive(paper.created_at),
            updated_at: format_primitive(paper.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PaperDetailResponse {
    #[serde(flatten)]
    pub(crate) paper: PaperResponse,
    pub(crate) questions: Vec<QuestionResponse>,
}

/// Live review projection: coarse status from the paper row, sub-status
/// derived from the moderation ledger.
#[derive(Debug, Serialize)]
pub(crate) struct PaperStatusResponse {
    pub(crate) paper_id: String,
    pub(crate) status: PaperStatus,
    pub(crate) active_claim: Option<ModerationRecordResponse>,
    pub(crate) total_questions: i64,
    pub(crate) approved_questions: i64,
    pub(crate) rejected_questions: i64,
    pub(crate) claimed_questions: i64,
}

impl PaperStatusResponse {
    pub(crate) fn from_summary(paper_id: String, summary: ReviewSummary) -> Self {
        Self {
            paper_id,
            status: summary.status,
            active_claim: summary.active_claim.map(ModerationRecordResponse::from_db),
            total_questions: summary.total_questions,
            approved_questions: summary.approved_questions,
            rejected_questions: summary.rejected_questions,
            claimed_questions: summary.claimed_questions,
        }
    }
}

/// Everything the external PDF renderer needs: paper metadata plus the
/// finalized, ordered question list.
#[derive(Debug, Serialize)]
pub(crate) struct PaperExportResponse {
    pub(crate) paper_id: String,
    pub(crate) title: String,
    pub(crate) status: PaperStatus,
    pub(crate) course_code: String,
    pub(crate) course_title: String,
    pub(crate) author_name: String,
    pub(crate) submitted_at: Option<String>,
    pub(crate) questions: Vec<QuestionResponse>,
}
