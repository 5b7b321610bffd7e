use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::ModerationRecord;
use crate::db::types::{ModerationTarget, RecordStatus};

#[derive(Debug, Deserialize)]
pub(crate) struct ApproveRequest {
    #[serde(default)]
    pub(crate) comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectRequest {
    pub(crate) comments: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModerationRecordResponse {
    pub(crate) id: String,
    pub(crate) target_type: ModerationTarget,
    pub(crate) target_id: String,
    pub(crate) paper_id: String,
    pub(crate) moderator_id: String,
    pub(crate) status: RecordStatus,
    pub(crate) comments: Option<String>,
    pub(crate) claimed_at: String,
    pub(crate) resolved_at: Option<String>,
}

impl ModerationRecordResponse {
    pub(crate) fn from_db(record: ModerationRecord) -> Self {
        Self {
            id: record.id,
            target_type: record.target_type,
            target_id: record.target_id,
            paper_id: record.paper_id,
            moderator_id: record.moderator_id,
            status: record.status,
            comments: record.comments,
            claimed_at: format_primitive(record.claimed_at),
            resolved_at: record.resolved_at.map(format_primitive),
        }
    }
}
