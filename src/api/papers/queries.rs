use serde::Deserialize;

use crate::api::pagination::default_limit;
use crate::db::types::PaperStatus;

#[derive(Debug, Deserialize)]
pub(super) struct ListPapersQuery {
    #[serde(default)]
    #[serde(alias = "courseId")]
    pub(super) course_id: Option<String>,
    #[serde(default)]
    pub(super) status: Option<PaperStatus>,
    #[serde(default)]
    pub(super) skip: i64,
    #[serde(default = "default_limit")]
    pub(super) limit: i64,
}
