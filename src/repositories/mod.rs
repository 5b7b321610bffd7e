pub(crate) mod course_outcomes;
pub(crate) mod courses;
pub(crate) mod moderation_records;
pub(crate) mod papers;
pub(crate) mod questions;
pub(crate) mod users;
