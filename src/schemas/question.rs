use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{McqOption, Question};
use crate::db::types::{QuestionStatus, QuestionType};

#[derive(Debug, Clone, Deserialize, Validate)]
pub(crate) struct McqOptionPayload {
    #[validate(length(min = 1, message = "option text must not be empty"))]
    pub(crate) text: String,
    #[serde(default)]
    #[serde(alias = "isCorrect")]
    pub(crate) is_correct: bool,
}

impl McqOptionPayload {
    pub(crate) fn into_db(self) -> McqOption {
        McqOption { text: self.text, is_correct: self.is_correct }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionCreate {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub(crate) content: String,
    #[serde(alias = "type", alias = "questionType")]
    pub(crate) question_type: QuestionType,
    #[serde(default)]
    #[validate(range(min = 0, message = "marks must be non-negative"))]
    pub(crate) marks: Option<i32>,
    #[serde(default)]
    #[serde(alias = "coId")]
    pub(crate) co_id: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) options: Vec<McqOptionPayload>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub(crate) content: Option<String>,
    #[serde(default)]
    #[serde(alias = "type", alias = "questionType")]
    pub(crate) question_type: Option<QuestionType>,
    #[serde(default)]
    #[validate(range(min = 0, message = "marks must be non-negative"))]
    pub(crate) marks: Option<i32>,
    #[serde(default)]
    #[serde(alias = "clearMarks")]
    pub(crate) clear_marks: bool,
    #[serde(default)]
    #[serde(alias = "coId")]
    pub(crate) co_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "clearCoId")]
    pub(crate) clear_co_id: bool,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) options: Option<Vec<McqOptionPayload>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionReorderRequest {
    #[serde(alias = "questionIds")]
    pub(crate) question_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct McqOptionResponse {
    pub(crate) text: String,
    pub(crate) is_correct: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: String,
    pub(crate) paper_id: String,
    pub(crate) content: String,
    pub(crate) question_type: QuestionType,
    pub(crate) marks: Option<i32>,
    pub(crate) co_id: Option<String>,
    pub(crate) status: QuestionStatus,
    pub(crate) sequence_number: i32,
    pub(crate) options: Vec<McqOptionResponse>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: Question) -> Self {
        Self {
            id: question.id,
            paper_id: question.paper_id,
            content: question.content,
            question_type: question.question_type,
            marks: question.marks,
            co_id: question.co_id,
            status: question.status,
            sequence_number: question.sequence_number,
            options: question
                .options
                .0
                .into_iter()
                .map(|option| McqOptionResponse {
                    text: option.text,
                    is_correct: option.is_correct,
                })
                .collect(),
            created_at: format_primitive(question.created_at),
            updated_at: format_primitive(question.updated_at),
        }
    }
}
