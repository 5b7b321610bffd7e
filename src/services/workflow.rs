use thiserror::Error;

use crate::db::models::McqOption;
use crate::db::types::{PaperStatus, QuestionType};

/// Failures of the moderation workflow. Conflicts are routine outcomes and
/// carry the detail the caller needs to explain them (who holds the claim);
/// precondition violations are rejected before any state is mutated.
#[derive(Debug, Error)]
pub(crate) enum WorkflowError {
    #[error("already being reviewed by {by}")]
    AlreadyClaimed { by: String },
    #[error("paper is approved and can no longer change")]
    PaperFinalized,
    #[error("moderation record is already resolved")]
    AlreadyResolved,
    #[error("paper has not been submitted for review")]
    NotSubmitted,
    #[error("paper is not editable in its current status")]
    NotDraft,
    #[error("paper has no active questions")]
    EmptyPaper,
    #[error("only the paper's author may do this")]
    NotAuthor,
    #[error("caller does not hold the claim on this paper")]
    NotClaimedByModerator,
    #[error("paper must be claimed before its questions can be claimed")]
    PaperNotClaimedByModerator,
    #[error("rejection requires non-empty comments")]
    MissingComments,
    #[error("claim is held by another moderator")]
    NotOwner,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Papers may be submitted from `draft` or, after a rejection handed edit
/// rights back to the author, from `change_requested`.
pub(crate) fn ensure_submittable(status: PaperStatus) -> Result<(), WorkflowError> {
    match status {
        PaperStatus::Draft | PaperStatus::ChangeRequested => Ok(()),
        PaperStatus::Approved => Err(WorkflowError::PaperFinalized),
        PaperStatus::Submitted | PaperStatus::UnderReview => Err(WorkflowError::NotDraft),
    }
}

pub(crate) fn ensure_claimable(status: PaperStatus) -> Result<(), WorkflowError> {
    match status {
        PaperStatus::Submitted | PaperStatus::UnderReview => Ok(()),
        PaperStatus::Approved => Err(WorkflowError::PaperFinalized),
        PaperStatus::Draft | PaperStatus::ChangeRequested => Err(WorkflowError::NotSubmitted),
    }
}

pub(crate) fn author_may_edit(status: PaperStatus) -> bool {
    matches!(status, PaperStatus::Draft | PaperStatus::ChangeRequested)
}

pub(crate) fn require_comments(comments: &str) -> Result<&str, WorkflowError> {
    let trimmed = comments.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::MissingComments);
    }
    Ok(trimmed)
}

/// Any question-level rejection left standing in the current cycle dominates
/// the paper-level resolution.
pub(crate) fn aggregate_outcome(rejected_questions: i64) -> PaperStatus {
    if rejected_questions > 0 {
        PaperStatus::ChangeRequested
    } else {
        PaperStatus::Approved
    }
}

pub(crate) fn validate_options(
    question_type: QuestionType,
    options: &[McqOption],
) -> Result<(), String> {
    match question_type {
        QuestionType::Subjective => {
            if options.is_empty() {
                Ok(())
            } else {
                Err("Subjective questions must not carry options".to_string())
            }
        }
        QuestionType::Mcq => {
            if options.len() < 2 {
                return Err("MCQ questions require at least two options".to_string());
            }
            if options.iter().any(|option| option.text.trim().is_empty()) {
                return Err("MCQ option text must not be empty".to_string());
            }
            let correct = options.iter().filter(|option| option.is_correct).count();
            if correct != 1 {
                return Err("MCQ questions require exactly one correct option".to_string());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str, is_correct: bool) -> McqOption {
        McqOption { text: text.to_string(), is_correct }
    }

    #[test]
    fn submittable_from_draft_and_change_requested() {
        assert!(ensure_submittable(PaperStatus::Draft).is_ok());
        assert!(ensure_submittable(PaperStatus::ChangeRequested).is_ok());
    }

    #[test]
    fn submit_blocked_while_in_review_pipeline() {
        assert!(matches!(
            ensure_submittable(PaperStatus::Submitted),
            Err(WorkflowError::NotDraft)
        ));
        assert!(matches!(
            ensure_submittable(PaperStatus::UnderReview),
            Err(WorkflowError::NotDraft)
        ));
    }

    #[test]
    fn approved_is_absorbing_for_submit_and_claim() {
        assert!(matches!(
            ensure_submittable(PaperStatus::Approved),
            Err(WorkflowError::PaperFinalized)
        ));
        assert!(matches!(
            ensure_claimable(PaperStatus::Approved),
            Err(WorkflowError::PaperFinalized)
        ));
    }

    #[test]
    fn claimable_only_once_submitted() {
        assert!(ensure_claimable(PaperStatus::Submitted).is_ok());
        assert!(ensure_claimable(PaperStatus::UnderReview).is_ok());
        assert!(matches!(ensure_claimable(PaperStatus::Draft), Err(WorkflowError::NotSubmitted)));
        assert!(matches!(
            ensure_claimable(PaperStatus::ChangeRequested),
            Err(WorkflowError::NotSubmitted)
        ));
    }

    #[test]
    fn author_edit_rights_follow_status() {
        assert!(author_may_edit(PaperStatus::Draft));
        assert!(author_may_edit(PaperStatus::ChangeRequested));
        assert!(!author_may_edit(PaperStatus::Submitted));
        assert!(!author_may_edit(PaperStatus::UnderReview));
        assert!(!author_may_edit(PaperStatus::Approved));
    }

    #[test]
    fn comments_must_not_be_blank() {
        assert!(matches!(require_comments(""), Err(WorkflowError::MissingComments)));
        assert!(matches!(require_comments("   \t"), Err(WorkflowError::MissingComments)));
        assert_eq!(require_comments("  fix Q2 ").unwrap(), "fix Q2");
    }

    #[test]
    fn question_rejections_dominate_aggregate() {
        assert_eq!(aggregate_outcome(0), PaperStatus::Approved);
        assert_eq!(aggregate_outcome(1), PaperStatus::ChangeRequested);
        assert_eq!(aggregate_outcome(3), PaperStatus::ChangeRequested);
    }

    #[test]
    fn subjective_questions_reject_options() {
        assert!(validate_options(QuestionType::Subjective, &[]).is_ok());
        assert!(validate_options(QuestionType::Subjective, &[option("a", true)]).is_err());
    }

    #[test]
    fn mcq_requires_two_options_and_one_correct() {
        assert!(validate_options(QuestionType::Mcq, &[option("a", true)]).is_err());
        assert!(
            validate_options(QuestionType::Mcq, &[option("a", false), option("b", false)]).is_err()
        );
        assert!(
            validate_options(QuestionType::Mcq, &[option("a", true), option("b", true)]).is_err()
        );
        assert!(validate_options(QuestionType::Mcq, &[option("a", true), option("", false)])
            .is_err());
        assert!(
            validate_options(QuestionType::Mcq, &[option("a", true), option("b", false)]).is_ok()
        );
    }
}
