mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/queue", get(handlers::queue))
        .route("/claims", get(handlers::my_claims))
        .route("/records", get(handlers::records))
        .route("/papers/:paper_id/claim", post(handlers::claim_paper))
        .route("/papers/:paper_id/approve", post(handlers::approve_paper))
        .route("/papers/:paper_id/reject", post(handlers::reject_paper))
        .route("/papers/:paper_id/release", post(handlers::release_paper))
        .route(
            "/papers/:paper_id/questions/:question_id/claim",
            post(handlers::claim_question),
        )
        .route(
            "/papers/:paper_id/questions/:question_id/approve",
            post(handlers::approve_question),
        )
        .route(
            "/papers/:paper_id/questions/:question_id/reject",
            post(handlers::reject_question),
        )
        .route(
            "/papers/:paper_id/questions/:question_id/release",
            post(handlers::release_question),
        )
}

#[cfg(test)]
mod tests;
