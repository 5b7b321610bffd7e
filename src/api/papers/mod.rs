mod helpers;
mod manage;
mod queries;
mod questions;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(manage::create_paper).get(manage::list_papers))
        .route(
            "/:paper_id",
            get(manage::get_paper).patch(manage::update_paper).delete(manage::delete_paper),
        )
        .route("/:paper_id/submit", post(manage::submit_paper))
        .route("/:paper_id/status", get(manage::paper_status))
        .route("/:paper_id/records", get(manage::paper_records))
        .route("/:paper_id/export", get(manage::export_paper))
        .route("/:paper_id/questions", post(questions::add_question))
        .route("/:paper_id/questions/order", put(questions::reorder_questions))
        .route(
            "/:paper_id/questions/:question_id",
            axum::routing::patch(questions::update_question).delete(questions::delete_question),
        )
}
