use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::models::User;
use crate::test_support::{self, TestContext};

async fn seed_submitted_paper(ctx: &TestContext, tag: &str) -> (String, User, String) {
    let author = test_support::insert_instructor(
        ctx.state.db(),
        &format!("author_{tag}"),
        "Paper Author",
        "teach-pass",
    )
    .await;
    let course = test_support::insert_course(
        ctx.state.db(),
        &format!("CRS-{tag}"),
        "Course Under Review",
        &author.id,
    )
    .await;
    let paper =
        test_support::insert_paper(ctx.state.db(), &course.id, &author.id, "Paper Under Review")
            .await;
    test_support::insert_question(ctx.state.db(), &paper.id, "<p>State the pumping lemma.</p>")
        .await;
    test_support::insert_question(ctx.state.db(), &paper.id, "<p>Prove closure under union.</p>")
        .await;

    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/papers/{}/submit", paper.id),
            Some(&author_token),
            None,
        ))
        .await
        .expect("submit paper");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["status"], "submitted");

    (paper.id, author, author_token)
}

#[tokio::test]
async fn happy_path_submit_claim_approve() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, author_token) = seed_submitted_paper(&ctx, "happy").await;

    let moderator =
        test_support::insert_moderator(ctx.state.db(), "mod_happy", "Mina Moderator", "mod-pass")
            .await;
    let mod_token = test_support::bearer_token(&moderator.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claim paper");
    let status = response.status();
    let record = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {record}");
    assert_eq!(record["status"], "claimed");
    assert_eq!(record["moderator_id"], moderator.id.as_str());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/papers/{paper_id}/status"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("paper status");
    let projection = test_support::read_json(response).await;
    assert_eq!(projection["status"], "under_review");
    assert_eq!(projection["active_claim"]["moderator_id"], moderator.id.as_str());
    assert_eq!(projection["total_questions"], 2);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/approve"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("approve paper");
    let status = response.status();
    let paper = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {paper}");
    assert_eq!(paper["status"], "approved");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/papers/{paper_id}/records"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("paper records");
    let records = test_support::read_json(response).await;
    let records = records.as_array().expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], "approved");
}

#[tokio::test]
async fn second_claim_conflicts_and_names_holder() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, _author_token) = seed_submitted_paper(&ctx, "conflict").await;

    let first =
        test_support::insert_moderator(ctx.state.db(), "mod_first", "Maria Holder", "mod-pass")
            .await;
    let second =
        test_support::insert_moderator(ctx.state.db(), "mod_second", "Sam Second", "mod-pass")
            .await;
    let first_token = test_support::bearer_token(&first.id, ctx.state.settings());
    let second_token = test_support::bearer_token(&second.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&first_token),
            None,
        ))
        .await
        .expect("first claim");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&second_token),
            None,
        ))
        .await
        .expect("second claim");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
    assert!(body["detail"].as_str().unwrap_or("").contains("Maria Holder"));
}

#[tokio::test]
async fn concurrent_claims_grant_exactly_one() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, _author_token) = seed_submitted_paper(&ctx, "race").await;

    let first =
        test_support::insert_moderator(ctx.state.db(), "mod_race1", "Racer One", "mod-pass").await;
    let second =
        test_support::insert_moderator(ctx.state.db(), "mod_race2", "Racer Two", "mod-pass").await;
    let first_token = test_support::bearer_token(&first.id, ctx.state.settings());
    let second_token = test_support::bearer_token(&second.id, ctx.state.settings());

    let uri = format!("/api/v1/moderation/papers/{paper_id}/claim");
    let (first_response, second_response) = tokio::join!(
        ctx.app.clone().oneshot(test_support::json_request(
            Method::POST,
            &uri,
            Some(&first_token),
            None,
        )),
        ctx.app.clone().oneshot(test_support::json_request(
            Method::POST,
            &uri,
            Some(&second_token),
            None,
        )),
    );

    let statuses =
        [first_response.expect("first claim").status(), second_response.expect("second claim").status()];
    assert!(statuses.contains(&StatusCode::CREATED), "statuses: {statuses:?}");
    assert!(statuses.contains(&StatusCode::CONFLICT), "statuses: {statuses:?}");
}

#[tokio::test]
async fn reclaim_by_holder_is_idempotent() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, _author_token) = seed_submitted_paper(&ctx, "reclaim").await;

    let moderator =
        test_support::insert_moderator(ctx.state.db(), "mod_reclaim", "Repeat Claimer", "mod-pass")
            .await;
    let mod_token = test_support::bearer_token(&moderator.id, ctx.state.settings());
    let uri = format!("/api/v1/moderation/papers/{paper_id}/claim");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, &uri, Some(&mod_token), None))
        .await
        .expect("first claim");
    let first = test_support::read_json(response).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::POST, &uri, Some(&mod_token), None))
        .await
        .expect("second claim");
    let status = response.status();
    let second = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {second}");
    assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn rejection_requires_comments() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, _author_token) = seed_submitted_paper(&ctx, "comments").await;

    let moderator =
        test_support::insert_moderator(ctx.state.db(), "mod_comments", "Moderator", "mod-pass")
            .await;
    let mod_token = test_support::bearer_token(&moderator.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claim paper");
    assert_eq!(response.status(), StatusCode::CREATED);

    for comments in ["", "   \t"] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/moderation/papers/{paper_id}/reject"),
                Some(&mod_token),
                Some(json!({ "comments": comments })),
            ))
            .await
            .expect("reject without comments");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert!(body["detail"].as_str().unwrap_or("").contains("comments"));
    }

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/reject"),
            Some(&mod_token),
            Some(json!({ "comments": "Fix question 2" })),
        ))
        .await
        .expect("reject with comments");
    let status = response.status();
    let paper = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {paper}");
    assert_eq!(paper["status"], "change_requested");
}

#[tokio::test]
async fn change_cycle_preserves_question_set() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, author_token) = seed_submitted_paper(&ctx, "cycle").await;

    let moderator =
        test_support::insert_moderator(ctx.state.db(), "mod_cycle", "Moderator", "mod-pass").await;
    let mod_token = test_support::bearer_token(&moderator.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/papers/{paper_id}"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("paper before cycle");
    let before = test_support::read_json(response).await;
    let ids_before: Vec<String> = before["questions"]
        .as_array()
        .expect("questions")
        .iter()
        .map(|question| question["id"].as_str().expect("id").to_string())
        .collect();
    let first_question = ids_before[0].clone();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claim paper");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/reject"),
            Some(&mod_token),
            Some(json!({ "comments": "Tighten the wording of Q1" })),
        ))
        .await
        .expect("reject paper");
    assert_eq!(response.status(), StatusCode::OK);

    // The change_requested transition hands edit rights back to the author.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/papers/{paper_id}/questions/{first_question}"),
            Some(&author_token),
            Some(json!({ "content": "<p>State the pumping lemma precisely.</p>" })),
        ))
        .await
        .expect("revise question");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/papers/{paper_id}/submit"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("resubmit paper");
    let status = response.status();
    let resubmitted = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {resubmitted}");
    assert_eq!(resubmitted["status"], "submitted");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/papers/{paper_id}"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("paper after cycle");
    let after = test_support::read_json(response).await;
    let ids_after: Vec<String> = after["questions"]
        .as_array()
        .expect("questions")
        .iter()
        .map(|question| question["id"].as_str().expect("id").to_string())
        .collect();
    assert_eq!(ids_before, ids_after);

    // The old claim is history, not an active hold.
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/papers/{paper_id}/status"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("status after cycle");
    let projection = test_support::read_json(response).await;
    assert_eq!(projection["status"], "submitted");
    assert!(projection["active_claim"].is_null());
}

#[tokio::test]
async fn approved_paper_is_absorbing() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, author_token) = seed_submitted_paper(&ctx, "absorb").await;

    let moderator =
        test_support::insert_moderator(ctx.state.db(), "mod_absorb", "Moderator", "mod-pass").await;
    let other =
        test_support::insert_moderator(ctx.state.db(), "mod_absorb2", "Other", "mod-pass").await;
    let mod_token = test_support::bearer_token(&moderator.id, ctx.state.settings());
    let other_token = test_support::bearer_token(&other.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claim paper");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/approve"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("approve paper");
    assert_eq!(response.status(), StatusCode::OK);

    let attempts = [
        test_support::json_request(
            Method::POST,
            &format!("/api/v1/papers/{paper_id}/submit"),
            Some(&author_token),
            None,
        ),
        test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&other_token),
            None,
        ),
        test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/approve"),
            Some(&mod_token),
            None,
        ),
        test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/reject"),
            Some(&mod_token),
            Some(json!({ "comments": "too late" })),
        ),
    ];

    for request in attempts {
        let response = ctx.app.clone().oneshot(request).await.expect("mutate approved paper");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
        assert!(body["detail"].as_str().unwrap_or("").contains("approved"));
    }
}

#[tokio::test]
async fn question_claim_requires_paper_claim() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, author_token) = seed_submitted_paper(&ctx, "subclaim").await;

    let moderator =
        test_support::insert_moderator(ctx.state.db(), "mod_subclaim", "Moderator", "mod-pass")
            .await;
    let mod_token = test_support::bearer_token(&moderator.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/papers/{paper_id}"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("paper detail");
    let detail = test_support::read_json(response).await;
    let question_id = detail["questions"][0]["id"].as_str().expect("question id").to_string();

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/questions/{question_id}/claim"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claim question without paper claim");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
}

#[tokio::test]
async fn question_rejection_dominates_paper_approval() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, author_token) = seed_submitted_paper(&ctx, "dominate").await;

    let moderator =
        test_support::insert_moderator(ctx.state.db(), "mod_dominate", "Moderator", "mod-pass")
            .await;
    let mod_token = test_support::bearer_token(&moderator.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/papers/{paper_id}"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("paper detail");
    let detail = test_support::read_json(response).await;
    let question_id = detail["questions"][0]["id"].as_str().expect("question id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claim paper");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/questions/{question_id}/claim"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claim question");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/questions/{question_id}/reject"),
            Some(&mod_token),
            Some(json!({ "comments": "Ambiguous statement" })),
        ))
        .await
        .expect("reject question");
    let status = response.status();
    let record = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {record}");
    assert_eq!(record["status"], "rejected");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/approve"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("approve paper with rejected question");
    let status = response.status();
    let paper = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {paper}");
    assert_eq!(paper["status"], "change_requested");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/papers/{paper_id}/status"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("status projection");
    let projection = test_support::read_json(response).await;
    assert_eq!(projection["rejected_questions"], 1);
}

#[tokio::test]
async fn release_returns_paper_to_queue() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, author_token) = seed_submitted_paper(&ctx, "release").await;

    let first =
        test_support::insert_moderator(ctx.state.db(), "mod_release1", "First", "mod-pass").await;
    let second =
        test_support::insert_moderator(ctx.state.db(), "mod_release2", "Second", "mod-pass").await;
    let first_token = test_support::bearer_token(&first.id, ctx.state.settings());
    let second_token = test_support::bearer_token(&second.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&first_token),
            None,
        ))
        .await
        .expect("first claim");
    assert_eq!(response.status(), StatusCode::CREATED);

    // A non-holder cannot release someone else's claim.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/release"),
            Some(&second_token),
            None,
        ))
        .await
        .expect("release by non-holder");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/release"),
            Some(&first_token),
            None,
        ))
        .await
        .expect("release by holder");
    let status = response.status();
    let record = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {record}");
    assert_eq!(record["status"], "released");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/papers/{paper_id}/status"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("status after release");
    let projection = test_support::read_json(response).await;
    assert_eq!(projection["status"], "submitted");
    assert!(projection["active_claim"].is_null());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&second_token),
            None,
        ))
        .await
        .expect("second moderator claims after release");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn deleted_question_cannot_be_claimed() {
    let ctx = test_support::setup_test_context().await;

    let author = test_support::insert_instructor(
        ctx.state.db(),
        "author_deleted",
        "Author",
        "teach-pass",
    )
    .await;
    let course =
        test_support::insert_course(ctx.state.db(), "CRS-deleted", "Course", &author.id).await;
    let paper =
        test_support::insert_paper(ctx.state.db(), &course.id, &author.id, "Paper").await;
    test_support::insert_question(ctx.state.db(), &paper.id, "<p>Kept</p>").await;
    let doomed = test_support::insert_question(ctx.state.db(), &paper.id, "<p>Doomed</p>").await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/papers/{}/questions/{}", paper.id, doomed.id),
            Some(&author_token),
            None,
        ))
        .await
        .expect("soft delete question");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/papers/{}/submit", paper.id),
            Some(&author_token),
            None,
        ))
        .await
        .expect("submit paper");
    assert_eq!(response.status(), StatusCode::OK);

    let moderator =
        test_support::insert_moderator(ctx.state.db(), "mod_deleted", "Moderator", "mod-pass")
            .await;
    let mod_token = test_support::bearer_token(&moderator.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{}/claim", paper.id),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claim paper");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{}/questions/{}/claim", paper.id, doomed.id),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claim deleted question");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
}

#[tokio::test]
async fn moderation_endpoints_require_moderator_role() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, author_token) = seed_submitted_paper(&ctx, "role").await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("claim as instructor");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
}

#[tokio::test]
async fn queue_lists_submitted_papers_and_claims_listing_tracks_moderator() {
    let ctx = test_support::setup_test_context().await;
    let (paper_id, _author, _author_token) = seed_submitted_paper(&ctx, "queue").await;

    let moderator =
        test_support::insert_moderator(ctx.state.db(), "mod_queue", "Moderator", "mod-pass").await;
    let mod_token = test_support::bearer_token(&moderator.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/moderation/queue",
            Some(&mod_token),
            None,
        ))
        .await
        .expect("queue");
    let queue = test_support::read_json(response).await;
    assert_eq!(queue["total_count"], 1);
    assert_eq!(queue["items"][0]["id"], paper_id.as_str());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/moderation/papers/{paper_id}/claim"),
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claim paper");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/moderation/claims?status=claimed",
            Some(&mod_token),
            None,
        ))
        .await
        .expect("claims listing");
    let claims = test_support::read_json(response).await;
    let claims = claims.as_array().expect("claims");
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["target_id"], paper_id.as_str());
}
