use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn admin_provisions_instructor_who_can_login() {
    let ctx = test_support::setup_test_context().await;

    let admin =
        test_support::insert_platform_admin(ctx.state.db(), "useradmin01", "Admin", "admin-pass")
            .await;
    let token = test_support::bearer_token(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/users",
            Some(&token),
            Some(json!({
                "username": "newinstructor",
                "full_name": "New Instructor",
                "password": "instructor-pass",
                "role": "instructor"
            })),
        ))
        .await
        .expect("create user");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["role"], "instructor");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({
                "username": "newinstructor",
                "password": "instructor-pass"
            })),
        ))
        .await
        .expect("login");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    let access_token = body["access_token"].as_str().expect("token").to_string();

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/auth/me",
            Some(&access_token),
            None,
        ))
        .await
        .expect("me");
    let me = test_support::read_json(response).await;
    assert_eq!(me["username"], "newinstructor");
    assert_eq!(me["role"], "instructor");
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let ctx = test_support::setup_test_context().await;

    let admin =
        test_support::insert_platform_admin(ctx.state.db(), "useradmin02", "Admin", "admin-pass")
            .await;
    test_support::insert_moderator(ctx.state.db(), "takenname", "Existing", "mod-pass").await;
    let token = test_support::bearer_token(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/users",
            Some(&token),
            Some(json!({
                "username": "takenname",
                "full_name": "Duplicate",
                "password": "duplicate-pass",
                "role": "moderator"
            })),
        ))
        .await
        .expect("create duplicate user");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
}

#[tokio::test]
async fn non_admin_cannot_manage_users() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_instructor(ctx.state.db(), "useradmin03", "Instructor", "teach-pass")
            .await;
    let token = test_support::bearer_token(&instructor.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/users",
            Some(&token),
            Some(json!({
                "username": "sneaky",
                "full_name": "Sneaky",
                "password": "sneaky-pass",
                "role": "admin"
            })),
        ))
        .await
        .expect("create user as instructor");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
}

#[tokio::test]
async fn deactivated_user_cannot_authenticate() {
    let ctx = test_support::setup_test_context().await;

    let admin =
        test_support::insert_platform_admin(ctx.state.db(), "useradmin04", "Admin", "admin-pass")
            .await;
    let moderator =
        test_support::insert_moderator(ctx.state.db(), "leaving", "Leaving Mod", "mod-pass").await;
    let admin_token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let mod_token = test_support::bearer_token(&moderator.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/users/{}", moderator.id),
            Some(&admin_token),
            Some(json!({ "is_active": false })),
        ))
        .await
        .expect("deactivate user");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["is_active"], false);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/auth/me",
            Some(&mod_token),
            None,
        ))
        .await
        .expect("me as deactivated user");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
