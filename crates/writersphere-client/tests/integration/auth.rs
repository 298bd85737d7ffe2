//! Sign-up, sign-in, refresh, and sign-out against a mock auth API.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};
use writersphere_client::{Error, SignUpResponse};
use writersphere_core::{Role, UserId};

use crate::common::{ANON_KEY, TestHarness, far_future, session, session_json};

#[tokio::test]
async fn test_sign_up_with_session_signs_in() {
    let harness = TestHarness::new().await;
    let user = UserId::new();

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(header("apikey", ANON_KEY))
        .and(body_json(json!({
            "email": "w@example.com",
            "password": "hunter22",
            "data": { "role": "writer" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json(
            user,
            "fresh",
            far_future(),
        )))
        .expect(1)
        .mount(&harness.server)
        .await;

    let mut rx = harness.client.subscribe();
    let response = harness
        .client
        .auth()
        .sign_up("w@example.com", "hunter22", Role::Writer)
        .await
        .unwrap();

    assert!(matches!(response, SignUpResponse::Session(_)));
    assert_eq!(response.user().id, user);
    assert!(rx.has_changed().unwrap());
    assert_eq!(
        rx.borrow_and_update().as_ref().map(|s| s.access_token.clone()),
        Some("fresh".to_string())
    );
    assert!(harness.store().load().unwrap().is_some());
}

#[tokio::test]
async fn test_sign_up_requiring_confirmation() {
    let harness = TestHarness::new().await;
    let user = UserId::new();

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": user.to_string(),
            "email": "r@example.com",
            "user_metadata": { "role": "reader" },
            "confirmation_sent_at": "2026-01-01T00:00:00Z"
        })))
        .mount(&harness.server)
        .await;

    let response = harness
        .client
        .auth()
        .sign_up("r@example.com", "hunter22", Role::Reader)
        .await
        .unwrap();

    match &response {
        SignUpResponse::ConfirmationRequired(u) => assert_eq!(u.role(), Some(Role::Reader)),
        SignUpResponse::Session(_) => unreachable!("no session expected"),
    }
    assert!(harness.client.current_session().is_none());
}

#[tokio::test]
async fn test_sign_up_existing_email_reports_backend_message() {
    let harness = TestHarness::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 422,
            "error_code": "user_already_exists",
            "msg": "User already registered"
        })))
        .mount(&harness.server)
        .await;

    let err = harness
        .client
        .auth()
        .sign_up("w@example.com", "hunter22", Role::Writer)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "User already registered");
}

#[tokio::test]
async fn test_sign_in_with_password() {
    let harness = TestHarness::new().await;
    let user = UserId::new();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json(
            user,
            "signed-in",
            far_future(),
        )))
        .mount(&harness.server)
        .await;

    let session = harness
        .client
        .auth()
        .sign_in_with_password("w@example.com", "hunter22")
        .await
        .unwrap();
    assert_eq!(session.user_id(), user);
    assert_eq!(session.role(), Some(Role::Writer));
    assert_eq!(harness.client.current_session(), Some(session));
}

#[tokio::test]
async fn test_bad_credentials() {
    let harness = TestHarness::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&harness.server)
        .await;

    let err = harness
        .client
        .auth()
        .sign_in_with_password("w@example.com", "nope")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert!(harness.client.current_session().is_none());
}

#[tokio::test]
async fn test_expired_session_is_refreshed() {
    let user = UserId::new();
    let harness = TestHarness::with_session(session(user, "stale", 0)).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({ "refresh_token": "stale-refresh" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json(
            user,
            "renewed",
            far_future(),
        )))
        .expect(1)
        .mount(&harness.server)
        .await;

    let current = harness.client.auth().session().await.unwrap().unwrap();
    assert_eq!(current.access_token, "renewed");
    assert_eq!(
        harness.store().load().unwrap().unwrap().access_token,
        "renewed"
    );
}

#[tokio::test]
async fn test_rejected_refresh_signs_out() {
    let harness = TestHarness::with_session(session(UserId::new(), "stale", 0)).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .mount(&harness.server)
        .await;

    assert!(harness.client.auth().session().await.unwrap().is_none());
    assert!(harness.store().load().unwrap().is_none());
    let err = harness.client.auth().require_session().await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));
}

#[tokio::test]
async fn test_sign_out_revokes_and_clears() {
    let harness = TestHarness::signed_in(UserId::new()).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&harness.server)
        .await;

    let mut rx = harness.client.subscribe();
    harness.client.auth().sign_out().await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_none());
    assert!(harness.store().load().unwrap().is_none());
}

#[tokio::test]
async fn test_sign_out_with_revoked_token_still_clears() {
    let harness = TestHarness::signed_in(UserId::new()).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "msg": "invalid JWT" })))
        .mount(&harness.server)
        .await;

    harness.client.auth().sign_out().await.unwrap();
    assert!(harness.client.current_session().is_none());
}

#[tokio::test]
async fn test_get_user() {
    let user = UserId::new();
    let harness = TestHarness::signed_in(user).await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": user.to_string(),
            "email": "writer@example.com",
            "user_metadata": { "role": "writer" }
        })))
        .mount(&harness.server)
        .await;

    let fetched = harness.client.auth().user().await.unwrap();
    assert_eq!(fetched.id, user);
    assert_eq!(fetched.role(), Some(Role::Writer));
}
