//! Session and credential handling tests.

mod common;

use campus_board::core::error::AppError;
use campus_board::core::types::{CreateUserRequest, LoginRequest};

use common::{register_user, test_state, TEST_PASSWORD};

#[tokio::test]
async fn register_rejects_duplicate_usernames() {
    let state = test_state().await;
    register_user(&state, "alice").await;

    let err = state
        .auth_service
        .register(CreateUserRequest {
            username: "alice".to_string(),
            email: Some("other@example.com".to_string()),
            password: "another".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let state = test_state().await;
    register_user(&state, "alice").await;

    let err = state
        .auth_service
        .login(LoginRequest {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));

    let err = state
        .auth_service
        .login(LoginRequest {
            username: "nobody".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test]
async fn session_tokens_round_trip_until_logout() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;

    let (user, session) = state
        .auth_service
        .login(LoginRequest {
            username: "alice".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.id, alice.id);

    let resolved = state
        .auth_service
        .validate_session(&session.token)
        .await
        .unwrap();
    assert_eq!(resolved.id, alice.id);

    state.auth_service.logout(&session.token).await.unwrap();

    let err = state
        .auth_service
        .validate_session(&session.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test]
async fn unknown_tokens_are_rejected() {
    let state = test_state().await;

    let err = state
        .auth_service
        .validate_session("not-a-real-token")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
}
