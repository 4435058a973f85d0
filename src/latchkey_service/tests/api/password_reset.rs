use chrono::{Duration, Utc};
use latchkey_core::{AuthError, ResetRequestChanges, ResetStatus};

use crate::helpers::{TestApp, random_email, secret};

#[tokio::test]
async fn reset_flow_replaces_the_password() {
    let app = TestApp::new();
    app.register("alice@x.com", "Test#1234").await;

    app.service
        .create_reset_request("alice@x.com", &app.anonymous())
        .await
        .unwrap();
    assert_eq!(app.service.reset_requests().len().await, 1);

    let code = app.reset_code_for("alice@x.com").await.unwrap();
    let request = app.service.get_reset_request(&code).await.unwrap();
    assert_eq!(request.status(), ResetStatus::Valid);

    let outcome = app
        .service
        .use_reset_request(&code, secret("NewPass1"), &app.anonymous())
        .await
        .unwrap();
    assert!(app.service.check_token(outcome.token.expose()).is_ok());

    assert!(app.login("alice@x.com", "NewPass1").await.is_ok());
    assert_eq!(
        app.login("alice@x.com", "Test#1234").await.unwrap_err(),
        AuthError::Unauthorized
    );

    let used = app.service.get_reset_request(&code).await.unwrap();
    assert_eq!(used.status(), ResetStatus::Used);
    assert!(used.used_on().is_some());
}

#[tokio::test]
async fn expired_request_reads_as_invalid_and_cannot_be_used() {
    let app = TestApp::new();
    app.register("alice@x.com", "Test#1234").await;
    let (_, admin) = app.admin().await;

    app.service
        .create_reset_request("alice@x.com", &app.anonymous())
        .await
        .unwrap();
    let code = app.reset_code_for("alice@x.com").await.unwrap();

    let changes = ResetRequestChanges {
        valid_until: Some(Utc::now() - Duration::seconds(1)),
    };
    app.service
        .update_reset_request(&code, changes, &admin)
        .await
        .unwrap();

    let request = app.service.get_reset_request(&code).await.unwrap();
    assert_eq!(request.status(), ResetStatus::Invalid);

    let result = app
        .service
        .use_reset_request(&code, secret("x"), &app.anonymous())
        .await;
    assert_eq!(result.unwrap_err(), AuthError::InvalidResetCode);
    assert!(app.login("alice@x.com", "Test#1234").await.is_ok());
}

#[tokio::test]
async fn unknown_and_known_emails_look_the_same() {
    let app = TestApp::new();
    app.register("alice@x.com", "Test#1234").await;
    let stranger = random_email();

    let unknown = app
        .service
        .create_reset_request(&stranger, &app.anonymous())
        .await;
    let known = app
        .service
        .create_reset_request("alice@x.com", &app.anonymous())
        .await;

    assert_eq!(unknown, Ok(()));
    assert_eq!(known, Ok(()));
    assert_eq!(app.service.reset_requests().len().await, 1);
    assert!(app.reset_code_for(&stranger).await.is_none());
    assert!(app.reset_code_for("alice@x.com").await.is_some());
}

#[tokio::test]
async fn a_code_is_consumed_at_most_once() {
    let app = TestApp::new();
    app.register("alice@x.com", "Test#1234").await;
    app.service
        .create_reset_request("alice@x.com", &app.anonymous())
        .await
        .unwrap();
    let code = app.reset_code_for("alice@x.com").await.unwrap();

    app.service
        .use_reset_request(&code, secret("First#1"), &app.anonymous())
        .await
        .unwrap();
    let second = app
        .service
        .use_reset_request(&code, secret("Second#2"), &app.anonymous())
        .await;

    assert_eq!(second.unwrap_err(), AuthError::InvalidResetCode);
    assert!(app.login("alice@x.com", "First#1").await.is_ok());
    assert!(app.login("alice@x.com", "Second#2").await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_use_of_one_code_has_a_single_winner() {
    let app = TestApp::new();
    app.register("alice@x.com", "Test#1234").await;
    app.service
        .create_reset_request("alice@x.com", &app.anonymous())
        .await
        .unwrap();
    let code = app.reset_code_for("alice@x.com").await.unwrap();
    let principal = app.anonymous();

    let (a, b) = tokio::join!(
        app.service
            .use_reset_request(&code, secret("PassA#1"), &principal),
        app.service
            .use_reset_request(&code, secret("PassB#2"), &principal),
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(AuthError::InvalidResetCode)))
    );
}

#[tokio::test]
async fn unknown_code_is_not_found_on_read_and_invalid_on_use() {
    let app = TestApp::new();

    assert_eq!(
        app.service.get_reset_request("no-such-code").await.unwrap_err(),
        AuthError::NotFound
    );
    assert_eq!(
        app.service
            .use_reset_request("no-such-code", secret("x"), &app.anonymous())
            .await
            .unwrap_err(),
        AuthError::InvalidResetCode
    );
}

#[tokio::test]
async fn only_admins_update_requests() {
    let app = TestApp::new();
    app.register("alice@x.com", "Test#1234").await;
    let alice = app.login("alice@x.com", "Test#1234").await.unwrap();
    app.service
        .create_reset_request("alice@x.com", &app.anonymous())
        .await
        .unwrap();
    let code = app.reset_code_for("alice@x.com").await.unwrap();

    let result = app
        .service
        .update_reset_request(&code, ResetRequestChanges::default(), &app.principal_for(&alice))
        .await;
    assert_eq!(result.unwrap_err(), AuthError::Unauthorized);
}
