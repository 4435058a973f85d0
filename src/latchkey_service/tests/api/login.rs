use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use latchkey_core::{AccountId, AuthError};

use crate::helpers::{TestApp, random_email};

#[tokio::test]
async fn login_returns_a_token_for_the_account() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;

    let outcome = app.login("alice@x.com", "Test#1234").await.unwrap();
    let claims = app.service.check_token(outcome.token.expose()).unwrap();

    assert_eq!(claims.account_id, alice.id);
    assert_eq!(outcome.account.id, alice.id);
    assert_eq!(
        app.login("alice@x.com", "wrong").await.unwrap_err(),
        AuthError::Unauthorized
    );
}

#[tokio::test]
async fn login_profile_never_carries_the_credential() {
    let app = TestApp::new();
    app.register("alice@x.com", "Test#1234").await;

    let outcome = app.login("alice@x.com", "Test#1234").await.unwrap();
    let json = serde_json::to_value(&outcome.account).unwrap();

    assert!(json.get("credential").is_none());
    assert!(json.get("salt").is_none());
    assert!(json.get("digest").is_none());
}

#[tokio::test]
async fn login_with_unknown_email_is_unauthenticated() {
    let app = TestApp::new();
    let result = app.login(&random_email(), "whatever").await;
    assert_eq!(result.unwrap_err(), AuthError::Unauthenticated);
}

#[tokio::test]
async fn check_token_rejects_garbage() {
    let app = TestApp::new();
    assert_eq!(
        app.service.check_token("definitely.not.valid").unwrap_err(),
        AuthError::Unauthenticated
    );
}

#[tokio::test]
async fn admin_can_log_in_as_another_account() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;
    let (admin, principal) = app.admin().await;

    let outcome = app
        .service
        .login_as(&alice.id.to_string(), &principal)
        .await
        .unwrap();
    let claims = app.service.check_token(outcome.token.expose()).unwrap();

    assert_eq!(claims.account_id, alice.id);
    assert_ne!(claims.account_id, admin.id);
}

#[tokio::test]
async fn login_as_boundaries() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;
    let bob = app.register("bob@x.com", "Bob#1234").await;
    let bob_login = app.login("bob@x.com", "Bob#1234").await.unwrap();
    let bob_principal = app.principal_for(&bob_login);
    let (_, admin) = app.admin().await;

    for target in [alice.id.to_string(), AccountId::new().to_string()] {
        let result = app.service.login_as(&target, &bob_principal).await;
        assert_eq!(result.unwrap_err(), AuthError::Unauthorized);
    }

    let by_email = app.service.login_as("bob@x.com", &admin).await.unwrap();
    assert_eq!(by_email.account.id, bob.id);

    let missing = app
        .service
        .login_as(&AccountId::new().to_string(), &admin)
        .await;
    assert_eq!(missing.unwrap_err(), AuthError::NotFound);
}

#[tokio::test]
async fn principal_is_resolved_from_request_headers() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;
    let outcome = app.login("alice@x.com", "Test#1234").await.unwrap();

    let mut headers = HeaderMap::new();
    let principal = app.service.principal_from_headers(&headers);
    assert!(!principal.is_authenticated());

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", outcome.token.expose())).unwrap(),
    );
    let principal = app.service.principal_from_headers(&headers);
    assert_eq!(principal.account_id(), Some(alice.id));
    assert!(!principal.is_admin());
}
