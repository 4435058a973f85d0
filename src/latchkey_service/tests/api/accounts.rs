use latchkey_application::ProfileUpdate;
use latchkey_core::{AuthError, Role};

use crate::helpers::{TestApp, registration, secret};

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.register("alice@x.com", "Test#1234").await;

    let result = app
        .service
        .register(registration("ALICE@x.com", "Other#1"), &app.anonymous())
        .await;
    assert!(matches!(result, Err(AuthError::Conflict(_))));
}

#[tokio::test]
async fn owner_changes_password_and_is_notified() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;
    let login = app.login("alice@x.com", "Test#1234").await.unwrap();

    app.service
        .change_password(
            alice.id,
            secret("Test#1234"),
            secret("Changed#1"),
            &app.principal_for(&login),
        )
        .await
        .unwrap();

    assert!(app.login("alice@x.com", "Changed#1").await.is_ok());
    let notice = app
        .email_client
        .last_sent_to(&alice.email)
        .await
        .unwrap();
    assert_eq!(notice.subject, "Your password was changed");
}

#[tokio::test]
async fn soft_deleted_account_is_locked_out() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;
    let login = app.login("alice@x.com", "Test#1234").await.unwrap();
    let (_, admin) = app.admin().await;

    app.service
        .delete_account(alice.id, false, &app.principal_for(&login))
        .await
        .unwrap();

    assert_eq!(
        app.login("alice@x.com", "Test#1234").await.unwrap_err(),
        AuthError::AccountDeleted
    );
    assert_eq!(
        app.service
            .find_account(alice.id, &app.principal_for(&login))
            .await
            .unwrap_err(),
        AuthError::NotFound
    );
    assert!(app.service.find_account(alice.id, &admin).await.is_ok());

    app.service
        .create_reset_request("alice@x.com", &app.anonymous())
        .await
        .unwrap();
    assert!(app.service.reset_requests().is_empty().await);

    let impersonated = app
        .service
        .login_as(&alice.id.to_string(), &admin)
        .await
        .unwrap();
    assert_eq!(impersonated.account.id, alice.id);
}

#[tokio::test]
async fn admin_hard_delete_removes_the_account() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;
    let (_, admin) = app.admin().await;

    app.service
        .delete_account(alice.id, true, &admin)
        .await
        .unwrap();

    assert_eq!(
        app.service.find_account(alice.id, &admin).await.unwrap_err(),
        AuthError::NotFound
    );
    assert_eq!(
        app.login("alice@x.com", "Test#1234").await.unwrap_err(),
        AuthError::Unauthenticated
    );
}

#[tokio::test]
async fn deleted_admin_token_loses_admin_rights() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;
    let (root, root_principal) = app.admin().await;
    let (_, ops_principal) = app.admin().await;

    app.service
        .delete_account(root.id, false, &ops_principal)
        .await
        .unwrap();

    assert_eq!(
        app.service
            .login_as(&alice.id.to_string(), &root_principal)
            .await
            .unwrap_err(),
        AuthError::Unauthorized
    );
    assert_eq!(
        app.service
            .delete_account(alice.id, true, &root_principal)
            .await
            .unwrap_err(),
        AuthError::Unauthenticated
    );
    assert!(app.service.find_account(alice.id, &ops_principal).await.is_ok());
}

#[tokio::test]
async fn demoted_admin_token_loses_admin_rights() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;
    let (root, root_principal) = app.admin().await;
    let (_, ops_principal) = app.admin().await;

    let demoted = app
        .service
        .update_account(
            root.id,
            ProfileUpdate {
                role: Some(Role::User),
                ..ProfileUpdate::default()
            },
            &ops_principal,
        )
        .await
        .unwrap();
    assert_eq!(demoted.role, Role::User);

    assert_eq!(
        app.service
            .login_as("alice@x.com", &root_principal)
            .await
            .unwrap_err(),
        AuthError::Unauthorized
    );
    assert_eq!(
        app.service
            .change_password(alice.id, None, secret("Hijacked#1"), &root_principal)
            .await
            .unwrap_err(),
        AuthError::Unauthorized
    );
    assert!(app.login("alice@x.com", "Test#1234").await.is_ok());
}

#[tokio::test]
async fn owner_cannot_promote_themselves() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;
    let login = app.login("alice@x.com", "Test#1234").await.unwrap();

    let profile = app
        .service
        .update_account(
            alice.id,
            ProfileUpdate {
                last_name: Some("Liddell".to_owned()),
                role: Some(Role::Admin),
                ..ProfileUpdate::default()
            },
            &app.principal_for(&login),
        )
        .await
        .unwrap();

    assert_eq!(profile.last_name, "Liddell");
    assert_eq!(profile.role, Role::User);
}

#[tokio::test]
async fn registration_sends_a_welcome_email() {
    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Test#1234").await;

    let welcome = app
        .email_client
        .last_sent_to(&alice.email)
        .await
        .unwrap();
    assert_eq!(welcome.subject, "Welcome!");
}
