use std::{
    io,
    sync::{Arc, Mutex},
};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::helpers::{TestApp, secret};

/// Collects everything the fmt layer writes.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn logs_never_contain_passwords_tokens_or_codes() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = TestApp::new();
    let alice = app.register("alice@x.com", "Register#Pw1").await;

    let wrong = app.login("alice@x.com", "Wrong#Guess1").await;
    assert!(wrong.is_err());
    let login = app.login("alice@x.com", "Register#Pw1").await.unwrap();
    let token = login.token.expose().to_owned();
    let principal = app.principal_for(&login);
    assert!(app.service.check_token(&token).is_ok());

    let rejected = app
        .service
        .change_password(alice.id, secret("Wrong#Old3"), secret("Never#Pw9"), &principal)
        .await;
    assert!(rejected.is_err());
    app.service
        .change_password(alice.id, secret("Register#Pw1"), secret("Changed#Pw2"), &principal)
        .await
        .unwrap();

    app.service
        .create_reset_request("alice@x.com", &app.anonymous())
        .await
        .unwrap();
    let code = app.reset_code_for("alice@x.com").await.unwrap();
    let reset = app
        .service
        .use_reset_request(&code, secret("Reset#Pw4"), &app.anonymous())
        .await
        .unwrap();
    let reset_token = reset.token.expose().to_owned();
    let replay = app
        .service
        .use_reset_request(&code, secret("Replay#Pw5"), &app.anonymous())
        .await;
    assert!(replay.is_err());

    assert!(app.login("alice@x.com", "Reset#Pw4").await.is_ok());
    assert!(app.service.check_token("not-a-token").is_err());

    let captured = logs.contents();
    assert!(captured.contains("Login succeeded"));
    assert!(captured.contains("Password reset completed"));

    for sensitive in [
        "Register#Pw1",
        "Wrong#Guess1",
        "Wrong#Old3",
        "Never#Pw9",
        "Changed#Pw2",
        "Reset#Pw4",
        "Replay#Pw5",
        token.as_str(),
        reset_token.as_str(),
        code.as_str(),
        "integration-test-secret",
    ] {
        assert!(!captured.contains(sensitive), "log output leaked {sensitive:?}");
    }
}
