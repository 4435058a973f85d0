use fake::{Fake, faker::internet::en::SafeEmail, faker::name::en::FirstName};
use latchkey_adapters::{
    HashMapAccountStore, HashMapResetRequestStore, LatchkeySettings, MockEmailClient,
    config::email::FORGOT_PASSWORD_SUBJECT, telemetry::try_init_test_tracing,
};
use latchkey_application::{LoginCredentials, LoginOutcome, Registration};
use latchkey_core::{AccountProfile, AuthError, Email, RequestPrincipal, Role};
use latchkey_service::LatchkeyService;
use secrecy::Secret;

pub type Service = LatchkeyService<HashMapAccountStore, HashMapResetRequestStore, MockEmailClient>;

const TEST_SETTINGS: &str = r#"{
    "jwt": { "secret": "integration-test-secret" },
    "hasher": { "iterations": 1, "memory_in_kib": 1024, "parallelism": 1 },
    "reset": { "retry_backoff_in_millis": 1 }
}"#;

pub struct TestApp {
    pub service: Service,
    pub email_client: MockEmailClient,
}

impl TestApp {
    pub fn new() -> Self {
        try_init_test_tracing();

        let settings = LatchkeySettings::from_json(TEST_SETTINGS).expect("test settings");
        let email_client = MockEmailClient::new();
        let service =
            LatchkeyService::in_memory(&settings, email_client.clone()).expect("service");

        Self {
            service,
            email_client,
        }
    }

    pub fn anonymous(&self) -> RequestPrincipal {
        self.service.principal(None)
    }

    pub fn principal_for(&self, outcome: &LoginOutcome) -> RequestPrincipal {
        self.service
            .principal(Some(&format!("Bearer {}", outcome.token.expose())))
    }

    pub async fn register(&self, email: &str, password: &str) -> AccountProfile {
        self.service
            .register(registration(email, password), &self.anonymous())
            .await
            .expect("registration")
    }

    /// Provision an admin and return its authenticated principal.
    pub async fn admin(&self) -> (AccountProfile, RequestPrincipal) {
        let email = random_email();
        let profile = self
            .service
            .provision_account(registration(&email, "admin-pw"), Role::Admin)
            .await
            .expect("admin provisioning");
        let outcome = self.login(&email, "admin-pw").await.expect("admin login");
        (profile, self.principal_for(&outcome))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        self.service
            .login(LoginCredentials::new(email, password), &self.anonymous())
            .await
    }

    /// Code from the latest reset email sent to `email`.
    pub async fn reset_code_for(&self, email: &str) -> Option<String> {
        let recipient = Email::parse(email).ok()?;
        let outbox = self.email_client.outbox().await;
        let sent = outbox
            .iter()
            .rev()
            .find(|sent| sent.recipient == recipient && sent.subject == FORGOT_PASSWORD_SUBJECT)?;
        sent.content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .nth(2)
            .map(str::to_owned)
    }
}

pub fn registration(email: &str, password: &str) -> Registration {
    Registration {
        first_name: Some(FirstName().fake()),
        last_name: Some("Tester".to_owned()),
        email: Some(email.to_owned()),
        password: Some(Secret::new(password.to_owned())),
    }
}

pub fn secret(raw: &str) -> Option<Secret<String>> {
    Some(Secret::new(raw.to_owned()))
}

pub fn random_email() -> String {
    SafeEmail().fake()
}
