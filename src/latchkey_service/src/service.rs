use std::sync::Arc;

use http::HeaderMap;
use latchkey_adapters::{
    Argon2CredentialHasher, EmailNotifier, HashMapAccountStore, HashMapResetRequestStore,
    JwtTokenService, LatchkeySettings, RandomResetCodeGenerator, SettingsError,
};
use latchkey_application::{
    AuthenticationService, AuthorizationGuard, ChangePasswordUseCase, DeleteAccountUseCase,
    FindAccountUseCase, LoginCredentials, LoginOutcome, ProfileUpdate, Registration, ResetPolicy,
    ResetWorkflowService, SignupUseCase, UpdateAccountUseCase,
};
use latchkey_core::{
    AccountId, AccountProfile, AccountStore, AuthError, EmailClient, HasherError,
    RequestPrincipal, ResetCode, ResetRequest, ResetRequestChanges, ResetRequestStore, Role,
    SessionClaims,
};
use secrecy::Secret;
use thiserror::Error;

type Auth<A> = AuthenticationService<A, Argon2CredentialHasher, JwtTokenService>;
type Resets<A, R, E> = ResetWorkflowService<
    A,
    Argon2CredentialHasher,
    JwtTokenService,
    R,
    RandomResetCodeGenerator,
    EmailNotifier<E>,
>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Invalid hasher parameters: {0}")]
    Hasher(#[from] HasherError),
}

/// Composition root of the credential and session core.
///
/// Wires the Argon2 hasher, the JWT token service and the random code
/// generator to caller-supplied stores and email client, and exposes every
/// operation a transport layer needs.
pub struct LatchkeyService<A, R, E> {
    auth: Arc<Auth<A>>,
    resets: Resets<A, R, E>,
    guard: AuthorizationGuard<JwtTokenService>,
    notifier: EmailNotifier<E>,
}

impl<E> LatchkeyService<HashMapAccountStore, HashMapResetRequestStore, E>
where
    E: EmailClient + Clone + 'static,
{
    /// Service backed by the in-memory stores.
    pub fn in_memory(settings: &LatchkeySettings, email_client: E) -> Result<Self, ServiceError> {
        Self::new(
            settings,
            HashMapAccountStore::new(),
            HashMapResetRequestStore::new(),
            email_client,
        )
    }
}

impl<A, R, E> LatchkeyService<A, R, E>
where
    A: AccountStore + 'static,
    R: ResetRequestStore + 'static,
    E: EmailClient + Clone + 'static,
{
    pub fn new(
        settings: &LatchkeySettings,
        accounts: A,
        requests: R,
        email_client: E,
    ) -> Result<Self, ServiceError> {
        let hasher = Arc::new(Argon2CredentialHasher::new(&settings.hasher)?);
        let tokens = JwtTokenService::from_settings(&settings.jwt);
        let notifier = EmailNotifier::new(email_client);

        let policy = ResetPolicy {
            lifetime: settings.reset.lifetime()?,
            max_code_attempts: settings.reset.max_code_attempts,
            retry_backoff: settings.reset.retry_backoff(),
        };

        let auth = Arc::new(AuthenticationService::new(accounts, hasher, tokens.clone()));
        let resets = ResetWorkflowService::new(
            Arc::clone(&auth),
            requests,
            RandomResetCodeGenerator::new(),
            notifier.clone(),
            policy,
        );

        tracing::info!(
            token_ttl_in_seconds = settings.jwt.time_to_live_in_seconds,
            reset_lifetime_in_minutes = settings.reset.lifetime()?.num_minutes(),
            "Latchkey service initialised"
        );

        Ok(Self {
            auth,
            resets,
            guard: AuthorizationGuard::new(tokens),
            notifier,
        })
    }

    pub fn accounts(&self) -> &A {
        self.auth.accounts()
    }

    pub fn reset_requests(&self) -> &R {
        self.resets.requests()
    }

    pub fn email_client(&self) -> &E {
        self.notifier.client()
    }

    /// Principal for a raw `Authorization` header value.
    pub fn principal(&self, authorization: Option<&str>) -> RequestPrincipal {
        self.guard.principal(authorization)
    }

    pub fn principal_from_headers(&self, headers: &HeaderMap) -> RequestPrincipal {
        self.guard.principal_from_headers(headers)
    }

    // Authentication

    pub async fn login(
        &self,
        credentials: LoginCredentials,
        principal: &RequestPrincipal,
    ) -> Result<LoginOutcome, AuthError> {
        self.auth.login(credentials, principal).await
    }

    pub async fn login_as(
        &self,
        id_or_email: &str,
        principal: &RequestPrincipal,
    ) -> Result<LoginOutcome, AuthError> {
        self.auth.login_as(id_or_email, principal).await
    }

    pub fn check_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.auth.check_token(token)
    }

    // Password reset

    pub async fn create_reset_request(
        &self,
        email: &str,
        principal: &RequestPrincipal,
    ) -> Result<(), AuthError> {
        self.resets.create_reset_request(email, principal).await
    }

    pub async fn get_reset_request(&self, code: &str) -> Result<ResetRequest, AuthError> {
        self.resets.find_by_code(&ResetCode::from(code)).await
    }

    pub async fn use_reset_request(
        &self,
        code: &str,
        new_password: Option<Secret<String>>,
        principal: &RequestPrincipal,
    ) -> Result<LoginOutcome, AuthError> {
        self.resets
            .use_code(&ResetCode::from(code), new_password, principal)
            .await
    }

    pub async fn update_reset_request(
        &self,
        code: &str,
        changes: ResetRequestChanges,
        principal: &RequestPrincipal,
    ) -> Result<ResetRequest, AuthError> {
        self.resets
            .update_by_admin(&ResetCode::from(code), changes, principal)
            .await
    }

    // Accounts

    pub async fn register(
        &self,
        registration: Registration,
        principal: &RequestPrincipal,
    ) -> Result<AccountProfile, AuthError> {
        SignupUseCase::new(self.auth.accounts(), self.auth.hasher(), &self.notifier)
            .execute(registration, Role::User, principal)
            .await
    }

    /// Create an account of any role outside of a request, e.g. the first
    /// admin at startup.
    pub async fn provision_account(
        &self,
        registration: Registration,
        role: Role,
    ) -> Result<AccountProfile, AuthError> {
        SignupUseCase::new(self.auth.accounts(), self.auth.hasher(), &self.notifier)
            .provision(registration, role)
            .await
    }

    pub async fn change_password(
        &self,
        account_id: AccountId,
        old_password: Option<Secret<String>>,
        new_password: Option<Secret<String>>,
        principal: &RequestPrincipal,
    ) -> Result<(), AuthError> {
        ChangePasswordUseCase::new(self.auth.accounts(), self.auth.hasher(), &self.notifier)
            .execute(account_id, old_password, new_password, principal)
            .await
    }

    pub async fn update_account(
        &self,
        account_id: AccountId,
        update: ProfileUpdate,
        principal: &RequestPrincipal,
    ) -> Result<AccountProfile, AuthError> {
        UpdateAccountUseCase::new(self.auth.accounts())
            .execute(account_id, update, principal)
            .await
    }

    pub async fn delete_account(
        &self,
        account_id: AccountId,
        hard: bool,
        principal: &RequestPrincipal,
    ) -> Result<AccountProfile, AuthError> {
        DeleteAccountUseCase::new(self.auth.accounts())
            .execute(account_id, hard, principal)
            .await
    }

    pub async fn find_account(
        &self,
        account_id: AccountId,
        principal: &RequestPrincipal,
    ) -> Result<AccountProfile, AuthError> {
        FindAccountUseCase::new(self.auth.accounts())
            .execute(account_id, principal)
            .await
    }
}
