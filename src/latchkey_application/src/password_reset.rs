use std::{sync::Arc, time::Duration as StdDuration};

use chrono::{DateTime, Duration, Utc};
use latchkey_core::{
    AccountChanges, AccountStore, AuthError, CredentialHasher, Email, Notifier, RequestPrincipal,
    ResetCode, ResetCodeGenerator, ResetRequest, ResetRequestChanges, ResetRequestStore,
    ResetRequestStoreError, ResetStatus, TokenService,
};
use secrecy::Secret;

use crate::{
    authentication::{AuthenticationService, LoginOutcome},
    authorization::{forbid_unauthenticated, live_admin},
    credentials::{generate_credential, required_password},
};

/// Tunables of the forgot-password workflow.
#[derive(Debug, Clone)]
pub struct ResetPolicy {
    /// How long a freshly created request stays valid.
    pub lifetime: Duration,
    /// Insert attempts before a code collision is surfaced as a conflict.
    pub max_code_attempts: u32,
    /// Base delay between insert attempts, multiplied by the attempt number.
    pub retry_backoff: StdDuration,
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self {
            lifetime: Duration::days(1),
            max_code_attempts: 3,
            retry_backoff: StdDuration::from_millis(10),
        }
    }
}

/// Read a request by code and apply lazy expiry.
///
/// A `valid` request past its `valid_until` is flipped to `invalid` and
/// persisted before being returned. The write is conditional on the stored
/// status still being `valid`; if another task got there first the stored
/// state is re-read and returned instead.
pub async fn read_with_lazy_expiry<R>(
    store: &R,
    code: &ResetCode,
    now: DateTime<Utc>,
) -> Result<Option<ResetRequest>, ResetRequestStoreError>
where
    R: ResetRequestStore + ?Sized,
{
    let Some(mut request) = store.find_by_code(code).await? else {
        return Ok(None);
    };

    if !request.expire_if_stale(now) {
        return Ok(Some(request));
    }

    if store.save_if_status(&request, ResetStatus::Valid).await? {
        tracing::info!(
            account_id = %request.account().reference,
            "Reset request expired on read"
        );
        Ok(Some(request))
    } else {
        store.find_by_code(code).await
    }
}

/// The forgot-password state machine.
pub struct ResetWorkflowService<A, H, T, R, G, N> {
    auth: Arc<AuthenticationService<A, H, T>>,
    requests: R,
    codes: G,
    notifier: N,
    policy: ResetPolicy,
}

impl<A, H, T, R, G, N> ResetWorkflowService<A, H, T, R, G, N>
where
    A: AccountStore,
    H: CredentialHasher + 'static,
    T: TokenService,
    R: ResetRequestStore,
    G: ResetCodeGenerator,
    N: Notifier,
{
    pub fn new(
        auth: Arc<AuthenticationService<A, H, T>>,
        requests: R,
        codes: G,
        notifier: N,
        policy: ResetPolicy,
    ) -> Self {
        Self {
            auth,
            requests,
            codes,
            notifier,
            policy,
        }
    }

    pub fn requests(&self) -> &R {
        &self.requests
    }

    /// Open a reset request for `email` and send its code.
    ///
    /// Unknown, malformed and soft-deleted emails produce `Ok(None)` with no
    /// persistence and no notification.
    #[tracing::instrument(
        name = "ResetWorkflowService::create",
        skip_all,
        fields(request_id = %principal.request_id())
    )]
    pub async fn create(
        &self,
        email: &str,
        principal: &RequestPrincipal,
    ) -> Result<Option<ResetRequest>, AuthError> {
        let Ok(email) = Email::parse(email) else {
            tracing::info!("Reset requested for a malformed email");
            return Ok(None);
        };

        let account = match self.auth.accounts().find_by_email(&email).await? {
            Some(account) if !account.is_deleted() => account,
            Some(account) => {
                tracing::info!(account_id = %account.id(), "Reset requested for a deleted account");
                return Ok(None);
            }
            None => {
                tracing::info!(%email, "Reset requested for an unregistered email");
                return Ok(None);
            }
        };

        let mut attempt = 1;
        let request = loop {
            let request = ResetRequest::builder()
                .account(&account)
                .build(self.codes.generate(), self.policy.lifetime, Utc::now())
                .map_err(|e| AuthError::Internal(e.to_string()))?;

            match self.requests.insert(request.clone()).await {
                Ok(()) => break request,
                Err(ResetRequestStoreError::CodeConflict)
                    if attempt < self.policy.max_code_attempts =>
                {
                    tracing::warn!(attempt, "Reset code collision, retrying");
                    tokio::time::sleep(self.policy.retry_backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, attempt, "Failed to store reset request");
                    return Err(e.into());
                }
            }
        };

        if let Err(e) = self
            .notifier
            .send_forgot_password_code(&account.profile(), request.code())
            .await
        {
            tracing::error!(
                error = %e,
                account_id = %account.id(),
                "Failed to send forgot password code"
            );
        }

        tracing::info!(account_id = %account.id(), valid_until = %request.valid_until(), "Reset request created");
        Ok(Some(request))
    }

    /// The caller-facing variant of [`Self::create`]: always `Ok(())` unless a
    /// collaborator failed.
    pub async fn create_reset_request(
        &self,
        email: &str,
        principal: &RequestPrincipal,
    ) -> Result<(), AuthError> {
        self.create(email, principal).await.map(|_| ())
    }

    #[tracing::instrument(name = "ResetWorkflowService::find_by_code", skip_all)]
    pub async fn find_by_code(&self, code: &ResetCode) -> Result<ResetRequest, AuthError> {
        read_with_lazy_expiry(&self.requests, code, Utc::now())
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Consume a code, set a new password and log the account in.
    #[tracing::instrument(
        name = "ResetWorkflowService::use_code",
        skip_all,
        fields(request_id = %principal.request_id())
    )]
    pub async fn use_code(
        &self,
        code: &ResetCode,
        new_password: Option<Secret<String>>,
        principal: &RequestPrincipal,
    ) -> Result<LoginOutcome, AuthError> {
        let password = required_password(new_password, "password")?;
        let now = Utc::now();

        let request = read_with_lazy_expiry(&self.requests, code, now)
            .await?
            .filter(|request| request.is_valid_at(now));
        let Some(mut request) = request else {
            tracing::warn!("Reset attempted with an unusable code");
            return Err(AuthError::InvalidResetCode);
        };

        let account_id = request.account().reference;
        let account = match self.auth.accounts().find_by_id(&account_id).await? {
            Some(account) if !account.is_deleted() => account,
            _ => {
                tracing::warn!(%account_id, "Reset attempted for a missing account");
                return Err(AuthError::NotFound);
            }
        };

        let credential = generate_credential(self.auth.hasher(), password).await?;

        request
            .mark_used(now)
            .map_err(|_| AuthError::InvalidResetCode)?;
        if !self
            .requests
            .save_if_status(&request, ResetStatus::Valid)
            .await?
        {
            tracing::warn!(%account_id, "Reset code consumed concurrently");
            return Err(AuthError::InvalidResetCode);
        }

        let account = self
            .auth
            .accounts()
            .update(&account.id(), AccountChanges::credential(credential))
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    %account_id,
                    valid_until = %request.valid_until(),
                    "Reset request consumed but the new password was not stored; a new code must be issued"
                );
            })?;

        if let Err(e) = self.notifier.send_password_changed(&account.profile()).await {
            tracing::error!(error = %e, %account_id, "Failed to send password changed notice");
        }

        let token = self.auth.issue_token(&account)?;
        tracing::info!(%account_id, "Password reset completed");

        Ok(LoginOutcome {
            account: account.profile(),
            token,
        })
    }

    /// Direct edit of a request by an admin. Bypasses the `use` transition.
    #[tracing::instrument(
        name = "ResetWorkflowService::update_by_admin",
        skip_all,
        fields(request_id = %principal.request_id())
    )]
    pub async fn update_by_admin(
        &self,
        code: &ResetCode,
        changes: ResetRequestChanges,
        principal: &RequestPrincipal,
    ) -> Result<ResetRequest, AuthError> {
        let admin_id = live_admin(self.auth.accounts(), principal)
            .await
            .map_err(forbid_unauthenticated)?
            .id();

        let mut request = read_with_lazy_expiry(&self.requests, code, Utc::now())
            .await?
            .ok_or(AuthError::NotFound)?;
        let status = request.status();
        request.apply_admin_changes(changes);

        if !self.requests.save_if_status(&request, status).await? {
            return Err(AuthError::Conflict(
                "reset request changed concurrently".to_owned(),
            ));
        }

        tracing::info!(
            %admin_id,
            account_id = %request.account().reference,
            valid_until = %request.valid_until(),
            "Admin updated reset request"
        );
        Ok(request)
    }
}
