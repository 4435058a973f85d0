use std::sync::Arc;

use latchkey_core::{
    AccessToken, Account, AccountId, AccountProfile, AccountStore, AuthError, CredentialHasher,
    Email, RequestPrincipal, SessionClaims, TokenService,
};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::{
    authorization::{forbid_unauthenticated, live_admin},
    credentials::{required_password, verify_credential},
};

/// Raw login input. Either field may be absent.
#[derive(Debug, Default, Deserialize)]
pub struct LoginCredentials {
    pub email: Option<String>,
    pub password: Option<Secret<String>>,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(Secret::new(password.into())),
        }
    }
}

/// A sanitized account together with a freshly issued token.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub account: AccountProfile,
    pub token: AccessToken,
}

/// Orchestrates login, impersonation and token checks.
pub struct AuthenticationService<A, H, T> {
    accounts: A,
    hasher: Arc<H>,
    tokens: T,
}

impl<A, H, T> AuthenticationService<A, H, T>
where
    A: AccountStore,
    H: CredentialHasher + 'static,
    T: TokenService,
{
    pub fn new(accounts: A, hasher: Arc<H>, tokens: T) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
        }
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    pub fn hasher(&self) -> &Arc<H> {
        &self.hasher
    }

    /// Verify an email/password pair and issue a session token.
    #[tracing::instrument(
        name = "AuthenticationService::login",
        skip_all,
        fields(request_id = %principal.request_id())
    )]
    pub async fn login(
        &self,
        credentials: LoginCredentials,
        principal: &RequestPrincipal,
    ) -> Result<LoginOutcome, AuthError> {
        let LoginCredentials { email, password } = credentials;

        let Some(raw_email) = email.filter(|email| !email.trim().is_empty()) else {
            tracing::warn!("Login attempt without an email");
            return Err(AuthError::MissingField("email"));
        };
        let password = required_password(password, "password").inspect_err(|_| {
            tracing::warn!(email = %raw_email, "Login attempt without a password");
        })?;

        let Ok(email) = Email::parse(&raw_email) else {
            tracing::warn!("Login attempt with a malformed email");
            return Err(AuthError::Unauthenticated);
        };

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            tracing::warn!(%email, "Login attempt for an unregistered email");
            return Err(AuthError::Unauthenticated);
        };

        let matches =
            verify_credential(&self.hasher, account.credential().clone(), password).await?;
        if !matches {
            tracing::warn!(%email, account_id = %account.id(), "Login attempt with a wrong password");
            return Err(AuthError::Unauthorized);
        }

        if account.is_deleted() {
            tracing::warn!(
                %email,
                account_id = %account.id(),
                "Login attempt for a deleted account"
            );
            return Err(AuthError::AccountDeleted);
        }

        let token = self.issue_token(&account)?;
        tracing::info!(account_id = %account.id(), "Login succeeded");

        Ok(LoginOutcome {
            account: account.profile(),
            token,
        })
    }

    /// Issue a token for another account without its password. Admins only.
    ///
    /// `id_or_email` is treated as an account id when it is id-shaped and as
    /// an email otherwise. Soft-deleted targets are allowed.
    #[tracing::instrument(
        name = "AuthenticationService::login_as",
        skip_all,
        fields(request_id = %principal.request_id())
    )]
    pub async fn login_as(
        &self,
        id_or_email: &str,
        principal: &RequestPrincipal,
    ) -> Result<LoginOutcome, AuthError> {
        let admin = live_admin(&self.accounts, principal)
            .await
            .map_err(forbid_unauthenticated)
            .inspect_err(|_| {
                tracing::warn!(
                    requester = ?principal.account_id(),
                    "Non-admin attempted to log in as another account"
                );
            })?;

        let target = match AccountId::parse(id_or_email) {
            Some(id) => self.accounts.find_by_id(&id).await?,
            None => match Email::parse(id_or_email) {
                Ok(email) => self.accounts.find_by_email(&email).await?,
                Err(_) => None,
            },
        };

        let Some(target) = target else {
            tracing::warn!(
                admin_id = %admin.id(),
                "Admin attempted to log in as an unknown account"
            );
            return Err(AuthError::NotFound);
        };

        let token = self.issue_token(&target)?;
        tracing::info!(
            admin_id = %admin.id(),
            target_id = %target.id(),
            "Admin logged in as another account"
        );

        Ok(LoginOutcome {
            account: target.profile(),
            token,
        })
    }

    /// Verify a token and return its claims. Every failure is `Unauthenticated`.
    #[tracing::instrument(name = "AuthenticationService::check_token", skip_all)]
    pub fn check_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AuthError::Unauthenticated
        })
    }

    pub fn issue_token(&self, account: &Account) -> Result<AccessToken, AuthError> {
        Ok(self.tokens.issue(&account.session_claims())?)
    }
}
