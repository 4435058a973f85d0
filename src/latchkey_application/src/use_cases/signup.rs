use std::sync::Arc;

use latchkey_core::{
    Account, AccountProfile, AccountStore, AuthError, CredentialHasher, Email, NewAccount,
    Notifier, RequestPrincipal, Role,
};
use secrecy::Secret;
use serde::Deserialize;

use crate::{
    authorization::{forbid_unauthenticated, live_admin},
    credentials::{generate_credential, required_password},
};

/// Raw registration input.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Secret<String>>,
}

/// Signup use case - creates an account with a freshly salted credential
pub struct SignupUseCase<'a, A, H, N>
where
    A: AccountStore,
    H: CredentialHasher + 'static,
    N: Notifier,
{
    accounts: &'a A,
    hasher: &'a Arc<H>,
    notifier: &'a N,
}

impl<'a, A, H, N> SignupUseCase<'a, A, H, N>
where
    A: AccountStore,
    H: CredentialHasher + 'static,
    N: Notifier,
{
    pub fn new(accounts: &'a A, hasher: &'a Arc<H>, notifier: &'a N) -> Self {
        Self {
            accounts,
            hasher,
            notifier,
        }
    }

    /// Register a new account.
    ///
    /// Anyone may register a `user`. Creating an `admin` requires an admin
    /// principal.
    ///
    /// # Returns
    /// The sanitized profile, or `Conflict` when the email is taken.
    #[tracing::instrument(
        name = "SignupUseCase::execute",
        skip(self, registration),
        fields(request_id = %principal.request_id())
    )]
    pub async fn execute(
        &self,
        registration: Registration,
        role: Role,
        principal: &RequestPrincipal,
    ) -> Result<AccountProfile, AuthError> {
        if role.is_admin() {
            live_admin(self.accounts, principal)
                .await
                .map_err(forbid_unauthenticated)
                .inspect_err(|_| {
                    tracing::warn!(
                        requester = ?principal.account_id(),
                        "Non-admin attempted to create an admin account"
                    );
                })?;
        }

        self.provision(registration, role).await
    }

    /// Create an account with any role and no principal check. Meant for
    /// operator bootstrap, never for request handling.
    #[tracing::instrument(name = "SignupUseCase::provision", skip(self, registration))]
    pub async fn provision(
        &self,
        registration: Registration,
        role: Role,
    ) -> Result<AccountProfile, AuthError> {
        let Registration {
            first_name,
            last_name,
            email,
            password,
        } = registration;

        let email = email
            .filter(|email| !email.trim().is_empty())
            .ok_or(AuthError::MissingField("email"))?;
        let email = Email::parse(&email).map_err(|_| AuthError::InvalidField("email"))?;
        let password = required_password(password, "password")?;

        let credential = generate_credential(self.hasher, password).await?;
        let account = Account::new(
            NewAccount {
                first_name: first_name.unwrap_or_default().trim().to_owned(),
                last_name: last_name.unwrap_or_default().trim().to_owned(),
                email,
                role,
            },
            credential,
        );
        let profile = account.profile();

        self.accounts.create(account).await.inspect_err(|e| {
            tracing::warn!(error = %e, email = %profile.email, "Registration rejected");
        })?;

        if let Err(e) = self.notifier.send_signup_successful(&profile).await {
            tracing::error!(error = %e, account_id = %profile.id, "Failed to send welcome email");
        }

        tracing::info!(account_id = %profile.id, %role, "Account registered");
        Ok(profile)
    }
}
