use std::sync::Arc;

use latchkey_core::{
    AccountChanges, AccountId, AccountStore, AuthError, CredentialHasher, Notifier,
    RequestPrincipal,
};
use secrecy::Secret;

use crate::{
    authorization::live_account,
    credentials::{generate_credential, required_password, verify_credential},
};

/// Change password use case - re-salts and stores a new credential
pub struct ChangePasswordUseCase<'a, A, H, N>
where
    A: AccountStore,
    H: CredentialHasher + 'static,
    N: Notifier,
{
    accounts: &'a A,
    hasher: &'a Arc<H>,
    notifier: &'a N,
}

impl<'a, A, H, N> ChangePasswordUseCase<'a, A, H, N>
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

    /// Execute the change password use case
    ///
    /// Owners must supply their current password. Admins may omit it, and
    /// are the only ones allowed to change the password of a soft-deleted
    /// account, since a deleted owner no longer authenticates.
    #[tracing::instrument(
        name = "ChangePasswordUseCase::execute",
        skip(self, old_password, new_password, principal),
        fields(request_id = %principal.request_id())
    )]
    pub async fn execute(
        &self,
        account_id: AccountId,
        old_password: Option<Secret<String>>,
        new_password: Option<Secret<String>>,
        principal: &RequestPrincipal,
    ) -> Result<(), AuthError> {
        let caller = live_account(self.accounts, principal).await?;
        let by_admin = caller.is_admin();
        if caller.id() != account_id && !by_admin {
            tracing::warn!(
                requester = %caller.id(),
                "Attempt to change another account's password"
            );
            return Err(AuthError::Unauthorized);
        }

        let new_password = required_password(new_password, "newPassword")?;
        let account = self
            .accounts
            .find_by_id(&account_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !by_admin || old_password.is_some() {
            let old_password = required_password(old_password, "oldPassword")?;
            let matches =
                verify_credential(self.hasher, account.credential().clone(), old_password).await?;
            if !matches {
                tracing::warn!(%account_id, "Password change with a wrong current password");
                return Err(AuthError::Unauthorized);
            }
        }

        let credential = generate_credential(self.hasher, new_password).await?;
        let account = self
            .accounts
            .update(&account_id, AccountChanges::credential(credential))
            .await?;

        if let Err(e) = self.notifier.send_password_changed(&account.profile()).await {
            tracing::error!(error = %e, %account_id, "Failed to send password changed notice");
        }

        tracing::info!(
            %account_id,
            changed_by = %caller.id(),
            "Password changed"
        );
        Ok(())
    }
}
