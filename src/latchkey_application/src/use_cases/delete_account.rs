use latchkey_core::{AccountId, AccountProfile, AccountStore, AuthError, RequestPrincipal};

use crate::authorization::live_account;

/// Delete account use case - soft delete for owners, soft or hard for admins
pub struct DeleteAccountUseCase<'a, A>
where
    A: AccountStore,
{
    accounts: &'a A,
}

impl<'a, A> DeleteAccountUseCase<'a, A>
where
    A: AccountStore,
{
    pub fn new(accounts: &'a A) -> Self {
        Self { accounts }
    }

    /// Execute the delete account use case
    ///
    /// # Arguments
    /// * `account_id` - Account to delete
    /// * `hard` - Physically remove the record. Admins only.
    ///
    /// # Returns
    /// The profile as it was after deletion.
    #[tracing::instrument(
        name = "DeleteAccountUseCase::execute",
        skip(self, principal),
        fields(request_id = %principal.request_id())
    )]
    pub async fn execute(
        &self,
        account_id: AccountId,
        hard: bool,
        principal: &RequestPrincipal,
    ) -> Result<AccountProfile, AuthError> {
        let caller = live_account(self.accounts, principal).await?;
        let is_owner = caller.id() == account_id;

        if !caller.is_admin() && (!is_owner || hard) {
            tracing::warn!(
                requester = %caller.id(),
                hard,
                "Unauthorized account deletion attempt"
            );
            return Err(AuthError::Unauthorized);
        }

        let account = if hard {
            self.accounts.hard_delete(&account_id).await?
        } else {
            self.accounts.soft_delete(&account_id).await?
        };

        tracing::info!(
            %account_id,
            deleted_by = %caller.id(),
            hard,
            "Account deleted"
        );
        Ok(account.profile())
    }
}
