use latchkey_core::{AccountId, AccountProfile, AccountStore, AuthError, RequestPrincipal};

use crate::authorization::live_admin;

/// Find account use case - sanitized lookup by id
pub struct FindAccountUseCase<'a, A>
where
    A: AccountStore,
{
    accounts: &'a A,
}

impl<'a, A> FindAccountUseCase<'a, A>
where
    A: AccountStore,
{
    pub fn new(accounts: &'a A) -> Self {
        Self { accounts }
    }

    /// Soft-deleted accounts are only visible to admins.
    #[tracing::instrument(
        name = "FindAccountUseCase::execute",
        skip(self, principal),
        fields(request_id = %principal.request_id())
    )]
    pub async fn execute(
        &self,
        account_id: AccountId,
        principal: &RequestPrincipal,
    ) -> Result<AccountProfile, AuthError> {
        let Some(account) = self.accounts.find_by_id(&account_id).await? else {
            return Err(AuthError::NotFound);
        };
        if !account.is_deleted() {
            return Ok(account.profile());
        }

        match live_admin(self.accounts, principal).await {
            Ok(_) => Ok(account.profile()),
            Err(e @ AuthError::Internal(_)) => Err(e),
            Err(_) => Err(AuthError::NotFound),
        }
    }
}
