use latchkey_core::{
    AccountChanges, AccountId, AccountProfile, AccountStore, AuthError, Email, RequestPrincipal,
    Role,
};
use serde::Deserialize;

use crate::authorization::live_account;

/// Raw profile edit. Absent fields are left untouched.
///
/// There is no credential here: passwords only change through
/// [`ChangePasswordUseCase`](super::change_password::ChangePasswordUseCase)
/// or the reset workflow.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Update account use case - owners edit their profile, admins edit anyone
pub struct UpdateAccountUseCase<'a, A>
where
    A: AccountStore,
{
    accounts: &'a A,
}

impl<'a, A> UpdateAccountUseCase<'a, A>
where
    A: AccountStore,
{
    pub fn new(accounts: &'a A) -> Self {
        Self { accounts }
    }

    /// Apply `update` to `account_id`.
    ///
    /// `role` is an admin-only field and is dropped from a non-admin's edit.
    ///
    /// # Returns
    /// The updated profile, or `Conflict` when the new email is taken.
    #[tracing::instrument(
        name = "UpdateAccountUseCase::execute",
        skip(self, update, principal),
        fields(request_id = %principal.request_id())
    )]
    pub async fn execute(
        &self,
        account_id: AccountId,
        update: ProfileUpdate,
        principal: &RequestPrincipal,
    ) -> Result<AccountProfile, AuthError> {
        let caller = live_account(self.accounts, principal).await?;
        let by_admin = caller.is_admin();
        if caller.id() != account_id && !by_admin {
            tracing::warn!(
                requester = %caller.id(),
                "Attempt to edit another account's profile"
            );
            return Err(AuthError::Unauthorized);
        }

        let ProfileUpdate {
            first_name,
            last_name,
            email,
            role,
        } = update;

        let email = match email {
            Some(raw) => {
                Some(Email::parse(&raw).map_err(|_| AuthError::InvalidField("email"))?)
            }
            None => None,
        };

        let role = if by_admin {
            role
        } else {
            if role.is_some() {
                tracing::warn!(requester = %caller.id(), "Dropping role from a non-admin edit");
            }
            None
        };

        let changes = AccountChanges {
            first_name: first_name.map(|name| name.trim().to_owned()),
            last_name: last_name.map(|name| name.trim().to_owned()),
            email,
            role,
            ..AccountChanges::default()
        };

        let account = self
            .accounts
            .update(&account_id, changes)
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, %account_id, "Profile update rejected");
            })?;

        tracing::info!(
            %account_id,
            updated_by = %caller.id(),
            role = %account.role(),
            "Account updated"
        );
        Ok(account.profile())
    }
}
