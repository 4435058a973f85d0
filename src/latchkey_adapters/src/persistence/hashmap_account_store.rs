use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use chrono::Utc;
use latchkey_core::{Account, AccountChanges, AccountId, AccountStore, AccountStoreError, Email};

/// In-memory account store. Email uniqueness is enforced on create and on
/// email changes.
#[derive(Default, Clone)]
pub struct HashMapAccountStore {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
}

impl HashMapAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl AccountStore for HashMapAccountStore {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| account.email() == email)
            .cloned())
    }

    async fn create(&self, account: Account) -> Result<(), AccountStoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .values()
            .any(|existing| existing.email() == account.email())
        {
            return Err(AccountStoreError::EmailTaken);
        }
        accounts.insert(account.id(), account);
        Ok(())
    }

    async fn update(
        &self,
        id: &AccountId,
        changes: AccountChanges,
    ) -> Result<Account, AccountStoreError> {
        let mut accounts = self.accounts.write().await;

        if let Some(email) = &changes.email {
            let taken = accounts
                .values()
                .any(|existing| existing.id() != *id && existing.email() == email);
            if taken {
                return Err(AccountStoreError::EmailTaken);
            }
        }

        let account = accounts
            .get_mut(id)
            .ok_or(AccountStoreError::AccountNotFound)?;
        account.apply(changes);
        Ok(account.clone())
    }

    async fn soft_delete(&self, id: &AccountId) -> Result<Account, AccountStoreError> {
        self.update(id, AccountChanges::soft_delete(Utc::now())).await
    }

    async fn hard_delete(&self, id: &AccountId) -> Result<Account, AccountStoreError> {
        let mut accounts = self.accounts.write().await;
        accounts.remove(id).ok_or(AccountStoreError::AccountNotFound)
    }
}
