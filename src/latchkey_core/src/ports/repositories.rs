use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    account::{Account, AccountChanges, AccountId},
    email::Email,
    reset_code::ResetCode,
    reset_request::{ResetRequest, ResetStatus},
};

// AccountStore port trait and errors
#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("Account not found")]
    AccountNotFound,
    #[error("Email already taken")]
    EmailTaken,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for AccountStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AccountNotFound, Self::AccountNotFound) => true,
            (Self::EmailTaken, Self::EmailTaken) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountStoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError>;
    async fn create(&self, account: Account) -> Result<(), AccountStoreError>;
    async fn update(
        &self,
        id: &AccountId,
        changes: AccountChanges,
    ) -> Result<Account, AccountStoreError>;
    async fn soft_delete(&self, id: &AccountId) -> Result<Account, AccountStoreError>;
    async fn hard_delete(&self, id: &AccountId) -> Result<Account, AccountStoreError>;
}

// ResetRequestStore port trait and errors
#[derive(Debug, Error)]
pub enum ResetRequestStoreError {
    #[error("Reset request not found")]
    RequestNotFound,
    #[error("Reset code already exists")]
    CodeConflict,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for ResetRequestStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::RequestNotFound, Self::RequestNotFound) => true,
            (Self::CodeConflict, Self::CodeConflict) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

#[async_trait]
pub trait ResetRequestStore: Send + Sync {
    async fn find_by_code(
        &self,
        code: &ResetCode,
    ) -> Result<Option<ResetRequest>, ResetRequestStoreError>;

    /// Persist a new request. Must fail with `CodeConflict` when the code is
    /// already taken so the caller can draw a new one.
    async fn insert(&self, request: ResetRequest) -> Result<(), ResetRequestStoreError>;

    async fn save(&self, request: &ResetRequest) -> Result<(), ResetRequestStoreError>;

    /// Atomically replace the stored request only if its current status is
    /// `expected`. Returns whether the write was applied.
    async fn save_if_status(
        &self,
        request: &ResetRequest,
        expected: ResetStatus,
    ) -> Result<bool, ResetRequestStoreError>;
}
