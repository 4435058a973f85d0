use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    account::{Account, AccountId},
    email::Email,
    reset_code::ResetCode,
};

/// Lifecycle state of a reset request. `Valid` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetStatus {
    Valid,
    Used,
    Invalid,
}

impl ResetStatus {
    pub fn can_transition_to(self, next: ResetStatus) -> bool {
        matches!(
            (self, next),
            (ResetStatus::Valid, ResetStatus::Used) | (ResetStatus::Valid, ResetStatus::Invalid)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResetStatus::Valid => "valid",
            ResetStatus::Used => "used",
            ResetStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for ResetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResetRequestError {
    #[error("A reset request needs an account")]
    MissingAccount,
    #[error("Reset request is no longer valid")]
    NotValid,
}

/// Denormalized copy of the account at the time the request was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub reference: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
}

impl From<&Account> for AccountSnapshot {
    fn from(account: &Account) -> Self {
        Self {
            reference: account.id(),
            first_name: account.first_name().to_owned(),
            last_name: account.last_name().to_owned(),
            email: account.email().clone(),
        }
    }
}

/// Time-bounded, single-use permission to set a new password.
#[derive(Debug, Clone)]
pub struct ResetRequest {
    account: AccountSnapshot,
    code: ResetCode,
    valid_until: DateTime<Utc>,
    used_on: Option<DateTime<Utc>>,
    status: ResetStatus,
    created_at: DateTime<Utc>,
}

impl ResetRequest {
    pub fn builder() -> ResetRequestBuilder {
        ResetRequestBuilder::default()
    }

    pub fn account(&self) -> &AccountSnapshot {
        &self.account
    }

    pub fn code(&self) -> &ResetCode {
        &self.code
    }

    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_until
    }

    pub fn used_on(&self) -> Option<DateTime<Utc>> {
        self.used_on
    }

    pub fn status(&self) -> ResetStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn has_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_until <= now
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ResetStatus::Valid && !self.has_expired_at(now)
    }

    /// Lazy expiry: flips a stale `valid` request to `invalid`.
    ///
    /// Returns `true` when the status changed and the request must be
    /// persisted.
    pub fn expire_if_stale(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == ResetStatus::Valid && self.has_expired_at(now) {
            self.status = ResetStatus::Invalid;
            return true;
        }
        false
    }

    /// Consume the request. Fails for any request that is not valid at `now`.
    pub fn mark_used(&mut self, now: DateTime<Utc>) -> Result<(), ResetRequestError> {
        if !self.is_valid_at(now) {
            return Err(ResetRequestError::NotValid);
        }
        self.status = ResetStatus::Used;
        self.used_on = Some(now);
        Ok(())
    }

    /// Operational override applied by an admin. Does not touch `status`.
    pub fn apply_admin_changes(&mut self, changes: ResetRequestChanges) {
        if let Some(valid_until) = changes.valid_until {
            self.valid_until = valid_until;
        }
    }
}

/// Fields an admin may edit directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequestChanges {
    pub valid_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ResetRequestBuilder {
    account: Option<AccountSnapshot>,
    valid_until: Option<DateTime<Utc>>,
}

impl ResetRequestBuilder {
    pub fn account(mut self, account: &Account) -> Self {
        self.account = Some(AccountSnapshot::from(account));
        self
    }

    pub fn snapshot(mut self, snapshot: AccountSnapshot) -> Self {
        self.account = Some(snapshot);
        self
    }

    pub fn valid_until(mut self, valid_until: DateTime<Utc>) -> Self {
        self.valid_until = Some(valid_until);
        self
    }

    /// Assign the code and resolve `valid_until`, which falls back to
    /// `now + lifetime` when not set explicitly.
    pub fn build(
        self,
        code: ResetCode,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<ResetRequest, ResetRequestError> {
        let account = self.account.ok_or(ResetRequestError::MissingAccount)?;
        Ok(ResetRequest {
            account,
            code,
            valid_until: self.valid_until.unwrap_or(now + lifetime),
            used_on: None,
            status: ResetStatus::Valid,
            created_at: now,
        })
    }
}
