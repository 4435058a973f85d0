use thiserror::Error;

use crate::ports::{
    repositories::{AccountStoreError, ResetRequestStoreError},
    services::{HasherError, TokenError},
};

/// Caller-visible error kinds of the credential core.
///
/// Messages are deliberately terse. `Internal` keeps its detail for logs but
/// never renders it.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid value for field: {0}")]
    InvalidField(&'static str),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Not authorized")]
    Unauthorized,
    #[error("Account has been deleted")]
    AccountDeleted,
    #[error("Not found")]
    NotFound,
    #[error("Invalid reset code")]
    InvalidResetCode,
    #[error("Conflict")]
    Conflict(String),
    #[error("Internal error")]
    Internal(String),
}

/// Transport-neutral status classes for mapping [`AuthError`] at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    ClientError,
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
}

impl AuthError {
    pub fn status_class(&self) -> StatusClass {
        match self {
            AuthError::MissingField(_)
            | AuthError::InvalidField(_)
            | AuthError::InvalidResetCode => StatusClass::ClientError,
            AuthError::Unauthenticated => StatusClass::Unauthenticated,
            AuthError::Unauthorized | AuthError::AccountDeleted => StatusClass::Forbidden,
            AuthError::NotFound => StatusClass::NotFound,
            AuthError::Conflict(_) => StatusClass::Conflict,
            AuthError::Internal(_) => StatusClass::Internal,
        }
    }

    /// Stable machine-readable code for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingField(_) => "MISSING_FIELD",
            AuthError::InvalidField(_) => "INVALID_FIELD",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::AccountDeleted => "USER_HAS_BEEN_DELETED",
            AuthError::NotFound => "NOT_FOUND",
            AuthError::InvalidResetCode => "INVALID_FORGOT_PASSWORD_CODE",
            AuthError::Conflict(_) => "CONFLICT",
            AuthError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl PartialEq for AuthError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingField(a), Self::MissingField(b)) => a == b,
            (Self::InvalidField(a), Self::InvalidField(b)) => a == b,
            (Self::Unauthenticated, Self::Unauthenticated) => true,
            (Self::Unauthorized, Self::Unauthorized) => true,
            (Self::AccountDeleted, Self::AccountDeleted) => true,
            (Self::NotFound, Self::NotFound) => true,
            (Self::InvalidResetCode, Self::InvalidResetCode) => true,
            (Self::Conflict(_), Self::Conflict(_)) => true,
            (Self::Internal(_), Self::Internal(_)) => true,
            _ => false,
        }
    }
}

impl From<AccountStoreError> for AuthError {
    fn from(error: AccountStoreError) -> Self {
        match error {
            AccountStoreError::AccountNotFound => AuthError::NotFound,
            AccountStoreError::EmailTaken => AuthError::Conflict(error.to_string()),
            AccountStoreError::UnexpectedError(e) => AuthError::Internal(e),
        }
    }
}

impl From<ResetRequestStoreError> for AuthError {
    fn from(error: ResetRequestStoreError) -> Self {
        match error {
            ResetRequestStoreError::RequestNotFound => AuthError::NotFound,
            ResetRequestStoreError::CodeConflict => AuthError::Conflict(error.to_string()),
            ResetRequestStoreError::UnexpectedError(e) => AuthError::Internal(e),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::InvalidToken => AuthError::Unauthenticated,
            TokenError::SigningFailed(e) => AuthError::Internal(e),
        }
    }
}

impl From<HasherError> for AuthError {
    fn from(error: HasherError) -> Self {
        AuthError::Internal(error.to_string())
    }
}
