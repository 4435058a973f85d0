use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    account::AccountProfile,
    credential::{PasswordDigest, Salt},
    email::Email,
    password::Password,
    reset_code::ResetCode,
    session::{AccessToken, SessionClaims},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("Malformed salt")]
    MalformedSalt,
    #[error("Malformed digest")]
    MalformedDigest,
    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),
}

/// Salted, slow password key derivation.
///
/// A wrong password is never an error: `verify` returns `Ok(false)`. Errors
/// are reserved for malformed salts or digests.
pub trait CredentialHasher: Send + Sync {
    fn generate_salt(&self) -> Salt;
    fn derive(&self, password: &Password, salt: &Salt) -> Result<PasswordDigest, HasherError>;
    fn verify(
        &self,
        password: &Password,
        salt: &Salt,
        expected: &PasswordDigest,
    ) -> Result<bool, HasherError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed or expired. Deliberately indistinguishable.
    #[error("Invalid token")]
    InvalidToken,
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),
}

/// Stateless issuance and verification of signed session tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, claims: &SessionClaims) -> Result<AccessToken, TokenError>;
    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError>;
}

pub trait ResetCodeGenerator: Send + Sync {
    fn generate(&self) -> ResetCode;
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Failed to deliver notification: {0}")]
    DeliveryFailed(String),
}

/// Out-of-band messages sent by the reset workflow and account use cases.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_signup_successful(&self, account: &AccountProfile)
    -> Result<(), NotificationError>;

    async fn send_forgot_password_code(
        &self,
        account: &AccountProfile,
        code: &ResetCode,
    ) -> Result<(), NotificationError>;

    async fn send_password_changed(
        &self,
        account: &AccountProfile,
    ) -> Result<(), NotificationError>;
}

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}
