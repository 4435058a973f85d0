pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    account::{Account, AccountChanges, AccountId, AccountProfile, NewAccount, Role},
    credential::{Credential, PasswordDigest, Salt},
    email::{Email, EmailError},
    password::{Password, PasswordError},
    principal::{Identity, RequestId, RequestPrincipal},
    reset_code::ResetCode,
    reset_request::{
        AccountSnapshot, ResetRequest, ResetRequestBuilder, ResetRequestChanges,
        ResetRequestError, ResetStatus,
    },
    session::{AccessToken, SessionClaims},
};

pub use error::{AuthError, StatusClass};

pub use ports::{
    repositories::{AccountStore, AccountStoreError, ResetRequestStore, ResetRequestStoreError},
    services::{
        CredentialHasher, EmailClient, HasherError, NotificationError, Notifier,
        ResetCodeGenerator, TokenError, TokenService,
    },
};
