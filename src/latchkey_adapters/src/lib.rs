pub mod codes;
pub mod config;
pub mod email;
pub mod hashing;
pub mod persistence;
pub mod telemetry;
pub mod tokens;

pub use codes::random_reset_code_generator::RandomResetCodeGenerator;
pub use crate::config::settings::{
    DurationUnit, HasherSettings, JwtSettings, LatchkeySettings, ResetDuration, ResetSettings,
    SettingsError,
};
pub use email::{
    email_notifier::EmailNotifier,
    mock_email_client::{MockEmailClient, SentEmail},
};
pub use hashing::argon2_credential_hasher::Argon2CredentialHasher;
pub use persistence::{
    hashmap_account_store::HashMapAccountStore,
    hashmap_reset_request_store::HashMapResetRequestStore,
};
pub use tokens::jwt_token_service::JwtTokenService;
