use std::sync::Arc;

use latchkey_core::{AuthError, Credential, CredentialHasher, Password};

/// Derive a fresh salt and digest off the async executor.
#[tracing::instrument(name = "Computing credential", skip_all)]
pub async fn generate_credential<H>(
    hasher: &Arc<H>,
    password: Password,
) -> Result<Credential, AuthError>
where
    H: CredentialHasher + 'static,
{
    let hasher = Arc::clone(hasher);
    let current_span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| Credential::generate(hasher.as_ref(), &password))
    })
    .await
    .map_err(|e| AuthError::Internal(e.to_string()))?
    .map_err(AuthError::from)
}

/// Check a candidate password against a stored credential off the async
/// executor.
#[tracing::instrument(name = "Verifying credential", skip_all)]
pub async fn verify_credential<H>(
    hasher: &Arc<H>,
    credential: Credential,
    candidate: Password,
) -> Result<bool, AuthError>
where
    H: CredentialHasher + 'static,
{
    let hasher = Arc::clone(hasher);
    let current_span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| credential.matches(hasher.as_ref(), &candidate))
    })
    .await
    .map_err(|e| AuthError::Internal(e.to_string()))?
    .map_err(AuthError::from)
}

/// Turn an optional raw password into a `Password`, treating empty input as
/// absent.
pub fn required_password(
    raw: Option<secrecy::Secret<String>>,
    field: &'static str,
) -> Result<Password, AuthError> {
    raw.and_then(|secret| Password::try_from(secret).ok())
        .ok_or(AuthError::MissingField(field))
}
