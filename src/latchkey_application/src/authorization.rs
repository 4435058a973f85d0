use http::{HeaderMap, header::AUTHORIZATION};
use latchkey_core::{
    Account, AccountStore, AuthError, Identity, RequestId, RequestPrincipal, TokenService,
};

/// Builds the per-request principal from an optional bearer token.
///
/// Resolution never fails: a missing or invalid token yields an anonymous
/// principal, and routes decide whether that is acceptable via
/// [`require_authenticated`] or [`require_admin`].
#[derive(Clone)]
pub struct AuthorizationGuard<T> {
    tokens: T,
}

impl<T> AuthorizationGuard<T>
where
    T: TokenService,
{
    pub fn new(tokens: T) -> Self {
        Self { tokens }
    }

    pub fn principal_from_headers(&self, headers: &HeaderMap) -> RequestPrincipal {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        self.principal(authorization)
    }

    pub fn principal(&self, authorization: Option<&str>) -> RequestPrincipal {
        self.resolve(authorization, RequestId::new())
    }

    #[tracing::instrument(name = "AuthorizationGuard::resolve", skip(self, authorization))]
    pub fn resolve(&self, authorization: Option<&str>, request_id: RequestId) -> RequestPrincipal {
        let Some(token) = authorization.and_then(bearer_token) else {
            return RequestPrincipal::anonymous(request_id);
        };

        match self.tokens.verify(token) {
            Ok(claims) => RequestPrincipal::authenticated(request_id, &claims),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
                RequestPrincipal::anonymous(request_id)
            }
        }
    }
}

/// Reject anonymous principals.
pub fn require_authenticated(principal: &RequestPrincipal) -> Result<&Identity, AuthError> {
    principal.identity().ok_or(AuthError::Unauthenticated)
}

/// Reject anonymous principals with `Unauthenticated` and non-admins with
/// `Unauthorized`.
pub fn require_admin(principal: &RequestPrincipal) -> Result<&Identity, AuthError> {
    let identity = require_authenticated(principal)?;
    if !identity.is_admin {
        tracing::warn!(
            request_id = %principal.request_id(),
            account_id = %identity.account_id,
            "Non-admin attempted an admin-only operation"
        );
        return Err(AuthError::Unauthorized);
    }
    Ok(identity)
}

/// Re-read the caller's account from the store.
///
/// Claims describe the account at issuance only. A caller whose account has
/// since been removed or soft-deleted is `Unauthenticated`.
pub async fn live_account<A>(accounts: &A, principal: &RequestPrincipal) -> Result<Account, AuthError>
where
    A: AccountStore + ?Sized,
{
    let identity = require_authenticated(principal)?;
    match accounts.find_by_id(&identity.account_id).await? {
        Some(account) if !account.is_deleted() => Ok(account),
        _ => {
            tracing::warn!(
                request_id = %principal.request_id(),
                account_id = %identity.account_id,
                "Token presented for a deleted account"
            );
            Err(AuthError::Unauthenticated)
        }
    }
}

/// [`require_admin`] followed by a check of the live role.
pub async fn live_admin<A>(accounts: &A, principal: &RequestPrincipal) -> Result<Account, AuthError>
where
    A: AccountStore + ?Sized,
{
    require_admin(principal)?;
    let account = live_account(accounts, principal).await?;
    if !account.is_admin() {
        tracing::warn!(
            request_id = %principal.request_id(),
            account_id = %account.id(),
            "Admin token presented by a demoted account"
        );
        return Err(AuthError::Unauthorized);
    }
    Ok(account)
}

/// For admin-only operations where an unknown caller is simply forbidden.
pub(crate) fn forbid_unauthenticated(error: AuthError) -> AuthError {
    match error {
        AuthError::Unauthenticated => AuthError::Unauthorized,
        other => other,
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
