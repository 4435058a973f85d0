use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    account::{AccountId, Role},
    session::SessionClaims,
};

/// Correlation identifier attached to every log line of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The verified identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account_id: AccountId,
    pub role: Role,
    pub is_admin: bool,
}

impl From<&SessionClaims> for Identity {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            account_id: claims.account_id,
            role: claims.role,
            is_admin: claims.role.is_admin(),
        }
    }
}

/// Per-request principal built by the authorization guard and passed
/// explicitly to every service call. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPrincipal {
    request_id: RequestId,
    identity: Option<Identity>,
}

impl RequestPrincipal {
    pub fn anonymous(request_id: RequestId) -> Self {
        Self {
            request_id,
            identity: None,
        }
    }

    pub fn authenticated(request_id: RequestId, claims: &SessionClaims) -> Self {
        Self {
            request_id,
            identity: Some(Identity::from(claims)),
        }
    }

    /// Principal for work that does not originate from an inbound request.
    pub fn system() -> Self {
        Self::anonymous(RequestId::new())
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.identity.as_ref().map(|identity| identity.account_id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.is_admin)
    }
}
