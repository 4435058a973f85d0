use std::fmt;

use crate::{
    domain::password::Password,
    ports::services::{CredentialHasher, HasherError},
};

/// Random bytes mixed into a password digest. Unique per account.
#[derive(Clone, PartialEq, Eq)]
pub struct Salt(Vec<u8>);

impl Salt {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt([REDACTED])")
    }
}

/// One-way derived representation of a password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(Vec<u8>);

impl PasswordDigest {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest([REDACTED])")
    }
}

/// Salt and digest pair stored for an account.
///
/// [`Credential::generate`] is the only way to produce a new credential from a
/// password, and it always draws a fresh salt first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    salt: Salt,
    digest: PasswordDigest,
}

impl Credential {
    pub fn generate<H>(hasher: &H, password: &Password) -> Result<Self, HasherError>
    where
        H: CredentialHasher + ?Sized,
    {
        let salt = hasher.generate_salt();
        let digest = hasher.derive(password, &salt)?;
        Ok(Self { salt, digest })
    }

    /// Rebuild a credential loaded from persistent storage.
    pub fn restore(salt: Salt, digest: PasswordDigest) -> Self {
        Self { salt, digest }
    }

    pub fn matches<H>(&self, hasher: &H, candidate: &Password) -> Result<bool, HasherError>
    where
        H: CredentialHasher + ?Sized,
    {
        hasher.verify(candidate, &self.salt, &self.digest)
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn digest(&self) -> &PasswordDigest {
        &self.digest
    }
}
