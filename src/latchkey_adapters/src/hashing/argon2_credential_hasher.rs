use argon2::{Algorithm, Argon2, Params, Version};
use latchkey_core::{CredentialHasher, HasherError, Password, PasswordDigest, Salt};
use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::config::{
    constants::hashing::{DIGEST_LEN, MIN_SALT_LEN, SALT_LEN},
    settings::HasherSettings,
};

/// Argon2id key stretching over raw salt and digest bytes.
#[derive(Debug, Clone)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Argon2CredentialHasher {
    pub fn new(settings: &HasherSettings) -> Result<Self, HasherError> {
        let params = Params::new(
            settings.memory_in_kib,
            settings.iterations,
            settings.parallelism,
            Some(DIGEST_LEN),
        )
        .map_err(|e| HasherError::DerivationFailed(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn generate_salt(&self) -> Salt {
        let mut bytes = vec![0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Salt::from_bytes(bytes)
    }

    #[tracing::instrument(name = "Deriving password digest", skip_all)]
    fn derive(&self, password: &Password, salt: &Salt) -> Result<PasswordDigest, HasherError> {
        if salt.as_bytes().len() < MIN_SALT_LEN {
            return Err(HasherError::MalformedSalt);
        }

        let mut digest = vec![0u8; DIGEST_LEN];
        self.argon2()
            .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut digest)
            .map_err(|e| HasherError::DerivationFailed(e.to_string()))?;

        Ok(PasswordDigest::from_bytes(digest))
    }

    fn verify(
        &self,
        password: &Password,
        salt: &Salt,
        expected: &PasswordDigest,
    ) -> Result<bool, HasherError> {
        if expected.as_bytes().len() != DIGEST_LEN {
            return Err(HasherError::MalformedDigest);
        }

        let candidate = self.derive(password, salt)?;
        Ok(candidate.as_bytes().ct_eq(expected.as_bytes()).into())
    }
}
