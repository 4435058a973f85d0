use std::fmt;

use secrecy::{ExposeSecret, Secret};

/// Single-use, URL-safe password reset code.
#[derive(Clone)]
pub struct ResetCode(Secret<String>);

impl ResetCode {
    pub fn new(code: String) -> Self {
        Self(Secret::new(code))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for ResetCode {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for ResetCode {}

impl std::hash::Hash for ResetCode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.expose().hash(state);
    }
}

impl From<&str> for ResetCode {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl fmt::Debug for ResetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetCode([REDACTED])")
    }
}
