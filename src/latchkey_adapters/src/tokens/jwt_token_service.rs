use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use latchkey_core::{AccessToken, AccountId, Role, SessionClaims, TokenError, TokenService};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::config::settings::JwtSettings;

/// Wire form of the session claims.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    name: String,
    iat: i64,
    exp: i64,
}

/// HS256 tokens signed with a single server-held secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    time_to_live: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &Secret<String>, time_to_live: Duration) -> Self {
        let secret = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            time_to_live,
        }
    }

    pub fn from_settings(settings: &JwtSettings) -> Self {
        Self::new(
            &settings.secret,
            Duration::seconds(settings.time_to_live_in_seconds),
        )
    }

    pub fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        claims: &SessionClaims,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, TokenError> {
        let exp = now
            .checked_add_signed(self.time_to_live)
            .ok_or_else(|| TokenError::SigningFailed("Duration out of range".to_owned()))?;

        let claims = Claims {
            sub: claims.account_id.to_string(),
            role: claims.role,
            name: claims.display_name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(AccessToken::new)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, claims: &SessionClaims) -> Result<AccessToken, TokenError> {
        self.issue_at(claims, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                TokenError::InvalidToken
            })?
            .claims;

        let account_id = AccountId::parse(&claims.sub).ok_or(TokenError::InvalidToken)?;

        Ok(SessionClaims {
            account_id,
            role: claims.role,
            display_name: claims.name,
        })
    }
}
