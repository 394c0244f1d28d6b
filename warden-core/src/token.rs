//! Signed login tokens
//!
//! Tokens are HS256 JSON Web Tokens signed with the secret of the [`App`](crate::App) the login
//! was made for. Anyone holding the same secret can verify them with [`AuthToken::claims`].
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{AppId, Error, UserId, error::CryptoError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub uid: UserId,
    pub email: String,
    pub app_id: AppId,
    /// Expiry as Unix seconds.
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(uid: UserId, email: impl Into<String>, app_id: AppId, expires_at: DateTime<Utc>) -> Self {
        Self {
            uid,
            email: email.into(),
            app_id,
            exp: expires_at.timestamp(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn sign(claims: &TokenClaims, secret: &str) -> Result<Self, Error> {
        let token = encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| CryptoError::TokenSigning(e.to_string()))?;

        Ok(Self(token))
    }

    /// Verify the signature and expiry and return the embedded claims.
    pub fn claims(&self, secret: &str) -> Result<TokenClaims, Error> {
        let data = decode::<TokenClaims>(
            &self.0,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| CryptoError::TokenVerification(e.to_string()))?;

        Ok(data.claims)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl std::fmt::Display for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
