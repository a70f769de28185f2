//! # Bearer Tokens
//!
//! HS256 tokens carrying the user's primary key as an integer `sub`.
//! Verification checks the signature, issuer, audience and expiry; whether
//! the user still exists is left to the authorization gate.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use crate::store::RowId;

/// Claims of a campushub access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: RowId,
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
    pub iss: String,
}

fn default_secret() -> String {
    "campushub-development-secret".to_string()
}

fn default_issuer() -> String {
    "campushub".to_string()
}

fn default_ttl_minutes() -> i64 {
    60 * 24
}

/// Signing settings, read from the `jwt` section of the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(default = "default_secret")]
    pub secret: String,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_issuer")]
    pub audience: String,

    /// Lifetime of issued tokens
    #[serde(default = "default_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            issuer: default_issuer(),
            audience: default_issuer(),
            token_ttl_minutes: default_ttl_minutes(),
        }
    }
}

/// Issues and verifies access tokens with one shared secret
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            config,
        }
    }

    /// Signed token for `user_id`, valid for the configured lifetime
    pub fn issue(&self, user_id: RowId) -> AuthResult<String> {
        let issued = Utc::now();
        let claims = TokenClaims {
            sub: user_id,
            iat: issued.timestamp(),
            exp: (issued + Duration::minutes(self.config.token_ttl_minutes)).timestamp(),
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Verified claims of `token`. A `sub` that is not an integer makes the
    /// token malformed.
    pub fn claims(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut rules = Validation::new(Algorithm::HS256);
        rules.set_audience(&[&self.config.audience]);
        rules.set_issuer(&[&self.config.issuer]);

        decode::<TokenClaims>(token, &self.decoding_key, &rules)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }

    /// User id carried by a verified token
    pub fn user_id(&self, token: &str) -> AuthResult<RowId> {
        self.claims(token).map(|claims| claims.sub)
    }
}
