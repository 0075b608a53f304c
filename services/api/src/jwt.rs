//! JWT service for access token generation and validation
//!
//! Tokens are signed with a shared secret using one of the HMAC algorithms
//! and carry the user's email as subject. There is no refresh token and no
//! revocation list; a token is valid until its `exp` claim passes.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::config::Settings;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Signing algorithm name, e.g. `HS256`
    pub algorithm: String,
    /// Access token lifetime (default: 30 minutes)
    pub access_token_expiry: Duration,
}

impl JwtConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            secret: settings.secret_key.clone(),
            algorithm: settings.algorithm.clone(),
            access_token_expiry: settings.access_token_ttl(),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User email
    pub sub: Option<String>,
    /// Issued at time
    #[serde(default)]
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// Reasons a token can be refused
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("Token has expired")]
    Expired,

    #[error("Token has no subject")]
    MissingSubject,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    access_token_expiry: Duration,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        let algorithm = Algorithm::from_str(config.algorithm.trim()).map_err(|_| {
            anyhow::anyhow!("Unsupported signing algorithm: {}", config.algorithm)
        })?;

        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            anyhow::bail!(
                "Signing algorithm {:?} needs a key pair; only HS256, HS384 and HS512 are supported",
                algorithm
            );
        }

        if config.secret.is_empty() {
            anyhow::bail!("Token signing secret must not be empty");
        }

        let mut validation = Validation::new(algorithm);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;

        Ok(JwtService {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm,
            validation,
            access_token_expiry: config.access_token_expiry,
        })
    }

    /// Generate an access token for a subject with the configured lifetime
    pub fn generate_access_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, self.access_token_expiry)
    }

    /// Generate a token for a subject that expires after `ttl`
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now(), ttl)
    }

    pub fn issue_at(
        &self,
        subject: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: Some(subject.to_string()),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)
    }

    /// Validate a token and return its subject
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;

        if now.timestamp() > token_data.claims.exp {
            return Err(TokenError::Expired);
        }

        token_data
            .claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(TokenError::MissingSubject)
    }
}
