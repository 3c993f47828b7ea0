//! Session token issuance and validation.
//!
//! Tokens are HMAC-signed JWTs carrying a [`SessionClaims`] payload. The
//! algorithm, secret, issuer and audience come from [`JwtConfig`]; nothing is
//! stored server-side, so validation is a pure function of the secret and the
//! token.

use chrono::{Duration, Utc};
use explorers_core::error::CoreError;
use explorers_core::types::{DbId, Timestamp};
use explorers_db::models::user::UserInfo;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{parse_or, required, ConfigError};

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject -- the username.
    pub sub: String,
    /// The user's internal database id.
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    /// Issuer, fixed by configuration.
    pub iss: String,
    /// Audience, fixed by configuration.
    pub aud: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Not-before time (UTC Unix timestamp).
    pub nbf: i64,
    /// Expiration time (UTC Unix timestamp). The token is invalid from this second on.
    pub exp: i64,
    /// Unique token identifier (UUID v4) for audit logs.
    pub jti: String,
}

/// Default token lifetime in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 24;
/// Longest accepted token lifetime: one year.
const MAX_EXPIRY_HOURS: i64 = 24 * 365;
/// Default issuer and audience.
const DEFAULT_ISSUER: &str = "file-explorers";

/// Configuration for session token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Symmetric secret used to sign and verify tokens.
    pub secret: String,
    /// HMAC algorithm (`HS256`, `HS384` or `HS512`).
    pub algorithm: Algorithm,
    pub issuer: String,
    pub audience: String,
    /// Token lifetime in hours (default: 24).
    pub expiry_hours: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var            | Required | Default          |
    /// |--------------------|----------|------------------|
    /// | `JWT_SECRET`       | **yes**  | --               |
    /// | `JWT_ALGORITHM`    | no       | `HS256`          |
    /// | `JWT_ISSUER`       | no       | `file-explorers` |
    /// | `JWT_AUDIENCE`     | no       | `file-explorers` |
    /// | `JWT_EXPIRY_HOURS` | no       | `24`             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = required(lookup, "JWT_SECRET")?;

        let algorithm: Algorithm = parse_or(lookup, "JWT_ALGORITHM", Algorithm::HS256)?;
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::Invalid {
                key: "JWT_ALGORITHM",
                value: format!("{algorithm:?}"),
                reason: "only HMAC algorithms (HS256, HS384, HS512) are supported".into(),
            });
        }

        let issuer = lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.into());
        let audience = lookup("JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_ISSUER.into());

        let expiry_hours: i64 = parse_or(lookup, "JWT_EXPIRY_HOURS", DEFAULT_EXPIRY_HOURS)?;
        if !(1..=MAX_EXPIRY_HOURS).contains(&expiry_hours) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY_HOURS",
                value: expiry_hours.to_string(),
                reason: format!("must be between 1 and {MAX_EXPIRY_HOURS}"),
            });
        }

        Ok(Self {
            secret,
            algorithm,
            issuer,
            audience,
            expiry_hours,
        })
    }
}

/// Issues and validates session tokens.
pub struct TokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    /// Issue a token for `user`, valid from now for the configured lifetime.
    pub fn issue(&self, user: &UserInfo) -> Result<String, CoreError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, user: &UserInfo, now: Timestamp) -> Result<String, CoreError> {
        let issued = now.timestamp();
        let expires = Duration::try_hours(self.config.expiry_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Token lifetime of {} hours is out of range",
                    self.config.expiry_hours
                ))
            })?;
        let claims = SessionClaims {
            sub: user.username.clone(),
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: issued,
            nbf: issued,
            exp: expires.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| CoreError::Internal(format!("Token signing failed: {e}")))
    }

    /// Verify a bearer token and return its claims.
    ///
    /// Checks signature, algorithm, issuer, audience and the `[nbf, exp)`
    /// window with no leeway. Every failure, including an absent token, is
    /// [`CoreError::Unauthenticated`].
    pub fn resolve_identity(&self, token: Option<&str>) -> Result<SessionClaims, CoreError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::Unauthenticated("Missing session token".into()))?;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected session token");
                CoreError::Unauthenticated("Invalid or expired token".into())
            })?;

        // The library accepts `exp == now`; the window is half-open.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(CoreError::Unauthenticated("Invalid or expired token".into()));
        }

        Ok(data.claims)
    }
}
