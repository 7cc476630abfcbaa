use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use thiserror::Error;
use uuid::Uuid;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TOKEN_TYPE_PASSWORD_RESET;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::revocation::NoRevocation;
use crate::revocation::RevocationCheck;

/// Reset tokens are short-lived regardless of the configured access-token TTL.
const PASSWORD_RESET_TTL_MINUTES: i64 = 15;

/// Immutable configuration snapshot the authority is built from.
///
/// Resolved once at process start; the authority never re-derives or reloads
/// it, which keeps concurrent reads safe without synchronization.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Symmetric signing secret (at least 32 bytes for HS256)
    pub secret: String,
    /// HMAC family algorithm
    pub algorithm: Algorithm,
    /// Default access-token time-to-live, in minutes
    pub default_ttl_minutes: i64,
}

/// Token lifecycle errors.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    /// Bad signature, malformed structure, missing or elapsed expiry, or a
    /// revoked token. Deliberately carries no detail about which check
    /// failed; surfaced as 401 at the HTTP boundary.
    #[error("Token is invalid or expired")]
    InvalidToken,

    /// Signing infrastructure failed; a server fault, not a client error.
    #[error("Failed to create token: {0}")]
    CreationFailed(String),

    /// Verification infrastructure failed for reasons unrelated to the
    /// token's own validity; surfaced as 500 at the HTTP boundary.
    #[error("Token verification failed: {0}")]
    VerificationFailed(String),
}

/// Issuance, verification, refresh and single-purpose scoping of bearer
/// tokens, plus password hashing.
///
/// Holds only immutable state (keys, default TTL) and injected
/// capabilities (clock, revocation check); safe to share across concurrent
/// request tasks behind an `Arc` without further synchronization.
pub struct TokenAuthority {
    jwt_handler: JwtHandler,
    password_hasher: PasswordHasher,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
    revocation: Arc<dyn RevocationCheck>,
}

impl TokenAuthority {
    /// Build an authority from a resolved configuration snapshot.
    ///
    /// Uses the system clock and a no-op revocation check; both can be
    /// swapped with [`with_clock`](Self::with_clock) and
    /// [`with_revocation_check`](Self::with_revocation_check).
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            jwt_handler: JwtHandler::new(config.secret.as_bytes(), config.algorithm),
            password_hasher: PasswordHasher::new(),
            default_ttl: Duration::minutes(config.default_ttl_minutes),
            clock: Arc::new(SystemClock),
            revocation: Arc::new(NoRevocation),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the revocation check consulted on every verification.
    pub fn with_revocation_check(mut self, revocation: Arc<dyn RevocationCheck>) -> Self {
        self.revocation = revocation;
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash.
    ///
    /// Malformed hashes verify as `false`, never as an error.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        self.password_hasher.verify(password, hash)
    }

    /// Issue a signed, time-boxed token for `claims`.
    ///
    /// Stamps `iat` from the clock, `exp = iat + ttl` (the configured
    /// default when `ttl` is `None`) and a fresh unique `jti`. Claims should
    /// include a subject; any extra fields the caller supplies pass through
    /// unmodified.
    ///
    /// # Errors
    /// * `CreationFailed` - Signing failed (server fault)
    pub fn issue(&self, claims: Claims, ttl: Option<Duration>) -> Result<String, TokenError> {
        let now = self.clock.now();
        let ttl = ttl.unwrap_or(self.default_ttl);

        let mut claims = claims;
        claims.iat = Some(now.timestamp());
        claims.exp = Some((now + ttl).timestamp());
        claims.jti = Some(Uuid::new_v4().to_string());

        self.jwt_handler
            .encode(&claims)
            .map_err(|e| TokenError::CreationFailed(e.to_string()))
    }

    /// Decode and validate a token, returning its claims.
    ///
    /// A token whose signature does not validate, that carries no `exp`, or
    /// whose `exp` has passed is rejected with the same opaque
    /// `InvalidToken`; nothing reveals which check failed.
    ///
    /// # Errors
    /// * `InvalidToken` - The token must not be accepted
    /// * `VerificationFailed` - Decoding infrastructure failure
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims: Claims = self.jwt_handler.decode(token).map_err(|e| match e {
            JwtError::InvalidToken(_) => TokenError::InvalidToken,
            other => TokenError::VerificationFailed(other.to_string()),
        })?;

        // A decodable token without an expiry must never be accepted.
        let exp = claims.exp.ok_or(TokenError::InvalidToken)?;

        if self.clock.now().timestamp() > exp {
            return Err(TokenError::InvalidToken);
        }

        if self.revocation.is_revoked(&claims) {
            return Err(TokenError::InvalidToken);
        }

        Ok(claims)
    }

    /// Re-issue a fresh token from a still-valid one.
    ///
    /// The new token carries only `sub`, `user_id` and `role` from the old
    /// claims; refresh narrows scope, never widens it. The old token is not
    /// altered or invalidated.
    ///
    /// # Errors
    /// Same as [`verify`](Self::verify), plus `CreationFailed` if re-issuing
    /// fails.
    pub fn refresh(&self, token: &str) -> Result<String, TokenError> {
        let claims = self.verify(token)?;

        let narrowed = Claims {
            sub: claims.sub,
            user_id: claims.user_id,
            role: claims.role,
            ..Claims::default()
        };

        self.issue(narrowed, None)
    }

    /// Issue a single-purpose password-reset token for `subject`.
    ///
    /// Reset tokens carry `type = "password_reset"` and a fixed 15-minute
    /// TTL, independent of the configured access-token expiry.
    pub fn issue_password_reset_token(&self, subject: &str) -> Result<String, TokenError> {
        let claims = Claims::new()
            .with_subject(subject)
            .with_token_type(TOKEN_TYPE_PASSWORD_RESET);

        self.issue(claims, Some(Duration::minutes(PASSWORD_RESET_TTL_MINUTES)))
    }

    /// Verify a password-reset token, returning the subject it was issued
    /// for.
    ///
    /// Returns `None` rather than an error when the token fails
    /// verification or is not a reset token; this is the one verification
    /// path that inspects the token kind.
    pub fn verify_password_reset_token(&self, token: &str) -> Option<String> {
        let claims = self.verify(token).ok()?;

        if claims.token_type.as_deref() != Some(TOKEN_TYPE_PASSWORD_RESET) {
            return None;
        }

        claims.sub
    }
}
