//! Credential lifecycle library
//!
//! Provides the token and password infrastructure for the back-office API:
//! - Password hashing (Argon2id)
//! - Signed, time-boxed bearer tokens: issuance, verification, refresh
//! - Single-purpose password-reset tokens
//!
//! The authority is stateless apart from an immutable configuration snapshot
//! and two injected capabilities (a clock and a revocation check), so one
//! instance is shared across all concurrent request tasks.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Token Lifecycle
//! ```
//! use auth::{Algorithm, Claims, TokenAuthority, TokenConfig};
//!
//! let authority = TokenAuthority::new(&TokenConfig {
//!     secret: "secret_key_at_least_32_bytes_long!".to_string(),
//!     algorithm: Algorithm::HS256,
//!     default_ttl_minutes: 60,
//! });
//!
//! // Issue an access token
//! let claims = Claims::new()
//!     .with_subject("rider@example.com")
//!     .with_user_id(1)
//!     .with_role("user");
//! let token = authority.issue(claims, None).unwrap();
//!
//! // Verify it
//! let verified = authority.verify(&token).unwrap();
//! assert_eq!(verified.sub.as_deref(), Some("rider@example.com"));
//!
//! // Refresh narrows the claim set to sub / user_id / role
//! let refreshed = authority.refresh(&token).unwrap();
//! assert!(authority.verify(&refreshed).is_ok());
//! ```

pub mod authority;
pub mod clock;
pub mod jwt;
pub mod password;
pub mod revocation;

// Re-export commonly used items
pub use authority::TokenAuthority;
pub use authority::TokenConfig;
pub use authority::TokenError;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TOKEN_TYPE_PASSWORD_RESET;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use revocation::NoRevocation;
pub use revocation::RevocationCheck;

// The algorithm type is part of the configuration surface.
pub use jsonwebtoken::Algorithm;
