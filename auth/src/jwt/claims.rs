use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Token type marker carried by password-reset tokens.
pub const TOKEN_TYPE_PASSWORD_RESET: &str = "password_reset";

/// Bearer-token claims.
///
/// Reserved keys are `sub`, `user_id`, `role`, `exp`, `iat`, `jti` and the
/// optional `type` discriminator; anything else a caller supplies travels in
/// the flattened `extra` map. All fields are optional so the same structure
/// can describe a claim set before issuance (no timestamps yet) and after
/// decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user-facing identifier, e.g. email)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Internal user identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// Coarse authorization tag (e.g. "user", "admin")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// JWT ID (unique per issuance, traceability only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Token kind discriminator; absent for ordinary access tokens
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Additional custom fields (flattened into the token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set internal user identifier.
    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Set role.
    pub fn with_role(mut self, role: impl ToString) -> Self {
        self.role = Some(role.to_string());
        self
    }

    /// Set the token kind discriminator.
    pub fn with_token_type(mut self, token_type: impl ToString) -> Self {
        self.token_type = Some(token_type.to_string());
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Check whether the token is expired at `current_timestamp`.
    ///
    /// A token with no `exp` never counts as expired here; verification
    /// rejects such tokens outright before this question is asked.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| exp < current_timestamp)
    }
}
