use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// The token itself is bad: signature mismatch, malformed structure,
    /// undecodable payload.
    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    /// The decoding machinery failed for reasons unrelated to the token's
    /// own validity (key material, crypto backend).
    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),
}
