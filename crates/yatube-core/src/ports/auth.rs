//! Identity token port.

use crate::domain::Identity;

/// Claims carried by an identity token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub identity: Identity,
    pub exp: i64,
}

/// Token service trait - issues and verifies identity tokens.
///
/// Login itself happens elsewhere; this service only has to agree with the
/// issuer on the token format.
pub trait TokenService: Send + Sync {
    /// Issue a token for an identity.
    fn generate_token(&self, identity: &Identity) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing credentials")]
    MissingAuth,
}
