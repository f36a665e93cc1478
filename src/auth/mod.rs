use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Claims carried by the identity provider's session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// External user id (the identity provider's subject).
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated caller context, resolved by the identity middleware.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
}

/// Identity attached to every request: `None` means anonymous.
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<AuthUser>);

impl CurrentUser {
    /// Handlers call this for their own 401 check; the gatekeeper already
    /// rejects anonymous API traffic, so this is the inner line of defense.
    pub fn require(&self) -> Result<&AuthUser, ApiError> {
        self.0
            .as_ref()
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }
}

/// Validate a session token and extract its claims.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims)
}
