use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::IdentityConfig;

/// Role metadata maintained by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Member,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity provider returned status {0}")]
    Status(u16),
}

/// Role lookup seam: the gatekeeper consults this for authenticated
/// requests; tests substitute a stub.
#[async_trait]
pub trait RoleLookup: Send + Sync {
    async fn role_for(&self, user_id: &str) -> Result<UserRole, IdentityError>;
}

/// HTTP client against the identity provider's management API.
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProviderProfile {
    #[serde(default)]
    public_metadata: PublicMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetadata {
    role: Option<String>,
}

fn role_from_profile(profile: &ProviderProfile) -> UserRole {
    match profile.public_metadata.role.as_deref() {
        Some("admin") => UserRole::Admin,
        _ => UserRole::Member,
    }
}

#[async_trait]
impl RoleLookup for IdentityClient {
    async fn role_for(&self, user_id: &str) -> Result<UserRole, IdentityError> {
        let url = format!("{}/v1/users/{}", self.base_url, user_id);
        let response = self.http.get(&url).bearer_auth(&self.api_key).send().await?;

        if !response.status().is_success() {
            return Err(IdentityError::Status(response.status().as_u16()));
        }

        let profile: ProviderProfile = response.json().await?;
        Ok(role_from_profile(&profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_comes_from_public_metadata() {
        let profile: ProviderProfile =
            serde_json::from_str(r#"{"public_metadata": {"role": "admin"}}"#).expect("json");
        assert_eq!(role_from_profile(&profile), UserRole::Admin);
    }

    #[test]
    fn any_other_role_is_member() {
        let profile: ProviderProfile =
            serde_json::from_str(r#"{"public_metadata": {"role": "editor"}}"#).expect("json");
        assert_eq!(role_from_profile(&profile), UserRole::Member);
    }

    #[test]
    fn missing_metadata_is_member() {
        let profile: ProviderProfile = serde_json::from_str(r#"{}"#).expect("json");
        assert_eq!(role_from_profile(&profile), UserRole::Member);
    }
}
