//! Payment gateway configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment gateway configuration (Asaas)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    /// Gateway API access token
    pub api_key: String,

    /// Shared secret webhooks are signed with
    pub webhook_secret: String,

    /// Override for the API base URL (sandbox environments)
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Upper bound for any gateway call, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl GatewayConfig {
    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_API_KEY"));
        }
        if self.webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_WEBHOOK_SECRET"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    10
}
