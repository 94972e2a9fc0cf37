//! Asaas payment-gateway adapter.
//!
//! Implements the `PaymentGateway` port against the Asaas REST API: webhook
//! signature verification plus the payment lookup used during webhook
//! processing. The HTTP client carries a request timeout so a slow gateway
//! surfaces as a retryable `Gateway` error instead of holding the request
//! open.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::LedgerError;
use crate::domain::gateway::GatewayPayment;
use crate::ports::PaymentGateway;

use super::signature::verify_signature;

/// Asaas API configuration.
#[derive(Clone)]
pub struct AsaasConfig {
    /// API access token.
    api_key: SecretString,

    /// Shared secret the gateway signs webhook bodies with.
    webhook_secret: SecretString,

    /// Base URL for the Asaas API.
    api_base_url: String,

    /// Upper bound for any single gateway call.
    request_timeout: Duration,
}

impl AsaasConfig {
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.asaas.com/v3".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (sandbox, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Asaas adapter for the `PaymentGateway` port.
pub struct AsaasGateway {
    config: AsaasConfig,
    http_client: reqwest::Client,
}

impl AsaasGateway {
    pub fn new(config: AsaasConfig) -> Result<Self, LedgerError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LedgerError::Gateway(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl PaymentGateway for AsaasGateway {
    fn verify_signature(&self, payload: &[u8], signature: &str) -> Result<(), LedgerError> {
        verify_signature(
            self.config.webhook_secret.expose_secret().as_bytes(),
            payload,
            signature,
        )
    }

    async fn find_payment(&self, payment_id: &str) -> Result<Option<GatewayPayment>, LedgerError> {
        let url = format!("{}/payments/{}", self.config.api_base_url, payment_id);

        let response = self
            .http_client
            .get(&url)
            .header("access_token", self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LedgerError::Gateway(format!("payment lookup timed out: {}", e))
                } else {
                    LedgerError::Gateway(format!("payment lookup failed: {}", e))
                }
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(payment_id, %status, error = %body, "gateway payment lookup failed");
            return Err(LedgerError::Gateway(format!(
                "gateway returned {} for payment {}",
                status, payment_id
            )));
        }

        let payment: GatewayPayment = response.json().await.map_err(|e| {
            LedgerError::Gateway(format!("failed to parse gateway payment: {}", e))
        })?;

        Ok(Some(payment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gateway::compute_signature;

    fn adapter() -> AsaasGateway {
        AsaasGateway::new(AsaasConfig::new("key_test", "whsec_test")).unwrap()
    }

    #[test]
    fn config_defaults_to_production_base_url() {
        let config = AsaasConfig::new("key", "secret");
        assert_eq!(config.api_base_url, "https://api.asaas.com/v3");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn config_builder_overrides() {
        let config = AsaasConfig::new("key", "secret")
            .with_base_url("http://localhost:9090")
            .with_request_timeout(Duration::from_secs(2));
        assert_eq!(config.api_base_url, "http://localhost:9090");
        assert_eq!(config.request_timeout, Duration::from_secs(2));
    }

    #[test]
    fn verify_signature_accepts_matching_digest() {
        let adapter = adapter();
        let payload = br#"{"event":"PAYMENT_CONFIRMED","payment":{"id":"pay_1"}}"#;
        let signature = compute_signature(b"whsec_test", payload);
        assert!(adapter.verify_signature(payload, &signature).is_ok());
    }

    #[test]
    fn verify_signature_rejects_wrong_digest() {
        let adapter = adapter();
        let result = adapter.verify_signature(b"payload", "0badc0de");
        assert!(matches!(result, Err(LedgerError::Authentication(_))));
    }
}
