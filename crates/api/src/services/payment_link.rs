//! Payment provider client.
//!
//! Creates hosted payment links by calling the configured provider and
//! proxying its JSON response back to the caller.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::PaymentConfig;
use domain::models::payment::PaymentLinkOrder;

/// Errors that can occur while creating a payment link.
#[derive(Debug, Error)]
pub enum PaymentLinkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}")]
    Provider { status: u16 },
}

/// Client for the external payment-link API.
pub struct PaymentLinkClient {
    client: Client,
    provider_url: String,
    api_key: String,
}

impl PaymentLinkClient {
    /// Create a new client from the payment configuration.
    pub fn new(config: &PaymentConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            provider_url: config.provider_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Create a payment link for an order.
    ///
    /// The provider's JSON response is returned verbatim; the caller proxies
    /// it to the front end.
    pub async fn create_link(
        &self,
        order: &PaymentLinkOrder,
    ) -> Result<serde_json::Value, PaymentLinkError> {
        let url = format!("{}/payment-links", self.provider_url);

        let response = self
            .client
            .post(&url)
            .header("key", &self.api_key)
            .json(order)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "Payment provider rejected the order");
            return Err(PaymentLinkError::Provider {
                status: status.as_u16(),
            });
        }

        let body = response.json::<serde_json::Value>().await?;
        info!(amount = order.amount, "Payment link created");
        Ok(body)
    }
}
