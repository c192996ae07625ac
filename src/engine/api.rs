use std::time::Duration;

use serde_json::Value;

use super::config::EngineConfig;
use super::error::EngineError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Read-only client for the billing portal. One instance is safe to share
/// across concurrent resolutions; the engine performs no retries (retry and
/// cancellation policy belong to the caller).
#[derive(Clone)]
pub struct PortalClient {
    client: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(cfg: &EngineConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("creditwatch/0.1")
            // Avoid hanging forever on broken portal TCP handshakes.
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            client,
            base_url: cfg.portal_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, what: &'static str, url: String) -> Result<Value, EngineError> {
        let resp = self.client.get(url).timeout(REQUEST_TIMEOUT).send().await?;
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(EngineError::Provider { what, status });
        }
        Ok(resp.json::<Value>().await.unwrap_or(Value::Null))
    }

    pub async fn subscription_from_link(&self, token: &str) -> Result<Value, EngineError> {
        let url = format!(
            "{}/subscriptions_from_link?token={}",
            self.base_url,
            urlencoding::encode(token)
        );
        self.get_json("subscription", url).await
    }

    pub async fn customer_from_link(&self, token: &str) -> Result<Value, EngineError> {
        let url = format!(
            "{}/customer_from_link?token={}",
            self.base_url,
            urlencoding::encode(token)
        );
        self.get_json("customer", url).await
    }

    pub async fn ledger_summary(
        &self,
        customer_id: &str,
        pricing_unit_id: &str,
        token: &str,
    ) -> Result<Value, EngineError> {
        let url = format!(
            "{}/customers/{}/ledger_summary?pricing_unit_id={}&token={}",
            self.base_url,
            urlencoding::encode(customer_id),
            urlencoding::encode(pricing_unit_id),
            urlencoding::encode(token)
        );
        self.get_json("ledger", url).await
    }

    pub async fn usage(
        &self,
        subscription_id: &str,
        price_id: &str,
        token: &str,
    ) -> Result<Value, EngineError> {
        let url = format!(
            "{}/subscriptions/{}/usage?price_id={}&token={}",
            self.base_url,
            urlencoding::encode(subscription_id),
            urlencoding::encode(price_id),
            urlencoding::encode(token)
        );
        self.get_json("usage", url).await
    }
}
