use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use jyotish_common::{Error, Result};
use jyotish_config::AstrologyConfig;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::birth::BirthData;
use crate::facet::Facet;

/// HTTP client for the Kundali data provider. One POST per facet, no retries.
#[derive(Clone)]
pub struct KundaliClient {
    client: Client,
    base_url: String,
    authorization: String,
}

impl KundaliClient {
    pub fn new(config: &AstrologyConfig) -> Result<Self> {
        if config.api_key.is_none() {
            warn!("ASTROLOGY_API_KEY is not set; chart requests will be rejected by the provider");
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Http(format!("failed to build astrology client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: basic_auth(&config.user_id, config.api_key.as_deref().unwrap_or("")),
        })
    }

    /// Fetch a single facet for `birth`. Non-2xx answers become
    /// [`Error::Provider`] with the status and response body.
    pub async fn fetch_facet(&self, facet: Facet, birth: &BirthData) -> Result<Value> {
        let endpoint = facet.path();
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("requesting facet {} from {}", endpoint, url);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.authorization)
            .header(CONTENT_TYPE, "application/json")
            .json(&birth.payload())
            .send()
            .await
            .map_err(|e| Error::Http(format!("astrology request [{endpoint}] failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Http(format!("invalid JSON from [{endpoint}]: {e}")))
    }
}

fn basic_auth(user_id: &str, api_key: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user_id}:{api_key}")))
}
