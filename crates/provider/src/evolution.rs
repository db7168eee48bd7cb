//! Evolution-API-compatible HTTP adapter.
//!
//! Endpoint shapes follow the Evolution API conventions: the instance name
//! rides in the path, the API key in an `apikey` header, and request bodies
//! are small JSON documents keyed by `number`.

use std::time::Duration;

use serde_json::json;

use zf_domain::config::ProviderConfig;
use zf_domain::error::{Error, Result};

use crate::traits::{MessagingProvider, PresenceState, ProfileAttributes};

pub struct EvolutionProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EvolutionProvider {
    /// Build the adapter from config.  The API key is read from the
    /// configured env var once here; an absent key is tolerated (some
    /// self-hosted deployments run keyless) but warn-logged.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!(
                env = %config.api_key_env,
                "provider API key env var unset — requests will be sent without an apikey header"
            );
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Other(format!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    /// POST a JSON body to `{base}/{path}` and map non-2xx to
    /// [`Error::Provider`].
    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<()> {
        let url = format!("{}/{}", self.base_url, path);
        let mut req = self.http.post(&url).json(&body);
        if !self.api_key.is_empty() {
            req = req.header("apikey", &self.api_key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::provider(path, None, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::provider(
                path,
                Some(status.as_u16()),
                text.chars().take(500).collect::<String>(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MessagingProvider for EvolutionProvider {
    async fn send_message(&self, instance_id: &str, chat_id: &str, text: &str) -> Result<()> {
        self.post_json(
            &format!("message/sendText/{instance_id}"),
            json!({ "number": chat_id, "text": text }),
        )
        .await
    }

    async fn set_presence(
        &self,
        instance_id: &str,
        chat_id: &str,
        state: PresenceState,
    ) -> Result<()> {
        self.post_json(
            &format!("chat/sendPresence/{instance_id}"),
            json!({ "number": chat_id, "presence": state.to_string() }),
        )
        .await
    }

    async fn update_profile(
        &self,
        instance_id: &str,
        client_id: &str,
        attributes: &ProfileAttributes,
    ) -> Result<()> {
        self.post_json(
            &format!("chat/updatePrivacySettings/{instance_id}"),
            json!({
                "clientId": client_id,
                "presence": attributes.presence.to_string(),
                "readreceipts": attributes.read_receipts,
                "online": attributes.online_privacy,
            }),
        )
        .await
    }

    async fn mark_read(&self, instance_id: &str, chat_id: &str) -> Result<()> {
        self.post_json(
            &format!("chat/markMessageAsRead/{instance_id}"),
            json!({ "number": chat_id }),
        )
        .await
    }
}
