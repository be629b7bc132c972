//! HTTP client for the hosted voice-agent API.

use async_trait::async_trait;
use reqwest::Url;

use super::{AssistantConfig, VoiceAgent, VoiceError, VoiceResult};

/// Default base URL of the hosted voice-agent API.
pub const DEFAULT_BASE_URL: &str = "https://api.vapi.ai";

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Reqwest-backed [`VoiceAgent`] implementation.
///
/// `start` posts the assistant configuration to the session endpoint;
/// `stop` posts to its stop counterpart. Session identity is owned by the
/// collaborator under the process-wide single-session assumption.
#[derive(Debug, Clone)]
pub struct HostedVoiceAgent {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HostedVoiceAgent {
    /// Create a client against the default base URL.
    pub fn new(api_key: String) -> VoiceResult<Self> {
        let base_url = Url::parse(DEFAULT_BASE_URL).map_err(|e| VoiceError::Http(e.to_string()))?;
        Self::with_base_url(base_url, api_key)
    }

    /// Create a client against a specific base URL (tests point this at a
    /// local server).
    pub fn with_base_url(base_url: Url, api_key: String) -> VoiceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VoiceError::Http(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> VoiceResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| VoiceError::Http(e.to_string()))
    }

    async fn post(&self, url: Url, body: Option<serde_json::Value>) -> VoiceResult<()> {
        let mut request = self.http.post(url).bearer_auth(&self.api_key);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VoiceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Remote {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VoiceAgent for HostedVoiceAgent {
    async fn start(&self, config: &AssistantConfig) -> VoiceResult<()> {
        let url = self.endpoint("session/start")?;
        let body = serde_json::json!({ "assistant": config });
        self.post(url, Some(body)).await
    }

    async fn stop(&self) -> VoiceResult<()> {
        let url = self.endpoint("session/stop")?;
        self.post(url, None).await
    }
}
