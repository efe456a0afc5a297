//! Vale Server transport.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::alert::AlertsByFormat;
use crate::engine::DiagnosticEngine;
use crate::error::EngineError;

/// Default address of a locally running Vale Server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:7777";

/// Engine that submits documents to a running Vale Server.
#[derive(Debug, Clone)]
pub struct RemoteEngine {
    client: reqwest::Client,
    endpoint: Url,
}

impl RemoteEngine {
    /// Creates an engine posting to `<base_url>/vale`.
    pub fn new(base_url: &str) -> Result<Self, EngineError> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: Self::resolve_endpoint(base_url)?,
        })
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The full URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn resolve_endpoint(base_url: &str) -> Result<Url, EngineError> {
        let mut base = Url::parse(base_url.trim())
            .map_err(|e| EngineError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // `join` replaces the last segment unless the base ends with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join("vale")
            .map_err(|e| EngineError::InvalidUrl(format!("{}: {}", base_url, e)))
    }
}

#[async_trait]
impl DiagnosticEngine for RemoteEngine {
    async fn vale(&self, text: &str, format: &str) -> Result<AlertsByFormat, EngineError> {
        debug!("POST {} ({} bytes, format {})", self.endpoint, text.len(), format);

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("text", text), ("format", format)])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    EngineError::ConnectionRefused(self.endpoint.to_string())
                } else {
                    EngineError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::HttpStatus(status));
        }

        let body = response.text().await?;
        Ok(AlertsByFormat::from_json(&body)?)
    }

    fn name(&self) -> &'static str {
        "server"
    }
}
