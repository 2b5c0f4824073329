//! Emulator session: the client bundle plus whatever keeps the emulator alive.
//!
//! Opened once before a suite and dropped after it. With an explicit endpoint
//! the session only holds clients; otherwise it owns a LocalStack container
//! (feature `localstack`).

use crate::aws::{EmulatorEndpoint, ServiceClients};
#[cfg(not(feature = "localstack"))]
use crate::error::DeployError;
use crate::error::Result;
#[cfg(feature = "localstack")]
use crate::localstack::LocalStackFixture;
use petstore_config::EmulatorConfig;
use tracing::info;

pub struct EmulatorSession {
    clients: ServiceClients,
    endpoint: EmulatorEndpoint,
    #[cfg(feature = "localstack")]
    fixture: Option<LocalStackFixture>,
}

impl EmulatorSession {
    /// Connect to `config.endpoint` if set, else start a container
    pub async fn open(config: &EmulatorConfig) -> Result<Self> {
        if let Some(url) = &config.endpoint {
            info!(endpoint = %url, "Using external emulator");
            return Ok(Self::external(EmulatorEndpoint::from_config(url.clone(), config)).await);
        }

        Self::start_container(config).await
    }

    /// Session over an emulator someone else manages
    pub async fn external(endpoint: EmulatorEndpoint) -> Self {
        let clients = ServiceClients::connect(&endpoint).await;
        Self {
            clients,
            endpoint,
            #[cfg(feature = "localstack")]
            fixture: None,
        }
    }

    #[cfg(feature = "localstack")]
    async fn start_container(config: &EmulatorConfig) -> Result<Self> {
        let fixture = LocalStackFixture::start(config).await?;
        let endpoint = fixture.endpoint().clone();
        let clients = ServiceClients::connect(&endpoint).await;
        Ok(Self {
            clients,
            endpoint,
            fixture: Some(fixture),
        })
    }

    #[cfg(not(feature = "localstack"))]
    async fn start_container(_config: &EmulatorConfig) -> Result<Self> {
        Err(DeployError::Container(
            "no emulator endpoint configured; set PETSTORE_EMULATOR_ENDPOINT or enable the `localstack` feature"
                .to_string(),
        ))
    }

    pub fn clients(&self) -> &ServiceClients {
        &self.clients
    }

    pub fn endpoint(&self) -> &EmulatorEndpoint {
        &self.endpoint
    }

    /// Container logs, when this session owns the container
    pub async fn emulator_logs(&self) -> Option<String> {
        #[cfg(feature = "localstack")]
        if let Some(fixture) = &self.fixture {
            return match fixture.logs().await {
                Ok(logs) => Some(logs),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read emulator logs");
                    None
                }
            };
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn external_endpoint_skips_container() {
        let config = EmulatorConfig {
            endpoint: Some("http://127.0.0.1:4566".to_string()),
            ..EmulatorConfig::default()
        };
        let session = EmulatorSession::open(&config).await.unwrap();
        assert_eq!(session.endpoint().url, "http://127.0.0.1:4566");
        assert!(session.emulator_logs().await.is_none());
    }

    #[cfg(not(feature = "localstack"))]
    #[tokio::test]
    async fn missing_endpoint_without_container_support() {
        let err = EmulatorSession::open(&EmulatorConfig::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), "container");
    }
}
