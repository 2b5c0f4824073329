//! LocalStack container lifecycle.
//!
//! The container is removed when the fixture is dropped, so a panicking test
//! still releases it.

use crate::aws::EmulatorEndpoint;
use crate::error::{DeployError, Result};
use petstore_config::EmulatorConfig;
use testcontainers::core::{IntoContainerPort, Mount, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use tracing::info;

/// LocalStack's single edge port for every service
pub const EDGE_PORT: u16 = 4566;

/// Services the harness needs; LocalStack starts nothing else
pub const SERVICES: &str = "cloudformation,lambda,apigateway";

const READY_MESSAGE: &str = "Ready.";

/// A running LocalStack container
pub struct LocalStackFixture {
    endpoint: EmulatorEndpoint,
    container: ContainerAsync<GenericImage>,
}

impl LocalStackFixture {
    /// Start the configured image and wait until it reports ready
    pub async fn start(config: &EmulatorConfig) -> Result<Self> {
        info!(
            image = %config.image,
            tag = %config.tag,
            services = SERVICES,
            "Starting LocalStack container"
        );

        let image = GenericImage::new(config.image.clone(), config.tag.clone())
            .with_exposed_port(EDGE_PORT.tcp())
            .with_exposed_port(config.web_ui_port.tcp())
            .with_wait_for(WaitFor::message_on_stdout(READY_MESSAGE));

        let mut request = image
            .with_env_var("SERVICES", SERVICES)
            .with_env_var("AWS_DEFAULT_REGION", config.region.clone())
            // Lambda executors run as sibling containers
            .with_mount(Mount::bind_mount(
                "/var/run/docker.sock",
                "/var/run/docker.sock",
            ))
            .with_startup_timeout(config.startup_timeout());
        if config.debug {
            request = request.with_env_var("DEBUG", "1");
        }
        if config.web_ui {
            request = request.with_env_var("LOCALSTACK_WEB_UI", "1");
        }

        let container = request
            .start()
            .await
            .map_err(|e| DeployError::Container(format!("failed to start LocalStack: {}", e)))?;

        let host = container
            .get_host()
            .await
            .map_err(|e| DeployError::Container(format!("failed to resolve host: {}", e)))?;
        let port = container
            .get_host_port_ipv4(EDGE_PORT.tcp())
            .await
            .map_err(|e| DeployError::Container(format!("failed to resolve edge port: {}", e)))?;

        let url = format!("http://{}:{}", host, port);
        info!(endpoint = %url, "LocalStack ready");

        Ok(Self {
            endpoint: EmulatorEndpoint::from_config(url, config),
            container,
        })
    }

    pub fn endpoint(&self) -> &EmulatorEndpoint {
        &self.endpoint
    }

    /// Everything the container has written to stdout and stderr so far
    pub async fn logs(&self) -> Result<String> {
        let stdout = self
            .container
            .stdout_to_vec()
            .await
            .map_err(|e| DeployError::Container(format!("failed to read stdout: {}", e)))?;
        let stderr = self
            .container
            .stderr_to_vec()
            .await
            .map_err(|e| DeployError::Container(format!("failed to read stderr: {}", e)))?;

        let mut logs = String::from_utf8_lossy(&stdout).into_owned();
        logs.push_str(&String::from_utf8_lossy(&stderr));
        Ok(logs)
    }
}
