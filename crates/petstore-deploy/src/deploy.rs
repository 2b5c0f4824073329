//! Stack creation: read the template, send create-stack, hand back the id.

use crate::emulator::{CloudEmulator, StackRequest};
use crate::error::{DeployError, Result};
use petstore_config::StackConfig;
use std::path::Path;
use tracing::info;

/// Read a template body from disk
pub async fn read_template(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DeployError::TemplateRead {
            path: path.display().to_string(),
            source,
        })
}

/// Build the create-stack request described by the stack config
pub async fn request_from_config(config: &StackConfig) -> Result<StackRequest> {
    let template_body = read_template(&config.template_path).await?;
    Ok(StackRequest::new(
        config.name.clone(),
        template_body,
        config.capabilities.iter().copied(),
    ))
}

/// Issue create-stack and return the stack id.
///
/// Only sends the request; pair with
/// [`wait_for_stack_creation`](crate::poll::wait_for_stack_creation) to wait
/// for the resources.
pub async fn deploy_stack(emulator: &dyn CloudEmulator, request: &StackRequest) -> Result<String> {
    if request.template_body().trim().is_empty() {
        return Err(DeployError::TemplateRejected {
            stack_name: request.name().to_string(),
            reason: "template body is empty".to_string(),
        });
    }

    let capabilities: Vec<&str> = request.capabilities().iter().map(|c| c.as_str()).collect();
    info!(
        stack_name = %request.name(),
        template_bytes = request.template_body().len(),
        capabilities = ?capabilities,
        "Creating stack"
    );

    let stack_id = emulator.create_stack(request).await?;

    info!(stack_name = %request.name(), stack_id = %stack_id, "Stack creation initiated");
    Ok(stack_id)
}
