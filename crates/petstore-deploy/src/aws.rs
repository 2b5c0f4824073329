//! AWS SDK client bundle pointed at an emulator endpoint.
//!
//! All three clients share one `SdkConfig`: same region, same static
//! credentials, same endpoint override.

use crate::emulator::{Capability, CloudEmulator, RestApiSummary, StackRequest, StackSnapshot};
use crate::error::{DeployError, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_cloudformation::types::Capability as CfnCapability;
use petstore_config::EmulatorConfig;
use tracing::debug;

/// Where the emulator listens and how to authenticate against it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorEndpoint {
    pub url: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

impl EmulatorEndpoint {
    /// Endpoint settings for a given URL, taking region and credentials from config
    pub fn from_config(url: impl Into<String>, config: &EmulatorConfig) -> Self {
        Self {
            url: url.into(),
            region: config.region.clone(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
        }
    }
}

/// CloudFormation, Lambda and API Gateway clients for one suite
#[derive(Debug, Clone)]
pub struct ServiceClients {
    cloudformation: aws_sdk_cloudformation::Client,
    lambda: aws_sdk_lambda::Client,
    apigateway: aws_sdk_apigateway::Client,
}

impl ServiceClients {
    /// Build clients that talk to `endpoint` with static credentials
    pub async fn connect(endpoint: &EmulatorEndpoint) -> Self {
        debug!(
            endpoint = %endpoint.url,
            region = %endpoint.region,
            "Configuring service clients"
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(endpoint.region.clone()))
            .endpoint_url(endpoint.url.clone())
            .credentials_provider(Credentials::new(
                endpoint.access_key.clone(),
                endpoint.secret_key.clone(),
                None,
                None,
                "petstore-emulator",
            ))
            .load()
            .await;

        Self::from_sdk_config(&sdk_config)
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self {
            cloudformation: aws_sdk_cloudformation::Client::new(sdk_config),
            lambda: aws_sdk_lambda::Client::new(sdk_config),
            apigateway: aws_sdk_apigateway::Client::new(sdk_config),
        }
    }

    pub fn cloudformation(&self) -> &aws_sdk_cloudformation::Client {
        &self.cloudformation
    }

    pub fn lambda(&self) -> &aws_sdk_lambda::Client {
        &self.lambda
    }

    pub fn apigateway(&self) -> &aws_sdk_apigateway::Client {
        &self.apigateway
    }
}

fn to_cfn_capability(capability: Capability) -> CfnCapability {
    match capability {
        Capability::Iam => CfnCapability::CapabilityIam,
        Capability::NamedIam => CfnCapability::CapabilityNamedIam,
        Capability::AutoExpand => CfnCapability::CapabilityAutoExpand,
    }
}

#[async_trait]
impl CloudEmulator for ServiceClients {
    async fn create_stack(&self, request: &StackRequest) -> Result<String> {
        let mut builder = self
            .cloudformation
            .create_stack()
            .stack_name(request.name())
            .template_body(request.template_body());
        for capability in request.capabilities() {
            builder = builder.capabilities(to_cfn_capability(*capability));
        }

        let output = builder.send().await.map_err(|e| {
            // A service error here means the emulator looked at the request and said no
            if e.as_service_error().is_some() {
                DeployError::TemplateRejected {
                    stack_name: request.name().to_string(),
                    reason: DisplayErrorContext(&e).to_string(),
                }
            } else {
                DeployError::emulator("CreateStack", DisplayErrorContext(&e))
            }
        })?;

        output
            .stack_id()
            .map(str::to_string)
            .ok_or_else(|| DeployError::emulator("CreateStack", "response carried no stack id"))
    }

    async fn describe_stack(&self, stack_name: &str) -> Result<StackSnapshot> {
        let output = self
            .cloudformation
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .and_then(|se| se.message())
                    .is_some_and(|m| m.contains("does not exist"));
                if missing {
                    DeployError::StackNotFound(stack_name.to_string())
                } else {
                    DeployError::emulator("DescribeStacks", DisplayErrorContext(&e))
                }
            })?;

        let stack = output
            .stacks()
            .first()
            .ok_or_else(|| DeployError::StackNotFound(stack_name.to_string()))?;

        Ok(StackSnapshot {
            stack_id: stack.stack_id().map(str::to_string),
            status: stack
                .stack_status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            reason: stack.stack_status_reason().map(str::to_string),
            detailed_status: stack.detailed_status().map(|s| s.as_str().to_string()),
            description: stack.description().map(str::to_string),
        })
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        self.cloudformation
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| DeployError::emulator("DeleteStack", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn list_function_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = self
                .lambda
                .list_functions()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| {
                    DeployError::emulator(
                        "ListFunctions",
                        aws_sdk_lambda::error::DisplayErrorContext(&e),
                    )
                })?;

            names.extend(
                output
                    .functions()
                    .iter()
                    .filter_map(|f| f.function_name())
                    .map(str::to_string),
            );

            match output.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(names)
    }

    async fn list_rest_apis(&self) -> Result<Vec<RestApiSummary>> {
        let mut apis = Vec::new();
        let mut position: Option<String> = None;

        loop {
            let output = self
                .apigateway
                .get_rest_apis()
                .set_position(position.take())
                .send()
                .await
                .map_err(|e| {
                    DeployError::emulator(
                        "GetRestApis",
                        aws_sdk_apigateway::error::DisplayErrorContext(&e),
                    )
                })?;

            apis.extend(output.items().iter().map(|api| RestApiSummary {
                id: api.id().unwrap_or_default().to_string(),
                name: api.name().map(str::to_string),
            }));

            match output.position() {
                Some(next) if !next.is_empty() => position = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(apis)
    }
}
