//! The seam between the harness and the cloud (or its local emulator).
//!
//! Everything the deploy/verify/teardown flow needs from CloudFormation,
//! Lambda and API Gateway goes through [`CloudEmulator`], so the polling
//! protocol can be exercised against a scripted implementation.

use crate::error::Result;
use async_trait::async_trait;

pub use petstore_config::Capability;

/// Status string CloudFormation reports once every resource is created
pub const CREATE_COMPLETE: &str = "CREATE_COMPLETE";

/// Any status with this suffix is terminal failure (`CREATE_FAILED`,
/// `ROLLBACK_FAILED`, `DELETE_FAILED`, ...)
pub const FAILED_SUFFIX: &str = "_FAILED";

/// A create-stack request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRequest {
    name: String,
    template_body: String,
    capabilities: Vec<Capability>,
}

impl StackRequest {
    pub fn new(
        name: impl Into<String>,
        template_body: impl Into<String>,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        let mut unique = Vec::new();
        for capability in capabilities {
            if !unique.contains(&capability) {
                unique.push(capability);
            }
        }
        Self {
            name: name.into(),
            template_body: template_body.into(),
            capabilities: unique,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template_body(&self) -> &str {
        &self.template_body
    }

    /// Capabilities in request order, without duplicates
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

/// What describe-stacks reported for one stack at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackSnapshot {
    pub stack_id: Option<String>,
    pub status: String,
    pub reason: Option<String>,
    pub detailed_status: Option<String>,
    pub description: Option<String>,
}

impl StackSnapshot {
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == CREATE_COMPLETE
    }

    pub fn is_failed(&self) -> bool {
        self.status.ends_with(FAILED_SUFFIX)
    }
}

/// A REST API as listed by API Gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestApiSummary {
    pub id: String,
    pub name: Option<String>,
}

/// Operations the harness performs against the emulator
#[async_trait]
pub trait CloudEmulator: Send + Sync {
    /// Issue create-stack; returns the stack id
    async fn create_stack(&self, request: &StackRequest) -> Result<String>;

    /// Current state of the named stack
    async fn describe_stack(&self, stack_name: &str) -> Result<StackSnapshot>;

    /// Issue delete-stack by name
    async fn delete_stack(&self, stack_name: &str) -> Result<()>;

    /// Names of every Lambda function, across all pages
    async fn list_function_names(&self) -> Result<Vec<String>>;

    /// Every REST API, across all pages
    async fn list_rest_apis(&self) -> Result<Vec<RestApiSummary>>;
}
