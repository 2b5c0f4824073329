//! Full deployment run: deploy → wait → verify function → verify API,
//! followed by teardown whatever happened before.

use crate::deploy::deploy_stack;
use crate::emulator::{CloudEmulator, StackRequest};
use crate::error::Result;
use crate::poll::{wait_for_stack_creation, PollPolicy, PollReport, Sleeper};
use crate::teardown::{delete_stack, TeardownOutcome};
use crate::verify::{require_api, require_function};
use tracing::{error, info};

/// What a successful deployment produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReport {
    pub stack_id: String,
    pub poll: PollReport,
}

/// Deployment result plus the teardown that always follows it
#[derive(Debug)]
pub struct SuiteOutcome {
    pub deployment: Result<DeploymentReport>,
    pub teardown: TeardownOutcome,
}

impl SuiteOutcome {
    /// The deployment result; teardown problems are already logged
    pub fn into_result(self) -> Result<DeploymentReport> {
        self.deployment
    }
}

/// Deploy `request`, wait for it, and check the expected resources.
/// Stops at the first failing step.
pub async fn run_deployment(
    emulator: &dyn CloudEmulator,
    request: &StackRequest,
    expected_function: &str,
    policy: &PollPolicy,
    sleeper: &dyn Sleeper,
) -> Result<DeploymentReport> {
    let stack_id = deploy_stack(emulator, request).await?;
    let poll = wait_for_stack_creation(emulator, request.name(), policy, sleeper).await?;

    require_function(emulator, expected_function).await?;
    require_api(emulator).await?;

    Ok(DeploymentReport { stack_id, poll })
}

/// [`run_deployment`] followed by best-effort deletion of the stack
pub async fn run_suite(
    emulator: &dyn CloudEmulator,
    request: &StackRequest,
    expected_function: &str,
    policy: &PollPolicy,
    sleeper: &dyn Sleeper,
) -> SuiteOutcome {
    let deployment = run_deployment(emulator, request, expected_function, policy, sleeper).await;

    match &deployment {
        Ok(report) => info!(
            stack_name = %request.name(),
            stack_id = %report.stack_id,
            attempts = report.poll.attempts,
            "Deployment verified"
        ),
        Err(e) => error!(
            stack_name = %request.name(),
            kind = e.kind(),
            error = %e,
            "Deployment failed"
        ),
    }

    let teardown = delete_stack(emulator, request.name()).await;
    SuiteOutcome {
        deployment,
        teardown,
    }
}
