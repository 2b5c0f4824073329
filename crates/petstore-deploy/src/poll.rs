//! Stack-creation polling.
//!
//! A bounded loop with a fixed interval: each attempt reads the stack status
//! once and either finishes (`CREATE_COMPLETE`), fails (`*_FAILED`), or sleeps
//! and tries again. After `max_attempts` non-terminal reads the loop gives up
//! with [`DeployError::PollTimeout`]. There is no backoff and no jitter.

use crate::emulator::CloudEmulator;
use crate::error::{DeployError, Result};
use async_trait::async_trait;
use petstore_config::PollConfig;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Attempt bound and fixed interval for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Longer window for slow emulators: 30 attempts, 10s apart
    pub fn thorough() -> Self {
        Self::new(30, Duration::from_secs(10))
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(10))
    }
}

impl From<&PollConfig> for PollPolicy {
    fn from(config: &PollConfig) -> Self {
        Self::new(config.max_attempts, config.interval())
    }
}

/// Suspends the poll loop between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleep
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How a successful wait went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// Number of status reads performed, including the final one
    pub attempts: u32,
    /// Total time spent sleeping between reads
    pub slept: Duration,
    pub stack_id: Option<String>,
}

/// Poll the named stack until it is created, fails, or the bound runs out.
pub async fn wait_for_stack_creation(
    emulator: &dyn CloudEmulator,
    stack_name: &str,
    policy: &PollPolicy,
    sleeper: &dyn Sleeper,
) -> Result<PollReport> {
    let mut slept = Duration::ZERO;
    let mut last_status = String::from("UNKNOWN");

    for attempt in 1..=policy.max_attempts {
        let stack = emulator.describe_stack(stack_name).await?;

        if stack.is_complete() {
            info!(
                stack_name = %stack_name,
                attempt,
                slept_secs = slept.as_secs(),
                "Stack creation complete"
            );
            return Ok(PollReport {
                attempts: attempt,
                slept,
                stack_id: stack.stack_id,
            });
        }

        debug!(
            stack_name = %stack_name,
            attempt,
            status = %stack.status,
            detailed_status = stack.detailed_status.as_deref().unwrap_or("-"),
            description = stack.description.as_deref().unwrap_or("-"),
            reason = stack.reason.as_deref().unwrap_or("-"),
            "Stack not complete yet"
        );

        if stack.is_failed() {
            let reason = stack
                .reason
                .unwrap_or_else(|| "no reason reported".to_string());
            warn!(
                stack_name = %stack_name,
                attempt,
                status = %stack.status,
                reason = %reason,
                "Stack creation failed"
            );
            return Err(DeployError::StackCreateFailed {
                stack_name: stack_name.to_string(),
                status: stack.status,
                reason,
            });
        }

        info!(
            stack_name = %stack_name,
            attempt,
            max_attempts = policy.max_attempts,
            status = %stack.status,
            "Waiting for stack creation"
        );
        last_status = stack.status;

        // No point sleeping once the bound is spent
        if attempt < policy.max_attempts {
            sleeper.sleep(policy.interval).await;
            slept += policy.interval;
        }
    }

    warn!(
        stack_name = %stack_name,
        attempts = policy.max_attempts,
        last_status = %last_status,
        "Stack creation timed out"
    );
    Err(DeployError::PollTimeout {
        stack_name: stack_name.to_string(),
        attempts: policy.max_attempts,
        last_status,
    })
}
