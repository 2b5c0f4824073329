//! Best-effort stack deletion. Failures are logged and reported, never raised.

use crate::emulator::CloudEmulator;
use tracing::{info, warn};

/// Result of a delete-stack attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// delete-stack was accepted; deletion continues asynchronously
    Initiated,
    /// delete-stack failed; the error message is kept for reporting
    Failed(String),
}

impl TeardownOutcome {
    pub fn is_initiated(&self) -> bool {
        matches!(self, TeardownOutcome::Initiated)
    }
}

/// Issue delete-stack for `stack_name`. Does not wait for deletion.
pub async fn delete_stack(emulator: &dyn CloudEmulator, stack_name: &str) -> TeardownOutcome {
    info!(stack_name = %stack_name, "Deleting stack");

    match emulator.delete_stack(stack_name).await {
        Ok(()) => {
            info!(stack_name = %stack_name, "Stack deletion initiated");
            TeardownOutcome::Initiated
        }
        Err(e) => {
            warn!(stack_name = %stack_name, error = %e, "Failed to delete stack");
            TeardownOutcome::Failed(e.to_string())
        }
    }
}
