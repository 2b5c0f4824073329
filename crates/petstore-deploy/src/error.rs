//! Error types for the deployment harness

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DeployError>;

/// Errors surfaced by deploy, poll, verify and teardown operations
#[derive(Debug, Error)]
pub enum DeployError {
    /// The emulator refused create-stack outright (malformed template,
    /// unsupported transform resource, name collision)
    #[error("Template rejected for stack '{stack_name}': {reason}")]
    TemplateRejected { stack_name: String, reason: String },

    /// Stack status ended in `_FAILED`
    #[error("Stack creation failed: {stack_name} reached {status}: {reason}")]
    StackCreateFailed {
        stack_name: String,
        status: String,
        reason: String,
    },

    /// No terminal status within the attempt bound
    #[error("Stack creation timed out: {stack_name} still {last_status} after {attempts} attempts")]
    PollTimeout {
        stack_name: String,
        attempts: u32,
        last_status: String,
    },

    /// An expected resource was absent after deployment
    #[error("Verification failed: {0}")]
    VerificationMismatch(String),

    /// describe-stacks returned nothing for the name
    #[error("Stack not found: {0}")]
    StackNotFound(String),

    /// Template file could not be read
    #[error("Failed to read template {path}: {source}")]
    TemplateRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Any other emulator call failed
    #[error("{operation} failed: {message}")]
    Emulator { operation: String, message: String },

    /// Emulator container could not be started or inspected
    #[error("Emulator container error: {0}")]
    Container(String),
}

impl DeployError {
    pub fn emulator(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Emulator {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Short label for the failed check, used in logs and CLI exit output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TemplateRejected { .. } => "template_rejected",
            Self::StackCreateFailed { .. } => "stack_create_failed",
            Self::PollTimeout { .. } => "poll_timeout",
            Self::VerificationMismatch(_) => "verification_mismatch",
            Self::StackNotFound(_) => "stack_not_found",
            Self::TemplateRead { .. } => "template_read",
            Self::Emulator { .. } => "emulator",
            Self::Container(_) => "container",
        }
    }
}
