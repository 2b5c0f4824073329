// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &HarnessConfig) -> Result<()> {
    validate_stack_config(&config.stack)?;
    validate_poll_config(&config.poll)?;
    validate_emulator_config(&config.emulator)?;
    Ok(())
}

fn validate_stack_config(config: &StackConfig) -> Result<()> {
    if config.name.trim().is_empty() {
        bail!("stack.name cannot be empty");
    }

    // CloudFormation stack names: letter first, then alphanumerics and hyphens
    let mut chars = config.name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_with_letter || !chars.all(|c| c.is_ascii_alphanumeric() || c == '-') {
        bail!(
            "stack.name '{}' must start with a letter and contain only letters, digits, and hyphens",
            config.name
        );
    }
    if config.name.len() > 128 {
        bail!("stack.name must be at most 128 characters");
    }

    if config.expected_function.trim().is_empty() {
        bail!("stack.expected_function cannot be empty");
    }

    if config.capabilities.is_empty() {
        warn!("stack.capabilities is empty; templates creating IAM resources will be rejected");
    }

    Ok(())
}

/// Longest accepted pause between status polls
const MAX_INTERVAL_SECS: u64 = 60 * 60;

fn validate_poll_config(config: &PollConfig) -> Result<()> {
    if config.max_attempts == 0 {
        bail!("poll.max_attempts must be greater than 0");
    }

    if config.interval_secs > MAX_INTERVAL_SECS {
        bail!(
            "poll.interval_secs must be at most {} (got {})",
            MAX_INTERVAL_SECS,
            config.interval_secs
        );
    }

    let Some(max_wait) = config.max_wait() else {
        bail!(
            "poll window of {} attempts every {}s is too large",
            config.max_attempts,
            config.interval_secs
        );
    };

    // Warn about very long poll windows
    if max_wait.as_secs() > 30 * 60 {
        warn!(
            max_attempts = config.max_attempts,
            interval_secs = config.interval_secs,
            "poll window exceeds 30 minutes"
        );
    }

    Ok(())
}

fn validate_emulator_config(config: &EmulatorConfig) -> Result<()> {
    if config.region.trim().is_empty() {
        bail!("emulator.region cannot be empty");
    }

    if let Some(endpoint) = &config.endpoint {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            bail!(
                "emulator.endpoint '{}' must start with http:// or https://",
                endpoint
            );
        }
    } else {
        if config.image.trim().is_empty() || config.tag.trim().is_empty() {
            bail!("emulator.image and emulator.tag are required when no endpoint is set");
        }
        if config.startup_timeout_secs == 0 {
            bail!("emulator.startup_timeout_secs must be greater than 0");
        }
    }

    Ok(())
}
