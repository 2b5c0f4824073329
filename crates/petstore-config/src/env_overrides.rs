use crate::{Capability, HarnessConfig, LogFormat};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "PETSTORE_";

/// Abstraction over environment-variable lookups so tests can supply
/// their own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the PETSTORE_ prefix
    /// Used for AWS standard variables (AWS_ACCESS_KEY_ID, etc.) and `ENV_*`
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the harness config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut HarnessConfig, env: &E) -> Result<()> {
    // Stack
    if let Some(name) = get_env_string(env, "STACK_NAME") {
        config.stack.name = name;
    }
    if let Some(path) = get_env_string(env, "TEMPLATE_PATH") {
        config.stack.template_path = PathBuf::from(path);
    }
    if let Some(raw) = get_env_string(env, "CAPABILITIES") {
        config.stack.capabilities = parse_capabilities(&raw)
            .with_context(|| format!("Invalid {}CAPABILITIES value", ENV_PREFIX))?;
    }
    if let Some(function) = get_env_string(env, "EXPECTED_FUNCTION") {
        config.stack.expected_function = function;
    }

    // Polling
    if let Some(val) = get_env_u32(env, "POLL_MAX_ATTEMPTS")? {
        config.poll.max_attempts = val;
    }
    if let Some(val) = get_env_u64(env, "POLL_INTERVAL_SECS")? {
        config.poll.interval_secs = val;
    }

    // Emulator
    if let Some(image) = get_env_string(env, "EMULATOR_IMAGE") {
        config.emulator.image = image;
    }
    if let Some(tag) = get_env_string(env, "EMULATOR_TAG") {
        config.emulator.tag = tag;
    }
    if let Some(endpoint) = get_env_string(env, "EMULATOR_ENDPOINT") {
        config.emulator.endpoint = Some(endpoint);
    }
    if let Some(val) = get_env_bool(env, "EMULATOR_DEBUG")? {
        config.emulator.debug = val;
    }
    if let Some(val) = get_env_bool(env, "EMULATOR_WEB_UI")? {
        config.emulator.web_ui = val;
    }
    if let Some(val) = get_env_u64(env, "EMULATOR_STARTUP_TIMEOUT_SECS")? {
        config.emulator.startup_timeout_secs = val;
    }
    if let Some(region) = get_env_string(env, "REGION") {
        config.emulator.region = region;
    }
    // AWS standard credentials (without PETSTORE_ prefix for compatibility)
    if let Some(access_key) = env.get_raw("AWS_ACCESS_KEY_ID") {
        config.emulator.access_key = access_key;
    }
    if let Some(secret_key) = env.get_raw("AWS_SECRET_ACCESS_KEY") {
        config.emulator.secret_key = secret_key;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.log.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }

    Ok(())
}

fn parse_capabilities(raw: &str) -> Result<Vec<Capability>> {
    let mut capabilities = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let capability = part.parse::<Capability>()?;
        if !capabilities.contains(&capability) {
            capabilities.push(capability);
        }
    }
    Ok(capabilities)
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key)
}

fn get_env_u32<E: EnvSource>(env: &E, key: &str) -> Result<Option<u32>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .trim()
                .parse::<u32>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_u64<E: EnvSource>(env: &E, key: &str) -> Result<Option<u64>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_bool<E: EnvSource>(env: &E, key: &str) -> Result<Option<bool>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = match val.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(anyhow!(
                        "Failed to parse {}{} (expected bool): {}",
                        ENV_PREFIX,
                        key,
                        other
                    ))
                }
            };
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
