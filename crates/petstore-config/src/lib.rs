// petstore-config - Configuration for the pet store deployment harness
//
// Two independent pieces live here:
// - PetProperties: the application's `env.*` settings (name, number)
// - HarnessConfig: everything the deploy/verify/teardown flow needs
//
// HarnessConfig sources, highest priority first:
// 1. Environment variables (PETSTORE_* prefix)
// 2. Config file path from PETSTORE_CONFIG env var
// 3. Config file contents from PETSTORE_CONFIG_CONTENT env var
// 4. Default config file location (./petstore.toml)
// 5. Built-in defaults

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

mod env_overrides;
mod pet;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};
pub use pet::{PetProperties, PET_ENV_PREFIX};
pub use sources::StdEnvSource;

/// Stack name used when nothing else is configured
pub const DEFAULT_STACK_NAME: &str = "PetStoreApiStack";

/// Lambda function the pet store template creates
pub const DEFAULT_FUNCTION_NAME: &str = "pet-store-boot-3";

/// Main harness configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub stack: StackConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub emulator: EmulatorConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// What gets deployed and what the verifier expects afterwards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub name: String,
    pub template_path: PathBuf,
    pub capabilities: Vec<Capability>,
    pub expected_function: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_STACK_NAME.to_string(),
            template_path: PathBuf::from("templates/petstore-cloudformation.yaml"),
            capabilities: Capability::all().to_vec(),
            expected_function: DEFAULT_FUNCTION_NAME.to_string(),
        }
    }
}

/// Stack-creation polling bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval_secs: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Upper bound on time spent sleeping between polls, `None` on overflow
    pub fn max_wait(&self) -> Option<Duration> {
        self.interval().checked_mul(self.max_attempts.saturating_sub(1))
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval_secs: 10,
        }
    }
}

/// Local cloud emulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    pub image: String,
    pub tag: String,
    pub region: String,

    /// Use an already running emulator instead of starting a container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    pub access_key: String,
    #[serde(skip_serializing)]
    pub secret_key: String,

    /// Forwarded to the emulator as DEBUG=1
    pub debug: bool,
    /// Forwarded to the emulator as LOCALSTACK_WEB_UI=1
    pub web_ui: bool,
    pub web_ui_port: u16,
    pub startup_timeout_secs: u64,
}

impl EmulatorConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            image: "localstack/localstack".to_string(),
            tag: "3.8".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key: "test".to_string(),
            secret_key: "test".to_string(),
            debug: true,
            web_ui: true,
            web_ui_port: 8080,
            startup_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Template acknowledgement required before privileged resources are created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "CAPABILITY_IAM")]
    Iam,
    #[serde(rename = "CAPABILITY_NAMED_IAM")]
    NamedIam,
    #[serde(rename = "CAPABILITY_AUTO_EXPAND")]
    AutoExpand,
}

impl Capability {
    pub const fn all() -> [Capability; 3] {
        [
            Capability::Iam,
            Capability::NamedIam,
            Capability::AutoExpand,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Iam => "CAPABILITY_IAM",
            Capability::NamedIam => "CAPABILITY_NAMED_IAM",
            Capability::AutoExpand => "CAPABILITY_AUTO_EXPAND",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        match upper.strip_prefix("CAPABILITY_").unwrap_or(&upper) {
            "IAM" => Ok(Capability::Iam),
            "NAMED_IAM" => Ok(Capability::NamedIam),
            "AUTO_EXPAND" => Ok(Capability::AutoExpand),
            _ => anyhow::bail!(
                "Unsupported capability: {}. Supported: CAPABILITY_IAM, CAPABILITY_NAMED_IAM, CAPABILITY_AUTO_EXPAND",
                s
            ),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config(&StdEnvSource)
    }

    /// Load configuration from a specific file (for the CLI --config flag)
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        sources::load_from_file_path(path, &StdEnvSource)
    }

    /// Apply overrides from an arbitrary environment source, then validate
    pub fn with_env<E: EnvSource>(mut self, env: &E) -> Result<Self> {
        env_overrides::apply_env_overrides(&mut self, env)?;
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
