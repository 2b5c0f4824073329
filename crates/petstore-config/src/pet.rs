// Application properties bound from the `env.*` namespace.
//
// Invalid values are dropped with a warning instead of failing startup.

use crate::env_overrides::EnvSource;
use crate::sources::StdEnvSource;
use serde::Serialize;
use tracing::warn;

/// Prefix shared by all pet store application properties
pub const PET_ENV_PREFIX: &str = "ENV_";

/// Pet store application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PetProperties {
    name: Option<String>,
    number: Option<i32>,
}

impl PetProperties {
    pub fn new(name: Option<String>, number: Option<i32>) -> Self {
        Self { name, number }
    }

    /// Bind from the process environment
    pub fn from_env() -> Self {
        Self::from_source(&StdEnvSource)
    }

    /// Bind from any environment source
    pub fn from_source<E: EnvSource>(env: &E) -> Self {
        let name = env
            .get_raw(&format!("{}NAME", PET_ENV_PREFIX))
            .filter(|v| !v.is_empty());

        let number = env
            .get_raw(&format!("{}NUMBER", PET_ENV_PREFIX))
            .and_then(|raw| match raw.trim().parse::<i32>() {
                Ok(n) => Some(n),
                Err(e) => {
                    warn!(
                        key = %format!("{}NUMBER", PET_ENV_PREFIX),
                        value = %raw,
                        error = %e,
                        "Ignoring invalid pet property"
                    );
                    None
                }
            });

        Self { name, number }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn number(&self) -> Option<i32> {
        self.number
    }
}
