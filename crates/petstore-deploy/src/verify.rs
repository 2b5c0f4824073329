//! Post-deployment checks: the function exists by exact name, and at least
//! one REST API exists. Both only read from the emulator.

use crate::emulator::{CloudEmulator, RestApiSummary};
use crate::error::{DeployError, Result};
use tracing::{debug, info};

/// True iff `names` contains `expected` exactly (case-sensitive)
pub fn contains_function<S: AsRef<str>>(names: &[S], expected: &str) -> bool {
    names.iter().any(|n| n.as_ref() == expected)
}

/// True iff at least one REST API is listed
pub fn has_rest_api(apis: &[RestApiSummary]) -> bool {
    !apis.is_empty()
}

/// Check that a function with exactly `expected_name` is deployed
pub async fn verify_function(emulator: &dyn CloudEmulator, expected_name: &str) -> Result<bool> {
    let names = emulator.list_function_names().await?;
    debug!(functions = ?names, "Listed functions");

    let found = contains_function(&names, expected_name);
    info!(
        function_name = %expected_name,
        found,
        listed = names.len(),
        "Verified function"
    );
    Ok(found)
}

/// Check that the emulator lists at least one REST API
pub async fn verify_api(emulator: &dyn CloudEmulator) -> Result<bool> {
    let apis = emulator.list_rest_apis().await?;
    debug!(rest_apis = ?apis, "Listed REST APIs");

    let found = has_rest_api(&apis);
    info!(found, listed = apis.len(), "Verified REST APIs");
    Ok(found)
}

/// Like [`verify_function`], but a missing function is an error
pub async fn require_function(emulator: &dyn CloudEmulator, expected_name: &str) -> Result<()> {
    if verify_function(emulator, expected_name).await? {
        Ok(())
    } else {
        Err(DeployError::VerificationMismatch(format!(
            "Lambda function '{}' should be created",
            expected_name
        )))
    }
}

/// Like [`verify_api`], but an empty list is an error
pub async fn require_api(emulator: &dyn CloudEmulator) -> Result<()> {
    if verify_api(emulator).await? {
        Ok(())
    } else {
        Err(DeployError::VerificationMismatch(
            "API Gateway should have at least one REST API".to_string(),
        ))
    }
}
