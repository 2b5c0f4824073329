//! petstore-deploy - CloudFormation deployment harness for the pet store stack
//!
//! Creates the stack on a cloud emulator, polls it to completion, checks that
//! the Lambda function and REST API exist, and deletes the stack again.
//!
//! ```no_run
//! use petstore_deploy::{run_suite, EmulatorSession, PollPolicy, StackRequest, TokioSleeper};
//! # async fn example(config: petstore_config::HarnessConfig) -> petstore_deploy::Result<()> {
//! let session = EmulatorSession::open(&config.emulator).await?;
//! let request = petstore_deploy::request_from_config(&config.stack).await?;
//! let outcome = run_suite(
//!     session.clients(),
//!     &request,
//!     &config.stack.expected_function,
//!     &PollPolicy::from(&config.poll),
//!     &TokioSleeper,
//! )
//! .await;
//! outcome.into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod aws;
pub mod deploy;
pub mod emulator;
pub mod error;
#[cfg(feature = "localstack")]
pub mod localstack;
pub mod poll;
pub mod session;
pub mod suite;
pub mod teardown;
pub mod verify;

pub use aws::{EmulatorEndpoint, ServiceClients};
pub use deploy::{deploy_stack, read_template, request_from_config};
pub use emulator::{
    Capability, CloudEmulator, RestApiSummary, StackRequest, StackSnapshot, CREATE_COMPLETE,
    FAILED_SUFFIX,
};
pub use error::{DeployError, Result};
pub use poll::{wait_for_stack_creation, PollPolicy, PollReport, Sleeper, TokioSleeper};
pub use session::EmulatorSession;
pub use suite::{run_deployment, run_suite, DeploymentReport, SuiteOutcome};
pub use teardown::{delete_stack, TeardownOutcome};
pub use verify::{require_api, require_function, verify_api, verify_function};
