// petstore-stack - deploy the pet store stack onto a local cloud emulator
//
// Commands:
// - run:      deploy, wait, verify, tear down (one emulator session)
// - deploy:   create the stack and wait for it
// - verify:   check the function and REST API exist
// - teardown: best-effort delete of the stack
// - config:   print the resolved configuration
//
// deploy/verify/teardown are separate invocations, so they need an emulator
// that outlives the process (emulator.endpoint / PETSTORE_EMULATOR_ENDPOINT).

use anyhow::{bail, Context, Result};
use petstore_config::{HarnessConfig, PetProperties};
use petstore_deploy::{
    delete_stack, deploy_stack, request_from_config, require_api, require_function, run_suite,
    wait_for_stack_creation, EmulatorSession, PollPolicy, SuiteOutcome, TeardownOutcome,
    TokioSleeper,
};
use serde_json::json;
use tracing::{debug, info, Level};

mod init;

pub use init::init_tracing;

/// Install logging, then validate so config warnings reach the subscriber
pub fn prepare(config: &HarnessConfig) -> Result<()> {
    init_tracing(config);
    config.validate()
}

/// Full suite: deploy → wait → verify, then teardown regardless of outcome
pub async fn run(config: &HarnessConfig) -> Result<()> {
    let session = EmulatorSession::open(&config.emulator)
        .await
        .context("Failed to open emulator session")?;
    let request = request_from_config(&config.stack).await?;

    let outcome = run_suite(
        session.clients(),
        &request,
        &config.stack.expected_function,
        &PollPolicy::from(&config.poll),
        &TokioSleeper,
    )
    .await;

    dump_emulator_logs(&session, emulator_log_level(&outcome)).await;
    if let TeardownOutcome::Failed(reason) = &outcome.teardown {
        info!(reason = %reason, "Teardown did not complete; stack may need manual cleanup");
    }

    let report = outcome
        .into_result()
        .with_context(|| format!("Suite failed for stack {}", config.stack.name))?;
    info!(
        stack_id = %report.stack_id,
        attempts = report.poll.attempts,
        waited_secs = report.poll.slept.as_secs(),
        "Suite passed"
    );
    Ok(())
}

/// Create the stack and wait until it is complete
pub async fn deploy(config: &HarnessConfig) -> Result<()> {
    let session = open_external(config).await?;
    let request = request_from_config(&config.stack).await?;

    let stack_id = deploy_stack(session.clients(), &request).await?;
    let report = wait_for_stack_creation(
        session.clients(),
        request.name(),
        &PollPolicy::from(&config.poll),
        &TokioSleeper,
    )
    .await?;

    println!("{}", stack_id);
    info!(attempts = report.attempts, "Stack deployed");
    Ok(())
}

/// Check the expected function and at least one REST API exist
pub async fn verify(config: &HarnessConfig) -> Result<()> {
    let session = open_external(config).await?;
    require_function(session.clients(), &config.stack.expected_function).await?;
    require_api(session.clients()).await?;
    info!("Verification passed");
    Ok(())
}

/// Delete the stack; failures are reported but not fatal
pub async fn teardown(config: &HarnessConfig) -> Result<()> {
    let session = open_external(config).await?;
    match delete_stack(session.clients(), &config.stack.name).await {
        TeardownOutcome::Initiated => println!("deletion initiated: {}", config.stack.name),
        TeardownOutcome::Failed(reason) => println!("deletion failed: {}", reason),
    }
    Ok(())
}

/// Resolved harness config and pet properties as JSON
pub fn describe_config(config: &HarnessConfig, pets: &PetProperties) -> Result<String> {
    serde_json::to_string_pretty(&json!({
        "harness": config,
        "pet": pets,
    }))
    .context("Failed to serialize configuration")
}

async fn open_external(config: &HarnessConfig) -> Result<EmulatorSession> {
    if config.emulator.endpoint.is_none() {
        bail!(
            "this command needs a running emulator; set emulator.endpoint or PETSTORE_EMULATOR_ENDPOINT"
        );
    }
    EmulatorSession::open(&config.emulator)
        .await
        .context("Failed to open emulator session")
}

/// Emulator output is only interesting by default when the suite failed
fn emulator_log_level(outcome: &SuiteOutcome) -> Level {
    if outcome.deployment.is_err() {
        Level::INFO
    } else {
        Level::DEBUG
    }
}

async fn dump_emulator_logs(session: &EmulatorSession, level: Level) {
    let Some(logs) = session.emulator_logs().await else {
        return;
    };
    if level == Level::INFO {
        info!("Emulator logs:");
        for line in logs.lines() {
            info!("  {}", line);
        }
    } else {
        debug!("Emulator logs:");
        for line in logs.lines() {
            debug!("  {}", line);
        }
    }
}
