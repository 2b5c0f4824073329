//! End-to-end suite runs against a scripted emulator

mod harness;

use harness::{init_tracing, RecordingSleeper, ScriptedEmulator};
use petstore_deploy::{
    deploy_stack, read_template, run_suite, Capability, DeployError, PollPolicy, StackRequest,
    TeardownOutcome,
};
use std::time::Duration;

const TEMPLATE: &str = include_str!("../../../templates/petstore-cloudformation.yaml");

fn request() -> StackRequest {
    StackRequest::new("PetStoreApiStack", TEMPLATE, Capability::all())
}

#[tokio::test]
async fn happy_path_deploys_verifies_and_tears_down() {
    init_tracing();
    let emulator = ScriptedEmulator::new()
        .with_statuses(&["CREATE_IN_PROGRESS", "CREATE_IN_PROGRESS", "CREATE_COMPLETE"])
        .with_functions(&["pet-store-boot-3"])
        .with_rest_apis(&["petstore"]);
    let sleeper = RecordingSleeper::default();

    let outcome = run_suite(
        &emulator,
        &request(),
        "pet-store-boot-3",
        &PollPolicy::default(),
        &sleeper,
    )
    .await;

    assert_eq!(outcome.teardown, TeardownOutcome::Initiated);
    let report = outcome.into_result().unwrap();
    assert!(report.stack_id.contains("PetStoreApiStack"));
    assert_eq!(report.poll.attempts, 3);
    assert_eq!(sleeper.total(), Duration::from_secs(20));
    assert_eq!(emulator.deletes(), 1);

    let created = emulator.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].capabilities().len(), 3);
}

#[tokio::test]
async fn rejected_template_still_tears_down() {
    init_tracing();
    let emulator = ScriptedEmulator::new()
        .rejecting_create("No resource provider found for \"AWS::Serverless::Function\"");
    let sleeper = RecordingSleeper::default();

    let outcome = run_suite(
        &emulator,
        &request(),
        "pet-store-boot-3",
        &PollPolicy::default(),
        &sleeper,
    )
    .await;

    assert!(outcome.teardown.is_initiated());
    let err = outcome.into_result().unwrap_err();
    assert!(matches!(err, DeployError::TemplateRejected { .. }));
    assert_eq!(emulator.describes(), 0);
    assert_eq!(sleeper.count(), 0);
}

#[tokio::test]
async fn missing_function_fails_after_completion() {
    init_tracing();
    let emulator = ScriptedEmulator::new()
        .with_statuses(&["CREATE_COMPLETE"])
        .with_functions(&["something-else"])
        .with_rest_apis(&["petstore"]);
    let sleeper = RecordingSleeper::default();

    let outcome = run_suite(
        &emulator,
        &request(),
        "pet-store-boot-3",
        &PollPolicy::default(),
        &sleeper,
    )
    .await;

    let err = outcome.into_result().unwrap_err();
    assert_eq!(err.kind(), "verification_mismatch");
    assert_eq!(emulator.deletes(), 1);
}

#[tokio::test]
async fn teardown_failure_does_not_mask_result() {
    init_tracing();
    let emulator = ScriptedEmulator::new()
        .with_statuses(&["CREATE_COMPLETE"])
        .with_functions(&["pet-store-boot-3"])
        .with_rest_apis(&["petstore"])
        .failing_delete("throttled");
    let sleeper = RecordingSleeper::default();

    let outcome = run_suite(
        &emulator,
        &request(),
        "pet-store-boot-3",
        &PollPolicy::default(),
        &sleeper,
    )
    .await;

    assert!(!outcome.teardown.is_initiated());
    assert!(outcome.into_result().is_ok());
}

#[tokio::test]
async fn empty_template_is_rejected_before_sending() {
    init_tracing();
    let emulator = ScriptedEmulator::new();
    let request = StackRequest::new("PetStoreApiStack", "   \n", [Capability::Iam]);

    let err = deploy_stack(&emulator, &request).await.unwrap_err();
    assert!(matches!(err, DeployError::TemplateRejected { .. }));
    assert!(emulator.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn bundled_template_is_readable() {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../templates/petstore-cloudformation.yaml"
    );
    let body = read_template(path).await.unwrap();
    assert!(body.contains("pet-store-boot-3"));
    assert!(body.contains("AWS::Serverless-2016-10-31"));
}

#[tokio::test]
async fn unreadable_template_is_reported() {
    let err = read_template("/nonexistent/template.yaml")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "template_read");
}
