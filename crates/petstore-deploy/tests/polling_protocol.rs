//! Stack-creation polling against a scripted emulator

mod harness;

use harness::{init_tracing, RecordingSleeper, ScriptedEmulator};
use petstore_deploy::{wait_for_stack_creation, DeployError, PollPolicy};
use std::time::Duration;

const STACK: &str = "PetStoreApiStack";

fn policy(max_attempts: u32) -> PollPolicy {
    PollPolicy::new(max_attempts, Duration::from_secs(10))
}

#[tokio::test]
async fn completes_on_third_poll_after_two_sleeps() {
    init_tracing();
    let emulator = ScriptedEmulator::new().with_statuses(&[
        "CREATE_IN_PROGRESS",
        "CREATE_IN_PROGRESS",
        "CREATE_COMPLETE",
    ]);
    let sleeper = RecordingSleeper::default();

    let report = wait_for_stack_creation(&emulator, STACK, &policy(5), &sleeper)
        .await
        .unwrap();

    assert_eq!(report.attempts, 3);
    assert_eq!(report.slept, Duration::from_secs(20));
    assert_eq!(emulator.describes(), 3);
    assert_eq!(sleeper.count(), 2);
    assert_eq!(sleeper.total(), Duration::from_secs(20));
    assert!(report.stack_id.is_some());
}

#[tokio::test]
async fn immediate_success_never_sleeps() {
    init_tracing();
    let emulator = ScriptedEmulator::new().with_statuses(&["CREATE_COMPLETE"]);
    let sleeper = RecordingSleeper::default();

    let report = wait_for_stack_creation(&emulator, STACK, &policy(5), &sleeper)
        .await
        .unwrap();

    assert_eq!(report.attempts, 1);
    assert_eq!(sleeper.count(), 0);
    assert_eq!(emulator.describes(), 1);
}

#[tokio::test]
async fn success_stops_polling() {
    init_tracing();
    // Anything after CREATE_COMPLETE must never be read
    let emulator = ScriptedEmulator::new().with_statuses(&[
        "CREATE_IN_PROGRESS",
        "CREATE_COMPLETE",
        "CREATE_FAILED",
        "CREATE_FAILED",
    ]);
    let sleeper = RecordingSleeper::default();

    let report = wait_for_stack_creation(&emulator, STACK, &policy(5), &sleeper)
        .await
        .unwrap();

    assert_eq!(report.attempts, 2);
    assert_eq!(emulator.describes(), 2);
}

#[tokio::test]
async fn failed_status_stops_immediately_with_reason() {
    init_tracing();
    let emulator = ScriptedEmulator::new()
        .with_statuses(&["CREATE_IN_PROGRESS"])
        .with_failure(
            "CREATE_FAILED",
            "No resource provider found for \"AWS::Serverless::Function\"",
        );
    let sleeper = RecordingSleeper::default();

    let err = wait_for_stack_creation(&emulator, STACK, &policy(5), &sleeper)
        .await
        .unwrap_err();

    match &err {
        DeployError::StackCreateFailed { status, reason, .. } => {
            assert_eq!(status, "CREATE_FAILED");
            assert!(reason.contains("AWS::Serverless::Function"));
        }
        other => panic!("expected StackCreateFailed, got {:?}", other),
    }
    assert!(err.to_string().contains("AWS::Serverless::Function"));
    assert_eq!(emulator.describes(), 2);
    assert_eq!(sleeper.count(), 1);
}

#[tokio::test]
async fn any_failed_suffix_is_terminal() {
    init_tracing();
    let emulator = ScriptedEmulator::new().with_failure("ROLLBACK_FAILED", "rollback broke");
    let sleeper = RecordingSleeper::default();

    let err = wait_for_stack_creation(&emulator, STACK, &policy(5), &sleeper)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "stack_create_failed");
    assert_eq!(emulator.describes(), 1);
    assert_eq!(sleeper.count(), 0);
}

#[tokio::test]
async fn never_completing_stack_times_out_without_deleting() {
    init_tracing();
    let emulator = ScriptedEmulator::new().with_statuses(&["CREATE_IN_PROGRESS"]);
    let sleeper = RecordingSleeper::default();

    let err = wait_for_stack_creation(&emulator, STACK, &policy(5), &sleeper)
        .await
        .unwrap_err();

    match err {
        DeployError::PollTimeout {
            attempts,
            last_status,
            ..
        } => {
            assert_eq!(attempts, 5);
            assert_eq!(last_status, "CREATE_IN_PROGRESS");
        }
        other => panic!("expected PollTimeout, got {:?}", other),
    }
    assert_eq!(emulator.describes(), 5);
    assert_eq!(sleeper.count(), 4);
    assert_eq!(emulator.deletes(), 0);
}

#[tokio::test]
async fn rollback_complete_is_not_success() {
    init_tracing();
    let emulator =
        ScriptedEmulator::new().with_statuses(&["ROLLBACK_IN_PROGRESS", "ROLLBACK_COMPLETE"]);
    let sleeper = RecordingSleeper::default();

    let err = wait_for_stack_creation(&emulator, STACK, &policy(3), &sleeper)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "poll_timeout");
    assert_eq!(emulator.describes(), 3);
}

#[tokio::test]
async fn thorough_policy_polls_thirty_times() {
    init_tracing();
    let emulator = ScriptedEmulator::new().with_statuses(&["CREATE_IN_PROGRESS"]);
    let sleeper = RecordingSleeper::default();

    let err = wait_for_stack_creation(&emulator, STACK, &PollPolicy::thorough(), &sleeper)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "poll_timeout");
    assert_eq!(emulator.describes(), 30);
    assert_eq!(sleeper.total(), Duration::from_secs(290));
}

#[tokio::test]
async fn missing_stack_propagates() {
    init_tracing();
    let emulator = ScriptedEmulator::new();
    let sleeper = RecordingSleeper::default();

    let err = wait_for_stack_creation(&emulator, STACK, &policy(5), &sleeper)
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::StackNotFound(ref name) if name == STACK));
    assert_eq!(sleeper.count(), 0);
}
