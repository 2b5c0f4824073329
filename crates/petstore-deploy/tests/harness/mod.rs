//! Scripted emulator and recording sleeper shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use petstore_deploy::{
    CloudEmulator, DeployError, RestApiSummary, Result, Sleeper, StackRequest, StackSnapshot,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const STACK_ID: &str = "arn:aws:cloudformation:us-east-1:000000000000:stack/PetStoreApiStack/1";

/// Initialize tracing subscriber for tests (call once)
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into()),
            )
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Emulator that replays a fixed status sequence.
///
/// Once the sequence is exhausted the last status repeats forever.
#[derive(Default)]
pub struct ScriptedEmulator {
    statuses: Mutex<VecDeque<StackSnapshot>>,
    last: Mutex<Option<StackSnapshot>>,
    functions: Vec<String>,
    rest_apis: Vec<RestApiSummary>,
    reject_create: Option<String>,
    fail_delete: Option<String>,
    pub created: Mutex<Vec<StackRequest>>,
    pub describe_calls: AtomicU32,
    pub delete_calls: AtomicU32,
    pub list_calls: AtomicU32,
}

impl ScriptedEmulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(mut self, statuses: &[&str]) -> Self {
        self.statuses = Mutex::new(
            statuses
                .iter()
                .map(|s| StackSnapshot {
                    stack_id: Some(STACK_ID.to_string()),
                    ..StackSnapshot::with_status(*s)
                })
                .collect(),
        );
        self
    }

    pub fn with_failure(mut self, status: &str, reason: &str) -> Self {
        let snapshot = StackSnapshot {
            reason: Some(reason.to_string()),
            ..StackSnapshot::with_status(status)
        };
        self.statuses.get_mut().unwrap().push_back(snapshot);
        self
    }

    pub fn with_functions(mut self, names: &[&str]) -> Self {
        self.functions = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_rest_apis(mut self, ids: &[&str]) -> Self {
        self.rest_apis = ids
            .iter()
            .map(|id| RestApiSummary {
                id: id.to_string(),
                name: Some("PetStoreApi".to_string()),
            })
            .collect();
        self
    }

    pub fn rejecting_create(mut self, reason: &str) -> Self {
        self.reject_create = Some(reason.to_string());
        self
    }

    pub fn failing_delete(mut self, message: &str) -> Self {
        self.fail_delete = Some(message.to_string());
        self
    }

    pub fn describes(&self) -> u32 {
        self.describe_calls.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> u32 {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CloudEmulator for ScriptedEmulator {
    async fn create_stack(&self, request: &StackRequest) -> Result<String> {
        if let Some(reason) = &self.reject_create {
            return Err(DeployError::TemplateRejected {
                stack_name: request.name().to_string(),
                reason: reason.clone(),
            });
        }
        self.created.lock().unwrap().push(request.clone());
        Ok(format!(
            "arn:aws:cloudformation:us-east-1:000000000000:stack/{}/1",
            request.name()
        ))
    }

    async fn describe_stack(&self, stack_name: &str) -> Result<StackSnapshot> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);

        let next = self.statuses.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(snapshot) => {
                *last = Some(snapshot.clone());
                Ok(snapshot)
            }
            None => last
                .clone()
                .ok_or_else(|| DeployError::StackNotFound(stack_name.to_string())),
        }
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_delete {
            Some(message) => Err(DeployError::emulator(
                "DeleteStack",
                format!("{}: {}", stack_name, message),
            )),
            None => Ok(()),
        }
    }

    async fn list_function_names(&self) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.functions.clone())
    }

    async fn list_rest_apis(&self) -> Result<Vec<RestApiSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rest_apis.clone())
    }
}

/// Sleeper that records requested durations instead of waiting
#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn total(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }

    pub fn count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
