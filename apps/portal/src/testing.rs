//! Test doubles for the gateway, notifier and confirmation seams.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::Barrier;

use crate::gateway::{Gateway, GatewayError};
use crate::models::user::UserDescriptor;
use crate::notify::{Confirm, ConfirmPrompt, Level, Notification, Notifier};
use crate::session::{LocalSessionStore, SessionStore};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub token: Option<String>,
}

/// Scripted gateway. Unscripted calls succeed with `{}`.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<RecordedCall>>,
    responses: HashMap<(Method, String), Value>,
    failures: HashMap<(Method, String), (u16, Option<String>)>,
    gate: Option<(String, Arc<Barrier>)>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, method: Method, path: &str, body: Value) -> Self {
        self.responses.insert((method, path.to_string()), body);
        self
    }

    pub fn fail(mut self, method: Method, path: &str, status: u16, message: Option<&str>) -> Self {
        self.failures.insert(
            (method, path.to_string()),
            (status, message.map(String::from)),
        );
        self
    }

    /// Calls whose path starts with `prefix` block until `parties` of them are in flight.
    /// Sequential dispatch therefore never completes.
    pub fn gate(mut self, prefix: &str, parties: usize) -> Self {
        self.gate = Some((prefix.to_string(), Arc::new(Barrier::new(parties))));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.clone(),
            path: path.to_string(),
            body: body.cloned(),
            token: token.map(String::from),
        });

        if let Some((prefix, barrier)) = &self.gate {
            if path.starts_with(prefix.as_str()) {
                barrier.wait().await;
            }
        }

        let key = (method, path.to_string());
        if let Some((status, message)) = self.failures.get(&key) {
            return Err(GatewayError::Api {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(self.responses.get(&key).cloned().unwrap_or_else(|| json!({})))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self, level: Level) -> usize {
        self.all().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Answers every prompt with a fixed reply and counts how often it was asked.
pub struct ScriptedConfirm {
    answer: bool,
    asked: Mutex<usize>,
}

impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(0),
        }
    }

    pub fn asked(&self) -> usize {
        *self.asked.lock().unwrap()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        *self.asked.lock().unwrap() += 1;
        self.answer
    }
}

pub struct Harness {
    pub state: AppState,
    pub gateway: Arc<MockGateway>,
    pub notifier: Arc<RecordingNotifier>,
}

fn harness(gateway: MockGateway, session: LocalSessionStore) -> Harness {
    let gateway = Arc::new(gateway);
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState {
        gateway: gateway.clone(),
        session: Arc::new(session),
        notifier: notifier.clone(),
    };
    Harness {
        state,
        gateway,
        notifier,
    }
}

/// State with an in-memory session already logged in.
pub fn logged_in(gateway: MockGateway, is_admin: bool) -> Harness {
    let session = LocalSessionStore::in_memory();
    session
        .set_session(
            "tok-123",
            &UserDescriptor {
                id: Some(1),
                email: Some("user@corp.id".into()),
                is_admin,
            },
        )
        .unwrap();
    harness(gateway, session)
}

pub fn logged_out(gateway: MockGateway) -> Harness {
    harness(gateway, LocalSessionStore::in_memory())
}
