//! In-process host that records every interaction.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::domain::model::HostId;
use crate::infra::host::{EventListener, HostTransport, PluginHost};

/// A single interaction with the host, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Request { message: String, payload: Value },
    CreateEmbeddedObject { embedded_type_id: HostId },
    ShowError { message: String },
}

impl HostCall {
    /// Message name for requests, `None` for other calls.
    pub fn message(&self) -> Option<&str> {
        match self {
            HostCall::Request { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Host double answering requests from scripted responses.
///
/// Unscripted messages answer `null`. Embedded objects get sequential numeric ids starting at
/// 1, or wherever `set_next_object_id` moved the counter.
pub struct RecordingHost {
    app_name: String,
    calls: Mutex<Vec<HostCall>>,
    responses: Mutex<HashMap<String, Value>>,
    failures: Mutex<HashMap<String, String>>,
    listeners: Mutex<HashMap<String, Vec<EventListener>>>,
    next_object_id: Mutex<u64>,
}

impl RecordingHost {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            listeners: Mutex::new(HashMap::new()),
            next_object_id: Mutex::new(1),
        }
    }

    /// Answer `message` with `response` from now on.
    pub fn respond(&self, message: impl Into<String>, response: Value) {
        self.responses.lock().insert(message.into(), response);
    }

    /// Fail every future `message` request with `reason`.
    pub fn fail(&self, message: impl Into<String>, reason: impl Into<String>) {
        self.failures.lock().insert(message.into(), reason.into());
    }

    /// Start handing out embedded-object ids from `id`.
    pub fn set_next_object_id(&self, id: u64) {
        *self.next_object_id.lock() = id;
    }

    /// Deliver a host event to every registered listener.
    pub fn emit(&self, event: &str, payload: Value) {
        let listeners = self.listeners.lock().get(event).cloned().unwrap_or_default();
        for listener in listeners {
            listener(payload.clone());
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.lock().get(event).map_or(0, Vec::len)
    }

    /// Names of the events that currently have listeners, sorted.
    pub fn listened_events(&self) -> Vec<String> {
        let mut events: Vec<String> = self
            .listeners
            .lock()
            .iter()
            .filter(|(_, listeners)| !listeners.is_empty())
            .map(|(event, _)| event.clone())
            .collect();
        events.sort();
        events
    }

    /// Snapshot of every recorded interaction.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Recorded requests as `(message, payload)` pairs.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                HostCall::Request { message, payload } => Some((message.clone(), payload.clone())),
                _ => None,
            })
            .collect()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<(String, Value)> {
        self.requests().pop()
    }

    /// Error messages shown to the user.
    pub fn shown_errors(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                HostCall::ShowError { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl HostTransport for RecordingHost {
    async fn request(&self, message: &str, payload: Value) -> Result<Value> {
        self.calls.lock().push(HostCall::Request {
            message: message.to_owned(),
            payload,
        });
        if let Some(reason) = self.failures.lock().get(message) {
            return Err(anyhow!("host rejected '{message}': {reason}"));
        }
        Ok(self
            .responses
            .lock()
            .get(message)
            .cloned()
            .unwrap_or(Value::Null))
    }

    fn on(&self, event: &str, listener: EventListener) {
        self.listeners
            .lock()
            .entry(event.to_owned())
            .or_default()
            .push(listener);
    }

    fn remove_listeners(&self, event: &str) {
        self.listeners.lock().remove(event);
    }
}

#[async_trait]
impl PluginHost for RecordingHost {
    fn app_name(&self) -> String {
        self.app_name.clone()
    }

    async fn create_embedded_object(&self, embedded_type_id: &HostId) -> Result<HostId> {
        self.calls.lock().push(HostCall::CreateEmbeddedObject {
            embedded_type_id: embedded_type_id.clone(),
        });
        let mut next = self.next_object_id.lock();
        let id = *next;
        *next += 1;
        Ok(HostId::from(id))
    }

    fn show_error_msg(&self, message: &str) {
        self.calls.lock().push(HostCall::ShowError {
            message: message.to_owned(),
        });
    }
}
