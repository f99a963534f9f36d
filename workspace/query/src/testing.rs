//! Scripted transport and payload fixtures for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use common::Target;
use futures::channel::oneshot;

use crate::transport::{HttpResponse, Transport, TransportError};

pub const BASE_URL: &str = "http://hird.test";

/// Routes test logs to stderr for the current thread. The filter comes from
/// RUST_LOG and defaults to `warn`.
pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    Failure(String),
}

/// Releases one paused call when triggered or dropped.
pub struct Gate(Option<oneshot::Sender<()>>);

impl Gate {
    pub fn release(mut self) {
        if let Some(sender) = self.0.take() {
            let _ = sender.send(());
        }
    }
}

/// Fake transport keyed by path and query. Unknown routes answer 404.
///
/// Replies are looked up when a call completes, so a test can pause a call,
/// change the reply and then release it.
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<HashMap<String, Reply>>,
    gates: RefCell<HashMap<String, VecDeque<oneshot::Receiver<()>>>>,
    calls: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        self.replies
            .borrow_mut()
            .insert(path.to_string(), Reply::Response(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, path: &str, message: &str) {
        self.replies
            .borrow_mut()
            .insert(path.to_string(), Reply::Failure(message.to_string()));
    }

    /// Holds the next call to `path` until the returned gate is released.
    pub fn pause(&self, path: &str) -> Gate {
        let (sender, receiver) = oneshot::channel();
        self.gates
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .push_back(receiver);
        Gate(Some(sender))
    }

    /// Full URLs requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, path: &str) -> usize {
        let url = format!("{}{}", BASE_URL, path);
        self.calls.borrow().iter().filter(|call| **call == url).count()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.borrow_mut().push(url.to_string());
        let path = url.strip_prefix(BASE_URL).unwrap_or(url).to_string();

        let gate = self
            .gates
            .borrow_mut()
            .get_mut(&path)
            .and_then(|queue| queue.pop_front());
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let reply = self.replies.borrow().get(&path).cloned();
        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure(message)) => Err(TransportError::new(message)),
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}

pub fn cities_json() -> &'static str {
    r#"{"cities":["Calgary","Kelowna","Toronto"]}"#
}

pub fn forecast_json(city: &str, target: Target, value: f64) -> String {
    format!(
        r#"{{"city":"{city}","target":"{target}","horizon":12,"data":[{{"date":"2026-01-01","value":{value},"lower":{lower},"upper":{upper}}}]}}"#,
        lower = value * 0.95,
        upper = value * 1.05,
    )
}

pub fn risk_json(city: &str, score: f64) -> String {
    format!(
        r#"{{"city":"{city}","date":"2025-06","score":{score},"breakdown":[{{"name":"Affordability","status":"Tight"}}]}}"#
    )
}

pub fn anomalies_json(target: Target) -> String {
    format!(
        r#"{{"city":"Calgary","target":"{target}","signals":[{{"date":"2025-02","score":2.9,"is_anomaly":true}}]}}"#
    )
}
