#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use card_pass::{HttpReply, SignRequest, SignerTransport, Sleeper, TransportError};
use reqwest::Url;

/// One scripted outcome for a transport call.
#[derive(Debug, Clone)]
pub enum Step {
    Reply(u16, Vec<u8>),
    Fail(String),
    /// Runs into the per-attempt timeout before failing.
    Timeout,
    /// Never completes.
    Hang,
}

impl Step {
    pub fn ok(body: &[u8]) -> Self {
        Step::Reply(200, body.to_vec())
    }

    pub fn status(status: u16, body: &str) -> Self {
        Step::Reply(status, body.as_bytes().to_vec())
    }
}

#[derive(Debug, Clone)]
pub struct Call {
    pub url: Url,
    pub request: Option<SignRequest>,
    pub timeout: Duration,
}

/// Transport that replays a fixed script and records every call.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn play(&self, call: Call) -> Result<HttpReply, TransportError> {
        let timeout = call.timeout;
        self.calls.lock().unwrap().push(call);
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Step::Fail("script exhausted".to_string()));

        match step {
            Step::Reply(status, body) => Ok(HttpReply { status, body }),
            Step::Fail(reason) => Err(TransportError::Connection(reason)),
            Step::Timeout => {
                tokio::time::sleep(timeout).await;
                Err(TransportError::Connection("operation timed out".to_string()))
            }
            Step::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl SignerTransport for ScriptedTransport {
    async fn post_json(
        &self,
        url: Url,
        request: &SignRequest,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        self.play(Call {
            url,
            request: Some(request.clone()),
            timeout,
        })
        .await
    }

    async fn get(&self, url: Url, timeout: Duration) -> Result<HttpReply, TransportError> {
        self.play(Call {
            url,
            request: None,
            timeout,
        })
        .await
    }
}

/// Sleeper that returns immediately and remembers what it was asked for.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}
