//! In-memory transport that replays a fixed script of outcomes

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ETAG};

use super::{Transport, TransportFailure, TransportResponse};
use crate::request::OutboundRequest;

pub(crate) enum Step {
    Respond(TransportResponse),
    Fail(String),
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    /// Replayed once the script runs out
    fallback: Option<fn() -> Step>,
    latency: Option<Duration>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            ..Self::default()
        }
    }

    pub(crate) fn repeating(step: fn() -> Step) -> Self {
        Self {
            fallback: Some(step),
            ..Self::default()
        }
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub(crate) fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub(crate) fn json(status: u16, body: &str, etag: Option<&str>) -> Step {
    let mut headers = HeaderMap::new();
    if let Some(etag) = etag {
        headers.insert(ETAG, HeaderValue::from_str(etag).unwrap());
    }
    Step::Respond(TransportResponse::new(status, headers, body.as_bytes().to_vec()))
}

pub(crate) fn status(code: u16) -> Step {
    Step::Respond(TransportResponse::new(code, HeaderMap::new(), Vec::new()))
}

pub(crate) fn fail(message: &str) -> Step {
    Step::Fail(message.to_string())
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportFailure> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let step = self.steps.lock().unwrap().pop_front();
        let step = match (step, self.fallback) {
            (Some(step), _) => step,
            (None, Some(fallback)) => fallback(),
            (None, None) => Step::Fail("script exhausted".to_string()),
        };

        match step {
            Step::Respond(response) => Ok(response),
            Step::Fail(message) => Err(TransportFailure::new(message)),
        }
    }
}
