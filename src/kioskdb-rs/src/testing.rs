//! In-memory transport for unit tests

use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::http::ApiRequest;
use crate::transport::{RawResponse, Transport};
use crate::{ClientError, Result};

enum Scripted {
    Response(RawResponse),
    Error(String),
}

/// Replays scripted responses in order and records every request it sees
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: RawResponse) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Response(response));
    }

    pub fn push_json(&self, body: Value) {
        self.push_response(RawResponse::new(200, body.to_string()));
    }

    pub fn push_error(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Error(message.to_string()));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Error(message)) => Err(ClientError::Transport(message)),
            None => Err(ClientError::Transport("no scripted response".to_string())),
        }
    }
}
