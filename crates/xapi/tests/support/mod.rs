//! Scripted transport shared by the client integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use xapi::client::{HttpRequest, HttpResponse, LrsClient, LrsConfig, Transport};
use xapi::{Auth, TransportError};

pub const ENDPOINT: &str = "https://lrs.example.com/xapi/";

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.respond_with_headers(status, &[], body)
    }

    pub fn respond_with_headers(self, status: u16, headers: &[(&str, &str)], body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body: body.as_bytes().to_vec(),
        }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses.lock().unwrap().push_back(Err(TransportError::new(message)));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request was sent")
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted response left")))
    }
}

/// Routes `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config() -> LrsConfig {
    LrsConfig::builder()
        .endpoint(ENDPOINT)
        .auth(Auth::basic("user", "pass"))
        .build()
        .unwrap()
}

pub fn client(transport: FakeTransport) -> LrsClient<FakeTransport> {
    init_tracing();
    LrsClient::new(config(), transport).unwrap()
}

/// Query parameters of a request, decoded.
pub fn query(request: &HttpRequest) -> Vec<(String, String)> {
    request.url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
}

pub fn param(request: &HttpRequest, name: &str) -> Option<String> {
    request.url.query_pairs().find(|(k, _)| k == name).map(|(_, v)| v.into_owned())
}
