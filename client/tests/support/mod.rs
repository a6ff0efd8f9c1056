//! Loopback HTTP backend double for integration tests.
//!
//! Answers each connection with the next queued response and records what
//! the client sent. Every response closes its connection, so the client
//! never reuses a socket the stub has already dropped.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

/// Canned HTTP response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

impl StubResponse {
    /// `200 OK` carrying a `{code, data, msg}` envelope.
    pub fn envelope(code: i64, data: Value, msg: &str) -> Self {
        Self::raw(200, json!({"code": code, "data": data, "msg": msg}).to_string())
    }

    /// Successful envelope around `data`.
    pub fn ok(data: Value) -> Self {
        Self::envelope(200, data, "success")
    }

    /// Arbitrary status and body.
    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    /// Wait before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Request as seen by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query, e.g. `/api/v1/products?page=1`.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

type Shared<T> = Arc<Mutex<T>>;

/// Running stub backend bound to an ephemeral loopback port.
pub struct StubBackend {
    addr: SocketAddr,
    requests: Shared<Vec<RecordedRequest>>,
    responses: Shared<VecDeque<StubResponse>>,
    task: JoinHandle<()>,
}

impl StubBackend {
    /// Start serving `responses` in order; once exhausted every request gets
    /// an empty success envelope.
    pub async fn start(responses: impl IntoIterator<Item = StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");
        let requests: Shared<Vec<RecordedRequest>> = Arc::default();
        let responses: Shared<VecDeque<StubResponse>> =
            Arc::new(Mutex::new(responses.into_iter().collect()));

        let task = tokio::spawn({
            let requests = Arc::clone(&requests);
            let responses = Arc::clone(&responses);
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let response = lock(&responses)
                        .pop_front()
                        .unwrap_or_else(|| StubResponse::ok(Value::Null));
                    let requests = Arc::clone(&requests);
                    tokio::spawn(async move {
                        serve(stream, response, &requests).await;
                    });
                }
            }
        });

        Self {
            addr,
            requests,
            responses,
            task,
        }
    }

    /// Origin the client should be configured with.
    pub fn origin(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("origin url")
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// The only request received; panics otherwise.
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().expect("one request")
    }

    /// Queue another response.
    pub fn push(&self, response: StubResponse) {
        lock(&self.responses).push_back(response);
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Address nothing listens on.
pub async fn unused_origin() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("origin url")
}

async fn serve(mut stream: TcpStream, response: StubResponse, requests: &Mutex<Vec<RecordedRequest>>) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };
    lock(requests).push(request);

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }
    let head = format!(
        "HTTP/1.1 {} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        response.body.len()
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(response.body.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];
    let header_end = loop {
        if let Some(end) = find_header_end(&buffer) {
            break end;
        }
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_owned();
    let target = request_line.next()?.to_owned();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer.split_off(header_end + 4);
    while body.len() < content_length {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
