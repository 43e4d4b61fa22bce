//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use edge_relay::fetch::{FetchError, OutboundRequest, Upstream, UpstreamResponse};
use edge_relay::{HttpServer, RelayConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// What a [`FakeUpstream`] does with a request.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Respond(u16, String),
    Fail(String),
    /// Never answers; only cancellation ends it.
    Hang,
}

type Behavior = dyn Fn(&OutboundRequest) -> FakeReply + Send + Sync;

/// In-memory upstream that records what it was asked for.
#[derive(Clone)]
pub struct FakeUpstream {
    behavior: Arc<Behavior>,
    pub seen: Arc<Mutex<Vec<OutboundRequest>>>,
    pub tokens: Arc<Mutex<Vec<CancellationToken>>>,
    pub in_flight: Arc<AtomicUsize>,
}

impl FakeUpstream {
    pub fn new<F>(behavior: F) -> Self
    where
        F: Fn(&OutboundRequest) -> FakeReply + Send + Sync + 'static,
    {
        Self {
            behavior: Arc::new(behavior),
            seen: Arc::default(),
            tokens: Arc::default(),
            in_flight: Arc::default(),
        }
    }

    pub fn always(reply: FakeReply) -> Self {
        Self::new(move |_| reply.clone())
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Upstream for FakeUpstream {
    fn get(
        &self,
        request: OutboundRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<UpstreamResponse, FetchError>> + Send {
        let this = self.clone();
        async move {
            this.seen.lock().unwrap().push(request.clone());
            this.tokens.lock().unwrap().push(cancel.clone());
            let _flight = InFlight::enter(&this.in_flight);

            match (this.behavior)(&request) {
                FakeReply::Respond(status, body) => Ok(UpstreamResponse {
                    status: StatusCode::from_u16(status).unwrap(),
                    headers: HeaderMap::new(),
                    body,
                }),
                FakeReply::Fail(message) => Err(FetchError::Transport(message)),
                FakeReply::Hang => {
                    cancel.cancelled().await;
                    Err(FetchError::Cancelled)
                }
            }
        }
    }
}

/// Router backed by `upstream`, ready for `oneshot`.
pub fn router_with(config: RelayConfig, upstream: FakeUpstream) -> Router {
    HttpServer::with_upstream(config, upstream).router()
}

/// Send one request through the router and collect the parts.
pub async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

/// Percent-encode a target for the `url` query parameter.
pub fn relay_uri(target: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("/api/rss-proxy?url={encoded}")
}

/// A canned HTTP/1.1 reply for the mock backend.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Start a programmable mock backend on an ephemeral loopback port.
///
/// Returns its address and the raw request heads it received.
pub async fn start_programmable_backend<F>(f: F) -> (SocketAddr, Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let heads: Arc<Mutex<Vec<String>>> = Arc::default();
    let f = Arc::new(f);
    let recorded = heads.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&buf).into_owned();
                recorded.lock().unwrap().push(head.clone());

                let reply = f(&head);
                tokio::time::sleep(reply.delay).await;

                let reason = StatusCode::from_u16(reply.status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown");
                let mut response = format!("HTTP/1.1 {} {}\r\n", reply.status, reason);
                for (name, value) in &reply.headers {
                    response.push_str(&format!("{name}: {value}\r\n"));
                }
                response.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.body.len(),
                    reply.body
                ));
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, heads)
}
