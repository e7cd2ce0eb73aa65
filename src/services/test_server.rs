//! Canned HTTP responder for client tests
//!
//! An `axum` router on an ephemeral port. Every request is recorded and
//! answered with the next scripted response (the last one repeats).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, mpsc};

/// One scripted reply
#[derive(Clone, Debug)]
pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Wait before answering; the request is recorded first
    pub delay: Duration,
}

impl Canned {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request as the server received it
#[derive(Debug)]
pub struct Recorded {
    pub method: Method,
    /// Path plus query string
    pub target: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    /// `"<METHOD> <path>?<query>"`
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.target)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

struct Script {
    replies: Vec<Canned>,
    next: AtomicUsize,
    seen: mpsc::UnboundedSender<Recorded>,
}

impl Script {
    fn reply(&self) -> Option<Canned> {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        self.replies
            .get(index.min(self.replies.len().saturating_sub(1)))
            .cloned()
    }
}

async fn answer(
    State(script): State<Arc<Script>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let _ = script.seen.send(Recorded {
        method,
        target,
        headers,
        body,
    });

    match script.reply() {
        Some(reply) => {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(CONTENT_TYPE, reply.content_type)], reply.body).into_response()
        }
        None => StatusCode::NOT_IMPLEMENTED.into_response(),
    }
}

pub struct TestServer {
    port: u16,
    requests: Mutex<mpsc::UnboundedReceiver<Recorded>>,
}

impl TestServer {
    /// Answer every request with the same response
    pub async fn respond(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self::sequence(vec![Canned {
            status,
            content_type,
            body,
            delay: Duration::ZERO,
        }])
        .await
    }

    /// Answer requests with the scripted responses in order
    pub async fn sequence(replies: Vec<Canned>) -> Self {
        let (seen, rx) = mpsc::unbounded_channel();
        let script = Arc::new(Script {
            replies,
            next: AtomicUsize::new(0),
            seen,
        });
        let app = Router::new().fallback(answer).with_state(script);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            port,
            requests: Mutex::new(rx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Next recorded request, in arrival order
    pub async fn request(&self) -> Recorded {
        self.requests
            .lock()
            .await
            .recv()
            .await
            .expect("request recorded")
    }
}

/// URL of a local port with nothing listening on it
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_requests_and_repeats_last_reply() {
        let server = TestServer::sequence(vec![
            Canned::json(201, r#"{"n": 1}"#),
            Canned::json(200, r#"{"n": 2}"#),
        ])
        .await;
        let client = reqwest::Client::new();
        let url = format!("{}/api/echo?x=1", server.base_url());

        let body = "0\r\n\r\nnach dem Trenner";
        let first = client.post(&url).body(body).send().await.expect("send");
        assert_eq!(first.status().as_u16(), 201);
        for _ in 0..2 {
            let reply = client.get(&url).send().await.expect("send");
            assert_eq!(reply.text().await.expect("text"), r#"{"n": 2}"#);
        }

        let recorded = server.request().await;
        assert_eq!(recorded.line(), "POST /api/echo?x=1");
        assert_eq!(recorded.body_text(), body);
        assert_eq!(server.request().await.method, Method::GET);
    }
}
