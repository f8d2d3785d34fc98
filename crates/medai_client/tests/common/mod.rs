//! In-process axum server for integration tests. Every endpoint answers with one
//! canned JSON response and records the multipart form it received.

#![allow(dead_code)]

use std::net::TcpListener as StdTcpListener;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;

/// One multipart part: a text field or an uploaded file.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// One request as seen by the test server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub parts: Vec<FormPart>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Value of a text field, if present.
    pub fn form_field(&self, name: &str) -> Option<String> {
        self.parts
            .iter()
            .find(|p| p.name == name && p.file_name.is_none())
            .map(|p| String::from_utf8_lossy(&p.data).into_owned())
    }

    /// File part uploaded under `name`, if present.
    pub fn file(&self, name: &str) -> Option<&FormPart> {
        self.parts
            .iter()
            .find(|p| p.name == name && p.file_name.is_some())
    }
}

pub struct TestServer {
    pub url: String,
    requests: mpsc::Receiver<CapturedRequest>,
    _handle: std::thread::JoinHandle<()>,
}

impl TestServer {
    /// Next captured request (waits up to 5 s).
    pub fn next_request(&self) -> CapturedRequest {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("server should have received a request")
    }
}

/// Pick a free port by binding to :0 and extracting the assigned port.
pub fn free_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

struct Canned {
    status: StatusCode,
    body: String,
    requests: Mutex<mpsc::Sender<CapturedRequest>>,
}

async fn capture(
    State(canned): State<Arc<Canned>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(FormPart {
            name,
            file_name,
            content_type,
            data,
        });
    }

    let request = CapturedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        parts,
    };
    if let Ok(tx) = canned.requests.lock() {
        let _ = tx.send(request);
    }

    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body.clone(),
    )
}

/// Spawn a server on its own thread and runtime that answers the backend's
/// endpoints with `status` and `body` (served as `application/json`).
pub fn spawn_json_server(status: u16, body: &str) -> TestServer {
    let (tx, rx) = mpsc::channel();
    let (ready_tx, ready_rx) = mpsc::channel();
    let canned = Arc::new(Canned {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
        requests: Mutex::new(tx),
    });

    let handle = std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let router = Router::new()
                .route("/multimodal_chat", post(capture))
                .route("/chat", post(capture))
                .route("/search_image_web", post(capture))
                .with_state(canned);
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let _ = ready_tx.send(addr);
            axum::serve(listener, router).await.unwrap();
        });
    });

    let addr = ready_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("test server should bind");

    TestServer {
        url: format!("http://{}", addr),
        requests: rx,
        _handle: handle,
    }
}
