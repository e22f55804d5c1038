//! Local stand-in for every provider API
//!
//! One axum server on an ephemeral port serves all provider paths, records
//! each request and replies with the configured canned response. It also
//! serves `/images/portrait.png` and `/pages/about.html` for URL checks.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Canned reply for one provider endpoint
#[derive(Debug, Clone)]
pub enum MockReply {
    Json(Value),
    Status(u16),
    /// Body that is not valid JSON
    Malformed,
    /// One reply per request to the path, the last one repeating
    Sequence(Vec<MockReply>),
}

impl Default for MockReply {
    fn default() -> Self {
        MockReply::Json(json!({}))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockResponses {
    pub tmdb: MockReply,
    pub wikimedia: MockReply,
    pub unsplash: MockReply,
    pub pixabay: MockReply,
    pub pexels: MockReply,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct MockState {
    responses: Arc<MockResponses>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockState {
    /// Record the request and build the reply for its position on the path
    fn respond(&self, uri: &Uri, headers: &HeaderMap, mock: &MockReply) -> Response {
        let seen = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == uri.path())
            .count();
        self.record(uri, headers);
        reply(mock, seen)
    }

    fn record(&self, uri: &Uri, headers: &HeaderMap) {
        let request = RecordedRequest {
            path: uri.path().to_string(),
            query: uri.query().unwrap_or_default().to_string(),
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        };
        self.requests.lock().unwrap().push(request);
    }
}

pub struct MockProviderServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockProviderServer {
    pub async fn start(responses: MockResponses) -> Self {
        let state = MockState {
            responses: Arc::new(responses),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = state.requests.clone();

        let app = Router::new()
            .route("/3/search/multi", get(tmdb))
            .route("/w/api.php", get(wikimedia))
            .route("/search/photos", get(unsplash))
            .route("/api/", get(pixabay))
            .route("/v1/search", get(pexels))
            .route("/images/portrait.png", get(png))
            .route("/pages/about.html", get(html))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path starts with `prefix`
    pub fn hits(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .count()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn reply(mock: &MockReply, seen: usize) -> Response {
    match mock {
        MockReply::Sequence(replies) => match replies.get(seen).or(replies.last()) {
            Some(next) => reply(next, seen),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        MockReply::Json(value) => axum::Json(value.clone()).into_response(),
        MockReply::Status(code) => (
            StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "mock failure",
        )
            .into_response(),
        MockReply::Malformed => (
            [(header::CONTENT_TYPE, "application/json")],
            "{\"results\": [",
        )
            .into_response(),
    }
}

async fn tmdb(State(s): State<MockState>, uri: Uri, headers: HeaderMap) -> Response {
    s.respond(&uri, &headers, &s.responses.tmdb)
}

async fn wikimedia(State(s): State<MockState>, uri: Uri, headers: HeaderMap) -> Response {
    s.respond(&uri, &headers, &s.responses.wikimedia)
}

async fn unsplash(State(s): State<MockState>, uri: Uri, headers: HeaderMap) -> Response {
    s.respond(&uri, &headers, &s.responses.unsplash)
}

async fn pixabay(State(s): State<MockState>, uri: Uri, headers: HeaderMap) -> Response {
    s.respond(&uri, &headers, &s.responses.pixabay)
}

async fn pexels(State(s): State<MockState>, uri: Uri, headers: HeaderMap) -> Response {
    s.respond(&uri, &headers, &s.responses.pexels)
}

async fn png(State(s): State<MockState>, uri: Uri, headers: HeaderMap) -> Response {
    s.record(&uri, &headers);
    ([(header::CONTENT_TYPE, "image/png")], vec![0u8; 16]).into_response()
}

async fn html(State(s): State<MockState>, uri: Uri, headers: HeaderMap) -> Response {
    s.record(&uri, &headers);
    ([(header::CONTENT_TYPE, "text/html")], "<html></html>").into_response()
}
