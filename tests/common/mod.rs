#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, patch, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use time::OffsetDateTime;

/// Unsigned JWT whose `exp` is `offset_secs` from now.
pub fn token_expiring_in(offset_secs: i64) -> String {
    let exp = OffsetDateTime::now_utc().unix_timestamp() + offset_secs;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "exp": exp, "email": "a@b.com" }).to_string());
    format!("{header}.{payload}.c2ln")
}

/// Requests seen by the fake backend, as `"METHOD path auth"`, plus any
/// payload notes the handlers add.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn record(&self, method: &Method, path: &str, headers: &HeaderMap) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        self.note(format!("{method} {path} {auth}"));
    }

    fn note(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }
}

/// Start a fake ShoeFastDesigner backend on a random local port.
pub async fn spawn_backend() -> (String, Calls) {
    let calls = Calls::default();
    let app = backend(calls.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://{addr}"), calls)
}

fn backend(calls: Calls) -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/unauthorized", any(|| async { StatusCode::UNAUTHORIZED }))
        .route(
            "/invalid",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": "Invalid credentials" })),
                )
            }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::BAD_GATEWAY, "<html>upstream down</html>") }),
        )
        .route("/sketch-to-image/shoe", post(generate))
        .route("/workflows/", get(workflows).post(create_workflow))
        .route("/workflows/latest-generation", get(latest_generation))
        .route("/workflows/generate-download-url/{*path}", get(download_url))
        .route("/workflows/{id}", get(workflow_detail))
        .route("/workflows/{id}/close", patch(|| async { StatusCode::NO_CONTENT }))
        .route(
            "/storage/collections",
            get(|| async { Json(json!({ "collections": [{ "name": "Summer", "count": 3 }] })) }),
        )
        .route("/storage/create-bucket", post(create_bucket))
        .route("/storage/save", post(save_design))
        .route(
            "/storage/leathers",
            get(|| async { Json(json!([{ "id": "leather-7", "name": "Nappa" }])) }),
        )
        .with_state(calls)
}

async fn echo(State(calls): State<Calls>, method: Method, headers: HeaderMap, body: String) -> Json<Value> {
    calls.record(&method, "/echo", &headers);
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    Json(json!({
        "method": method.as_str(),
        "authorization": header_str(header::AUTHORIZATION),
        "content_type": header_str(header::CONTENT_TYPE),
        "custom": header_str(header::HeaderName::from_static("x-custom")),
        "body": body,
    }))
}

async fn login(State(calls): State<Calls>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    calls.record(&Method::POST, "/auth/login", &headers);
    if body["password"] == "secret" {
        Json(json!({ "idToken": "abc", "email": body["email"].clone() })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn logout(State(calls): State<Calls>, headers: HeaderMap) -> StatusCode {
    calls.record(&Method::POST, "/auth/logout", &headers);
    StatusCode::OK
}

async fn generate(State(calls): State<Calls>, headers: HeaderMap) -> Response {
    calls.record(&Method::POST, "/sketch-to-image/shoe", &headers);
    let multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data; boundary="));
    if !multipart {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "expected multipart" })))
            .into_response();
    }
    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::HeaderName::from_static("x-generation-strategy"), "fallback"),
        ],
        vec![0x89, b'P', b'N', b'G'],
    )
        .into_response()
}

async fn workflows() -> Json<Value> {
    Json(json!([
        { "id": "wf-1", "name": "Runner", "status": "open" },
        { "id": "wf-2", "name": "Loafer", "status": "closed" }
    ]))
}

async fn create_workflow(State(calls): State<Calls>, Json(body): Json<Value>) -> Json<Value> {
    calls.note(format!("create-workflow {}", body["name"]));
    Json(json!({ "id": "wf-3", "name": body["name"].clone(), "status": "open" }))
}

fn generation(id: &str) -> Value {
    json!({
        "generation_id": id,
        "created_at": "2025-01-02T00:00:00Z",
        "image_url": format!("https://storage.example.com/generations/{id}.png"),
        "image_blob_path": format!("generations/{id}.png")
    })
}

/// `wf-1` has never been generated and reports `"generations": null`.
async fn workflow_detail(Path(id): Path<String>) -> Json<Value> {
    let generations = if id == "wf-1" {
        Value::Null
    } else {
        json!([generation("g-1"), generation("g-2")])
    };
    Json(json!({
        "workflow": { "id": id, "name": "Runner" },
        "generations": generations
    }))
}

/// Rejects the bearer token `expired` with `401`.
async fn latest_generation(headers: HeaderMap) -> Response {
    let expired = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer expired");
    if expired {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([{
        "id": "wf-2",
        "name": "Loafer",
        "latest_generation": generation("g-9")
    }]))
    .into_response()
}

async fn download_url(Path(path): Path<String>) -> Json<Value> {
    Json(json!({ "download_url": format!("https://storage.example.com/{path}?signature=x") }))
}

async fn create_bucket(State(calls): State<Calls>, Json(body): Json<Value>) -> StatusCode {
    calls.note(format!("create-bucket {}", body["collection_name"]));
    StatusCode::CREATED
}

/// Notes the raw multipart body so tests can look for the form fields.
async fn save_design(State(calls): State<Calls>, headers: HeaderMap, body: Bytes) -> Response {
    let multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data; boundary="));
    if !multipart {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "expected multipart" })))
            .into_response();
    }
    calls.note(format!("save {}", String::from_utf8_lossy(&body)));
    Json(json!({ "status": "saved" })).into_response()
}
