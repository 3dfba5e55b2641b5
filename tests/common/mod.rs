#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    pub body: Vec<u8>,
}

impl Request {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json request body")
    }
}

pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: body.to_string().into_bytes(),
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".into(), "application/pdf".into())],
            body: body.to_vec(),
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            headers: vec![("Location".into(), location.into())],
            body: Vec::new(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::json(status, json!({"detail": "fake backend error"}))
    }
}

type Handler = dyn Fn(&Request) -> Reply + Send + Sync;

#[derive(Clone)]
struct Shared {
    requests: Arc<Mutex<Vec<Request>>>,
    handler: Arc<Handler>,
}

async fn record_and_reply(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let request = Request {
        method: method.to_string(),
        target,
        body: body.to_vec(),
    };
    shared.requests.lock().expect("request log").push(request.clone());

    let reply = (shared.handler)(&request);
    let status = StatusCode::from_u16(reply.status).expect("valid status");
    let mut builder = Response::builder().status(status);
    for (k, v) in &reply.headers {
        builder = builder.header(k.as_str(), v.as_str());
    }
    builder.body(Body::from(reply.body)).expect("fake response")
}

/// Axum server standing in for the prior authorization backend. Every
/// request is logged, then answered by the test's handler.
pub struct FakeBackend {
    addr: String,
    requests: Arc<Mutex<Vec<Request>>>,
    _runtime: tokio::runtime::Runtime,
}

impl FakeBackend {
    pub fn start(handler: impl Fn(&Request) -> Reply + Send + Sync + 'static) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("tokio runtime");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shared = Shared {
            requests: Arc::clone(&requests),
            handler: Arc::new(handler),
        };
        let app = Router::new()
            .fallback(record_and_reply)
            .layer(DefaultBodyLimit::disable())
            .with_state(shared);

        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("bind fake backend");
        let addr = format!("http://{}", listener.local_addr().expect("local addr"));
        runtime.spawn(async move { axum::serve(listener, app).await.expect("serve fake backend") });

        Self {
            addr,
            requests,
            _runtime: runtime,
        }
    }

    pub fn url(&self) -> &str {
        &self.addr
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("request log").clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path() == path)
            .count()
    }
}

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub files: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let files = tmp.path().join("files");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&files).expect("create files dir");
        Self {
            _tmp: tmp,
            home,
            files,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("priorauth");
        cmd.env("HOME", &self.home)
            .env("NO_PROXY", "127.0.0.1,localhost")
            .env_remove("PRIOR_AUTH_API_URL")
            .env_remove("HTTP_PROXY")
            .env_remove("HTTPS_PROXY")
            .env_remove("ALL_PROXY")
            .env_remove("http_proxy")
            .env_remove("https_proxy")
            .env_remove("all_proxy");
        cmd
    }

    pub fn api_cmd(&self, backend: &FakeBackend) -> Command {
        let mut cmd = self.cmd();
        cmd.args(["--api-url", backend.url()]);
        cmd
    }

    pub fn run_json(&self, backend: &FakeBackend, args: &[&str]) -> Value {
        let out = self
            .api_cmd(backend)
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_err(&self, backend: &FakeBackend, args: &[&str]) -> Value {
        let out = self
            .api_cmd(backend)
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json error output")
    }

    /// Writes a file of `size` bytes starting with a PDF header.
    pub fn pdf(&self, name: &str, size: u64) -> PathBuf {
        let path = self.files.join(name);
        let mut f = fs::File::create(&path).expect("create pdf");
        f.write_all(b"%PDF-1.4\n").expect("write pdf header");
        f.set_len(size).expect("size pdf");
        path
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.join(".config/priorauth/config.toml")
    }

    pub fn audit_lines(&self) -> Vec<Value> {
        let raw = fs::read_to_string(self.home.join(".config/priorauth/audit.jsonl"))
            .unwrap_or_default();
        raw.lines()
            .map(|l| serde_json::from_str(l).expect("audit line json"))
            .collect()
    }
}

pub fn path_str(p: &Path) -> &str {
    p.to_str().expect("utf8 path")
}

pub fn scenario_criteria() -> Value {
    json!({
        "id": "root",
        "type": "operation",
        "operator": "and",
        "description": "Lumbar MRI criteria",
        "children": [
            {
                "id": "a",
                "type": "criterion",
                "description": "Six weeks of physical therapy",
                "value": {"is_met": true, "answer": "Yes", "justification": "PT documented"}
            },
            {"id": "b", "type": "criterion", "description": "Red flag symptoms"}
        ]
    })
}

pub fn file_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "filename": format!("stored-{}", name),
        "original_name": name,
        "mime_type": "application/pdf",
        "size": 2048,
        "upload_date": "2024-03-05T10:00:00"
    })
}

pub fn record_json(id: &str, criteria: Option<Value>) -> Value {
    let mut rec = json!({
        "id": id,
        "patient_name": "Jane Doe",
        "date": "2024-03-05T10:00:00.123456",
        "procedure": "MRI Lumbar Spine",
        "status": "pending",
        "created_at": "2024-03-05T10:00:00",
        "updated_at": "2024-03-05T10:00:00",
        "auth_document": file_json("f-doc", "auth.pdf"),
        "clinical_notes": file_json("f-notes", "notes.pdf")
    });
    if let Some(c) = criteria {
        rec["auth_questions"] = c;
    }
    rec
}
