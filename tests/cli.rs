use assert_cmd::Command;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use predicates::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tokio::runtime::Runtime;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn names(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|v| v.get("name").and_then(|n| n.as_str()).unwrap().to_string())
        .collect()
}

#[derive(Clone)]
struct Canned {
    routes: Arc<HashMap<String, (u16, String)>>,
    hits: Arc<Mutex<Vec<String>>>,
}

/// Answer every request from the canned table, keyed by path and query.
async fn canned_handler(
    State(canned): State<Canned>,
    method: Method,
    uri: Uri,
    _body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    canned
        .hits
        .lock()
        .unwrap()
        .push(format!("{} {}", method, target));

    match canned.routes.get(&target) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap(),
            [(CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Local axum server answering canned responses by request target.
///
/// Unknown targets get an empty 404. Every request is recorded as
/// `METHOD target`. The server stops when the value is dropped.
struct StubServer {
    url: String,
    hits: Arc<Mutex<Vec<String>>>,
    _runtime: Runtime,
}

impl StubServer {
    fn start(routes: &[(&str, u16, &str)]) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();

        let canned = Canned {
            routes: Arc::new(
                routes
                    .iter()
                    .map(|(target, status, body)| {
                        (target.to_string(), (*status, body.to_string()))
                    })
                    .collect(),
            ),
            hits: Arc::new(Mutex::new(Vec::new())),
        };
        let hits = Arc::clone(&canned.hits);
        let app = Router::new().fallback(canned_handler).with_state(canned);

        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        runtime.spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url,
            hits,
            _runtime: runtime,
        }
    }

    fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Port nobody listens on
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn noteseek(api_url: &str, state_dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("noteseek"));
    for var in [
        "HTTP_PROXY",
        "http_proxy",
        "HTTPS_PROXY",
        "https_proxy",
        "ALL_PROXY",
        "all_proxy",
        "RUST_LOG",
        "NOTES_PASSWORD",
    ] {
        cmd.env_remove(var);
    }
    cmd.arg("--api-url")
        .arg(api_url)
        .arg("--timeout")
        .arg("5")
        .arg("--state-dir")
        .arg(state_dir);
    cmd
}

const LISTING: &str = r#"["lab1_report.pdf","lab2_report.pdf","report_final.pdf","final_report.pdf","cs101/hw1.pdf","cs101/hw2.pdf"]"#;

#[test]
fn search_ranks_remote_listing() {
    let temp = tempdir().unwrap();
    let server = StubServer::start(&[("/api/notes?search=report", 200, LISTING)]);

    let assert = noteseek(&server.url, temp.path())
        .arg("search")
        .arg("report")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(
        names(&items),
        vec![
            "report_final.pdf",
            "lab1_report.pdf",
            "lab2_report.pdf",
            "final_report.pdf"
        ]
    );
    assert_eq!(server.hits(), vec!["GET /api/notes?search=report"]);
}

#[test]
fn search_blank_query_lists_everything_collapsed() {
    let temp = tempdir().unwrap();
    let server = StubServer::start(&[(
        "/api/notes?search=",
        200,
        r#"{"notes":["cs101/hw1.pdf","cs101/hw2.pdf","standalone.txt"]}"#,
    )]);

    let assert = noteseek(&server.url, temp.path())
        .arg("search")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(names(&items), vec!["cs101/", "standalone.txt"]);
    assert_eq!(items[0]["isFolder"], true);
    assert_eq!(items[1]["isFolder"], false);
}

#[test]
fn search_network_failure_prints_nothing() {
    let temp = tempdir().unwrap();

    let assert = noteseek(&closed_port_url(), temp.path())
        .arg("search")
        .arg("lab")
        .assert()
        .success();
    assert!(parse_jsonl(&assert.get_output().stdout).is_empty());
}

#[test]
fn suggest_blank_query_skips_request() {
    let temp = tempdir().unwrap();
    let server = StubServer::start(&[]);

    let assert = noteseek(&server.url, temp.path())
        .arg("suggest")
        .arg("   ")
        .assert()
        .success();
    assert!(parse_jsonl(&assert.get_output().stdout).is_empty());
    assert!(server.hits().is_empty());
}

#[test]
fn download_falls_back_to_query_endpoint() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("out");
    let server = StubServer::start(&[("/api/notes/download?path=lab1.pdf", 200, "PDFDATA")]);

    noteseek(&server.url, temp.path())
        .arg("download")
        .arg("lab1.pdf")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("lab1.pdf"));

    assert_eq!(fs::read_to_string(out.join("lab1.pdf")).unwrap(), "PDFDATA");
    assert_eq!(
        server.hits(),
        vec![
            "GET /api/notes/download/lab1.pdf",
            "GET /api/notes/download?path=lab1.pdf"
        ]
    );
}

#[test]
fn download_folder_uses_zip_endpoint_last() {
    let temp = tempdir().unwrap();
    let server = StubServer::start(&[("/api/notes/download-zip?prefix=cs101%2F", 200, "ZIP")]);

    noteseek(&server.url, temp.path())
        .arg("download")
        .arg("cs101/")
        .arg("--out")
        .arg(temp.path())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(temp.path().join("cs101.zip")).unwrap(), "ZIP");
    assert_eq!(server.hits().len(), 3);
}

#[test]
fn download_exhaustion_shows_generic_alert() {
    let temp = tempdir().unwrap();
    let server = StubServer::start(&[]);

    noteseek(&server.url, temp.path())
        .arg("download")
        .arg("cs101")
        .arg("--folder")
        .arg("--out")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Download failed. Please try again or contact support.",
        ));

    assert_eq!(server.hits().len(), 3);
    assert!(!temp.path().join("cs101.zip").exists());
}

#[test]
fn upload_refuses_taken_name() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("notes.pdf");
    fs::write(&file, "pdf").unwrap();
    let server = StubServer::start(&[("/api/notes?search=notes.pdf", 200, r#"["notes.pdf"]"#)]);

    noteseek(&server.url, temp.path())
        .arg("upload")
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Name already taken"));

    assert_eq!(server.hits(), vec!["GET /api/notes?search=notes.pdf"]);
}

#[test]
fn upload_file_with_custom_name() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("draft.docx");
    fs::write(&file, "doc").unwrap();
    let server = StubServer::start(&[
        ("/api/notes?search=week1.pdf", 200, "[]"),
        ("/api/notes/upload", 200, "ok"),
    ]);

    noteseek(&server.url, temp.path())
        .arg("upload")
        .arg(&file)
        .arg("--name")
        .arg("week1")
        .arg("--type")
        .arg("pdf")
        .assert()
        .success()
        .stdout(predicate::str::contains("File upload successful! (week1.pdf)"));

    assert_eq!(
        server.hits(),
        vec!["GET /api/notes?search=week1.pdf", "POST /api/notes/upload"]
    );
}

#[test]
fn upload_server_conflict_exits_with_name_taken() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("course");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("a.txt"), "a").unwrap();
    let server = StubServer::start(&[("/api/notes/upload", 409, "Folder exists")]);

    noteseek(&server.url, temp.path())
        .arg("upload")
        .arg(&dir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Folder exists"));
}

#[test]
fn login_whoami_logout() {
    let temp = tempdir().unwrap();
    let state = temp.path().join("state");
    let server = StubServer::start(&[("/api/auth/login", 200, "Login successful")]);

    noteseek(&server.url, &state)
        .arg("login")
        .arg("--username")
        .arg("ada")
        .arg("--password")
        .arg("secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("Login successful"));
    assert!(state.join("session.json").exists());

    noteseek(&server.url, &state)
        .arg("whoami")
        .assert()
        .success()
        .stdout("ada\n");

    noteseek(&server.url, &state)
        .arg("logout")
        .assert()
        .success();
    assert!(!state.join("session.json").exists());
}

#[test]
fn login_failure_surfaces_server_text() {
    let temp = tempdir().unwrap();
    let server = StubServer::start(&[("/api/auth/login", 401, "Invalid credentials")]);

    noteseek(&server.url, temp.path())
        .arg("login")
        .arg("--username")
        .arg("ada")
        .write_stdin("wrong\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid credentials"));
    assert!(!temp.path().join("session.json").exists());
}

#[test]
fn note_writes_my_notes_file() {
    let temp = tempdir().unwrap();

    noteseek(&closed_port_url(), temp.path())
        .arg("note")
        .arg("--out")
        .arg(temp.path())
        .write_stdin("remember the lab")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("my-notes.txt")).unwrap(),
        "remember the lab"
    );
}

#[test]
fn rank_reads_listing_from_stdin() {
    let temp = tempdir().unwrap();

    let assert = noteseek(&closed_port_url(), temp.path())
        .arg("rank")
        .arg("--input")
        .arg("-")
        .arg("lab 2")
        .write_stdin(LISTING)
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(names(&items), vec!["lab2_report.pdf"]);
}

#[test]
fn live_submit_line_searches_immediately() {
    let temp = tempdir().unwrap();
    let server = StubServer::start(&[("/api/notes?search=hw", 200, LISTING)]);

    let assert = noteseek(&server.url, temp.path())
        .arg("live")
        .write_stdin("!hw\n")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(names(&items), vec!["cs101/"]);
}

#[test]
fn live_burst_sends_only_last_query() {
    let temp = tempdir().unwrap();
    let server = StubServer::start(&[("/api/notes?search=lab2", 200, LISTING)]);

    let assert = noteseek(&server.url, temp.path())
        .arg("live")
        .arg("--debounce-ms")
        .arg("200")
        .write_stdin("l\nla\nlab\nlab2\n")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(names(&items), vec!["lab2_report.pdf"]);
    assert_eq!(server.hits(), vec!["GET /api/notes?search=lab2"]);
}
