use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use base64::Engine as _;
use serde_json::{Value, json};

/// One directory entry served by the stub's contents endpoint.
#[derive(Debug, Clone)]
pub struct StubEntry {
    pub name: String,
    pub kind: String,
    pub download_url: Option<String>,
}

#[allow(dead_code)]
impl StubEntry {
    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind: "file".to_owned(),
            download_url: Some(format!(
                "https://raw.githubusercontent.com/AINovelist/stories/main/{name}"
            )),
        }
    }

    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind: "dir".to_owned(),
            download_url: None,
        }
    }
}

/// In-memory picture of the story repository the stub serves.
#[derive(Debug, Clone, Default)]
pub struct StubRepo {
    /// Directory path -> listing.
    pub dirs: Vec<(String, Vec<StubEntry>)>,
    /// File path -> decoded text content.
    pub files: Vec<(String, String)>,
    /// Paths answered with 403 and a rate-limit message.
    pub forbidden: Vec<String>,
    /// Code search hits: (name, path, html_url).
    pub search_items: Vec<(String, String, String)>,
}

/// Minimal GitHub API double: repository contents (directories and base64
/// files) plus code search, backed by the fixtures above.
pub struct GithubStub {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl GithubStub {
    pub fn spawn(repo: StubRepo) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start github stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_owned();
                let path = percent_decode(url.split('?').next().unwrap_or(&url));
                let (status, body) = respond_to(&path, &repo);

                let mut response =
                    tiny_http::Response::from_string(body.to_string()).with_status_code(status);
                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("build header");
                response = response.with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for GithubStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond_to(path: &str, repo: &StubRepo) -> (u16, Value) {
    if path == "/search/code" {
        let items: Vec<Value> = repo
            .search_items
            .iter()
            .map(|(name, path, html_url)| {
                json!({ "name": name, "path": path, "html_url": html_url })
            })
            .collect();
        return (200, json!({ "total_count": items.len(), "items": items }));
    }

    let Some(rest) = path.strip_prefix("/repos/") else {
        return (404, json!({ "message": "Not Found" }));
    };
    let Some((_repo_part, contents_path)) = rest.split_once("/contents/") else {
        return (404, json!({ "message": "Not Found" }));
    };

    if repo.forbidden.iter().any(|p| p == contents_path) {
        return (403, json!({ "message": "API rate limit exceeded" }));
    }

    if let Some((dir, entries)) = repo.dirs.iter().find(|(dir, _)| dir == contents_path) {
        let listing: Vec<Value> = entries
            .iter()
            .map(|entry| {
                json!({
                    "name": entry.name,
                    "path": format!("{dir}/{}", entry.name),
                    "type": entry.kind,
                    "download_url": entry.download_url,
                })
            })
            .collect();
        return (200, Value::Array(listing));
    }

    if let Some((_, text)) = repo.files.iter().find(|(file, _)| file == contents_path) {
        let name = contents_path.rsplit('/').next().unwrap_or(contents_path);
        return (
            200,
            json!({
                "name": name,
                "path": contents_path,
                "type": "file",
                "encoding": "base64",
                "content": wrapped_base64(text),
            }),
        );
    }

    (404, json!({ "message": "Not Found" }))
}

/// The contents endpoint wraps base64 payloads at 60 columns; reproduce that
/// so decoding has to cope with embedded newlines.
fn wrapped_base64(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / 60 + 1);
    for (idx, ch) in encoded.chars().enumerate() {
        if idx > 0 && idx % 60 == 0 {
            wrapped.push('\n');
        }
        wrapped.push(ch);
    }
    wrapped.push('\n');
    wrapped
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' && idx + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&input[idx + 1..idx + 3], 16) {
                out.push(byte);
                idx += 3;
                continue;
            }
        }
        out.push(bytes[idx]);
        idx += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
