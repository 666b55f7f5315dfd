//! Shared helpers for the e2e suite.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};

/// RAII guard for setting an environment variable.
/// Restores the previous value on drop, even if a test panics.
#[allow(dead_code)]
pub struct EnvGuard {
    key: String,
    prev: Option<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    pub fn set(key: &str, val: impl AsRef<str>) -> Self {
        let prev = std::env::var(key).ok();
        unsafe { std::env::set_var(key, val.as_ref()) };
        Self {
            key: key.to_string(),
            prev,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => unsafe { std::env::set_var(&self.key, v) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}

/// Write the two catalog fixture documents and return their paths.
#[allow(dead_code)]
pub fn write_catalog(dir: &Path) -> (PathBuf, PathBuf) {
    let specs = dir.join("specs.json");
    let db = dir.join("database.json");
    std::fs::write(&specs, r#"{"title": "Tree Traits", "version": "1.0.0"}"#).unwrap();
    std::fs::write(
        &db,
        r#"[
            {"name": "Oak", "image": "images/oak.jpg", "wikidata": "Q1",
             "traits": {"genus": {"family": "Fagaceae"}, "leaf": {"shape": "lobed"}}},
            {"name": "Pine", "wikidata": "Q2",
             "traits": {"genus": {"family": "Pinaceae"}, "leaf": {"shape": "needle"}}},
            {"name": "Maple",
             "traits": {"leaf": {"shape": "lobed", "margin": "serrate"}}}
        ]"#,
    )
    .unwrap();
    (specs, db)
}

/// Serve canned `(path-fragment, body)` responses over HTTP on an ephemeral
/// port, one connection at a time, forever. The thread dies with the test
/// process; requests for unknown paths get a 404.
#[allow(dead_code)]
pub fn spawn_http_fixture(responses: Vec<(String, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind to ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut buf = [0u8; 4096];
            let Ok(n) = stream.read(&mut buf) else { continue };
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let request_path = request
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("/")
                .to_string();

            let body = responses
                .iter()
                .find(|(path, _)| request_path.contains(path.as_str()))
                .map(|(_, body)| body.clone());
            let response = match body {
                Some(body) => format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                ),
                None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                    .to_string(),
            };
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{addr}")
}

/// Entity document carrying a single P18 image claim.
#[allow(dead_code)]
pub fn entity_with_image(qid: &str, filename: &str) -> String {
    serde_json::json!({
        "entities": {
            qid: {
                "claims": {
                    "P18": [{"mainsnak": {"datavalue": {"value": filename}}}]
                }
            }
        }
    })
    .to_string()
}

/// Entity document without any image claim.
#[allow(dead_code)]
pub fn entity_without_image(qid: &str) -> String {
    serde_json::json!({"entities": {qid: {"claims": {}}}}).to_string()
}
