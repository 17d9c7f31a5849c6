//! Stdio JSON-RPC driver shared by the end-to-end tests
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tower_lsp::lsp_types::Url;

const SERVER_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_millis(200);

pub const FIXTURE_CONFIG: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/wordcount.toml");

pub const SHUTDOWN_ID: i64 = 99;

pub struct TestServer {
    child: Child,
    reader: BufReader<ChildStdout>,
    started: Instant,
}

impl TestServer {
    /// Server using the fixture config
    pub fn spawn() -> Self {
        Self::spawn_with(&["--config", FIXTURE_CONFIG], None)
    }

    pub fn spawn_with(args: &[&str], cwd: Option<&Path>) -> Self {
        let mut command = Command::new(env!("CARGO_BIN_EXE_wordcount-ls"));
        command
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if let Some(cwd) = cwd {
            command.current_dir(cwd);
        }

        let mut child = command.spawn().expect("Failed to spawn language server");
        let stdout = child.stdout.take().expect("Child stdout should be available");

        Self {
            child,
            reader: BufReader::new(stdout),
            started: Instant::now(),
        }
    }

    pub fn send(&mut self, message: Value) {
        let body = message.to_string();
        let framed = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);
        let stdin = self.child.stdin.as_mut().expect("Child stdin should be available");
        stdin.write_all(framed.as_bytes()).expect("Failed to write message");
        stdin.flush().expect("Failed to flush stdin");
    }

    pub fn notify(&mut self, method: &str, params: Value) {
        self.send(message(None, method, params));
    }

    pub fn request(&mut self, id: i64, method: &str, params: Value) -> Value {
        self.send(message(Some(id), method, params));
        self.read_until(|msg| msg.get("id").and_then(|v| v.as_i64()) == Some(id))
    }

    pub fn read_message(&mut self) -> Value {
        let mut content_length = None;
        loop {
            if self.started.elapsed() > SERVER_TIMEOUT * 2 {
                panic!("Timeout waiting for server output");
            }
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => panic!("Unexpected EOF while reading headers"),
                Ok(_) if line.trim().is_empty() => break,
                Ok(_) => {
                    if let Some(length) = line.strip_prefix("Content-Length:") {
                        content_length =
                            Some(length.trim().parse::<usize>().expect("Invalid Content-Length"));
                    }
                }
                Err(e) => panic!("Error reading headers: {}", e),
            }
        }

        let mut body = vec![0u8; content_length.expect("Missing Content-Length header")];
        self.reader.read_exact(&mut body).expect("Failed to read body");
        serde_json::from_slice(&body).expect("Body should be valid JSON")
    }

    /// Skip log messages and anything else until `predicate` matches
    pub fn read_until(&mut self, predicate: impl Fn(&Value) -> bool) -> Value {
        loop {
            let message = self.read_message();
            if predicate(&message) {
                return message;
            }
        }
    }

    pub fn next_status(&mut self) -> Value {
        let message = self.read_until(is_status);
        message["params"].clone()
    }

    /// Wait for a `window/logMessage` whose text contains `needle`
    pub fn wait_for_log(&mut self, needle: &str) -> String {
        let message = self.read_until(|msg| {
            msg["method"] == "window/logMessage"
                && msg["params"]["message"]
                    .as_str()
                    .is_some_and(|text| text.contains(needle))
        });
        message["params"]["message"].as_str().unwrap_or_default().to_string()
    }

    pub fn initialize(&mut self) {
        self.initialize_with_root(None);
    }

    pub fn initialize_with_root(&mut self, root: Option<&Path>) {
        let root_uri = root.map(|path| {
            Url::from_file_path(path)
                .expect("workspace root should be absolute")
                .to_string()
        });
        let response = self.request(
            1,
            "initialize",
            json!({ "processId": null, "rootUri": root_uri, "capabilities": {} }),
        );
        assert!(response.get("result").is_some(), "initialize failed: {}", response);
        self.notify("initialized", json!({}));
    }

    /// Send `shutdown` and return the status notifications written before
    /// its response
    pub fn request_shutdown(&mut self) -> Vec<Value> {
        self.send(message(Some(SHUTDOWN_ID), "shutdown", Value::Null));

        let mut statuses = Vec::new();
        loop {
            let message = self.read_message();
            if is_status(&message) {
                statuses.push(message["params"].clone());
            } else if message.get("id").and_then(|v| v.as_i64()) == Some(SHUTDOWN_ID) {
                assert!(message.get("error").is_none(), "shutdown failed: {}", message);
                return statuses;
            }
        }
    }

    pub fn exit(mut self) {
        self.notify("exit", Value::Null);

        drop(self.child.stdin.take());
        std::thread::sleep(SHUTDOWN_GRACE_PERIOD);
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }

    pub fn shutdown(mut self) {
        self.request_shutdown();
        self.exit();
    }
}

fn is_status(message: &Value) -> bool {
    message["method"] == "wordCount/status"
}

/// Build a JSON-RPC message; `null` params are left out entirely
pub fn message(id: Option<i64>, method: &str, params: Value) -> Value {
    let mut message = json!({ "jsonrpc": "2.0", "method": method });
    if let Some(id) = id {
        message["id"] = json!(id);
    }
    if !params.is_null() {
        message["params"] = params;
    }
    message
}

pub fn did_open(uri: &str, language_id: &str, text: &str) -> Value {
    json!({
        "textDocument": {
            "uri": uri,
            "languageId": language_id,
            "version": 1,
            "text": text
        }
    })
}

pub fn did_change(uri: &str, version: i32, text: &str) -> Value {
    json!({
        "textDocument": { "uri": uri, "version": version },
        "contentChanges": [{ "text": text }]
    })
}

pub fn range(start: (u32, u32), end: (u32, u32)) -> Value {
    json!({
        "start": { "line": start.0, "character": start.1 },
        "end": { "line": end.0, "character": end.1 }
    })
}
