//! In-memory stand-ins for the network and the log sink.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::download::{display_url, ByteStream, HttpClient};
use crate::error::{Error, Result};
use crate::logging;
use crate::session::Input;

#[derive(Default)]
pub struct FakeHttp {
    texts: HashMap<String, String>,
    heads: HashMap<String, u16>,
    bodies: HashMap<String, Vec<u8>>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, url: &str, body: &str) -> Self {
        self.texts.insert(url.to_string(), body.to_string());
        self
    }

    pub fn with_head(mut self, url: &str, status: u16) -> Self {
        self.heads.insert(url.to_string(), status);
        self
    }

    pub fn with_body(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    /// Every request to `url` fails as if the connection was refused.
    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &str, url: &Url) -> Result<()> {
        self.calls.lock().unwrap().push(format!("{} {}", method, url));
        if self.failing.iter().any(|failing| failing == url.as_str()) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(())
    }

    fn not_found(url: &Url) -> Error {
        Error::Status {
            url: display_url(url),
            status: 404,
        }
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get_text(&self, url: &Url) -> Result<String> {
        self.record("GET", url)?;
        self.texts.get(url.as_str()).cloned().ok_or_else(|| Self::not_found(url))
    }

    async fn head_status(&self, url: &Url) -> Result<u16> {
        self.record("HEAD", url)?;
        Ok(self.heads.get(url.as_str()).copied().unwrap_or(404))
    }

    async fn get_stream(&self, url: &Url) -> Result<ByteStream> {
        self.record("GET", url)?;
        let body = self.bodies.get(url.as_str()).cloned().ok_or_else(|| Self::not_found(url))?;

        // Split unevenly so the writer has to re-chunk.
        let frames = body
            .chunks(700)
            .map(|frame| Ok(Bytes::copy_from_slice(frame)))
            .collect::<Vec<_>>();
        Ok(stream::iter(frames).boxed())
    }
}

pub const FALLBACK_THUMBNAIL: &str = "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg";

/// A one-item videos endpoint body for `dQw4w9WgXcQ`.
pub fn video_list_json(title: &str, duration: &str) -> String {
    serde_json::json!({
        "kind": "youtube#videoListResponse",
        "items": [{
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "title": title,
                "description": format!("Description of {}", title),
                "thumbnails": {
                    "default": { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg" },
                    "high": { "url": FALLBACK_THUMBNAIL, "width": 480, "height": 360 }
                }
            },
            "contentDetails": { "duration": duration, "definition": "hd" }
        }]
    })
    .to_string()
}

#[derive(Clone, Default)]
pub struct LogSink(Arc<Mutex<Vec<u8>>>);

impl LogSink {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's log events into memory until the guard drops.
pub fn capture_logs() -> (LogSink, tracing::subscriber::DefaultGuard) {
    capture_logs_at("debug")
}

/// Like [`capture_logs`], filtered at `level` the way the binary filters.
pub fn capture_logs_at(level: &str) -> (LogSink, tracing::subscriber::DefaultGuard) {
    let sink = LogSink::default();
    let writer = sink.clone();
    let subscriber = logging::subscriber(move || writer.clone(), EnvFilter::new(level));
    (sink, tracing::subscriber::set_default(subscriber))
}

/// Answers prompts from a fixed script, then reports end of input.
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| format!("{}\n", line)).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Input for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
