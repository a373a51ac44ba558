//! Read Later RPC Server: JSON-RPC over stdin/stdout for the browser host.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"command", "params":{"name":"save-page","tab":{...}}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Toolbar updates are pushed as {"event":"badge",...} / {"event":"icon",...}.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

use readlater::app::App;
use readlater::platform;
use readlater::rpc_handler::handle_method;
use readlater::services::badge_presenter::BadgeSurface;
use readlater::types::badge::IconSet;
use readlater::types::errors::SurfaceError;

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn emit(line: &Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", line)?;
    out.flush()
}

/// Forwards toolbar writes to the host as event lines on stdout.
struct EventSurface;

#[async_trait]
impl BadgeSurface for EventSurface {
    async fn set_badge_text(&self, text: &str) -> Result<(), SurfaceError> {
        emit(&json!({"event": "badge", "text": text})).map_err(|e| SurfaceError(e.to_string()))
    }

    async fn set_badge_color(&self, color: &str) -> Result<(), SurfaceError> {
        emit(&json!({"event": "badge", "color": color})).map_err(|e| SurfaceError(e.to_string()))
    }

    async fn set_icon(&self, icons: &IconSet) -> Result<(), SurfaceError> {
        emit(&json!({"event": "icon", "path": {
            "48": icons.size_48,
            "128": icons.size_128,
            "256": icons.size_256,
        }}))
        .map_err(|e| SurfaceError(e.to_string()))
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let db_path = platform::database_path();
    let app = match App::open(&db_path, Arc::new(EventSurface)) {
        Ok(app) => app,
        Err(e) => {
            log::error!("failed to open {}: {}", db_path.display(), e);
            std::process::exit(1);
        }
    };
    log::info!("using store at {}", db_path.display());
    app.start().await;

    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    if emit(&ready).is_err() {
        return;
    }

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Err(e) => json!({"id": null, "error": format!("parse error: {}", e)}),
            Ok(req) => {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                if !rate_limiter.check() {
                    json!({"id": id, "error": "rate limit exceeded"})
                } else {
                    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                    let params = req.get("params").cloned().unwrap_or(json!({}));
                    match handle_method(&app, method, &params).await {
                        Ok(val) => json!({"id": id, "result": val}),
                        Err(err) => json!({"id": id, "error": err}),
                    }
                }
            }
        };

        if let Err(e) = emit(&response) {
            log::error!("stdout write failed: {}", e);
            break;
        }
    }
}
