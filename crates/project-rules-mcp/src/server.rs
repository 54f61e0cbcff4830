//! Line-oriented request dispatcher.
//!
//! Each input line is one request and is handled on its own: a bad line
//! yields its own error response and never affects the lines around it.
//! Responses are written in input order, one per line, flushed before the
//! next line is read.

use std::io;
use std::sync::Arc;

use project_rules_core::RuleStore;
use rmcp::model::ProtocolVersion;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::ServerIdentity;
use crate::protocol::{method_not_found, Request, Response};
use crate::tools;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("stdio error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct Dispatcher {
    store: Arc<RuleStore>,
    identity: ServerIdentity,
}

impl Dispatcher {
    pub fn new(store: Arc<RuleStore>, identity: ServerIdentity) -> Self {
        Self { store, identity }
    }

    /// Handle one raw input line. `None` means nothing is written back:
    /// blank lines and notifications for methods we don't serve.
    pub fn handle_line(&self, line: &[u8]) -> Option<Response> {
        let line = line.trim_ascii();
        if line.is_empty() {
            return None;
        }
        match Request::decode(line) {
            Ok(request) => self.handle_request(&request),
            Err(response) => {
                warn!(code = ?response.error_code(), "rejected input line");
                Some(response)
            }
        }
    }

    pub fn handle_request(&self, request: &Request) -> Option<Response> {
        debug!(method = %request.method, id = ?request.id, "request");
        let id = request.response_id();
        match request.method.as_str() {
            "initialize" => Some(Response::result(id, self.initialize_result())),
            "tools/list" => Some(Response::result(id, tools::tool_list())),
            "tools/call" => {
                let name = request.tool_name().unwrap_or_default();
                match tools::call_tool(&self.store, name, request.tool_arguments()) {
                    Ok(result) => Some(Response::result(id, result)),
                    Err(e) => {
                        debug!(tool = name, "unknown tool");
                        Some(Response::error(id, e))
                    }
                }
            }
            "ping" => Some(Response::result(id, json!({}))),
            method if request.is_notification() => {
                debug!(method, "ignoring notification");
                None
            }
            method => {
                debug!(method, "unknown method");
                Some(Response::error(id, method_not_found()))
            }
        }
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": ProtocolVersion::V_2024_11_05,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.identity.name,
                "version": self.identity.version,
                "description": self.identity.description
            }
        })
    }
}

/// Serve requests from `reader` until EOF.
///
/// Lines split across reads are reassembled by the buffered reader; a final
/// line without a trailing newline is still handled.
pub async fn serve<R, W>(
    dispatcher: &Dispatcher,
    mut reader: R,
    mut writer: W,
) -> Result<(), ServerError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if let Some(response) = dispatcher.handle_line(&line) {
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }
    debug!("input closed");
    Ok(())
}
