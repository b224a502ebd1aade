//! The typed HTTP invoker: one request/response cycle with uniform error
//! and decoding semantics.
//!
//! Callers pick the result shape by method, never by inspecting content:
//! [`HttpInvoker::execute_empty`] for void operations,
//! [`HttpInvoker::execute_json`] / [`HttpInvoker::execute_json_list`] for
//! JSON payloads, and [`HttpInvoker::execute_file`] for raw downloads.
//! Whatever the path taken, the response body stream is fully consumed and
//! dropped before control returns, so no envelope ever holds a live
//! connection. Nothing here retries; retry policy belongs to the caller.

use crate::error::{ClientError, Result, NO_BODY};
use crate::request::RequestDescriptor;
use crate::transport::{BodyStream, Transport, TransportResponse};
use futures_util::StreamExt;
use regex::Regex;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Status, headers, and the decoded payload of one successful call.
#[derive(Debug)]
pub struct ResponseEnvelope<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub payload: T,
}

impl<T> ResponseEnvelope<T> {
    /// Discard status and headers, keeping only the payload.
    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// Executes built requests against an injected transport.
pub struct HttpInvoker {
    transport: Arc<dyn Transport>,
}

impl HttpInvoker {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Execute a void operation. The body is drained and discarded even if
    /// the server sent trailing bytes.
    pub async fn execute_empty(&self, request: RequestDescriptor) -> Result<ResponseEnvelope<()>> {
        let operation = request.operation;
        let TransportResponse {
            status,
            headers,
            body,
        } = self.dispatch(request).await?;

        read_body(body).await?;

        debug!(operation, status = status.as_u16(), "Void operation complete");
        Ok(ResponseEnvelope {
            status,
            headers,
            payload: (),
        })
    }

    /// Execute an operation returning a single JSON value.
    ///
    /// A blank or whitespace-only 2xx body decodes to `None`; absence is a
    /// valid success case, not an error.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<ResponseEnvelope<Option<T>>> {
        let operation = request.operation;
        let TransportResponse {
            status,
            headers,
            body,
        } = self.dispatch(request).await?;

        // Fully read, then drop the stream; parsing does not need the
        // connection open.
        let bytes = read_body(body).await?;
        let text = String::from_utf8_lossy(&bytes);

        let payload = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).map_err(|e| {
                ClientError::Parse(format!("Failed to parse {operation} response: {e}"))
            })?)
        };

        debug!(operation, status = status.as_u16(), "JSON operation complete");
        Ok(ResponseEnvelope {
            status,
            headers,
            payload,
        })
    }

    /// Execute an operation returning a JSON array.
    pub async fn execute_json_list<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<ResponseEnvelope<Option<Vec<T>>>> {
        self.execute_json(request).await
    }

    /// Execute an operation returning a raw file.
    ///
    /// The destination filename comes from the `Content-Disposition` response
    /// header when present, otherwise a unique name is generated. Files land
    /// in `dest_dir`, or the system temp directory when `None`; generated
    /// temp files are best-effort cleaned up by the OS, not tracked here.
    pub async fn execute_file(
        &self,
        request: RequestDescriptor,
        dest_dir: Option<&Path>,
    ) -> Result<ResponseEnvelope<PathBuf>> {
        let operation = request.operation;
        let TransportResponse {
            status,
            headers,
            mut body,
        } = self.dispatch(request).await?;

        let dir = dest_dir.map_or_else(std::env::temp_dir, Path::to_path_buf);
        let path = match filename_from_headers(&headers) {
            Some(name) => dir.join(name),
            None => tempfile::Builder::new()
                .prefix("harmonia-download-")
                .tempfile_in(&dir)?
                .into_temp_path()
                .keep()
                .map_err(|e| ClientError::Io(e.error))?,
        };

        let mut file = File::create(&path).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(body);

        debug!(
            operation,
            status = status.as_u16(),
            path = %path.display(),
            size = written,
            "Download complete"
        );
        Ok(ResponseEnvelope {
            status,
            headers,
            payload: path,
        })
    }

    /// Send the request once and classify the response. Non-2xx responses
    /// are drained (connection hygiene) and surfaced as [`ClientError::Api`].
    async fn dispatch(&self, request: RequestDescriptor) -> Result<TransportResponse> {
        let operation = request.operation;
        let response = self.transport.send(request).await?;

        if response.is_success() {
            return Ok(response);
        }

        let TransportResponse {
            status,
            headers,
            body,
        } = response;

        let bytes = read_body(body).await.unwrap_or_default();
        let text = String::from_utf8_lossy(&bytes);
        let body = if text.trim().is_empty() {
            NO_BODY.to_string()
        } else {
            text.into_owned()
        };

        warn!(
            operation,
            status = status.as_u16(),
            "Server returned an error"
        );
        Err(ClientError::Api {
            operation,
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

/// Read the stream to exhaustion, then drop it. This is the single point
/// that guarantees the connection is released on the decode paths.
async fn read_body(mut body: BodyStream) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    while let Some(chunk) = body.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer)
}

/// Extract a filename from a `Content-Disposition` header value.
fn filename_from_headers(headers: &HeaderMap) -> Option<String> {
    static FILENAME: OnceLock<Regex> = OnceLock::new();
    let pattern = FILENAME
        .get_or_init(|| Regex::new(r#"filename=['"]?([^'"\s]+)['"]?"#).expect("valid pattern"));

    let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    let name = pattern.captures(value)?.get(1)?.as_str();

    // Strip any directory component the server may have smuggled in.
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}
