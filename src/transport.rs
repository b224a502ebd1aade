//! Transport abstraction over the actual HTTP stack.
//!
//! The invoker never talks to reqwest directly; it goes through [`Transport`]
//! so tests can substitute a mock and assert on call counts and stream
//! handling. The body is handed back as a lazy byte stream, never
//! pre-buffered, so large file downloads are not materialized in memory.

use crate::error::{ClientError, Result};
use crate::request::RequestDescriptor;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::io;
use tracing::debug;

/// Lazy response body: a stream of byte chunks. Dropping the stream releases
/// the underlying connection.
pub type BodyStream = BoxStream<'static, io::Result<Bytes>>;

/// Raw response as seen by the invoker: status, headers, and the body stream.
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BodyStream,
}

/// Blocking-per-call send primitive.
///
/// Implementations must be safe for concurrent use by multiple callers; the
/// invoker holds no mutable state across calls.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response.
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse>;
}

/// Production transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse> {
        let RequestDescriptor {
            operation,
            method,
            url,
            headers,
            body,
            timeout,
        } = request;

        debug!(operation, method = %method, url = %url, "Sending request");

        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(ClientError::Transport)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
            .boxed();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

impl TransportResponse {
    /// Status family check: anything outside 2xx is a server-reported error.
    pub fn is_success(&self) -> bool {
        self.status.as_u16() / 100 == 2
    }
}
