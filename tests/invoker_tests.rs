//! Invoker tests against a mock transport.
//!
//! These verify the response classification and resource-handling contracts
//! without any network: zero sends after client-side validation failures,
//! body streams drained and dropped on every path, exact error messages for
//! server-reported failures.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::Stream;
use futures_util::StreamExt;
use harmonia_client::{
    ClientConfig, ClientError, HarmoniaClient, HttpInvoker, OperationSpec, RequestDescriptor,
    Transport, TransportResponse,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_DISPOSITION};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

static GET_AUDIO_STREAM: OperationSpec = OperationSpec {
    name: "getAudioStream",
    method: Method::GET,
    path: "/Audio/{itemId}/stream",
    accept: "audio/*",
    content_type: None,
    deprecated: false,
};

static GET_CHANNEL: OperationSpec = OperationSpec {
    name: "getLiveTvChannel",
    method: Method::GET,
    path: "/LiveTv/Channels/{channelId}",
    accept: "application/json",
    content_type: None,
    deprecated: false,
};

static DELETE_RECORDING: OperationSpec = OperationSpec {
    name: "deleteRecording",
    method: Method::DELETE,
    path: "/LiveTv/Recordings/{recordingId}",
    accept: "application/json",
    content_type: None,
    deprecated: false,
};

const BASE: &str = "http://localhost:8096";

// =============================================================================
// Test doubles
// =============================================================================

/// Body stream spy: counts polls, records exhaustion, and counts drops so
/// tests can assert the invoker read to the end and released the stream
/// exactly once.
struct SpyStream {
    chunks: VecDeque<Bytes>,
    exhausted: Arc<AtomicBool>,
    drops: Arc<AtomicUsize>,
}

#[derive(Clone, Default)]
struct SpyHandles {
    exhausted: Arc<AtomicBool>,
    drops: Arc<AtomicUsize>,
}

impl SpyHandles {
    fn stream(&self, chunks: Vec<&[u8]>) -> SpyStream {
        SpyStream {
            chunks: chunks.into_iter().map(Bytes::copy_from_slice).collect(),
            exhausted: Arc::clone(&self.exhausted),
            drops: Arc::clone(&self.drops),
        }
    }

    fn was_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::SeqCst)
    }

    fn drop_count(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

impl Stream for SpyStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.chunks.pop_front() {
            Some(chunk) => Poll::Ready(Some(Ok(chunk))),
            None => {
                self.exhausted.store(true, Ordering::SeqCst);
                Poll::Ready(None)
            }
        }
    }
}

impl Drop for SpyStream {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Transport double: hands out canned responses, counts sends, and keeps
/// the descriptors it was given so tests can assert on what reached it.
struct MockTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<RequestDescriptor>>,
    calls: AtomicUsize,
}

impl MockTransport {
    fn new(responses: Vec<TransportResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn sent_requests(&self) -> std::sync::MutexGuard<'_, Vec<RequestDescriptor>> {
        self.requests.lock().unwrap()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: RequestDescriptor) -> harmonia_client::Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no canned response left");
        self.requests.lock().unwrap().push(request);
        Ok(response)
    }
}

fn response(status: StatusCode, headers: HeaderMap, stream: SpyStream) -> TransportResponse {
    TransportResponse {
        status,
        headers,
        body: stream.boxed(),
    }
}

// =============================================================================
// Validation before send
// =============================================================================

#[tokio::test]
async fn missing_path_parameter_makes_no_network_call() {
    let transport = MockTransport::new(vec![]);
    let _invoker = HttpInvoker::new(transport.clone());

    let err = GET_AUDIO_STREAM
        .request()
        .build(BASE, None, None)
        .unwrap_err();

    assert!(matches!(err, ClientError::MissingParameter { .. }));
    assert_eq!(
        err.to_string(),
        "Missing the required parameter 'itemId' when calling getAudioStream"
    );
    assert_eq!(transport.call_count(), 0);
}

// =============================================================================
// Empty shape
// =============================================================================

#[tokio::test]
async fn delete_with_204_returns_unit_payload_and_drains_stream() {
    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::NO_CONTENT,
        HeaderMap::new(),
        spy.stream(vec![]),
    )]);
    let invoker = HttpInvoker::new(transport.clone());

    let request = DELETE_RECORDING
        .request()
        .path_param("recordingId", "rec-1")
        .build(BASE, None, None)
        .unwrap();

    let envelope = invoker.execute_empty(request).await.unwrap();

    assert_eq!(envelope.status, StatusCode::NO_CONTENT);
    let () = envelope.payload;
    assert_eq!(transport.call_count(), 1);
    assert!(spy.was_exhausted());
    assert_eq!(spy.drop_count(), 1);
}

#[tokio::test]
async fn empty_shape_discards_trailing_bytes() {
    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::OK,
        HeaderMap::new(),
        spy.stream(vec![b"trailing", b" bytes"]),
    )]);
    let invoker = HttpInvoker::new(transport);

    let request = DELETE_RECORDING
        .request()
        .path_param("recordingId", "rec-2")
        .build(BASE, None, None)
        .unwrap();

    let envelope = invoker.execute_empty(request).await.unwrap();

    let () = envelope.payload;
    assert!(spy.was_exhausted());
    assert_eq!(spy.drop_count(), 1);
}

// =============================================================================
// Request plumbing
// =============================================================================

#[tokio::test]
async fn read_timeout_reaches_the_transport() {
    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::NO_CONTENT,
        HeaderMap::new(),
        spy.stream(vec![]),
    )]);
    let invoker = HttpInvoker::new(transport.clone());

    let request = DELETE_RECORDING
        .request()
        .path_param("recordingId", "rec-slow")
        .timeout(Duration::from_secs(5))
        .build(BASE, None, None)
        .unwrap();

    invoker.execute_empty(request).await.unwrap();

    let sent = transport.sent_requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].timeout, Some(Duration::from_secs(5)));
    assert_eq!(sent[0].method, Method::DELETE);
}

#[tokio::test]
async fn client_routes_calls_through_the_injected_transport() {
    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::OK,
        HeaderMap::new(),
        spy.stream(vec![br#"{"ServerName":"Den","Version":"10.9.2","Id":"f09a2b","OperatingSystem":null}"#]),
    )]);

    let client = HarmoniaClient::with_transport(
        ClientConfig::with_token("http://localhost:8096/", "tok-9"),
        transport.clone(),
    )
    .unwrap();

    let info = client.server_info().await.unwrap();

    assert_eq!(info.server_name, "Den");
    assert_eq!(transport.call_count(), 1);

    let sent = transport.sent_requests();
    assert_eq!(
        sent[0].url.as_str(),
        "http://localhost:8096/System/Info/Public"
    );
    assert_eq!(sent[0].headers.get("Authorization").unwrap(), "Bearer tok-9");
}

// =============================================================================
// JSON shapes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Channel {
    id: String,
    name: String,
}

#[tokio::test]
async fn json_shape_decodes_body() {
    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::OK,
        HeaderMap::new(),
        spy.stream(vec![br#"{"Id":"ch-7","Name":"News"}"#]),
    )]);
    let invoker = HttpInvoker::new(transport);

    let request = GET_CHANNEL
        .request()
        .path_param("channelId", "ch-7")
        .build(BASE, None, None)
        .unwrap();

    let envelope = invoker.execute_json::<Channel>(request).await.unwrap();

    assert_eq!(
        envelope.payload,
        Some(Channel {
            id: "ch-7".into(),
            name: "News".into(),
        })
    );
    assert_eq!(spy.drop_count(), 1);
}

#[tokio::test]
async fn blank_json_body_is_none_not_an_error() {
    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::OK,
        HeaderMap::new(),
        spy.stream(vec![b"   \n  "]),
    )]);
    let invoker = HttpInvoker::new(transport);

    let request = GET_CHANNEL
        .request()
        .path_param("channelId", "ch-8")
        .build(BASE, None, None)
        .unwrap();

    let envelope = invoker.execute_json::<Channel>(request).await.unwrap();
    assert_eq!(envelope.payload, None);
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::OK,
        HeaderMap::new(),
        spy.stream(vec![b"not json"]),
    )]);
    let invoker = HttpInvoker::new(transport);

    let request = GET_CHANNEL
        .request()
        .path_param("channelId", "ch-9")
        .build(BASE, None, None)
        .unwrap();

    let err = invoker.execute_json::<Channel>(request).await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
    // the stream is still released even though decoding failed
    assert_eq!(spy.drop_count(), 1);
}

#[tokio::test]
async fn json_round_trips_through_serialization() {
    let channel = Channel {
        id: "ch-1".into(),
        name: "Music".into(),
    };
    let text = serde_json::to_string(&channel).unwrap();
    let decoded: Channel = serde_json::from_str(&text).unwrap();
    assert_eq!(decoded, channel);
}

// =============================================================================
// Error classification
// =============================================================================

#[tokio::test]
async fn not_found_maps_to_api_error_with_exact_message() {
    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::NOT_FOUND,
        HeaderMap::new(),
        spy.stream(vec![b"not found"]),
    )]);
    let invoker = HttpInvoker::new(transport);

    let request = GET_CHANNEL
        .request()
        .path_param("channelId", "missing")
        .build(BASE, None, None)
        .unwrap();

    let err = invoker.execute_json::<Channel>(request).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "getLiveTvChannel call failed with: 404 - not found"
    );
    assert_eq!(err.status(), Some(404));
    // the error body was fully drained before the error was built
    assert!(spy.was_exhausted());
    assert_eq!(spy.drop_count(), 1);
}

#[tokio::test]
async fn empty_error_body_uses_no_body_marker() {
    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::INTERNAL_SERVER_ERROR,
        HeaderMap::new(),
        spy.stream(vec![]),
    )]);
    let invoker = HttpInvoker::new(transport);

    let request = DELETE_RECORDING
        .request()
        .path_param("recordingId", "rec-3")
        .build(BASE, None, None)
        .unwrap();

    let err = invoker.execute_empty(request).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "deleteRecording call failed with: 500 - [no body]"
    );
}

#[tokio::test]
async fn api_error_captures_response_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("x-request-id", HeaderValue::from_static("abc-123"));

    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::FORBIDDEN,
        headers,
        spy.stream(vec![b"forbidden"]),
    )]);
    let invoker = HttpInvoker::new(transport);

    let request = GET_CHANNEL
        .request()
        .path_param("channelId", "ch-10")
        .build(BASE, None, None)
        .unwrap();

    match invoker.execute_json::<Channel>(request).await.unwrap_err() {
        ClientError::Api { headers, body, .. } => {
            assert_eq!(headers.get("x-request-id").unwrap(), "abc-123");
            assert_eq!(body, "forbidden");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

// =============================================================================
// Raw file shape
// =============================================================================

#[tokio::test]
async fn file_download_honors_content_disposition() {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"track.mp3\""),
    );

    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::OK,
        headers,
        spy.stream(vec![b"ID3", b"audio-bytes"]),
    )]);
    let invoker = HttpInvoker::new(transport);

    let dir = tempfile::tempdir().unwrap();
    let request = GET_AUDIO_STREAM
        .request()
        .path_param("itemId", "3f29a086")
        .build(BASE, None, None)
        .unwrap();

    let envelope = invoker
        .execute_file(request, Some(dir.path()))
        .await
        .unwrap();

    assert_eq!(
        envelope.payload.file_name().unwrap().to_str().unwrap(),
        "track.mp3"
    );
    let contents = std::fs::read(&envelope.payload).unwrap();
    assert_eq!(contents, b"ID3audio-bytes");
    assert!(spy.was_exhausted());
    assert_eq!(spy.drop_count(), 1);
}

#[tokio::test]
async fn file_download_without_disposition_generates_unique_name() {
    let spy = SpyHandles::default();
    let transport = MockTransport::new(vec![response(
        StatusCode::OK,
        HeaderMap::new(),
        spy.stream(vec![b"payload"]),
    )]);
    let invoker = HttpInvoker::new(transport);

    let dir = tempfile::tempdir().unwrap();
    let request = GET_AUDIO_STREAM
        .request()
        .path_param("itemId", "3f29a086")
        .build(BASE, None, None)
        .unwrap();

    let envelope = invoker
        .execute_file(request, Some(dir.path()))
        .await
        .unwrap();

    let name = envelope.payload.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("harmonia-download-"));
    assert_eq!(std::fs::read(&envelope.payload).unwrap(), b"payload");
}
