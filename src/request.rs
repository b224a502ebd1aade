//! Operation descriptors and request construction.
//!
//! Every endpoint is described by a static [`OperationSpec`] (method, path
//! template, fixed headers). A call site turns the spec into an
//! [`OperationCall`], fills in path/query parameters, and builds an immutable
//! [`RequestDescriptor`] ready to hand to the transport. Building is pure:
//! no network activity happens here, and a template placeholder left unfilled
//! fails before anything is sent.

use crate::error::{ClientError, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use url::form_urlencoded;
use url::Url;

/// Static description of one API operation.
///
/// Specs are plain data: the per-endpoint modules declare one `const` row per
/// operation and feed it through the shared request builder.
#[derive(Debug, Clone)]
pub struct OperationSpec {
    /// Operation name, used verbatim in error messages
    pub name: &'static str,
    pub method: Method,
    /// Path template with `{name}` placeholders
    pub path: &'static str,
    /// Fixed `Accept` header value for this operation
    pub accept: &'static str,
    /// `Content-Type` applied when a body is attached
    pub content_type: Option<&'static str>,
    /// Kept for operations the server still answers but upstream has retired
    pub deprecated: bool,
}

impl OperationSpec {
    /// Start building a call for this operation.
    pub fn request(&'static self) -> OperationCall {
        OperationCall::new(self)
    }
}

/// A query parameter value: scalar, or one entry per element for
/// multi-valued ("explode") parameters.
#[derive(Debug, Clone)]
enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

/// Request interceptor callback, run on the draft request after the
/// operation-fixed headers and before the per-call overlay.
pub type RequestInterceptor = dyn Fn(&mut RequestDescriptor) + Send + Sync;

/// An in-progress call: an [`OperationSpec`] plus the parameters supplied by
/// the caller. Consumed by [`OperationCall::build`].
#[derive(Debug)]
pub struct OperationCall {
    spec: &'static OperationSpec,
    path_params: Vec<(&'static str, String)>,
    query: Vec<(&'static str, QueryValue)>,
    overlay: Vec<(HeaderName, HeaderValue)>,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl OperationCall {
    fn new(spec: &'static OperationSpec) -> Self {
        Self {
            spec,
            path_params: Vec::new(),
            query: Vec::new(),
            overlay: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Operation name, for logging and error messages.
    pub fn operation(&self) -> &'static str {
        self.spec.name
    }

    /// Substitute a `{name}` placeholder with a URL-encoded value.
    pub fn path_param(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.path_params.push((name, value.to_string()));
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.query
            .push((name, QueryValue::Single(value.to_string())));
        self
    }

    /// Append a query parameter if the value is present; `None` is omitted
    /// from the query string entirely.
    pub fn query_opt(self, name: &'static str, value: Option<impl fmt::Display>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Append a multi-valued query parameter as repeated `name=value` pairs,
    /// one per element, preserving element order. `None` is omitted.
    pub fn query_multi<T: fmt::Display>(mut self, name: &'static str, values: Option<&[T]>) -> Self {
        if let Some(values) = values {
            let values = values.iter().map(ToString::to_string).collect();
            self.query.push((name, QueryValue::Many(values)));
        }
        self
    }

    /// Add a per-call header. Applied last, so it wins over operation
    /// defaults and interceptor writes of the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.overlay.push((name, value));
        self
    }

    /// Attach a JSON-serialized body.
    pub fn json_body<B: Serialize>(mut self, body: &B) -> Result<Self> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| ClientError::Parse(format!("Failed to serialize request body: {e}")))?;
        self.body = Some(Bytes::from(bytes));
        Ok(self)
    }

    /// Set a read timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the request descriptor.
    ///
    /// Header precedence, earliest to latest writer: operation-fixed
    /// `Accept`/`Content-Type`, bearer credential, interceptor, per-call
    /// overlay. Later writers win on conflicting names.
    pub fn build(
        self,
        base_url: &str,
        bearer_token: Option<&str>,
        interceptor: Option<&RequestInterceptor>,
    ) -> Result<RequestDescriptor> {
        let mut path = self.spec.path.to_string();
        for (name, value) in &self.path_params {
            path = path.replace(&format!("{{{name}}}"), &escape_path(value));
        }

        // Any placeholder still standing is a missing required parameter.
        // This must fail before the transport ever sees the request.
        if let Some(start) = path.find('{') {
            let end = path[start..]
                .find('}')
                .map_or(path.len(), |i| start + i);
            return Err(ClientError::MissingParameter {
                operation: self.spec.name,
                parameter: path[start + 1..end].to_string(),
            });
        }

        let mut url = format!("{base_url}{path}");
        let query = self.encode_query();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        let url = Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(self.spec.accept));
        if self.body.is_some() {
            if let Some(content_type) = self.spec.content_type {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
        }
        if let Some(token) = bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::InvalidUrl("access token is not a valid header value".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut request = RequestDescriptor {
            operation: self.spec.name,
            method: self.spec.method.clone(),
            url,
            headers,
            body: self.body,
            timeout: self.timeout,
        };

        if let Some(interceptor) = interceptor {
            interceptor(&mut request);
        }
        for (name, value) in self.overlay {
            request.headers.insert(name, value);
        }

        Ok(request)
    }

    /// Encode the query pairs in declaration order. Multi values expand to
    /// repeated `name=value` pairs, never a comma-joined scalar.
    fn encode_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.query {
            match value {
                QueryValue::Single(value) => {
                    serializer.append_pair(name, value);
                }
                QueryValue::Many(values) => {
                    for value in values {
                        serializer.append_pair(name, value);
                    }
                }
            }
        }
        serializer.finish()
    }
}

/// A fully built request: created once, sent once, discarded.
#[derive(Debug)]
pub struct RequestDescriptor {
    /// Operation name carried along for diagnostics
    pub operation: &'static str,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// Read timeout applied by the transport before sending
    pub timeout: Option<Duration>,
}

/// URL-encode a path parameter value.
fn escape_path(value: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    // form encoding turns spaces into '+', which is not valid in a path
    encoded.replace('+', "%20")
}
