//! Main Harmonia server client.

use crate::audio::AudioApi;
use crate::error::{ClientError, Result};
use crate::invoker::{HttpInvoker, ResponseEnvelope};
use crate::library::LibraryStructureApi;
use crate::live_tv::LiveTvApi;
use crate::request::{OperationCall, OperationSpec, RequestDescriptor, RequestInterceptor};
use crate::transport::{HttpTransport, Transport};
use crate::types::{ClientConfig, PublicSystemInfo};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

static GET_PUBLIC_SYSTEM_INFO: OperationSpec = OperationSpec {
    name: "getPublicSystemInfo",
    method: Method::GET,
    path: "/System/Info/Public",
    accept: "application/json",
    content_type: None,
    deprecated: false,
};

/// Main client for interacting with a Harmonia media server.
///
/// The client validates and normalizes the base URL, owns the transport and
/// the typed invoker, and hands out borrowed sub-clients for the audio,
/// library-structure, and live-TV endpoint groups.
///
/// # Example
///
/// ```ignore
/// use harmonia_client::{ClientConfig, HarmoniaClient};
///
/// let config = ClientConfig::new("https://media.example.com");
/// let client = HarmoniaClient::new(config)?;
///
/// let info = client.server_info().await?;
/// println!("Connected to {} v{}", info.server_name, info.version);
///
/// let folders = client.library().virtual_folders().await?;
/// println!("{} virtual folders", folders.payload.unwrap_or_default().len());
/// ```
pub struct HarmoniaClient {
    invoker: HttpInvoker,
    config: Arc<RwLock<ClientConfig>>,
    interceptor: Option<Arc<RequestInterceptor>>,
}

impl HarmoniaClient {
    /// Create a new client backed by a reqwest transport with default
    /// timeouts.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("HarmoniaClient/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Transport)?;

        Self::with_transport(config, Arc::new(HttpTransport::new(http)))
    }

    /// Create a client with an injected transport. This is the seam used by
    /// tests and by callers that manage their own connection pool.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let normalized_config = ClientConfig {
            url,
            access_token: config.access_token,
        };

        Ok(Self {
            invoker: HttpInvoker::new(transport),
            config: Arc::new(RwLock::new(normalized_config)),
            interceptor: None,
        })
    }

    /// Install a global request interceptor. It runs on every built request
    /// after the operation-fixed headers and before the per-call overlay.
    pub fn with_request_interceptor(
        mut self,
        interceptor: impl Fn(&mut RequestDescriptor) + Send + Sync + 'static,
    ) -> Self {
        self.interceptor = Some(Arc::new(interceptor));
        self
    }

    /// Get the normalized server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check whether the client currently holds an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.access_token.is_some()
    }

    /// Set the access token (e.g., from stored credentials).
    pub async fn set_access_token(&self, access_token: String) {
        let mut config = self.config.write().await;
        config.access_token = Some(access_token);
    }

    /// Clear the stored token.
    pub async fn clear_access_token(&self) {
        let mut config = self.config.write().await;
        config.access_token = None;
        info!("Access token cleared");
    }

    /// Fetch public server information. Does not require authentication.
    pub async fn server_info(&self) -> Result<PublicSystemInfo> {
        let envelope = self
            .execute_json::<PublicSystemInfo>(GET_PUBLIC_SYSTEM_INFO.request())
            .await?;

        envelope.payload.ok_or_else(|| {
            ClientError::Parse("Server returned an empty system info response".into())
        })
    }

    /// Audio endpoints.
    pub fn audio(&self) -> AudioApi<'_> {
        AudioApi::new(self)
    }

    /// Library structure endpoints.
    pub fn library(&self) -> LibraryStructureApi<'_> {
        LibraryStructureApi::new(self)
    }

    /// Live TV endpoints.
    pub fn live_tv(&self) -> LiveTvApi<'_> {
        LiveTvApi::new(self)
    }

    /// Finish building a call with the client's base URL, credential, and
    /// interceptor, in that precedence order.
    async fn finalize(&self, call: OperationCall) -> Result<RequestDescriptor> {
        let config = self.config.read().await;
        call.build(
            &config.url,
            config.access_token.as_deref(),
            self.interceptor.as_deref(),
        )
    }

    pub(crate) async fn execute_empty(&self, call: OperationCall) -> Result<ResponseEnvelope<()>> {
        let request = self.finalize(call).await?;
        self.invoker.execute_empty(request).await
    }

    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        call: OperationCall,
    ) -> Result<ResponseEnvelope<Option<T>>> {
        let request = self.finalize(call).await?;
        self.invoker.execute_json(request).await
    }

    pub(crate) async fn execute_json_list<T: DeserializeOwned>(
        &self,
        call: OperationCall,
    ) -> Result<ResponseEnvelope<Option<Vec<T>>>> {
        let request = self.finalize(call).await?;
        self.invoker.execute_json_list(request).await
    }

    pub(crate) async fn execute_file(
        &self,
        call: OperationCall,
        dest_dir: Option<&Path>,
    ) -> Result<ResponseEnvelope<PathBuf>> {
        let request = self.finalize(call).await?;
        self.invoker.execute_file(request, dest_dir).await
    }
}
