//! Harmonia Media Server Client
//!
//! Typed HTTP client library for the Harmonia media server API (audio
//! streaming, library structure, live TV).
//!
//! Instead of hundreds of hand-rolled request methods, every endpoint is a
//! static [`OperationSpec`] row consumed by one generic engine: the spec is
//! turned into an [`OperationCall`], parameters are filled in, and the
//! [`HttpInvoker`] sends the request exactly once and decodes the response
//! by the caller-declared shape (empty, JSON value, JSON list, or raw file).
//! Non-2xx responses surface as a structured [`ClientError::Api`] carrying
//! status, headers, and the captured body text.
//!
//! # Example
//!
//! ```ignore
//! use harmonia_client::{ClientConfig, HarmoniaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("https://media.example.com");
//!     let client = HarmoniaClient::new(config)?;
//!
//!     let info = client.server_info().await?;
//!     println!("Connected to {} v{}", info.server_name, info.version);
//!
//!     let folders = client.library().virtual_folders().await?;
//!     for folder in folders.payload.unwrap_or_default() {
//!         println!("{}", folder.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod audio;
mod client;
mod error;
mod invoker;
mod library;
mod live_tv;
mod request;
mod transport;
mod types;

// Re-export main types
pub use client::HarmoniaClient;
pub use error::{ClientError, Result, NO_BODY};
pub use invoker::{HttpInvoker, ResponseEnvelope};
pub use request::{OperationCall, OperationSpec, RequestDescriptor, RequestInterceptor};
pub use transport::{BodyStream, HttpTransport, Transport, TransportResponse};
pub use types::{
    ChannelInfo, ClientConfig, ImageType, MediaPathInfo, PublicSystemInfo, QueryResult,
    RecordingGroup, TimerInfo, TunerHostInfo, VirtualFolderInfo,
};

// Re-export sub-clients for direct use if needed
pub use audio::{AudioApi, AudioStreamParams};
pub use library::LibraryStructureApi;
pub use live_tv::{ChannelParams, LiveTvApi};
