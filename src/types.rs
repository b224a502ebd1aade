//! Types for Harmonia server API requests and responses.
//!
//! The wire format uses PascalCase field names, so every DTO carries
//! `#[serde(rename_all = "PascalCase")]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for connecting to a Harmonia server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "https://media.example.com")
    pub url: String,
    /// Access token sent as a bearer credential (if authenticated)
    pub access_token: Option<String>,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
        }
    }

    /// Create a config with an existing token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: Some(access_token.into()),
        }
    }
}

// =============================================================================
// System Types
// =============================================================================

/// Public server information, available without authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicSystemInfo {
    pub server_name: String,
    pub version: String,
    pub id: String,
    pub operating_system: Option<String>,
}

// =============================================================================
// Library Structure Types
// =============================================================================

/// A virtual library folder as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VirtualFolderInfo {
    pub name: String,
    #[serde(default)]
    pub locations: Vec<String>,
    pub collection_type: Option<String>,
    pub item_id: Option<String>,
}

/// A media path to attach to an existing virtual folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaPathInfo {
    /// Name of the virtual folder the path belongs to
    pub name: String,
    pub path: String,
    pub network_path: Option<String>,
}

// =============================================================================
// Live TV Types
// =============================================================================

/// Image kinds attached to items and channels.
///
/// Serialized by variant name, which is also the wire form used in
/// `enableImageTypes=` query entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageType {
    Primary,
    Art,
    Backdrop,
    Banner,
    Logo,
    Thumb,
    Disc,
    Box,
    Screenshot,
    Chapter,
}

impl ImageType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Art => "Art",
            Self::Backdrop => "Backdrop",
            Self::Banner => "Banner",
            Self::Logo => "Logo",
            Self::Thumb => "Thumb",
            Self::Disc => "Disc",
            Self::Box => "Box",
            Self::Screenshot => "Screenshot",
            Self::Chapter => "Chapter",
        }
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paged query result wrapper used by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult<T> {
    pub items: Vec<T>,
    pub total_record_count: i32,
    #[serde(default)]
    pub start_index: i32,
}

/// A live TV channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    pub number: Option<String>,
    pub channel_type: Option<String>,
}

/// A tuner device reported by tuner discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TunerHostInfo {
    pub id: Option<String>,
    pub url: String,
    pub device_id: Option<String>,
    pub friendly_name: Option<String>,
    #[serde(rename = "Type")]
    pub tuner_type: Option<String>,
}

/// A scheduled recording timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimerInfo {
    pub id: String,
    pub channel_id: String,
    pub program_id: Option<String>,
    pub name: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: Option<String>,
}

/// A recording group. The server still exposes these on deprecated routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordingGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub recording_count: i32,
}
