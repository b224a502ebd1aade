//! Audio stream endpoints.

use crate::client::HarmoniaClient;
use crate::error::Result;
use crate::invoker::ResponseEnvelope;
use crate::request::{OperationCall, OperationSpec};
use reqwest::Method;
use std::path::{Path, PathBuf};

static GET_AUDIO_STREAM: OperationSpec = OperationSpec {
    name: "getAudioStream",
    method: Method::GET,
    path: "/Audio/{itemId}/stream",
    accept: "audio/*",
    content_type: None,
    deprecated: false,
};

static HEAD_AUDIO_STREAM: OperationSpec = OperationSpec {
    name: "headAudioStream",
    method: Method::HEAD,
    path: "/Audio/{itemId}/stream",
    accept: "audio/*",
    content_type: None,
    deprecated: false,
};

static GET_AUDIO_STREAM_BY_CONTAINER: OperationSpec = OperationSpec {
    name: "getAudioStreamByContainer",
    method: Method::GET,
    path: "/Audio/{itemId}/stream.{container}",
    accept: "audio/*",
    content_type: None,
    deprecated: false,
};

/// Optional parameters for the audio stream endpoints.
///
/// `None` fields are omitted from the query string entirely; requiredness
/// beyond the path parameters is the server's business, not enforced here.
#[derive(Debug, Clone, Default)]
pub struct AudioStreamParams {
    pub container: Option<String>,
    pub audio_codec: Option<String>,
    pub audio_channels: Option<u32>,
    pub max_streaming_bitrate: Option<u32>,
    pub device_id: Option<String>,
    /// Request the original file without transcoding
    pub static_stream: Option<bool>,
}

impl AudioStreamParams {
    fn apply(&self, call: OperationCall) -> OperationCall {
        call.query_opt("container", self.container.as_deref())
            .query_opt("audioCodec", self.audio_codec.as_deref())
            .query_opt("audioChannels", self.audio_channels)
            .query_opt("maxStreamingBitrate", self.max_streaming_bitrate)
            .query_opt("deviceId", self.device_id.as_deref())
            .query_opt("static", self.static_stream)
    }
}

/// Audio endpoints client, borrowed from [`HarmoniaClient::audio`].
pub struct AudioApi<'a> {
    client: &'a HarmoniaClient,
}

impl<'a> AudioApi<'a> {
    pub(crate) fn new(client: &'a HarmoniaClient) -> Self {
        Self { client }
    }

    /// Download an audio stream to a file.
    ///
    /// The filename honors the server's `Content-Disposition` header when
    /// present. Files land in `dest_dir`, or the system temp directory.
    pub async fn stream(
        &self,
        item_id: &str,
        params: &AudioStreamParams,
        dest_dir: Option<&Path>,
    ) -> Result<ResponseEnvelope<PathBuf>> {
        let call = params.apply(GET_AUDIO_STREAM.request().path_param("itemId", item_id));
        self.client.execute_file(call, dest_dir).await
    }

    /// HEAD variant of [`stream`](Self::stream): identical request building
    /// and response handling, different verb. Useful for probing transcode
    /// headers without pulling the body.
    pub async fn stream_head(
        &self,
        item_id: &str,
        params: &AudioStreamParams,
    ) -> Result<ResponseEnvelope<()>> {
        let call = params.apply(HEAD_AUDIO_STREAM.request().path_param("itemId", item_id));
        self.client.execute_empty(call).await
    }

    /// Download an audio stream with the container baked into the path
    /// (`/Audio/{itemId}/stream.{container}`).
    pub async fn stream_by_container(
        &self,
        item_id: &str,
        container: &str,
        params: &AudioStreamParams,
        dest_dir: Option<&Path>,
    ) -> Result<ResponseEnvelope<PathBuf>> {
        let call = params.apply(
            GET_AUDIO_STREAM_BY_CONTAINER
                .request()
                .path_param("itemId", item_id)
                .path_param("container", container),
        );
        self.client.execute_file(call, dest_dir).await
    }
}
