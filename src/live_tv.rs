//! Live TV endpoints: channels, timers, recordings, tuner discovery.

use crate::client::HarmoniaClient;
use crate::error::Result;
use crate::invoker::ResponseEnvelope;
use crate::request::{OperationCall, OperationSpec};
use crate::types::{ChannelInfo, ImageType, QueryResult, RecordingGroup, TimerInfo, TunerHostInfo};
use reqwest::Method;

static GET_CHANNELS: OperationSpec = OperationSpec {
    name: "getLiveTvChannels",
    method: Method::GET,
    path: "/LiveTv/Channels",
    accept: "application/json",
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

static GET_TIMERS: OperationSpec = OperationSpec {
    name: "getTimers",
    method: Method::GET,
    path: "/LiveTv/Timers",
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

static DISCOVER_TUNERS: OperationSpec = OperationSpec {
    name: "discoverTuners",
    method: Method::GET,
    path: "/LiveTv/Tuners/Discover",
    accept: "application/json",
    content_type: None,
    deprecated: false,
};

// The upstream API really does expose this misspelled route alongside the
// correct one, and some servers only answer on it. Reproduced verbatim; do
// not "fix" the path.
static DISCVOVER_TUNERS: OperationSpec = OperationSpec {
    name: "discvoverTuners",
    method: Method::GET,
    path: "/LiveTv/Tuners/Discvover",
    accept: "application/json",
    content_type: None,
    deprecated: true,
};

static GET_RECORDING_GROUP: OperationSpec = OperationSpec {
    name: "getRecordingGroup",
    method: Method::GET,
    path: "/LiveTv/Recordings/Groups/{groupId}",
    accept: "application/json",
    content_type: None,
    deprecated: true,
};

/// Optional parameters for the channel listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct ChannelParams {
    pub user_id: Option<String>,
    pub start_index: Option<u32>,
    pub limit: Option<u32>,
    pub is_favorite: Option<bool>,
    /// Image types to include, sent as repeated `enableImageTypes=` entries
    pub enable_image_types: Option<Vec<ImageType>>,
    /// Extra item fields to include, sent as repeated `fields=` entries
    pub fields: Option<Vec<String>>,
}

impl ChannelParams {
    fn apply(&self, call: OperationCall) -> OperationCall {
        call.query_opt("userId", self.user_id.as_deref())
            .query_opt("startIndex", self.start_index)
            .query_opt("limit", self.limit)
            .query_opt("isFavorite", self.is_favorite)
            .query_multi("enableImageTypes", self.enable_image_types.as_deref())
            .query_multi("fields", self.fields.as_deref())
    }
}

/// Live TV client, borrowed from [`HarmoniaClient::live_tv`].
pub struct LiveTvApi<'a> {
    client: &'a HarmoniaClient,
}

impl<'a> LiveTvApi<'a> {
    pub(crate) fn new(client: &'a HarmoniaClient) -> Self {
        Self { client }
    }

    /// List live TV channels.
    pub async fn channels(
        &self,
        params: &ChannelParams,
    ) -> Result<ResponseEnvelope<Option<QueryResult<ChannelInfo>>>> {
        let call = params.apply(GET_CHANNELS.request());
        self.client.execute_json(call).await
    }

    /// Fetch one channel by id.
    pub async fn channel(
        &self,
        channel_id: &str,
        user_id: Option<&str>,
    ) -> Result<ResponseEnvelope<Option<ChannelInfo>>> {
        let call = GET_CHANNEL
            .request()
            .path_param("channelId", channel_id)
            .query_opt("userId", user_id);
        self.client.execute_json(call).await
    }

    /// List scheduled recording timers.
    pub async fn timers(
        &self,
        channel_id: Option<&str>,
        series_timer_id: Option<&str>,
    ) -> Result<ResponseEnvelope<Option<QueryResult<TimerInfo>>>> {
        let call = GET_TIMERS
            .request()
            .query_opt("channelId", channel_id)
            .query_opt("seriesTimerId", series_timer_id);
        self.client.execute_json(call).await
    }

    /// Delete a recording.
    pub async fn delete_recording(&self, recording_id: &str) -> Result<ResponseEnvelope<()>> {
        let call = DELETE_RECORDING
            .request()
            .path_param("recordingId", recording_id);
        self.client.execute_empty(call).await
    }

    /// Scan the local network for tuner devices.
    pub async fn discover_tuners(
        &self,
        new_devices_only: Option<bool>,
    ) -> Result<ResponseEnvelope<Option<Vec<TunerHostInfo>>>> {
        let call = DISCOVER_TUNERS
            .request()
            .query_opt("newDevicesOnly", new_devices_only);
        self.client.execute_json_list(call).await
    }

    /// Misspelled twin of [`discover_tuners`](Self::discover_tuners), hitting
    /// `/LiveTv/Tuners/Discvover`. The typo is in the upstream API itself;
    /// the route is kept for servers that only answer on it.
    #[deprecated(note = "upstream typo route; prefer discover_tuners")]
    pub async fn discvover_tuners(
        &self,
        new_devices_only: Option<bool>,
    ) -> Result<ResponseEnvelope<Option<Vec<TunerHostInfo>>>> {
        let call = DISCVOVER_TUNERS
            .request()
            .query_opt("newDevicesOnly", new_devices_only);
        self.client.execute_json_list(call).await
    }

    /// Fetch a recording group.
    #[deprecated(note = "recording groups were retired upstream; the route may disappear")]
    pub async fn recording_group(
        &self,
        group_id: &str,
    ) -> Result<ResponseEnvelope<Option<RecordingGroup>>> {
        let call = GET_RECORDING_GROUP
            .request()
            .path_param("groupId", group_id);
        self.client.execute_json(call).await
    }
}
