//! Library structure endpoints: virtual folders and their media paths.

use crate::client::HarmoniaClient;
use crate::error::Result;
use crate::invoker::ResponseEnvelope;
use crate::request::OperationSpec;
use crate::types::{MediaPathInfo, VirtualFolderInfo};
use reqwest::Method;

static GET_VIRTUAL_FOLDERS: OperationSpec = OperationSpec {
    name: "getVirtualFolders",
    method: Method::GET,
    path: "/Library/VirtualFolders",
    accept: "application/json",
    content_type: None,
    deprecated: false,
};

static ADD_VIRTUAL_FOLDER: OperationSpec = OperationSpec {
    name: "addVirtualFolder",
    method: Method::POST,
    path: "/Library/VirtualFolders",
    accept: "application/json",
    content_type: None,
    deprecated: false,
};

static REMOVE_VIRTUAL_FOLDER: OperationSpec = OperationSpec {
    name: "removeVirtualFolder",
    method: Method::DELETE,
    path: "/Library/VirtualFolders",
    accept: "application/json",
    content_type: None,
    deprecated: false,
};

static RENAME_VIRTUAL_FOLDER: OperationSpec = OperationSpec {
    name: "renameVirtualFolder",
    method: Method::POST,
    path: "/Library/VirtualFolders/Name",
    accept: "application/json",
    content_type: None,
    deprecated: false,
};

static ADD_MEDIA_PATH: OperationSpec = OperationSpec {
    name: "addMediaPath",
    method: Method::POST,
    path: "/Library/VirtualFolders/Paths",
    accept: "application/json",
    content_type: Some("application/json"),
    deprecated: false,
};

static REMOVE_MEDIA_PATH: OperationSpec = OperationSpec {
    name: "removeMediaPath",
    method: Method::DELETE,
    path: "/Library/VirtualFolders/Paths",
    accept: "application/json",
    content_type: None,
    deprecated: false,
};

/// Library structure client, borrowed from [`HarmoniaClient::library`].
pub struct LibraryStructureApi<'a> {
    client: &'a HarmoniaClient,
}

impl<'a> LibraryStructureApi<'a> {
    pub(crate) fn new(client: &'a HarmoniaClient) -> Self {
        Self { client }
    }

    /// List all virtual folders.
    pub async fn virtual_folders(&self) -> Result<ResponseEnvelope<Option<Vec<VirtualFolderInfo>>>> {
        self.client
            .execute_json_list(GET_VIRTUAL_FOLDERS.request())
            .await
    }

    /// Create a virtual folder. `paths` is sent as repeated `paths=` query
    /// entries, one per element.
    pub async fn add_virtual_folder(
        &self,
        name: &str,
        collection_type: Option<&str>,
        paths: Option<&[String]>,
        refresh_library: Option<bool>,
    ) -> Result<ResponseEnvelope<()>> {
        let call = ADD_VIRTUAL_FOLDER
            .request()
            .query("name", name)
            .query_opt("collectionType", collection_type)
            .query_multi("paths", paths)
            .query_opt("refreshLibrary", refresh_library);
        self.client.execute_empty(call).await
    }

    /// Remove a virtual folder.
    pub async fn remove_virtual_folder(
        &self,
        name: &str,
        refresh_library: Option<bool>,
    ) -> Result<ResponseEnvelope<()>> {
        let call = REMOVE_VIRTUAL_FOLDER
            .request()
            .query("name", name)
            .query_opt("refreshLibrary", refresh_library);
        self.client.execute_empty(call).await
    }

    /// Rename a virtual folder.
    pub async fn rename_virtual_folder(
        &self,
        name: &str,
        new_name: &str,
        refresh_library: Option<bool>,
    ) -> Result<ResponseEnvelope<()>> {
        let call = RENAME_VIRTUAL_FOLDER
            .request()
            .query("name", name)
            .query("newName", new_name)
            .query_opt("refreshLibrary", refresh_library);
        self.client.execute_empty(call).await
    }

    /// Attach a media path to an existing virtual folder. The path info is
    /// sent as a JSON body.
    pub async fn add_media_path(
        &self,
        path_info: &MediaPathInfo,
        refresh_library: Option<bool>,
    ) -> Result<ResponseEnvelope<()>> {
        let call = ADD_MEDIA_PATH
            .request()
            .query_opt("refreshLibrary", refresh_library)
            .json_body(path_info)?;
        self.client.execute_empty(call).await
    }

    /// Detach a media path from a virtual folder.
    pub async fn remove_media_path(
        &self,
        name: &str,
        path: &str,
        refresh_library: Option<bool>,
    ) -> Result<ResponseEnvelope<()>> {
        let call = REMOVE_MEDIA_PATH
            .request()
            .query("name", name)
            .query("path", path)
            .query_opt("refreshLibrary", refresh_library);
        self.client.execute_empty(call).await
    }
}
