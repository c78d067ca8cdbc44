//! Dropbox: folders as containers, raw-byte uploads published through
//! shared links.

use crate::api_client::response::{read_json, require_string};
use crate::api_client::{
    ApiError, ApiResult, ContainerId, ContainerRequest, Credential, ImageHost, LocalFile,
};
use async_trait::async_trait;
use log::{debug, info};
use regex::Regex;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{json, Value};

const API_ARG_HEADER: &str = "Dropbox-API-Arg";

/// Dropbox API v2 client.
///
/// # Arguments
///
/// * `client` - Shared HTTP client (carries the request timeout).
/// * `api_base_url` - RPC endpoints, usually `https://api.dropboxapi.com`.
/// * `content_base_url` - Upload endpoint, usually `https://content.dropboxapi.com`.
pub struct DropboxClient {
    client: Client,
    api_base_url: String,
    content_base_url: String,
    share_param: Regex,
}

impl DropboxClient {
    pub fn new(client: Client, api_base_url: &str, content_base_url: &str) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            content_base_url: content_base_url.trim_end_matches('/').to_string(),
            share_param: Regex::new(r"([?&])dl=0").unwrap(),
        }
    }

    async fn rpc(&self, url: &str, credential: &Credential, body: &Value) -> Result<Value, String> {
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, credential.bearer())
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        read_json(response).await
    }

    async fn upload_content(
        &self,
        url: &str,
        credential: &Credential,
        remote_path: &str,
        bytes: &[u8],
    ) -> Result<Value, String> {
        let arg = json!({
            "path": remote_path,
            "mode": "add",
            "autorename": true,
            "mute": false,
        });

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, credential.bearer())
            .header(API_ARG_HEADER, arg.to_string())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| e.to_string())?;
        read_json(response).await
    }

    /// Rewrites `dl=0` so the link serves the image itself instead of the
    /// Dropbox preview page.
    fn embeddable(&self, shared_url: &str) -> String {
        if self.share_param.is_match(shared_url) {
            self.share_param.replace(shared_url, "${1}raw=1").into_owned()
        } else if shared_url.contains('?') {
            format!("{}&raw=1", shared_url)
        } else {
            format!("{}?raw=1", shared_url)
        }
    }
}

#[async_trait]
impl ImageHost for DropboxClient {
    async fn create_container(
        &self,
        credential: &Credential,
        request: &ContainerRequest,
    ) -> ApiResult<ContainerId> {
        let url = format!("{}/2/files/create_folder_v2", self.api_base_url);
        let body = json!({
            "path": format!("/{}", request.name),
            "autorename": true,
        });

        let folder = self
            .rpc(&url, credential, &body)
            .await
            .and_then(|value| require_string(&value, "/metadata/path_display"))
            .map_err(|detail| ApiError::remote(&url, detail))?;

        info!("Successfully created folder [name={}] at [path={}]", request.name, folder);
        Ok(ContainerId::new(folder))
    }

    async fn upload_file(
        &self,
        credential: &Credential,
        container: &ContainerId,
        file: &LocalFile,
    ) -> ApiResult<String> {
        let upload_url = format!("{}/2/files/upload", self.content_base_url);
        let remote_path = remote_file_path(container, &file.name);

        let stored_path = self
            .upload_content(&upload_url, credential, &remote_path, &file.bytes)
            .await
            .and_then(|value| require_string(&value, "/path_display"))
            .map_err(|detail| ApiError::upload(&file.path, &upload_url, detail))?;
        debug!("Stored {} as {}", file.path.display(), stored_path);

        let share_url = format!(
            "{}/2/sharing/create_shared_link_with_settings",
            self.api_base_url
        );
        let shared = self
            .rpc(&share_url, credential, &json!({ "path": stored_path }))
            .await
            .and_then(|value| require_string(&value, "/url"))
            .map_err(|detail| ApiError::upload(&file.path, &share_url, detail))?;

        Ok(self.embeddable(&shared))
    }
}

fn remote_file_path(container: &ContainerId, name: &str) -> String {
    format!("{}/{}", container.as_str().trim_end_matches('/'), name)
}
