//! Imgur: albums as containers, base64 JSON uploads.

use crate::api_client::response::{read_json, require_string};
use crate::api_client::{
    ApiError, ApiResult, ContainerId, ContainerRequest, Credential, ImageHost, LocalFile,
};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::info;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::{json, Value};

/// Imgur API v3 client.
///
/// # Arguments
///
/// * `client` - Shared HTTP client (carries the request timeout).
/// * `api_base_url` - Usually `https://api.imgur.com`.
pub struct ImgurClient {
    client: Client,
    api_base_url: String,
}

impl ImgurClient {
    pub fn new(client: Client, api_base_url: &str) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn album_url(&self) -> String {
        format!("{}/3/album", self.api_base_url)
    }

    fn image_url(&self) -> String {
        format!("{}/3/image", self.api_base_url)
    }

    async fn post_json(
        &self,
        url: &str,
        credential: &Credential,
        body: &Value,
    ) -> Result<Value, String> {
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
}

#[async_trait]
impl ImageHost for ImgurClient {
    async fn create_container(
        &self,
        credential: &Credential,
        request: &ContainerRequest,
    ) -> ApiResult<ContainerId> {
        let url = self.album_url();
        let body = json!({
            "title": request.name,
            "description": request.description,
        });

        let id = self
            .post_json(&url, credential, &body)
            .await
            .and_then(|value| require_string(&value, "/data/id"))
            .map_err(|detail| ApiError::remote(&url, detail))?;

        info!("Successfully created album [name={}] with [id={}]", request.name, id);
        Ok(ContainerId::new(id))
    }

    async fn upload_file(
        &self,
        credential: &Credential,
        container: &ContainerId,
        file: &LocalFile,
    ) -> ApiResult<String> {
        let url = self.image_url();
        let body = image_payload(container, file);

        self.post_json(&url, credential, &body)
            .await
            .and_then(|value| require_string(&value, "/data/link"))
            .map_err(|detail| ApiError::upload(&file.path, &url, detail))
    }
}

fn image_payload(container: &ContainerId, file: &LocalFile) -> Value {
    json!({
        "image": STANDARD.encode(&file.bytes),
        "title": file.name,
        "name": file.name,
        "album": container.as_str(),
    })
}
