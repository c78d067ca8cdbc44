//! The seam between the upload workflow and a concrete hosting service.

use crate::api_client::ApiResult;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

/// Opaque bearer token granting API access for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Tokens end up in log lines through `{:?}`; never print them.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Identifier of the album or folder the files of a run are grouped under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRequest {
    pub name: String,
    pub description: Option<String>,
}

/// A local file read fully into memory, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Where a local file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub path: PathBuf,
    pub link: String,
}

/// A hosting service able to group uploads and hand back public links.
///
/// Implemented by [`ImgurClient`](crate::api_client::ImgurClient) (albums)
/// and [`DropboxClient`](crate::api_client::DropboxClient) (folders).
///
/// # Example
///
/// ```no_run
/// use ffpics::api_client::{ContainerRequest, Credential, ImageHost, ImgurClient};
///
/// async fn example() {
///     let imgur = ImgurClient::new(reqwest::Client::new(), "https://api.imgur.com");
///     let credential = Credential::new("access-token");
///     let request = ContainerRequest {
///         name: "BandOfBrothers-2024-09-12".to_string(),
///         description: Some("Week 1 recap".to_string()),
///     };
///
///     match imgur.create_container(&credential, &request).await {
///         Ok(album) => println!("Created album {}", album),
///         Err(e) => eprintln!("Error: {}", e),
///     }
/// }
/// ```
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Creates a fresh album/folder. Never deduplicated: calling it twice
    /// with the same name yields two containers.
    ///
    /// # Arguments
    ///
    /// * `credential` - Bearer token obtained for this run.
    /// * `request` - Display name and optional description of the container.
    async fn create_container(
        &self,
        credential: &Credential,
        request: &ContainerRequest,
    ) -> ApiResult<ContainerId>;

    /// Uploads one file into `container` and returns its public URL.
    ///
    /// The file's base name is used as both title and name on the remote side.
    ///
    /// # Arguments
    ///
    /// * `credential` - Bearer token obtained for this run.
    /// * `container` - Album or folder returned by `create_container`.
    /// * `file` - The file contents and its name.
    async fn upload_file(
        &self,
        credential: &Credential,
        container: &ContainerId,
        file: &LocalFile,
    ) -> ApiResult<String>;
}
