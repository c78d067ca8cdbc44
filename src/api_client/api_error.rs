use std::io;
use std::path::Path;
use thiserror::Error;

/// Every way a publishing run can fail. None of them are retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authorization against {url} failed: {detail}")]
    Auth { url: String, detail: String },

    #[error("Creating the remote container at {url} failed: {detail}")]
    Remote { url: String, detail: String },

    #[error("Uploading {path} to {url} failed: {detail}")]
    Upload {
        path: String,
        url: String,
        detail: String,
    },

    #[error("Unable to read {path}: {source}")]
    LocalIo {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn auth(url: &str, detail: impl Into<String>) -> Self {
        Self::Auth {
            url: url.to_string(),
            detail: detail.into(),
        }
    }

    pub fn remote(url: &str, detail: impl Into<String>) -> Self {
        Self::Remote {
            url: url.to_string(),
            detail: detail.into(),
        }
    }

    pub fn upload(path: &Path, url: &str, detail: impl Into<String>) -> Self {
        Self::Upload {
            path: path.display().to_string(),
            url: url.to_string(),
            detail: detail.into(),
        }
    }

    pub fn local_io(path: &Path, source: io::Error) -> Self {
        Self::LocalIo {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_error_names_file_and_endpoint() {
        let err = ApiError::upload(
            Path::new("/tmp/week1/b.png"),
            "https://api.imgur.com/3/image",
            "status 400 Bad Request: {}",
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/week1/b.png"));
        assert!(message.contains("https://api.imgur.com/3/image"));
        assert!(message.contains("status 400"));
    }

    #[test]
    fn test_local_io_keeps_source() {
        let err = ApiError::local_io(
            Path::new("missing"),
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "Unable to read missing: no such file");
    }
}
