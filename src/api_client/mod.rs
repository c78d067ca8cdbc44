mod api_error;
mod credential;
mod dropbox;
mod host;
mod imgur;
mod response;

pub use api_error::{ApiError, ApiResult};
pub use credential::*;
pub use dropbox::DropboxClient;
pub use host::*;
pub use imgur::ImgurClient;
