pub mod api_client;
pub mod configuration;
pub mod foundation;
pub mod process;
pub mod startup;

pub use api_client::{ApiError, ApiResult, CredentialProvider, ImageHost};
pub use configuration::*;
pub use foundation::utils::{container_name, render_template};
pub use process::upload_all;
pub use startup::{publish, run, PublishRequest};
