/// # The Main Entry Point of Publishing
///
/// This module wires the workflow together, from configuration loading to
/// printing the league note template.
///
/// # Steps:
/// 1. Loads the configuration
/// 2. Obtains a credential
/// 3. Creates today's album or folder
/// 4. Uploads every file of the upload folder, in filename order
/// 5. Renders the template to stdout
///
use crate::api_client::{
    ApiError, ApiResult, ContainerRequest, CredentialProvider, DropboxClient, ImageHost,
    ImgurClient, InteractiveProvider, RefreshTokenProvider, StoredTokenProvider,
};
use crate::configuration::{self, ClientCredentials, ConfigFolder, Settings};
use crate::foundation::storage::TokenStore;
use crate::foundation::utils::{container_name, render_template};
use crate::process;
use anyhow::Context;
use chrono::Local;
use log::info;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Which service to publish to, with the secrets it needs.
pub enum HostCommand {
    Imgur {
        app: ClientCredentials,
        refresh_token: String,
    },
    Dropbox {
        app: ClientCredentials,
        /// Force the interactive authorization even if a token is stored.
        login: bool,
    },
}

pub struct RunOptions {
    pub host: HostCommand,
    pub upload_folder: PathBuf,
    pub description: Option<String>,
}

/// Everything the workflow needs once the collaborators are chosen.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub container: ContainerRequest,
    pub upload_folder: PathBuf,
}

pub async fn run(cfg_folder: ConfigFolder, options: RunOptions) -> anyhow::Result<()> {
    let settings = configuration::get_configuration(&cfg_folder.config_file)
        .context("Unable to parse configuration file")?;
    let client = build_http_client(&settings)?;
    let stored_token = uses_stored_token(&cfg_folder, &options.host);

    let (provider, host) = build_collaborators(&settings, &cfg_folder, client, options.host);

    let request = PublishRequest {
        container: ContainerRequest {
            name: container_name(&settings.album_prefix, Local::now().date_naive()),
            description: options.description,
        },
        upload_folder: options.upload_folder,
    };

    let template = match publish(provider.as_ref(), host.as_ref(), &request).await {
        Ok(template) => template,
        Err(e) => {
            let context = failure_context(&request, &e, stored_token);
            return Err(anyhow::Error::new(e).context(context));
        }
    };

    info!("Use the ESPN league note template below as a starting place...");
    print!("{}", template);
    Ok(())
}

/// Runs credential → container → uploads → template, stopping at the first
/// error. Nothing is rendered unless every file made it.
pub async fn publish(
    provider: &dyn CredentialProvider,
    host: &dyn ImageHost,
    request: &PublishRequest,
) -> ApiResult<String> {
    let credential = provider.obtain().await?;

    info!("Creating [container={}]", request.container.name);
    let container = host.create_container(&credential, &request.container).await?;

    let results = process::upload_all(host, &credential, &container, &request.upload_folder).await?;

    Ok(render_template(
        request.container.description.as_deref(),
        &results,
    ))
}

/// True when the Dropbox token saved by an earlier run will be reused.
fn uses_stored_token(cfg_folder: &ConfigFolder, command: &HostCommand) -> bool {
    matches!(command, HostCommand::Dropbox { login: false, .. })
        && TokenStore::new(&cfg_folder.token_file).exists()
}

fn failure_context(request: &PublishRequest, err: &ApiError, stored_token: bool) -> String {
    let mut context = format!("Publishing {} failed", request.upload_folder.display());
    if stored_token && is_rejected_token(err) {
        context.push_str("; the stored Dropbox token was rejected, run again with --login");
    }
    context
}

fn is_rejected_token(err: &ApiError) -> bool {
    matches!(err, ApiError::Remote { detail, .. } if detail.starts_with("status 401"))
}

fn build_http_client(settings: &Settings) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

fn build_collaborators(
    settings: &Settings,
    cfg_folder: &ConfigFolder,
    client: Client,
    command: HostCommand,
) -> (Box<dyn CredentialProvider>, Box<dyn ImageHost>) {
    match command {
        HostCommand::Imgur { app, refresh_token } => (
            Box::new(RefreshTokenProvider::new(
                client.clone(),
                &settings.imgur.token_url,
                app,
                &refresh_token,
            )),
            Box::new(ImgurClient::new(client, &settings.imgur.api_base_url)),
        ),
        HostCommand::Dropbox { app, login } => {
            let store = TokenStore::new(&cfg_folder.token_file);
            let provider: Box<dyn CredentialProvider> = if store.exists() && !login {
                Box::new(StoredTokenProvider::new(store))
            } else {
                Box::new(InteractiveProvider::new(
                    client.clone(),
                    &settings.dropbox.authorize_url,
                    &settings.dropbox.token_url,
                    app,
                    store,
                ))
            };
            (
                provider,
                Box::new(DropboxClient::new(
                    client,
                    &settings.dropbox.api_base_url,
                    &settings.dropbox.content_base_url,
                )),
            )
        }
    }
}
