//! Ways of getting hold of a bearer token before anything is uploaded.
//!
//! The binary picks one [`CredentialProvider`] up front and hands it to the
//! workflow; the workflow itself never looks at token files or prompts.

use crate::api_client::response::{read_json, require_string, string_at};
use crate::api_client::{ApiError, ApiResult, Credential};
use crate::configuration::ClientCredentials;
use crate::foundation::storage::TokenStore;
use async_trait::async_trait;
use log::info;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn obtain(&self) -> ApiResult<Credential>;
}

/// Exchanges a long-lived refresh token for an access token (Imgur).
pub struct RefreshTokenProvider {
    client: Client,
    token_url: String,
    app: ClientCredentials,
    refresh_token: String,
}

impl RefreshTokenProvider {
    pub fn new(
        client: Client,
        token_url: &str,
        app: ClientCredentials,
        refresh_token: &str,
    ) -> Self {
        Self {
            client,
            token_url: token_url.to_string(),
            app,
            refresh_token: refresh_token.to_string(),
        }
    }
}

#[async_trait]
impl CredentialProvider for RefreshTokenProvider {
    async fn obtain(&self) -> ApiResult<Credential> {
        let body = json!({
            "refresh_token": self.refresh_token,
            "client_id": self.app.client_id,
            "client_secret": self.app.client_secret,
            "grant_type": "refresh_token",
        });

        let response = self
            .client
            .post(&self.token_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::auth(&self.token_url, e.to_string()))?;
        let value = read_json(response)
            .await
            .map_err(|detail| ApiError::auth(&self.token_url, detail))?;

        parse_token_response(&self.token_url, &value, "/account_username")
    }
}

/// Walks the user through an authorization-code grant on the console
/// (Dropbox) and persists the resulting token.
pub struct InteractiveProvider {
    client: Client,
    authorize_url: String,
    token_url: String,
    app: ClientCredentials,
    store: TokenStore,
}

impl InteractiveProvider {
    pub fn new(
        client: Client,
        authorize_url: &str,
        token_url: &str,
        app: ClientCredentials,
        store: TokenStore,
    ) -> Self {
        Self {
            client,
            authorize_url: authorize_url.to_string(),
            token_url: token_url.to_string(),
            app,
            store,
        }
    }

    async fn exchange_code(&self, code: &str) -> ApiResult<Credential> {
        let form = [
            ("code", code),
            ("grant_type", "authorization_code"),
            ("client_id", self.app.client_id.as_str()),
            ("client_secret", self.app.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ApiError::auth(&self.token_url, e.to_string()))?;
        let value = read_json(response)
            .await
            .map_err(|detail| ApiError::auth(&self.token_url, detail))?;

        parse_token_response(&self.token_url, &value, "/account_id")
    }
}

#[async_trait]
impl CredentialProvider for InteractiveProvider {
    async fn obtain(&self) -> ApiResult<Credential> {
        let link = authorize_link(&self.authorize_url, &self.app.client_id)?;

        eprintln!("1. Go to: {}", link);
        eprintln!("2. Click \"Allow\" (you might have to log in first).");
        eprintln!("3. Copy the authorization code.");
        eprint!("Enter the authorization code here: ");

        let mut code = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut code)
            .await
            .map_err(|e| ApiError::auth(&self.authorize_url, e.to_string()))?;
        let code = code.trim();
        if code.is_empty() {
            return Err(ApiError::auth(
                &self.authorize_url,
                "no authorization code was entered",
            ));
        }

        let credential = self.exchange_code(code).await?;
        self.store
            .save(&credential)
            .map_err(|e| ApiError::local_io(self.store.path(), e))?;
        info!("Saved access token to {}", self.store.path().display());

        Ok(credential)
    }
}

/// Reuses a token saved by an earlier interactive run.
pub struct StoredTokenProvider {
    store: TokenStore,
}

impl StoredTokenProvider {
    pub fn new(store: TokenStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CredentialProvider for StoredTokenProvider {
    async fn obtain(&self) -> ApiResult<Credential> {
        let location = self.store.path().display().to_string();
        match self.store.load() {
            Ok(Some(credential)) => {
                info!("Reusing access token stored in {}", location);
                Ok(credential)
            }
            Ok(None) => Err(ApiError::auth(
                &location,
                "no stored token found; run again with --login",
            )),
            Err(e) => Err(ApiError::local_io(self.store.path(), e)),
        }
    }
}

/// Builds the page the user has to visit to grant access.
pub fn authorize_link(authorize_url: &str, client_id: &str) -> ApiResult<Url> {
    Url::parse_with_params(
        authorize_url,
        &[("client_id", client_id), ("response_type", "code")],
    )
    .map_err(|e| ApiError::auth(authorize_url, e.to_string()))
}

/// Pulls `access_token` out of a token endpoint response, logging the
/// account found at `identity` when the service reports one.
fn parse_token_response(url: &str, value: &Value, identity: &str) -> ApiResult<Credential> {
    let token =
        require_string(value, "/access_token").map_err(|detail| ApiError::auth(url, detail))?;

    if let Some(account) = string_at(value, identity) {
        info!("Retrieved access token for [account={}]", account);
    }

    Ok(Credential::new(token))
}
