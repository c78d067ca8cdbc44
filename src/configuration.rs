use config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};

const DEFAULT_ALBUM_PREFIX: &str = "BandOfBrothers";
const DEFAULT_TIMEOUT_SECS: i64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub album_prefix: String,
    pub request_timeout_secs: u64,
    pub imgur: ImgurSettings,
    pub dropbox: DropboxSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImgurSettings {
    pub token_url: String,
    pub api_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DropboxSettings {
    pub authorize_url: String,
    pub token_url: String,
    pub api_base_url: String,
    pub content_base_url: String,
}

/// Client id and secret of the registered API application.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }
}

/// Loads settings from the built-in defaults, then `cfg_file` if it exists,
/// then `FFPICS__*` environment variables (`__` separates nested keys).
pub fn get_configuration(cfg_file: &Path) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("album_prefix", DEFAULT_ALBUM_PREFIX)?
        .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS)?
        .set_default("imgur.token_url", "https://api.imgur.com/oauth2/token")?
        .set_default("imgur.api_base_url", "https://api.imgur.com")?
        .set_default(
            "dropbox.authorize_url",
            "https://www.dropbox.com/oauth2/authorize",
        )?
        .set_default("dropbox.token_url", "https://api.dropboxapi.com/oauth2/token")?
        .set_default("dropbox.api_base_url", "https://api.dropboxapi.com")?
        .set_default("dropbox.content_base_url", "https://content.dropboxapi.com")?
        .add_source(
            config::File::new(&cfg_file.to_string_lossy(), config::FileFormat::Yaml)
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix("FFPICS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub struct ConfigFolder {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub token_file: PathBuf,
}

impl ConfigFolder {
    pub fn new() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::at(&home_dir.join(".ffpics"))
    }

    pub fn at(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            config_file: config_dir.join("config.yaml"),
            token_file: config_dir.join("dropbox_token"),
        }
    }
}

impl Default for ConfigFolder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_config(cfg_folder: ConfigFolder) -> anyhow::Result<()> {
    println!("\x1b[1m\x1b[32mCreating configuration...\x1b[0m");

    if cfg_folder.config_file.exists() && !confirm_overwrite()? {
        println!("\x1b[33mOperation cancelled.\x1b[0m");
        return Ok(());
    }

    write_config_template(&cfg_folder)?;

    println!("\x1b[32mConfiguration file created at:");
    println!("  -> {}", cfg_folder.config_file.display());
    println!("\x1b[0mEvery key is optional; uncomment the ones you want to change.");

    Ok(())
}

fn write_config_template(cfg_folder: &ConfigFolder) -> io::Result<()> {
    fs::create_dir_all(&cfg_folder.config_dir)?;
    fs::write(&cfg_folder.config_file, include_str!("config_template.yaml"))
}

fn confirm_overwrite() -> Result<bool, io::Error> {
    println!("\x1b[31mThe configuration file already exists.");
    println!("Do you want to overwrite it? (y/N)\x1b[0m");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}
