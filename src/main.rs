use clap::{Arg, ArgAction, ArgMatches, Command};
use ffpics::configuration::{create_config, ClientCredentials, ConfigFolder};
use ffpics::startup::{run, HostCommand, RunOptions};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Command::new("ffpics")
        .about("🏈 Upload league note images and print a ready-to-paste template 🏈")
        .subcommand(
            Command::new("imgur")
                .about("📸 Upload the folder to a new Imgur album")
                .arg(
                    Arg::new("client_id")
                        .required(true)
                        .help("Client Id of the Imgur application"),
                )
                .arg(
                    Arg::new("client_secret")
                        .required(true)
                        .help("Client Secret of the Imgur application"),
                )
                .arg(
                    Arg::new("refresh_token")
                        .required(true)
                        .help("Refresh token of the Imgur account"),
                )
                .arg(upload_folder_arg())
                .arg(description_arg()),
        )
        .subcommand(
            Command::new("dropbox")
                .about("📦 Upload the folder to a new Dropbox folder")
                .arg(
                    Arg::new("app_key")
                        .required(true)
                        .help("App key of the Dropbox application"),
                )
                .arg(
                    Arg::new("app_secret")
                        .required(true)
                        .help("App secret of the Dropbox application"),
                )
                .arg(upload_folder_arg())
                .arg(description_arg())
                .arg(
                    Arg::new("login")
                        .long("login")
                        .action(ArgAction::SetTrue)
                        .help("Authorize again even if a token is already stored"),
                ),
        )
        .subcommand(Command::new("config").about("🛠️ Create or update the configuration file"))
        .get_matches();

    let cfg_folder = ConfigFolder::new();

    match args.subcommand() {
        Some(("imgur", matches)) => {
            let host = HostCommand::Imgur {
                app: ClientCredentials::new(
                    required(matches, "client_id"),
                    required(matches, "client_secret"),
                ),
                refresh_token: required(matches, "refresh_token").to_string(),
            };
            run(cfg_folder, run_options(matches, host)).await
        }
        Some(("dropbox", matches)) => {
            let host = HostCommand::Dropbox {
                app: ClientCredentials::new(
                    required(matches, "app_key"),
                    required(matches, "app_secret"),
                ),
                login: matches.get_flag("login"),
            };
            run(cfg_folder, run_options(matches, host)).await
        }
        Some(("config", _)) => create_config(cfg_folder),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn upload_folder_arg() -> Arg {
    Arg::new("upload_folder")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Folder containing the images to upload")
}

fn description_arg() -> Arg {
    Arg::new("description")
        .long("description")
        .help("Optional description for the album and the template")
}

// clap enforces `required(true)`, so the lookup cannot miss.
fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn run_options(matches: &ArgMatches, host: HostCommand) -> RunOptions {
    RunOptions {
        host,
        upload_folder: matches
            .get_one::<PathBuf>("upload_folder")
            .cloned()
            .unwrap_or_default(),
        description: matches.get_one::<String>("description").cloned(),
    }
}

fn print_usage() {
    println!("\x1b[1m\x1b[31mInvalid command!\x1b[0m\n");
    println!("📖 Available Commands:");
    println!("  \x1b[1m\x1b[32mffpics imgur <client_id> <client_secret> <refresh_token> <folder>\x1b[0m");
    println!("  \x1b[1m\x1b[32mffpics dropbox <app_key> <app_secret> <folder> [--login]\x1b[0m");
    println!("  \x1b[1m\x1b[32mffpics config\x1b[0m - 🛠️  Create or update configuration file");
    println!("\x1b[33mBoth upload commands accept --description \"text\".\x1b[0m\n");
}
