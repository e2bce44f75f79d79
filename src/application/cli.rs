use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::Arg;
use clap::Command;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::panel::help_text;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ContextSourceName;

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to the debug log file generated when running with environment variable RUST_LOG=sidellm")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("sidellm")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(help_text())
        .arg_required_else_help(false)
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(
            Arg::new(ConfigKey::ServerUrl.to_string())
                .short('s')
                .long(ConfigKey::ServerUrl.to_string())
                .env("SIDELLM_SERVER_URL")
                .num_args(1)
                .help(format!(
                    "Base URL of the OpenAI-compatible server hosting the model. [default: {}]",
                    Config::default(ConfigKey::ServerUrl)
                )),
        )
        .arg(
            Arg::new(ConfigKey::Model.to_string())
                .short('m')
                .long(ConfigKey::Model.to_string())
                .env("SIDELLM_MODEL")
                .num_args(1)
                .help(format!(
                    "Model name sent with each completion request. [default: {}]",
                    Config::default(ConfigKey::Model)
                )),
        )
        .arg(
            Arg::new(ConfigKey::ContextSource.to_string())
                .long(ConfigKey::ContextSource.to_string())
                .env("SIDELLM_CONTEXT_SOURCE")
                .num_args(1)
                .help(format!(
                    "Where /context captures page context from. [default: {}]",
                    Config::default(ConfigKey::ContextSource)
                ))
                .value_parser(PossibleValuesParser::new(ContextSourceName::VARIANTS)),
        )
        .arg(
            Arg::new(ConfigKey::ContextFile.to_string())
                .long(ConfigKey::ContextFile.to_string())
                .env("SIDELLM_CONTEXT_FILE")
                .num_args(1)
                .help("File read for page context when the context source is 'file'."),
        )
        .arg(
            Arg::new(ConfigKey::StorageFile.to_string())
                .long(ConfigKey::StorageFile.to_string())
                .env("SIDELLM_STORAGE_FILE")
                .num_args(1)
                .help(format!(
                    "Path of the JSON document holding chat history and settings. [default: {}]",
                    Config::default(ConfigKey::StorageFile)
                )),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("SIDELLM_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = dirs::cache_dir().unwrap().join("sidellm/debug.log");
                    println!("{}", log_path.to_str().unwrap());
                }
                Some(("enum-config", _)) => {
                    println!("{}", ConfigKey::VARIANTS.join("\n"));
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
