//! `smr` - smart replace command line and HTTP service

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use smr_core::BrandProfileStore;
use smr_engine::DeepReplacer;
use smr_server::{AppConfig, FileBrandProfileStore, LogFormat, SecretOverrides, DEFAULT_CONFIG_PATH};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

fn cli() -> Command {
    Command::new("smr")
        .version(smr_server::VERSION)
        .about("Smart find-and-replace for CMS entries")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .default_value(DEFAULT_CONFIG_PATH)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the TOML configuration file"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter directive, overrides RUST_LOG"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .value_parser(["pretty", "json"])
                .help("Log output format"),
        )
        .arg(secret_arg("contentstack-api-key", "CONTENTSTACK_API_KEY", "Stack API key"))
        .arg(secret_arg("contentstack-email", "CONTENTSTACK_EMAIL", "Content API login email"))
        .arg(secret_arg(
            "contentstack-password",
            "CONTENTSTACK_PASSWORD",
            "Content API login password",
        ))
        .arg(secret_arg("openai-api-key", "OPENAI_API_KEY", "Suggestion provider API key"))
        .subcommand(
            Command::new("serve").about("Run the HTTP service").arg(
                Arg::new("bind")
                    .long("bind")
                    .value_parser(value_parser!(SocketAddr))
                    .help("Listen address, overrides server.bind"),
            ),
        )
        .subcommand(
            Command::new("parse")
                .about("Extract operations from an instruction")
                .arg(Arg::new("command").required(true).help("Free-text instruction")),
        )
        .subcommand(
            Command::new("score")
                .about("Score a replacement suggestion")
                .arg(
                    Arg::new("find")
                        .long("find")
                        .required(true)
                        .help("Text being replaced"),
                )
                .arg(Arg::new("suggestion").long("suggestion").help("Candidate replacement"))
                .arg(Arg::new("context").long("context").help("Surrounding text")),
        )
        .subcommand(
            Command::new("validate")
                .about("Check text against the brand style profile")
                .arg(Arg::new("text").required(true).help("Candidate text")),
        )
        .subcommand(
            Command::new("replace")
                .about("Rewrite an entry JSON file offline")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .short('i')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Entry JSON file"),
                )
                .arg(
                    Arg::new("find")
                        .long("find")
                        .required(true)
                        .help("Text to find"),
                )
                .arg(
                    Arg::new("replace")
                        .long("replace")
                        .required(true)
                        .help("Replacement text"),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .action(ArgAction::SetTrue)
                        .help("Print without indentation"),
                ),
        )
}

fn secret_arg(name: &'static str, env: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .env(env)
        .hide_env_values(true)
        .global(true)
        .help(help)
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<AppConfig> {
    let path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::load(&path).with_context(|| format!("loading {}", path.display()))?;

    let secret = |name: &str| matches.get_one::<String>(name).cloned();
    Ok(config.with_secrets(SecretOverrides {
        contentstack_api_key: secret("contentstack-api-key"),
        contentstack_email: secret("contentstack-email"),
        contentstack_password: secret("contentstack-password"),
        openai_api_key: secret("openai-api-key"),
    }))
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{text}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();
    let mut config = load_config(&matches)?;

    let format = match matches.get_one::<String>("log-format") {
        Some(format) => format.parse::<LogFormat>()?,
        None => config.logging.format,
    };
    smr_server::telemetry::init_tracing(
        matches.get_one::<String>("log-level").map(String::as_str),
        &config.logging.level,
        format,
    )?;

    match matches.subcommand() {
        Some(("serve", args)) => {
            if let Some(bind) = args.get_one::<SocketAddr>("bind") {
                config.server.bind = *bind;
            }
            smr_server::serve(config, async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %err, "cannot listen for shutdown signal");
                }
            })
            .await?;
        }
        Some(("parse", args)) => {
            let command = args.get_one::<String>("command").map_or("", String::as_str);
            let parsed = smr_engine::parse(command);
            print_json(&parsed, false)?;
            if !parsed.is_valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(("score", args)) => {
            let find = args.get_one::<String>("find").map_or("", String::as_str);
            let confidence = smr_engine::score(
                args.get_one::<String>("suggestion").map(String::as_str),
                args.get_one::<String>("context").map(String::as_str),
                find,
            );
            print_json(&smr_server::ScoreResponse { confidence }, false)?;
        }
        Some(("validate", args)) => {
            let text = args.get_one::<String>("text").map_or("", String::as_str);
            let profile = FileBrandProfileStore::new(config.brand.profile_path.clone())
                .load()
                .await?;
            let verdict = smr_engine::validate(text, &profile);
            print_json(&verdict, false)?;
            if !verdict.accepted {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(("replace", args)) => {
            let input = args
                .get_one::<PathBuf>("input")
                .context("--input is required")?;
            let text = std::fs::read_to_string(input)
                .with_context(|| format!("reading {}", input.display()))?;
            let entry: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", input.display()))?;

            let find = args.get_one::<String>("find").map_or("", String::as_str);
            let replace = args.get_one::<String>("replace").map_or("", String::as_str);
            let replacer = DeepReplacer::new(find, replace)?
                .with_protected(config.engine.protected_fields.clone());
            print_json(&replacer.apply(&entry), args.get_flag("compact"))?;
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(ExitCode::SUCCESS)
}
