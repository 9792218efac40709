//! `schoolfinder` - CLI and HTTP server entry point

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use schoolfinder::cli::{
    AddCommand, Cli, Command, ConfigCommand, ListCommand, OutputFormat, ServeCommand,
};
use schoolfinder::{init_logging, service, Config, RankedSchool, SchoolSubmission, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match cli.command {
        Command::Serve(cmd) => handle_serve(load_config(cli.config)?, cmd).await,
        Command::Add(cmd) => handle_add(&load_config(cli.config)?, &cmd),
        Command::List(cmd) => handle_list(&load_config(cli.config)?, &cmd),
        Command::Status(cmd) => handle_status(&load_config(cli.config)?, cmd.json),
        Command::Config(cmd) => handle_config(cli.config, cmd),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("loading configuration")
}

fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    let path = config.database_path();
    Storage::open(&path).with_context(|| format!("opening database {}", path.display()))
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;

    let storage = open_storage(&config)?;
    schoolfinder::server::serve(&config, storage).await?;
    Ok(())
}

fn handle_add(config: &Config, cmd: &AddCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let submission =
        SchoolSubmission::from_strings(&cmd.name, &cmd.address, &cmd.latitude, &cmd.longitude);

    let id = service::add_school(&storage, &submission)?;
    println!("Added school {id}");
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let ranked = service::list_schools(
        &storage,
        cmd.latitude.as_deref(),
        cmd.longitude.as_deref(),
    )?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
        OutputFormat::Table => print_table(&ranked),
        OutputFormat::Plain => {
            for r in &ranked {
                println!("{:.2} km\t{}\t{}", r.distance, r.school.name, r.school.address);
            }
        }
    }
    Ok(())
}

fn print_table(ranked: &[RankedSchool]) {
    if ranked.is_empty() {
        println!("No schools found.");
        return;
    }

    let name_width = ranked
        .iter()
        .map(|r| r.school.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    println!("{:>6}  {:>10}  {:<name_width$}  ADDRESS", "ID", "DIST (KM)", "NAME");
    for r in ranked {
        println!(
            "{:>6}  {:>10.2}  {:<name_width$}  {}",
            r.school.id, r.distance, r.school.name, r.school.address
        );
    }
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "total_schools": stats.total_schools,
            "oldest_school": stats.oldest_school,
            "newest_school": stats.newest_school,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let fmt_time = |t: Option<chrono::DateTime<chrono::Utc>>| {
            t.map_or_else(|| "-".to_string(), |t| t.to_rfc3339())
        };
        println!("schoolfinder status");
        println!("-------------------");
        println!("Database:      {}", storage.path().display());
        println!("Schools:       {}", stats.total_schools);
        println!("Oldest:        {}", fmt_time(stats.oldest_school));
        println!("Newest:        {}", fmt_time(stats.newest_school));
        println!("Size (bytes):  {}", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Server]");
                println!("  Bind address:   {}", config.bind_address());
                if config.server.cors_allowed_origins.is_empty() {
                    println!("  CORS origins:   any");
                } else {
                    println!(
                        "  CORS origins:   {}",
                        config.server.cors_allowed_origins.join(", ")
                    );
                }
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::check_file(&path)
                .with_context(|| format!("validating {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
