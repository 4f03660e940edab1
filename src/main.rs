use crate::add::handle_add;
use crate::config::{handle_cfg, handle_init};
use crate::curr::handle_curr;
use crate::delete::handle_rm;
use crate::edit::{handle_convert, handle_cut, handle_mute, handle_speed};
use crate::error::ClipError;
use crate::list::handle_list;
use crate::model::{Cli, Commands};
use crate::rename::handle_rename;
use crate::settings::Config;
use anyhow::Result;
use clap::Parser;
use colored::*;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub mod add;
pub mod clip;
pub mod config;
pub mod curr;
pub mod delete;
pub mod edit;
pub mod error;
pub mod list;
pub mod model;
pub mod rename;
pub mod settings;
pub mod transform;
pub mod ui;
pub mod validate;
pub mod workflow;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        match e.downcast_ref::<ClipError>() {
            Some(clip_error) => eprintln!(
                "{} {:#}",
                format!("✗ Error [{}]:", clip_error.situation()).red().bold(),
                e
            ),
            None => eprintln!("{} {:#}", "✗ Error:".red().bold(), e),
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "vmaker=debug" } else { "warn" })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    if cli.debug {
        println!("{}", "○ Debug mode is ON".yellow());
    }

    let config_path = Config::location(cli.config.as_deref());
    let config = match cli.command {
        Commands::Init => Config::load_partial(&config_path).await?,
        _ => Config::load(&config_path).await?,
    };
    let yes = cli.yes;

    match &cli.command {
        Commands::Init => handle_init(config, &config_path).await?,
        Commands::Curr { dirname } => {
            handle_curr(config, &config_path, dirname.as_deref(), yes).await?
        }
        Commands::Add {
            name,
            choose,
            rename_strategy,
        } => handle_add(&config, name.as_deref(), *choose, *rename_strategy, yes).await?,
        Commands::Rm { names } => handle_rm(&config, names, yes).await?,
        Commands::Cut {
            name,
            start,
            end,
            backup,
        } => handle_cut(&config, name, start, end, *backup, yes).await?,
        Commands::Mute { name, backup } => handle_mute(&config, name, *backup, yes).await?,
        Commands::Speed {
            name,
            factor,
            backup,
        } => handle_speed(&config, name, *factor, *backup, yes).await?,
        Commands::Convert {
            name,
            suffix,
            many,
            backup,
        } => handle_convert(&config, name, suffix, many, *backup, yes).await?,
        Commands::Rename { name, new_name } => {
            handle_rename(&config, name, new_name, yes).await?
        }
        Commands::Ls => handle_list(&config).await?,
        Commands::Cfg { edit, editor } => {
            handle_cfg(&config, &config_path, *edit, editor.as_deref()).await?
        }
    }

    Ok(())
}
