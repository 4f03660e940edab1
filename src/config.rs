use crate::settings::{Config, validate_dir};
use anyhow::{Context, Result, bail};
use colored::*;
use inquire::Text;
use std::env;
use std::path::Path;
use tokio::process::Command;

pub async fn handle_init(mut config: Config, config_path: &Path) -> Result<()> {
    println!("○ Setting up vmaker. Missing directories will be created.");

    config.raw_dir = prompt_dir("› Directory your recorder saves videos to:", &config.raw_dir)?;
    config.clip_dir = prompt_dir("› Directory to collect project clips in:", &config.clip_dir)?;
    config.output_dir = prompt_dir("› Directory for rendered output:", &config.output_dir)?;

    for dir in [&config.raw_dir, &config.clip_dir, &config.output_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory {dir}"))?;
    }

    config.save(config_path).await?;
    println!(
        "{}",
        format!("✔ Config saved to {}", config_path.display()).green()
    );
    if config.curr_dirname.is_empty() {
        println!(
            "  Next, pick a working directory: {}",
            "vmaker curr <dirname>".italic()
        );
    }
    Ok(())
}

fn prompt_dir(message: &str, current: &str) -> Result<String> {
    let input = Text::new(message).with_initial_value(current).prompt()?;
    let path = validate_dir(&input)?;
    Ok(path.display().to_string())
}

pub async fn handle_cfg(
    config: &Config,
    config_path: &Path,
    edit: bool,
    editor: Option<&str>,
) -> Result<()> {
    if edit || editor.is_some() {
        return open_in_editor(config_path, editor).await;
    }

    println!("{} {}", "Config file:".green(), config_path.display());
    println!("{} {}", "Raw dir:".green(), config.raw_dir);
    println!("{} {}", "Clip dir:".green(), config.clip_dir);
    println!("{} {}", "Output dir:".green(), config.output_dir);
    match config.curr_path() {
        Ok(curr) => println!("{} {}", "Working dir:".green(), curr.display()),
        Err(_) => println!("{} {}", "Working dir:".green(), "(not selected)".yellow()),
    }
    if let Some(backup) = config.backup_path() {
        println!("{} {}", "Backup dir:".green(), backup.display());
    }
    Ok(())
}

async fn open_in_editor(config_path: &Path, editor: Option<&str>) -> Result<()> {
    let editor_name = editor
        .map(String::from)
        .or_else(|| env::var("VISUAL").ok())
        .or_else(|| env::var("EDITOR").ok());
    let mut command = match editor_name {
        Some(editor) => {
            println!("Using editor: {}", &editor);
            let mut parts = editor.split_whitespace();
            let mut cmd = Command::new(parts.next().unwrap_or("nano"));
            cmd.args(parts);
            cmd
        }
        None => {
            println!("VISUAL and EDITOR not set, falling back to nano.");
            Command::new("nano")
        }
    };
    command.arg(config_path);
    let status = command.status().await.context("Failed to open editor")?;
    if !status.success() {
        bail!("Editor process failed with status: {status}");
    }
    Ok(())
}
