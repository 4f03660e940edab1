use crate::clip::list_clips;
use crate::settings::Config;
use crate::ui::{confirm, print_clip_count};
use crate::validate::sanitize_stem;
use anyhow::{Context, Result};
use colored::*;
use inquire::{Select, Text};
use std::path::Path;

const NEW_DIR_OPTION: &str = "[Create a new directory]";

pub async fn handle_curr(
    mut config: Config,
    config_path: &Path,
    dirname: Option<&str>,
    yes: bool,
) -> Result<()> {
    let clip_dir = config.clip_path();

    let chosen = match dirname {
        Some(name) => sanitize_stem(name)?,
        None => {
            let mut options = subdirectories(&clip_dir).await?;
            options.push(NEW_DIR_OPTION.to_string());
            let mut select = Select::new("Select the working directory:", options.clone());
            if let Some(pos) = options.iter().position(|o| *o == config.curr_dirname) {
                select = select.with_starting_cursor(pos);
            }
            let choice = select.prompt()?;
            if choice == NEW_DIR_OPTION {
                sanitize_stem(&Text::new("› Name of the new directory:").prompt()?)?
            } else {
                choice
            }
        }
    };

    let curr = clip_dir.join(&chosen);
    if !curr.is_dir() {
        let question = format!("{} does not exist. Create it?", curr.display());
        if !confirm(&question, true, yes)? {
            println!("{}", "○ Working directory unchanged.".yellow());
            return Ok(());
        }
        tokio::fs::create_dir_all(&curr)
            .await
            .with_context(|| format!("Failed to create {}", curr.display()))?;
    }

    config.curr_dirname = chosen;
    config.save(config_path).await?;
    println!(
        "{}",
        format!("✔ Working directory set to {}", curr.display()).green()
    );
    print_clip_count(list_clips(&curr).await?.len(), &curr);
    Ok(())
}

async fn subdirectories(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", dir.display())),
    };
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn switching_creates_and_saves_working_directory() {
        let root = tempfile::tempdir().unwrap();
        let config_path = root.path().join("config.json");
        let config = Config {
            raw_dir: root.path().join("raw").display().to_string(),
            clip_dir: root.path().join("clips").display().to_string(),
            output_dir: root.path().join("out").display().to_string(),
            curr_dirname: String::new(),
            backup_dir: None,
        };

        handle_curr(config, &config_path, Some("02 basics"), true)
            .await
            .unwrap();

        let saved = Config::load(&config_path).await.unwrap();
        assert_eq!(saved.curr_dirname, "02_basics");
        assert!(root.path().join("clips").join("02_basics").is_dir());
    }

    #[tokio::test]
    async fn lists_only_directories() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("b")).unwrap();
        std::fs::create_dir(root.path().join("a")).unwrap();
        std::fs::write(root.path().join("c.mp4"), b"x").unwrap();
        assert_eq!(subdirectories(root.path()).await.unwrap(), vec!["a", "b"]);
        assert!(subdirectories(&root.path().join("missing")).await.unwrap().is_empty());
    }
}
