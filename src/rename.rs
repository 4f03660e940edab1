use crate::settings::Config;
use crate::ui::{confirm, find_clip};
use crate::workflow::{rename_clip, rename_stem};
use anyhow::Result;
use colored::*;

pub async fn handle_rename(config: &Config, name: &str, new_name: &str, yes: bool) -> Result<()> {
    let dir = config.curr_path()?;
    let clip = find_clip(name, &dir).await?;

    let new_stem = rename_stem(&clip, new_name)?;
    if new_stem == clip.stem {
        println!("{}", "○ Rename cancelled (name is the same).".yellow());
        return Ok(());
    }

    let new_full_name = format!("{new_stem}.{}", clip.ext);
    let question = format!("Rename '{clip}' to '{new_full_name}'?");
    if !confirm(&question, true, yes)? {
        println!("{}", "○ Rename cancelled.".yellow());
        return Ok(());
    }

    let renamed = rename_clip(&clip, &new_stem).await?;
    println!("{}", format!("✔ Renamed to '{renamed}'").green());
    Ok(())
}
