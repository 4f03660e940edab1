use crate::settings::Config;
use crate::ui::{confirm, print_clip_count};
use crate::workflow::{remove_clips, resolve_all};
use anyhow::Result;
use colored::*;

pub async fn handle_rm(config: &Config, names: &[String], yes: bool) -> Result<()> {
    let dir = config.curr_path()?;
    let clips = resolve_all(names, &dir).await?;

    println!("○ Preparing to delete {} clip(s):", clips.len());
    for clip in &clips {
        println!("    {}", clip.to_string().cyan());
    }

    if !confirm("Delete these files? This cannot be undone.", false, yes)? {
        println!("{}", "○ Removal cancelled.".yellow());
        return Ok(());
    }

    let remaining = remove_clips(&clips, &dir).await?;
    println!("{}", format!("✔ Removed {} clip(s).", clips.len()).green());
    print_clip_count(remaining, &dir);
    Ok(())
}
