use crate::clip::Clip;
use crate::settings::Config;
use crate::transform::{Ffmpeg, TransformKind, VideoTransformer, format_hms};
use crate::ui::{confirm, find_clip, offer_open_dir};
use crate::workflow::{ReplaceOptions, transform_and_replace};
use anyhow::Result;
use colored::*;
use std::path::Path;

pub async fn handle_cut(
    config: &Config,
    name: &str,
    start: &str,
    end: &str,
    backup: bool,
    yes: bool,
) -> Result<()> {
    let kind = TransformKind::cut(start, end)?;
    let dir = config.curr_path()?;
    let clip = find_clip(name, &dir).await?;

    println!(
        "○ Preparing to cut '{}' to {} - {}...",
        clip.to_string().cyan(),
        start,
        end
    );
    apply(config, &dir, &[clip], &kind, backup, yes).await
}

pub async fn handle_mute(config: &Config, name: &str, backup: bool, yes: bool) -> Result<()> {
    let dir = config.curr_path()?;
    let clip = find_clip(name, &dir).await?;

    println!("○ Preparing to mute '{}'...", clip.to_string().cyan());
    apply(config, &dir, &[clip], &TransformKind::Mute, backup, yes).await
}

pub async fn handle_speed(
    config: &Config,
    name: &str,
    factor: f64,
    backup: bool,
    yes: bool,
) -> Result<()> {
    let kind = TransformKind::speed(factor)?;
    let dir = config.curr_path()?;
    let clip = find_clip(name, &dir).await?;

    println!(
        "○ Preparing to change the speed of '{}' by {}x...",
        clip.to_string().cyan(),
        factor
    );
    match Ffmpeg::default().probe_duration(&clip.path).await {
        Ok(seconds) => println!(
            "  Length: {} → about {}",
            format_hms(seconds),
            format_hms((seconds as f64 / factor).floor() as u64).green()
        ),
        Err(e) => tracing::debug!("skipping duration preview: {e}"),
    }
    apply(config, &dir, &[clip], &kind, backup, yes).await
}

pub async fn handle_convert(
    config: &Config,
    name: &str,
    suffix: &str,
    many: &[String],
    backup: bool,
    yes: bool,
) -> Result<()> {
    let kind = TransformKind::convert(suffix)?;
    let dir = config.curr_path()?;

    let mut clips: Vec<Clip> = Vec::new();
    for n in std::iter::once(name).chain(many.iter().map(String::as_str)) {
        let clip = find_clip(n, &dir).await?;
        if !clips.contains(&clip) {
            clips.push(clip);
        }
    }

    println!(
        "○ Preparing to convert {} clip(s) to .{}...",
        clips.len(),
        kind.target_ext(&clips[0]).cyan()
    );
    apply(config, &dir, &clips, &kind, backup, yes).await
}

async fn apply(
    config: &Config,
    dir: &Path,
    clips: &[Clip],
    kind: &TransformKind,
    backup: bool,
    yes: bool,
) -> Result<()> {
    println!("  Affected file(s):");
    for clip in clips {
        println!("    {}", clip.path.display());
    }
    if backup {
        println!("  A timestamped .bak copy of each file will be kept.");
    } else {
        println!("{}", "  No backup will be kept. This cannot be undone.".yellow());
    }

    if !confirm("Sure to continue?", true, yes)? {
        println!("{}", "○ Operation cancelled.".yellow());
        return Ok(());
    }

    let ffmpeg = Ffmpeg::default();
    let options = ReplaceOptions {
        keep_backup: backup,
        backup_dir: config.backup_path(),
    };

    for clip in clips {
        println!("{}", format!("◌ Processing '{clip}'...").yellow());
        let replaced = transform_and_replace(&ffmpeg, clip, kind, &options).await?;
        println!(
            "{}",
            format!("✔ '{}' has been updated.", replaced.clip).green()
        );
        if let Some(path) = replaced.backup {
            println!("  Backup saved as {}", path.display());
        }
    }

    offer_open_dir(dir, yes)
}
