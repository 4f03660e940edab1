use crate::clip::{
    Clip, STAGING_MARKER, latest_video, list_clips, list_videos_recursive, numeric_prefix,
};
use crate::error::ClipError;
use crate::model::RenameStrategy;
use crate::settings::Config;
use crate::ui::{confirm, print_clip_count};
use crate::validate::sanitize_stem;
use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use colored::*;
use inquire::Select;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;

struct RecordingItem {
    path: PathBuf,
    modified: SystemTime,
}

impl fmt::Display for RecordingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when: DateTime<Local> = self.modified.into();
        write!(
            f,
            "{}  {}",
            when.format("%Y-%m-%d %H:%M:%S"),
            self.path.display()
        )
    }
}

pub async fn handle_add(
    config: &Config,
    name: Option<&str>,
    choose: bool,
    strategy: Option<RenameStrategy>,
    yes: bool,
) -> Result<()> {
    let raw_dir = config.raw_path();
    let dir = config.curr_path()?;

    let source = if choose {
        let items: Vec<RecordingItem> = list_videos_recursive(&raw_dir)
            .into_iter()
            .map(|(path, modified)| RecordingItem { path, modified })
            .collect();
        if items.is_empty() {
            bail!("No recordings found in {}.", raw_dir.display());
        }
        Select::new("Select a recording to add:", items)
            .with_page_size(15)
            .prompt()?
            .path
    } else {
        latest_video(&raw_dir)?
    };

    let modified = tokio::fs::metadata(&source)
        .await
        .and_then(|m| m.modified())
        .map_err(|e| ClipError::io(format!("Failed to read {}", source.display()), e))?;
    let existing = if dir.exists() {
        list_clips(&dir).await?
    } else {
        Vec::new()
    };
    let file_name = target_file_name(&source, name, strategy, modified, &existing)?;
    let dest = dir.join(&file_name);

    println!(
        "○ Will copy '{}' to {} as '{}'.",
        source.display(),
        dir.display().to_string().cyan(),
        file_name.green()
    );
    if !confirm("Sure to continue?", true, yes)? {
        println!("{}", "○ Add cancelled.".yellow());
        return Ok(());
    }

    copy_recording(&source, &dest).await?;
    println!("{}", format!("✔ Added '{file_name}'.").green());
    print_clip_count(list_clips(&dir).await?.len(), &dir);
    Ok(())
}

/// File name a recording gets in the working directory.
pub fn target_file_name(
    source: &Path,
    name: Option<&str>,
    strategy: Option<RenameStrategy>,
    modified: SystemTime,
    existing: &[Clip],
) -> Result<String, ClipError> {
    let source_clip = Clip::from_path(source).ok_or_else(|| {
        ClipError::UnsupportedFormat(
            source
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })?;
    let name = name.map(sanitize_stem).transpose()?;

    let stem = match (strategy, name) {
        (None, None) | (Some(RenameStrategy::DontRename), _) => source_clip.stem.clone(),
        (None, Some(name)) => name,
        (Some(RenameStrategy::Time), _) => {
            let when: DateTime<Local> = modified.into();
            when.format("%Y%m%d-%H%M%S").to_string()
        }
        (Some(RenameStrategy::ClipInfo), name) => {
            let next = existing
                .iter()
                .filter_map(|c| numeric_prefix(&c.stem))
                .max()
                .map_or(1, |n| n + 1);
            format!("{:03}-{}", next, name.unwrap_or(source_clip.stem.clone()))
        }
        (Some(RenameStrategy::Suffix), Some(name)) => format!("{}_{}", source_clip.stem, name),
        (Some(RenameStrategy::Suffix), None) => {
            return Err(ClipError::InvalidName(
                String::new(),
                "the suffix strategy needs a name",
            ));
        }
    };
    if stem.contains(STAGING_MARKER) {
        return Err(ClipError::InvalidName(
            stem,
            "names containing '_output' are reserved for staging files; pass a new name",
        ));
    }
    Ok(format!("{}.{}", stem, source_clip.ext))
}

/// Copies a recording into the working directory, never overwriting an existing file.
pub async fn copy_recording(source: &Path, dest: &Path) -> Result<(), ClipError> {
    if dest.exists() {
        return Err(ClipError::TargetExists(dest.to_path_buf()));
    }
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ClipError::io(format!("Failed to create {}", parent.display()), e))?;
    }
    tokio::fs::copy(source, dest)
        .await
        .map_err(|e| ClipError::io(format!("Failed to copy {}", source.display()), e))?;
    info!(from = %source.display(), to = %dest.display(), "recording added");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn existing(names: &[&str]) -> Vec<Clip> {
        names
            .iter()
            .filter_map(|n| Clip::from_path(&Path::new("/w").join(n)))
            .collect()
    }

    fn name(strategy: Option<RenameStrategy>, new_name: Option<&str>, clips: &[Clip]) -> String {
        target_file_name(
            Path::new("/raw/2026-10-19 10-00-00.mkv"),
            new_name,
            strategy,
            SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
            clips,
        )
        .unwrap()
    }

    #[test]
    fn keeps_recording_name_by_default() {
        assert_eq!(name(None, None, &[]), "2026-10-19 10-00-00.mkv");
        assert_eq!(
            name(Some(RenameStrategy::DontRename), Some("intro"), &[]),
            "2026-10-19 10-00-00.mkv"
        );
    }

    #[test]
    fn plain_name_replaces_stem() {
        assert_eq!(name(None, Some("my intro"), &[]), "my_intro.mkv");
    }

    #[test]
    fn clip_info_numbers_after_highest_prefix() {
        let clips = existing(&["001-setup.mp4", "004-demo.mp4", "notes.mov"]);
        assert_eq!(
            name(Some(RenameStrategy::ClipInfo), Some("outro"), &clips),
            "005-outro.mkv"
        );
        assert_eq!(
            name(Some(RenameStrategy::ClipInfo), Some("first"), &[]),
            "001-first.mkv"
        );
    }

    #[test]
    fn suffix_appends_to_recording_stem() {
        assert_eq!(
            name(Some(RenameStrategy::Suffix), Some("take2"), &[]),
            "2026-10-19 10-00-00_take2.mkv"
        );
        assert!(
            target_file_name(
                Path::new("/raw/a.mp4"),
                None,
                Some(RenameStrategy::Suffix),
                SystemTime::UNIX_EPOCH,
                &[],
            )
            .is_err()
        );
    }

    #[test]
    fn recording_named_like_a_staging_file_needs_a_new_name() {
        let staged = |new_name: Option<&str>, strategy: Option<RenameStrategy>| {
            target_file_name(
                Path::new("/raw/obs_output_01.mp4"),
                new_name,
                strategy,
                SystemTime::UNIX_EPOCH,
                &[],
            )
        };
        for result in [
            staged(None, None),
            staged(Some("intro"), Some(RenameStrategy::DontRename)),
            staged(Some("take2"), Some(RenameStrategy::Suffix)),
            staged(None, Some(RenameStrategy::ClipInfo)),
        ] {
            assert!(matches!(result, Err(ClipError::InvalidName(..))));
        }
        assert_eq!(staged(Some("intro"), None).unwrap(), "intro.mp4");
        assert_eq!(
            staged(Some("intro"), Some(RenameStrategy::ClipInfo)).unwrap(),
            "001-intro.mp4"
        );
    }

    #[test]
    fn time_strategy_uses_modification_time() {
        let when: DateTime<Local> =
            (SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)).into();
        assert_eq!(
            name(Some(RenameStrategy::Time), None, &[]),
            format!("{}.mkv", when.format("%Y%m%d-%H%M%S"))
        );
    }

    #[tokio::test]
    async fn copy_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("rec.mp4");
        std::fs::write(&source, b"new").unwrap();
        let dest = dir.path().join("work").join("rec.mp4");

        copy_recording(&source, &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");

        std::fs::write(&source, b"newer").unwrap();
        assert!(matches!(
            copy_recording(&source, &dest).await,
            Err(ClipError::TargetExists(_))
        ));
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }
}
