use crate::clip::{self, Clip};
use crate::error::ClipError;
use crate::transform::{TransformKind, VideoTransformer};
use crate::validate::sanitize_stem;
use chrono::Local;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ReplaceOptions {
    pub keep_backup: bool,
    /// Defaults to the clip's own directory.
    pub backup_dir: Option<PathBuf>,
}

impl Default for ReplaceOptions {
    fn default() -> Self {
        ReplaceOptions {
            keep_backup: true,
            backup_dir: None,
        }
    }
}

#[derive(Debug)]
pub struct Replaced {
    pub clip: Clip,
    pub backup: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Transforming,
    Replacing,
    Done,
}

/// A failed transform or backup leaves the original untouched. Only a failure after
/// the original has been deleted yields `ClipError::Inconsistent`.
pub async fn transform_and_replace<T: VideoTransformer>(
    transformer: &T,
    clip: &Clip,
    kind: &TransformKind,
    options: &ReplaceOptions,
) -> Result<Replaced, ClipError> {
    if let Some(staging) = clip::existing_staging(clip.dir()).await? {
        return Err(ClipError::StagingConflict(staging.path));
    }

    let target_ext = kind.target_ext(clip).to_string();
    let target = clip.sibling(&format!("{}.{}", clip.stem, target_ext));
    if target != clip.path && target.exists() {
        return Err(ClipError::TargetExists(target));
    }

    let staging_path = kind.staging_path(clip);
    debug!(stage = ?Stage::Transforming, clip = %clip, staging = %staging_path.display());
    if let Err(e) = transformer.transform(kind, &clip.path, &staging_path).await {
        warn!(clip = %clip, op = kind.verb(), "transform failed, original left untouched");
        return Err(e);
    }

    debug!(stage = ?Stage::Replacing, clip = %clip);
    let backup = if options.keep_backup {
        match write_backup(clip, options.backup_dir.as_deref()).await {
            Ok(path) => Some(path),
            Err(e) => {
                let _ = tokio::fs::remove_file(&staging_path).await;
                return Err(e);
            }
        }
    } else {
        None
    };

    let staging = clip::resolve_staging(clip).await?;

    tokio::fs::remove_file(&clip.path)
        .await
        .map_err(|e| ClipError::io(format!("Failed to remove {}", clip.path.display()), e))?;

    if let Err(err) = tokio::fs::rename(&staging.path, &target).await {
        return Err(ClipError::Inconsistent {
            staging: staging.path,
            original: clip.path.clone(),
            err,
        });
    }

    debug!(stage = ?Stage::Done, clip = %clip);
    info!(op = kind.verb(), target = %target.display(), backup = ?backup, "clip replaced");
    Ok(Replaced {
        clip: Clip {
            path: target,
            stem: clip.stem.clone(),
            ext: target_ext,
        },
        backup,
    })
}

pub fn backup_file_name(clip: &Clip, stamp: &str) -> String {
    format!("{}_{}.bak", clip.file_name(), stamp)
}

/// Never overwrites an earlier backup.
pub async fn write_backup(clip: &Clip, dir: Option<&Path>) -> Result<PathBuf, ClipError> {
    let dir = dir.unwrap_or_else(|| clip.dir()).to_path_buf();
    let failed = |path: &Path, err: std::io::Error| ClipError::BackupWriteFailure {
        path: path.to_path_buf(),
        err,
    };

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| failed(dir.as_path(), e))?;

    let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
    let mut path = dir.join(backup_file_name(clip, &stamp));
    let mut n = 1;
    while path.exists() {
        path = dir.join(backup_file_name(clip, &format!("{stamp}-{n}")));
        n += 1;
    }

    let copied = async {
        let mut source = tokio::fs::File::open(&clip.path).await?;
        let mut backup = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        tokio::io::copy(&mut source, &mut backup).await?;
        backup.sync_all().await
    }
    .await;

    if let Err(e) = copied {
        let _ = tokio::fs::remove_file(&path).await;
        return Err(failed(path.as_path(), e));
    }
    debug!(backup = %path.display(), "backup written");
    Ok(path)
}

/// Validates a user-typed new name for `clip`. A trailing `.ext` is dropped when it is
/// the clip's own extension; another video extension is refused, that takes `convert`.
pub fn rename_stem(clip: &Clip, new_name: &str) -> Result<String, ClipError> {
    let requested = new_name.trim();
    let stem = match clip::split_identifier(requested) {
        (stem, Some(ext)) if ext == clip.ext => stem,
        (_, Some(_)) => {
            return Err(ClipError::InvalidName(
                requested.to_string(),
                "renaming cannot change the format, use `vmaker convert`",
            ));
        }
        (stem, None) => stem,
    };
    sanitize_stem(stem)
}

/// Renames a clip in place under a stem from `rename_stem`, keeping its extension.
pub async fn rename_clip(clip: &Clip, stem: &str) -> Result<Clip, ClipError> {
    let target = clip.sibling(&format!("{}.{}", stem, clip.ext));

    if target == clip.path {
        return Ok(clip.clone());
    }
    if target.exists() {
        return Err(ClipError::TargetExists(target));
    }

    tokio::fs::rename(&clip.path, &target)
        .await
        .map_err(|e| ClipError::io(format!("Failed to rename {}", clip), e))?;
    info!(from = %clip, to = %target.display(), "clip renamed");
    Ok(Clip {
        path: target,
        stem: stem.to_string(),
        ext: clip.ext.clone(),
    })
}

pub async fn resolve_all(names: &[String], dir: &Path) -> Result<Vec<Clip>, ClipError> {
    let mut clips = Vec::new();
    let mut missing = Vec::new();
    let mut seen = HashSet::new();

    for name in names {
        match clip::resolve(name, dir).await {
            Ok(found) => {
                if seen.insert(found.path.clone()) {
                    clips.push(found);
                }
            }
            Err(ClipError::ClipNotFound { name, .. }) => missing.push(name),
            Err(e) => return Err(e),
        }
    }

    if !missing.is_empty() {
        return Err(ClipError::PartialRemoval(missing));
    }
    Ok(clips)
}

/// Deletes already-resolved clips and returns how many clips remain in `dir`.
pub async fn remove_clips(clips: &[Clip], dir: &Path) -> Result<usize, ClipError> {
    for clip in clips {
        tokio::fs::remove_file(&clip.path)
            .await
            .map_err(|e| ClipError::io(format!("Failed to remove {}", clip), e))?;
        info!(clip = %clip, "clip removed");
    }
    Ok(clip::list_clips(dir).await?.len())
}
