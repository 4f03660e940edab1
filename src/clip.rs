use crate::error::ClipError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

pub const VIDEO_EXTS: [&str; 6] = ["mp4", "mkv", "avi", "mov", "wmv", "flv"];

pub const STAGING_MARKER: &str = "_output";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub path: PathBuf,
    pub stem: String,
    pub ext: String,
}

impl Clip {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if !is_video_ext(ext) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        Some(Clip {
            path: path.to_path_buf(),
            stem: stem.to_string(),
            ext: ext.to_string(),
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, self.ext)
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn is_staging(&self) -> bool {
        self.file_name().contains(STAGING_MARKER)
    }

    pub fn sibling(&self, file_name: &str) -> PathBuf {
        self.dir().join(file_name)
    }
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

pub fn is_video_ext(ext: &str) -> bool {
    VIDEO_EXTS.contains(&ext)
}

pub fn normalize_ext(input: &str) -> Result<String, ClipError> {
    let trimmed = input.trim();
    let ext = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if is_video_ext(ext) {
        Ok(ext.to_string())
    } else {
        Err(ClipError::UnsupportedFormat(trimmed.to_string()))
    }
}

pub fn split_identifier(identifier: &str) -> (&str, Option<&str>) {
    match identifier.rsplit_once('.') {
        Some((stem, ext)) if is_video_ext(ext) && !stem.is_empty() => (stem, Some(ext)),
        _ => (identifier, None),
    }
}

/// Number before the first `-` of a stem. Anything else is simply not a prefix.
pub fn numeric_prefix(stem: &str) -> Option<u64> {
    let (prefix, _) = stem.split_once('-')?;
    prefix.parse().ok()
}

pub async fn scan(dir: &Path) -> Result<Vec<Clip>, ClipError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ClipError::io(format!("Failed to read {}", dir.display()), e))?;

    let mut clips = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ClipError::io(format!("Failed to read {}", dir.display()), e))?
    {
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        if let Some(clip) = Clip::from_path(&entry.path()) {
            clips.push(clip);
        }
    }
    clips.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(clips)
}

pub async fn list_clips(dir: &Path) -> Result<Vec<Clip>, ClipError> {
    Ok(scan(dir)
        .await?
        .into_iter()
        .filter(|clip| !clip.is_staging())
        .collect())
}

/// Rules, in order of precedence: exact stem (and extension, when one was typed),
/// numeric prefix before the first `-`, then a staging file whose name contains the stem.
pub async fn resolve(identifier: &str, dir: &Path) -> Result<Clip, ClipError> {
    let entries = scan(dir).await?;
    resolve_in(identifier, dir, entries)
}

fn resolve_in(identifier: &str, dir: &Path, entries: Vec<Clip>) -> Result<Clip, ClipError> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        return Err(ClipError::InvalidName(
            identifier.to_string(),
            "clip name cannot be empty",
        ));
    }
    let (stem, ext) = split_identifier(trimmed);

    if let Some(clip) = entries
        .iter()
        .find(|c| c.stem == stem && ext.is_none_or(|e| c.ext == e))
    {
        return Ok(clip.clone());
    }

    if let Ok(wanted) = stem.parse::<u64>() {
        if let Some(clip) = entries
            .iter()
            .filter(|c| !c.is_staging())
            .find(|c| numeric_prefix(&c.stem) == Some(wanted))
        {
            return Ok(clip.clone());
        }
    }

    match find_staging(stem, &entries)? {
        Some(clip) => Ok(clip),
        None => Err(ClipError::ClipNotFound {
            name: trimmed.to_string(),
            dir: dir.to_path_buf(),
        }),
    }
}

fn find_staging(stem: &str, entries: &[Clip]) -> Result<Option<Clip>, ClipError> {
    let mut candidates = entries
        .iter()
        .filter(|c| c.is_staging() && c.stem.contains(stem));
    let first = candidates.next();
    let rest: Vec<&Clip> = candidates.collect();
    match first {
        Some(clip) if rest.is_empty() => Ok(Some(clip.clone())),
        Some(clip) => Err(ClipError::AmbiguousStaging {
            name: stem.to_string(),
            candidates: std::iter::once(clip)
                .chain(rest)
                .map(Clip::file_name)
                .collect(),
        }),
        None => Ok(None),
    }
}

/// Locates the staging file produced for `original`; exactly one must exist.
pub async fn resolve_staging(original: &Clip) -> Result<Clip, ClipError> {
    let entries = scan(original.dir()).await?;
    find_staging(&original.stem, &entries)?.ok_or_else(|| ClipError::ClipNotFound {
        name: format!("{}{}", original.stem, STAGING_MARKER),
        dir: original.dir().to_path_buf(),
    })
}

pub async fn existing_staging(dir: &Path) -> Result<Option<Clip>, ClipError> {
    Ok(scan(dir).await?.into_iter().find(Clip::is_staging))
}

/// Every video below `dir`, newest modification first.
pub fn list_videos_recursive(dir: &Path) -> Vec<(PathBuf, SystemTime)> {
    let mut videos: Vec<(PathBuf, SystemTime)> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(is_video_ext)
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((entry.into_path(), modified))
        })
        .collect();
    videos.sort_by(|a, b| b.1.cmp(&a.1));
    videos
}

pub fn latest_video(dir: &Path) -> Result<PathBuf, ClipError> {
    list_videos_recursive(dir)
        .into_iter()
        .next()
        .map(|(path, _)| path)
        .ok_or_else(|| ClipError::ClipNotFound {
            name: "latest recording".to_string(),
            dir: dir.to_path_buf(),
        })
}
