use crate::clip::{Clip, STAGING_MARKER, normalize_ext};
use crate::error::ClipError;
use regex::Regex;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::{debug, info};
use which::which;

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("timestamp pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    seconds: u64,
}

impl Timestamp {
    pub fn parse(input: &str) -> Result<Self, ClipError> {
        if !TIMESTAMP_RE.is_match(input) {
            return Err(ClipError::InvalidTimeFormat(input.to_string()));
        }
        let parts: Vec<u64> = input
            .split(':')
            .map(|p| p.parse::<u64>())
            .collect::<Result<_, _>>()
            .map_err(|_| ClipError::InvalidTimeFormat(input.to_string()))?;
        let (h, m, s) = (parts[0], parts[1], parts[2]);
        if m >= 60 || s >= 60 {
            return Err(ClipError::InvalidTimeFormat(input.to_string()));
        }
        Ok(Timestamp {
            seconds: h * 3600 + m * 60 + s,
        })
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_hms(self.seconds))
    }
}

pub fn format_hms(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransformKind {
    Cut { start: Timestamp, end: Timestamp },
    Mute,
    Speed(f64),
    Convert(String),
}

impl TransformKind {
    pub fn cut(start: &str, end: &str) -> Result<Self, ClipError> {
        let start_ts = Timestamp::parse(start)?;
        let end_ts = Timestamp::parse(end)?;
        if start_ts >= end_ts {
            return Err(ClipError::InvalidTimeRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(TransformKind::Cut {
            start: start_ts,
            end: end_ts,
        })
    }

    pub fn speed(factor: f64) -> Result<Self, ClipError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ClipError::InvalidSpeed(factor));
        }
        Ok(TransformKind::Speed(factor))
    }

    pub fn convert(target: &str) -> Result<Self, ClipError> {
        Ok(TransformKind::Convert(normalize_ext(target)?))
    }

    pub fn target_ext<'a>(&'a self, clip: &'a Clip) -> &'a str {
        match self {
            TransformKind::Convert(ext) => ext,
            _ => &clip.ext,
        }
    }

    pub fn staging_path(&self, clip: &Clip) -> PathBuf {
        clip.sibling(&format!(
            "{}{}.{}",
            clip.stem,
            STAGING_MARKER,
            self.target_ext(clip)
        ))
    }

    pub fn verb(&self) -> &'static str {
        match self {
            TransformKind::Cut { .. } => "cut",
            TransformKind::Mute => "mute",
            TransformKind::Speed(_) => "speed",
            TransformKind::Convert(_) => "convert",
        }
    }

    pub fn ffmpeg_args(&self) -> Vec<String> {
        match self {
            TransformKind::Cut { start, end } => vec![
                "-ss".into(),
                start.to_string(),
                "-to".into(),
                end.to_string(),
            ],
            TransformKind::Mute => vec![
                "-c:v".into(),
                "copy".into(),
                "-af".into(),
                "volume=0".into(),
            ],
            TransformKind::Speed(factor) => vec![
                "-filter:v".into(),
                format!("setpts=PTS/{factor}"),
                "-filter:a".into(),
                atempo_chain(*factor),
            ],
            TransformKind::Convert(_) => Vec::new(),
        }
    }
}

/// `atempo` only accepts 0.5..=2.0 per stage, so larger factors are chained.
pub fn atempo_chain(factor: f64) -> String {
    let mut remaining = factor;
    let mut chain: Vec<String> = Vec::new();
    while remaining > 2.0 {
        chain.push("atempo=2".into());
        remaining /= 2.0;
    }
    while remaining < 0.5 {
        chain.push("atempo=0.5".into());
        remaining /= 0.5;
    }
    chain.push(format!("atempo={remaining}"));
    chain.join(",")
}

/// Runs a media operation out of process. Calls block until the tool exits.
#[allow(async_fn_in_trait)]
pub trait VideoTransformer {
    async fn transform(
        &self,
        kind: &TransformKind,
        input: &Path,
        output: &Path,
    ) -> Result<(), ClipError>;

    /// Duration in whole seconds, rounded down. For display only.
    async fn probe_duration(&self, input: &Path) -> Result<u64, ClipError>;
}

pub struct Ffmpeg {
    ffmpeg: OsString,
    ffprobe: OsString,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Ffmpeg {
            ffmpeg: "ffmpeg".into(),
            ffprobe: "ffprobe".into(),
        }
    }
}

impl Ffmpeg {
    fn locate(binary: &OsString) -> Result<PathBuf, ClipError> {
        which(binary).map_err(|e| ClipError::ExternalToolFailure {
            tool: binary.to_string_lossy().into_owned(),
            detail: format!("not found in PATH ({e}). Is it installed?"),
        })
    }

    async fn run(&self, binary: &OsString, args: &[OsString]) -> Result<Vec<u8>, ClipError> {
        let tool = binary.to_string_lossy().into_owned();
        let program = Self::locate(binary)?;
        debug!(%tool, ?args, "running external tool");

        let output = Command::new(&program)
            .args(args)
            .output()
            .await
            .map_err(|e| ClipError::ExternalToolFailure {
                tool: tool.clone(),
                detail: format!("could not be started: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClipError::ExternalToolFailure {
                tool,
                detail: format!("exited with status {}\n{}", output.status, stderr.trim()),
            });
        }
        Ok(output.stdout)
    }
}

impl VideoTransformer for Ffmpeg {
    async fn transform(
        &self,
        kind: &TransformKind,
        input: &Path,
        output: &Path,
    ) -> Result<(), ClipError> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-n".into(),
            "-i".into(),
            input.as_os_str().to_owned(),
        ];
        args.extend(kind.ffmpeg_args().into_iter().map(OsString::from));
        args.push(output.as_os_str().to_owned());

        self.run(&self.ffmpeg, &args).await?;
        info!(
            op = kind.verb(),
            input = %input.display(),
            output = %output.display(),
            "transform finished"
        );
        Ok(())
    }

    async fn probe_duration(&self, input: &Path) -> Result<u64, ClipError> {
        let args: Vec<OsString> = vec![
            "-v".into(),
            "error".into(),
            "-show_entries".into(),
            "format=duration".into(),
            "-of".into(),
            "default=noprint_wrappers=1:nokey=1".into(),
            input.as_os_str().to_owned(),
        ];
        let stdout = self.run(&self.ffprobe, &args).await?;
        let text = String::from_utf8_lossy(&stdout);
        let seconds: f64 = text
            .trim()
            .parse()
            .map_err(|_| ClipError::ExternalToolFailure {
                tool: self.ffprobe.to_string_lossy().into_owned(),
                detail: format!("unexpected duration output '{}'", text.trim()),
            })?;
        Ok(seconds.max(0.0).floor() as u64)
    }
}
