use quick_error::quick_error;
use std::io;
use std::path::PathBuf;

quick_error! {
    #[derive(Debug)]
    pub enum ClipError {
        ConfigMissing(path: PathBuf) {
            display("Config missing or incomplete at {}. Please run `vmaker init`.", path.display())
        }
        NoWorkingDirectory {
            display("No working directory selected. Please run `vmaker curr <dirname>`.")
        }
        InvalidPath(path: String, reason: &'static str) {
            display("Invalid path '{}': {}", path, reason)
        }
        ClipNotFound { name: String, dir: PathBuf } {
            display("Clip '{}' not found in {}", name, dir.display())
        }
        AmbiguousStaging { name: String, candidates: Vec<String> } {
            display("More than one staging file matches '{}': {}", name, candidates.join(", "))
        }
        StagingConflict(path: PathBuf) {
            display("A staging file is already present: {}. Remove or rename it first.", path.display())
        }
        TargetExists(path: PathBuf) {
            display("The file already exists: {}", path.display())
        }
        InvalidTimeFormat(input: String) {
            display("Invalid time '{}'. Use the HH:MM:SS format, e.g. 00:01:05.", input)
        }
        InvalidTimeRange { start: String, end: String } {
            display("Start time {} must be before end time {}.", start, end)
        }
        InvalidSpeed(factor: f64) {
            display("Invalid speed factor {}. It must be a positive number.", factor)
        }
        UnsupportedFormat(ext: String) {
            display("Unsupported video format '{}'. Use one of: .mp4 .mkv .avi .mov .wmv .flv", ext)
        }
        InvalidName(name: String, reason: &'static str) {
            display("Invalid name '{}': {}", name, reason)
        }
        ExternalToolFailure { tool: String, detail: String } {
            display("{} failed: {}", tool, detail)
        }
        BackupWriteFailure { path: PathBuf, err: io::Error } {
            source(err)
            display("Could not write backup {}: {}. The original clip was left untouched.", path.display(), err)
        }
        Inconsistent { staging: PathBuf, original: PathBuf, err: io::Error } {
            source(err)
            display("The original {} was removed but {} could not be moved into its place: {}",
                original.display(), staging.display(), err)
        }
        PartialRemoval(missing: Vec<String>) {
            display("Nothing was removed. Clips not found: {}", missing.join(", "))
        }
        Io { context: String, err: io::Error } {
            source(err)
            display("{}: {}", context, err)
        }
    }
}

impl ClipError {
    pub fn io(context: impl Into<String>, err: io::Error) -> Self {
        ClipError::Io {
            context: context.into(),
            err,
        }
    }

    /// Short description of what was going on when the error happened.
    pub fn situation(&self) -> &'static str {
        match self {
            ClipError::ConfigMissing(_) | ClipError::InvalidPath(..) => "initializing",
            ClipError::NoWorkingDirectory => "selecting",
            ClipError::ClipNotFound { .. } | ClipError::AmbiguousStaging { .. } => "resolving",
            ClipError::InvalidTimeFormat(_)
            | ClipError::InvalidTimeRange { .. }
            | ClipError::InvalidSpeed(_)
            | ClipError::UnsupportedFormat(_)
            | ClipError::InvalidName(..) => "validating",
            ClipError::StagingConflict(_) | ClipError::ExternalToolFailure { .. } => "transforming",
            ClipError::BackupWriteFailure { .. } => "backing up",
            ClipError::Inconsistent { .. } => "replacing",
            ClipError::TargetExists(_) => "copying",
            ClipError::PartialRemoval(_) => "removing",
            ClipError::Io { .. } => "accessing files",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_failure_keeps_source() {
        let err = ClipError::BackupWriteFailure {
            path: PathBuf::from("demo.mp4_20260101000000.bak"),
            err: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.situation(), "backing up");
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("left untouched"));
    }

    #[test]
    fn partial_removal_lists_missing_names() {
        let err = ClipError::PartialRemoval(vec!["4".into(), "outro".into()]);
        assert_eq!(err.to_string(), "Nothing was removed. Clips not found: 4, outro");
    }
}
