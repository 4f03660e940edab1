use crate::error::ClipError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_ENV: &str = "VMAKER_CONFIG";

/// Directories the tool works with. Loaded once at startup and handed to every command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub raw_dir: String,
    #[serde(default)]
    pub clip_dir: String,
    #[serde(default)]
    pub output_dir: String,
    #[serde(default)]
    pub curr_dirname: String,
    /// Where `.bak` files go. Next to the clip when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<String>,
}

impl Config {
    /// `--config` wins, then `VMAKER_CONFIG`, then the platform config directory.
    pub fn location(flag: Option<&Path>) -> PathBuf {
        if let Some(path) = flag {
            return path.to_path_buf();
        }
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(path);
        }
        Self::config_dir().join("vmaker").join("config.json")
    }

    fn config_dir() -> PathBuf {
        if cfg!(windows) {
            if let Some(appdata) = env::var_os("APPDATA") {
                return PathBuf::from(appdata);
            }
        }
        if let Some(xdg) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(xdg);
        }
        env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(".config"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Reads the config, treating a missing file, unparsable content or empty directory
    /// keys as not initialized.
    pub async fn load(path: &Path) -> Result<Self, ClipError> {
        let content = Self::read(path)
            .await?
            .ok_or_else(|| ClipError::ConfigMissing(path.to_path_buf()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|_| ClipError::ConfigMissing(path.to_path_buf()))?;
        if !config.is_complete() {
            return Err(ClipError::ConfigMissing(path.to_path_buf()));
        }
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Like `load` but tolerates an absent, damaged or partial file so `init` can rewrite it.
    pub async fn load_partial(path: &Path) -> Result<Self, ClipError> {
        let Some(content) = Self::read(path).await? else {
            return Ok(Config::default());
        };
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config is not valid JSON, starting over");
                Ok(Config::default())
            }
        }
    }

    async fn read(path: &Path) -> Result<Option<String>, ClipError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClipError::io(
                format!("Failed to read config {}", path.display()),
                e,
            )),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), ClipError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ClipError::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ClipError::io("Failed to serialize config", e.into()))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| ClipError::io(format!("Failed to write config {}", path.display()), e))?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        [&self.raw_dir, &self.clip_dir, &self.output_dir]
            .iter()
            .all(|v| !v.trim().is_empty())
    }

    pub fn raw_path(&self) -> PathBuf {
        PathBuf::from(&self.raw_dir)
    }

    pub fn clip_path(&self) -> PathBuf {
        PathBuf::from(&self.clip_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    /// The working directory: `clip_dir/curr_dirname`.
    pub fn curr_path(&self) -> Result<PathBuf, ClipError> {
        if self.curr_dirname.trim().is_empty() {
            return Err(ClipError::NoWorkingDirectory);
        }
        Ok(self.clip_path().join(&self.curr_dirname))
    }

    pub fn backup_path(&self) -> Option<PathBuf> {
        self.backup_dir
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
    }
}

/// A directory setting is usable when non-empty and not an existing non-directory.
pub fn validate_dir(input: &str) -> Result<PathBuf, ClipError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ClipError::InvalidPath(
            input.to_string(),
            "the path cannot be empty",
        ));
    }
    let path = PathBuf::from(trimmed);
    if path.exists() && !path.is_dir() {
        return Err(ClipError::InvalidPath(
            trimmed.to_string(),
            "it exists but is not a directory",
        ));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(root: &Path) -> Config {
        Config {
            raw_dir: root.join("raw").display().to_string(),
            clip_dir: root.join("clips").display().to_string(),
            output_dir: root.join("out").display().to_string(),
            curr_dirname: "01".into(),
            backup_dir: None,
        }
    }

    #[tokio::test]
    async fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = sample(dir.path());
        config.save(&path).await.unwrap();
        assert_eq!(Config::load(&path).await.unwrap(), config);
        assert_eq!(
            config.curr_path().unwrap(),
            dir.path().join("clips").join("01")
        );
    }

    #[tokio::test]
    async fn missing_file_is_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("none.json")).await.unwrap_err();
        assert!(matches!(err, ClipError::ConfigMissing(_)));
        assert_eq!(err.situation(), "initializing");
    }

    #[tokio::test]
    async fn missing_keys_are_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"raw_dir": "/raw", "clip_dir": ""}"#)
            .await
            .unwrap();
        assert!(matches!(
            Config::load(&path).await,
            Err(ClipError::ConfigMissing(_))
        ));
        let partial = Config::load_partial(&path).await.unwrap();
        assert_eq!(partial.raw_dir, "/raw");
    }

    #[tokio::test]
    async fn damaged_file_can_be_reinitialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();
        assert!(matches!(
            Config::load(&path).await,
            Err(ClipError::ConfigMissing(_))
        ));
        assert_eq!(Config::load_partial(&path).await.unwrap(), Config::default());

        let config = sample(dir.path());
        config.save(&path).await.unwrap();
        assert_eq!(Config::load(&path).await.unwrap(), config);
    }

    #[test]
    fn working_directory_needs_a_name() {
        let config = Config {
            curr_dirname: String::new(),
            ..sample(Path::new("/tmp"))
        };
        assert!(matches!(
            config.curr_path(),
            Err(ClipError::NoWorkingDirectory)
        ));
    }

    #[test]
    fn explicit_location_wins() {
        let flag = Path::new("/etc/vmaker.json");
        assert_eq!(Config::location(Some(flag)), flag);
    }

    #[test]
    fn validate_dir_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(validate_dir(file.to_str().unwrap()).is_err());
        assert!(validate_dir("  ").is_err());
        assert!(validate_dir(dir.path().join("new").to_str().unwrap()).is_ok());
    }
}
