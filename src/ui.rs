use crate::clip::{self, Clip};
use crate::error::ClipError;
use anyhow::Result;
use colored::*;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use inquire::Confirm;
use std::path::Path;

/// Asks a yes/no question unless `--yes` was given.
pub fn confirm(question: &str, default: bool, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Ok(Confirm::new(question).with_default(default).prompt()?)
}

/// Resolves a clip in the working directory, hinting at the closest name on a miss.
pub async fn find_clip(name: &str, dir: &Path) -> Result<Clip> {
    match clip::resolve(name, dir).await {
        Ok(found) => Ok(found),
        Err(err @ ClipError::ClipNotFound { .. }) => {
            let clips = clip::list_clips(dir).await.unwrap_or_default();
            if let Some(suggestion) = closest_name(name, &clips) {
                eprintln!("{}", format!("○ Did you mean '{suggestion}'?").yellow());
            }
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

pub fn closest_name(input: &str, clips: &[Clip]) -> Option<String> {
    let matcher = SkimMatcherV2::default();
    clips
        .iter()
        .filter_map(|clip| {
            matcher
                .fuzzy_match(&clip.file_name(), input.trim())
                .map(|score| (score, clip.file_name()))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, name)| name)
}

pub fn print_clip_count(count: usize, dir: &Path) {
    println!(
        "  {} clip(s) in {}",
        count.to_string().green().bold(),
        dir.display().to_string().cyan()
    );
}

/// Offers to show the working directory in the platform file browser.
pub fn offer_open_dir(dir: &Path, assume_yes: bool) -> Result<()> {
    if assume_yes {
        return Ok(());
    }
    let open = Confirm::new("Open the working directory?")
        .with_default(false)
        .prompt()?;
    if open {
        if let Err(e) = opener::open(dir) {
            println!(
                "{}",
                format!("✗ Could not open {}: {e}", dir.display()).yellow()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clips(names: &[&str]) -> Vec<Clip> {
        names
            .iter()
            .filter_map(|n| Clip::from_path(&Path::new("/w").join(n)))
            .collect()
    }

    #[test]
    fn suggests_closest_clip() {
        let all = clips(&["001-setup.mp4", "002-intro.mp4", "003-outro.mkv"]);
        assert_eq!(closest_name("intr", &all).as_deref(), Some("002-intro.mp4"));
        assert_eq!(closest_name("zzz", &all), None);
    }

    #[test]
    fn assume_yes_skips_prompt() {
        assert!(confirm("Continue?", false, true).unwrap());
    }
}
