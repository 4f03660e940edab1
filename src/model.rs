use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vmaker",
    version,
    about = "A tutorial video maker for programmers. Collects recordings into a project folder and edits them with ffmpeg."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Path of the config file (defaults to $VMAKER_CONFIG or the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
    #[arg(long, global = true, hide = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up the capture, clip and output directories
    Init,
    /// Show or switch the working directory inside the clip directory
    Curr { dirname: Option<String> },
    /// Copy the latest recording into the working directory
    Add {
        #[arg(help = "New name of the clip")]
        name: Option<String>,
        /// Pick the recording from a list instead of taking the newest
        #[arg(short = 'c', long)]
        choose: bool,
        #[arg(short = 'r', long, value_enum)]
        rename_strategy: Option<RenameStrategy>,
    },
    /// Delete clips from the working directory
    Rm {
        #[arg(required = true, help = "Names or numeric prefixes of the clips")]
        names: Vec<String>,
    },
    /// Keep only the part of a clip between two HH:MM:SS timestamps
    Cut {
        name: String,
        start: String,
        end: String,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        backup: bool,
    },
    /// Replace a clip's audio with silence
    Mute {
        name: String,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        backup: bool,
    },
    /// Speed a clip up or slow it down
    Speed {
        name: String,
        #[arg(allow_negative_numbers = true)]
        factor: f64,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        backup: bool,
    },
    /// Convert a clip to another container format, e.g. `.mkv`
    Convert {
        name: String,
        suffix: String,
        /// Further clips to convert to the same format
        #[arg(short = 'm', long, num_args = 1..)]
        many: Vec<String>,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        backup: bool,
    },
    /// Rename a clip, keeping its extension
    Rename { name: String, new_name: String },
    /// List the clips in the working directory
    Ls,
    /// Print the active configuration
    Cfg {
        /// Open the config file in an editor ($VISUAL, $EDITOR or nano)
        #[arg(short = 'e', long)]
        edit: bool,
        #[arg(long)]
        editor: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RenameStrategy {
    /// Keep the recording's file name
    DontRename,
    /// Name the clip after the recording's modification time
    Time,
    /// Prefix with the next clip number: `NNN-<name>`
    ClipInfo,
    /// Append the given name to the recording's name
    Suffix,
}
