//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for moodmix using Clap
//! derive macros. Running without a subcommand starts the interactive menu.
//!
//! ## Commands
//!
//! - `interactive`: Menu-driven session (default)
//! - `browse`, `top`, `search`: Look through the catalog
//! - `recommend`: Mood, genre or history based recommendations
//! - `track`: Record a song in the listening history
//! - `history`: Show the user profile and recent listening
//! - `stats`, `chart`: Analyse a saved playlist
//!
//! ## Examples
//!
//! ```bash
//! moodmix --user ana recommend --mood happy -n 5 --save
//! moodmix --user ana track "Levitating"
//! moodmix chart both playlist_ana_happy.csv
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::chart::ChartKind;
use crate::config::DEFAULT_CATALOG;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Chart types selectable on the command line
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum ChartChoice {
    /// Genre distribution as a bar chart
    Bar,
    /// Mood distribution as a pie chart
    Pie,
    /// Both charts side by side
    Both,
}

impl From<ChartChoice> for ChartKind {
    fn from(choice: ChartChoice) -> Self {
        match choice {
            ChartChoice::Bar => Self::GenreBar,
            ChartChoice::Pie => Self::MoodPie,
            ChartChoice::Both => Self::Analysis,
        }
    }
}

/// Main application arguments structure.
///
/// Global options locate the catalog and the data directory and name the
/// user whose history and playlists are used.
#[derive(Parser, Debug)]
#[command(name = "moodmix")]
#[command(about = "moodmix: mood and genre based playlists from a CSV song catalog")]
#[command(version)]
pub struct Args {
    /// CSV catalog with song_name, artist, genre, mood and popularity columns
    #[arg(long, global = true, env = "MOODMIX_CATALOG", default_value = DEFAULT_CATALOG)]
    pub catalog: PathBuf,

    /// Directory for history, playlists, reports and charts
    ///
    /// Defaults to the platform data directory (e.g. ~/.local/share/moodmix).
    #[arg(long, global = true, env = "MOODMIX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Name of the user whose history and playlist are used
    #[arg(short, long, global = true, env = "MOODMIX_USER")]
    pub user: Option<String>,

    /// Do not write a text report for each recommendation
    #[arg(long, global = true)]
    pub no_report: bool,

    /// The subcommand to execute (interactive menu when omitted)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the interactive menu
    ///
    /// Prompts for a username (unless --user is given) and a current mood,
    /// then offers recommendations, search, playlist editing, history
    /// tracking, statistics and charts.
    Interactive {
        /// Current mood, skipping the mood prompt
        #[arg(long)]
        mood: Option<String>,
    },

    /// Show every song in the catalog
    Browse,

    /// Show the most popular songs
    Top {
        /// How many songs to show
        #[arg(
            short = 'n',
            long,
            default_value = "10",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        count: u32,
    },

    /// Search song names and artists
    Search {
        /// Text to look for, case-insensitive
        keyword: String,
    },

    /// Recommend songs by mood and/or genre, or from listening history
    ///
    /// With neither --mood nor --genre, recommendations are based on the
    /// user's most played genre and mood, skipping songs already heard.
    Recommend {
        /// Mood to filter by (e.g. Happy, Sad, Energetic, Calm, Romantic)
        #[arg(long)]
        mood: Option<String>,

        /// Genre to filter by (e.g. Pop, Rock, Hip-Hop, Electronic, Jazz, Classical)
        #[arg(long)]
        genre: Option<String>,

        /// How many songs to recommend
        #[arg(
            short = 'n',
            long,
            default_value = "10",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        count: u32,

        /// Save the result as a playlist (default name when no file is given)
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        save: Option<String>,

        /// Print the recommendation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a song in the listening history
    Track {
        /// Exact song name (case-insensitive)
        #[arg(value_hint = clap::ValueHint::Other)]
        song: String,
    },

    /// Show the user profile and recent listening history
    History {
        /// How many recent entries to list
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },

    /// Show statistics for a saved playlist
    Stats {
        /// Playlist CSV written by `recommend --save` or the menu
        playlist: PathBuf,
    },

    /// Draw charts for a saved playlist
    Chart {
        /// Which chart to draw
        #[arg(value_enum)]
        kind: ChartChoice,

        /// Playlist CSV written by `recommend --save` or the menu
        playlist: PathBuf,
    },

    /// Print the resolved configuration as JSON
    Config,

    /// Generate shell completions
    ///
    /// Usage: moodmix completion bash > ~/.local/share/bash-completion/completions/moodmix
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },

    /// List catalog song names for completion (hidden command)
    #[command(hide = true)]
    CompleteSongs,
}
