//! Mood and genre based playlists from a CSV song catalog.
//!
//! Core modules:
//! - [`song`] - The song record and label normalisation
//! - [`catalog`] - Loading and validating the CSV catalog
//! - [`recommend`] - Filters, ranking and history-based recommendations
//! - [`history`] - Append-only listening history
//! - [`playlist`] - The working playlist, its CSV form and statistics
//!
//! ### Supporting Modules
//!
//! - [`stats`] - Label frequency tallies
//! - [`report`] - Text and JSON recommendation reports
//! - [`chart`] - Terminal and SVG charts
//! - [`display`] - Song tables and printed summaries
//! - [`session`] - One user's catalog, history and playlist together
//! - [`interactive`] - The prompt-driven menu
//! - [`config`] - Data directory and path resolution
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use moodmix::config::RuntimeConfig;
//! use moodmix::recommend::Criteria;
//! use moodmix::session::Session;
//! use std::path::PathBuf;
//!
//! let config = RuntimeConfig::new(PathBuf::from("songs.csv"), None)?;
//! let mut session = Session::start(config, "ana", "Happy")?;
//!
//! let result = session.recommend(Criteria::Mood("Happy".into()), 5)?;
//! for song in &result.songs {
//!     println!("{} - {} ({})", song.song_name, song.artist, song.popularity);
//! }
//!
//! let path = session.save_playlist(None)?;
//! println!("Saved to {}", path.display());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Recommendation Strategies
//!
//! - **Mood / Genre / Both**: case-insensitive filters over the catalog,
//!   ranked by popularity, highest first.
//! - **History**: the user's most played genre and mood drive the
//!   candidates. Every unheard song matching both comes first; while there
//!   are fewer than 20, unheard songs of that genre and then of that mood are
//!   added. The candidates are ranked by popularity and cut to the requested
//!   count. With no history the 20 most popular catalog songs are used, and
//!   an empty candidate list falls back to the whole catalog.
//!
//! Ties in popularity keep catalog order.
//!
//! ## Error Handling
//!
//! Public functions return `anyhow::Result`. Row-level catalog problems are
//! typed [`song::SongError`]s; such rows are skipped and logged rather than
//! failing the load.

pub mod catalog;
pub mod chart;
pub mod cli;
pub mod completion;
pub mod config;
pub mod display;
pub mod history;
pub mod interactive;
pub mod playlist;
pub mod recommend;
pub mod report;
pub mod session;
pub mod song;
pub mod stats;
