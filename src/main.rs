//! # moodmix
//!
//! Builds playlists from a CSV song catalog by mood, genre, popularity and
//! listening history.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive menu
//! moodmix --user ana
//!
//! # One-shot commands
//! moodmix top -n 5
//! moodmix search "dua"
//! moodmix --user ana recommend --genre pop --mood happy --save
//! moodmix --user ana track "Levitating"
//! moodmix chart pie playlist_ana_happy.csv
//! ```

use anyhow::{anyhow, bail, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};

use moodmix::catalog::Catalog;
use moodmix::cli::{self, Args};
use moodmix::completion;
use moodmix::config::RuntimeConfig;
use moodmix::display;
use moodmix::interactive;
use moodmix::playlist::{Playlist, LOADED_MOOD};
use moodmix::recommend::{self, Criteria};
use moodmix::session::{self, Session};
use moodmix::song::{normalize_mood, Song};

/// Main entry point for moodmix.
///
/// Initializes logging, parses command-line arguments and routes each
/// subcommand to the library. With no subcommand the interactive menu runs.
///
/// # Logging
///
/// Controlled via `RUST_LOG`:
/// - `RUST_LOG=debug moodmix top` - Enable debug logging
/// - `RUST_LOG=moodmix::catalog=debug moodmix browse` - Show skipped rows
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Completion helpers must not create directories or touch the data dir.
    match &args.command {
        Some(cli::Command::Completion { shell }) => {
            let mut cmd = Args::command();
            let shell = completion::shell_to_completion_shell(shell);
            completion::generate_completions(shell, &mut cmd);
            return Ok(());
        }
        Some(cli::Command::CompleteSongs) => {
            return completion::print_song_completions(&args.catalog);
        }
        _ => {}
    }

    let mut config = RuntimeConfig::new(args.catalog.clone(), args.data_dir.clone())?;
    if args.no_report {
        config = config.without_reports();
    }
    debug!("Resolved configuration: {config:?}");

    match args.command {
        None => interactive::run(config, args.user, None)?,
        Some(cli::Command::Interactive { mood }) => interactive::run(config, args.user, mood)?,
        Some(cli::Command::Browse) => {
            let catalog = load_catalog(&config)?;
            let songs: Vec<&Song> = catalog.songs().iter().collect();
            display::print_songs("All Available Songs", &songs);
        }
        Some(cli::Command::Top { count }) => {
            let catalog = load_catalog(&config)?;
            let top = recommend::top_songs(catalog.songs(), count as usize);
            display::print_songs(&format!("Top {count} Most Popular Songs"), &top);
        }
        Some(cli::Command::Search { keyword }) => {
            let catalog = load_catalog(&config)?;
            let results = recommend::search(catalog.songs(), &keyword);
            if results.is_empty() {
                println!("No songs found matching '{keyword}'");
            } else {
                display::print_songs(&format!("Search Results for '{keyword}'"), &results);
            }
        }
        Some(cli::Command::Recommend { mood, genre, count, save, json }) => {
            let username = require_user(args.user)?;
            let current_mood = mood
                .as_deref()
                .and_then(normalize_mood)
                .unwrap_or_else(|| LOADED_MOOD.to_string());
            let mut session = Session::start(config, &username, &current_mood)?;

            let criteria = Criteria::from_options(genre, mood);
            info!("Recommending {count} songs for {username} ({criteria})");
            let recommendation = session.recommend(criteria, count as usize)?;

            if json {
                println!("{}", recommendation.report.to_json()?);
            } else {
                display::print_recommendation(&recommendation);
            }

            if let Some(name) = save {
                if recommendation.songs.is_empty() {
                    println!("Nothing to save.");
                } else {
                    let path = session.save_playlist(Some(&name))?;
                    println!("Playlist saved to {}", path.display());
                }
            }
        }
        Some(cli::Command::Track { song }) => {
            let username = require_user(args.user)?;
            let mut session = Session::start(config, &username, LOADED_MOOD)?;
            let found = session
                .catalog()
                .find_by_name(&song)
                .cloned()
                .ok_or_else(|| anyhow!("Song '{song}' is not in the catalog"))?;
            let entry = session.track(&found)?;
            println!(
                "'{}' added to {}'s listening history at {}",
                entry.song_name, entry.username, entry.timestamp
            );
        }
        Some(cli::Command::History { limit }) => {
            let username = require_user(args.user)?;
            let session = Session::start(config, &username, LOADED_MOOD)?;
            let mut profile = session.profile();
            profile.recent = session
                .history()
                .for_user(&username)
                .recent(limit)
                .into_iter()
                .cloned()
                .collect();
            print!("{profile}");
        }
        Some(cli::Command::Stats { playlist }) => {
            let playlist = Playlist::load(&playlist)?;
            match playlist.statistics() {
                Some(stats) => display::print_statistics(&stats),
                None => println!("No songs in playlist to analyze!"),
            }
        }
        Some(cli::Command::Chart { kind, playlist }) => {
            let loaded = Playlist::load(&playlist)?;
            if loaded.is_empty() {
                bail!("Playlist {} has no songs to chart", playlist.display());
            }
            let output = session::draw_chart(loaded.songs(), kind.into(), &config)?;
            println!("{}", output.text);
            println!("Chart saved as {}", output.path.display());
        }
        Some(cli::Command::Config) => println!("{}", config.to_json()?),
        Some(cli::Command::Completion { .. } | cli::Command::CompleteSongs) => {}
    }

    Ok(())
}

fn load_catalog(config: &RuntimeConfig) -> Result<Catalog> {
    let catalog = Catalog::load(&config.catalog_path)?;
    if catalog.is_empty() {
        bail!("No valid songs in {}", config.catalog_path.display());
    }
    Ok(catalog)
}

fn require_user(user: Option<String>) -> Result<String> {
    user.as_deref()
        .and_then(session::clean_username)
        .ok_or_else(|| anyhow!("This command needs a user. Pass --user or set MOODMIX_USER."))
}
