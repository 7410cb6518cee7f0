//! # Interactive Menu
//!
//! The prompt-driven front end. Each menu entry maps onto one [`Session`]
//! operation; a failing entry prints its error and returns to the menu.

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use log::{debug, warn};

use crate::catalog::Catalog;
use crate::chart::ChartKind;
use crate::config::RuntimeConfig;
use crate::display;
use crate::history::History;
use crate::playlist::AddOutcome;
use crate::recommend::{Criteria, DEFAULT_COUNT};
use crate::session::{clean_username, Session};
use crate::song::{normalize_genre, normalize_mood, Song, KNOWN_GENRES, KNOWN_MOODS};

/// Entries of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ViewProfile,
    MoodRecommendations,
    GenreRecommendations,
    GenreAndMoodRecommendations,
    SmartRecommendations,
    SearchSongs,
    ViewPlaylist,
    AddSong,
    RemoveSong,
    TrackSong,
    SavePlaylist,
    PlaylistStatistics,
    GenreChart,
    MoodChart,
    CompleteAnalysis,
    BrowseSongs,
    TopSongs,
    ClearPlaylist,
    Exit,
}

impl MenuAction {
    pub const ALL: [Self; 19] = [
        Self::ViewProfile,
        Self::MoodRecommendations,
        Self::GenreRecommendations,
        Self::GenreAndMoodRecommendations,
        Self::SmartRecommendations,
        Self::SearchSongs,
        Self::ViewPlaylist,
        Self::AddSong,
        Self::RemoveSong,
        Self::TrackSong,
        Self::SavePlaylist,
        Self::PlaylistStatistics,
        Self::GenreChart,
        Self::MoodChart,
        Self::CompleteAnalysis,
        Self::BrowseSongs,
        Self::TopSongs,
        Self::ClearPlaylist,
        Self::Exit,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViewProfile => "View User Profile",
            Self::MoodRecommendations => "Get Mood-Based Recommendations",
            Self::GenreRecommendations => "Get Genre-Based Recommendations",
            Self::GenreAndMoodRecommendations => "Get Recommendations (Genre + Mood)",
            Self::SmartRecommendations => "Smart Recommendations (Based on History)",
            Self::SearchSongs => "Search Songs",
            Self::ViewPlaylist => "View Current Playlist",
            Self::AddSong => "Add Song to Playlist",
            Self::RemoveSong => "Remove Song from Playlist",
            Self::TrackSong => "Track Song in History",
            Self::SavePlaylist => "Save Playlist to CSV",
            Self::PlaylistStatistics => "View Playlist Statistics",
            Self::GenreChart => "Visualize Genre Distribution (Bar Chart)",
            Self::MoodChart => "Visualize Mood Distribution (Pie Chart)",
            Self::CompleteAnalysis => "Visualize Complete Analysis (Both Charts)",
            Self::BrowseSongs => "Browse All Available Songs",
            Self::TopSongs => "View Top Popular Songs",
            Self::ClearPlaylist => "Clear Current Playlist",
            Self::Exit => "Exit Application",
        }
    }
}

/// Run the menu until the user exits.
///
/// `username` and `mood` skip their prompts when given.
pub fn run(config: RuntimeConfig, username: Option<String>, mood: Option<String>) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!("\nMUSIC PLAYLIST RECOMMENDATION SYSTEM\n");
    println!("Loading songs database...");
    let catalog = Catalog::load(&config.catalog_path)?;
    if catalog.is_empty() {
        anyhow::bail!(
            "Could not load songs database. Please ensure {} exists and has valid songs.",
            config.catalog_path.display()
        );
    }
    println!("Loaded {} songs.", catalog.len());
    if !catalog.skipped().is_empty() {
        println!("Skipped {} invalid song entries.", catalog.skipped().len());
    }
    let history = History::load(&config.history_path)?;

    let username = match username.as_deref().and_then(clean_username) {
        Some(name) => name,
        None => prompt_username(&theme)?,
    };
    println!("\nHello, {username}!");
    let mood = match mood.as_deref().and_then(normalize_mood) {
        Some(mood) => mood,
        None => prompt_mood(&theme)?,
    };

    let mut session = Session::with_state(config, catalog, history, &username, &mood);
    println!("\nWelcome to your personalized music recommendation system!");
    println!("   Your current mood: {mood}");

    let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();
    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("Main menu")
            .items(&labels)
            .default(0)
            .interact_opt();

        let action = match choice {
            Ok(Some(idx)) => MenuAction::ALL[idx],
            Ok(None) => MenuAction::Exit,
            Err(err) => {
                debug!("Menu prompt ended: {err}");
                MenuAction::Exit
            }
        };

        if action == MenuAction::Exit {
            println!("\nThank you for using the Music Recommendation System!");
            return Ok(());
        }

        if let Err(err) = perform(&mut session, action, &theme) {
            warn!("{:?} failed: {err:#}", action);
            eprintln!("\nAn error occurred: {err:#}\n");
        }
    }
}

fn perform(session: &mut Session, action: MenuAction, theme: &ColorfulTheme) -> Result<()> {
    match action {
        MenuAction::ViewProfile => {
            println!("\nUSER PROFILE\n{}", session.profile());
        }
        MenuAction::MoodRecommendations => {
            let mood = prompt_mood(theme)?;
            recommend(session, Criteria::Mood(mood), theme)?;
        }
        MenuAction::GenreRecommendations => {
            let genre = prompt_genre(theme)?;
            recommend(session, Criteria::Genre(genre), theme)?;
        }
        MenuAction::GenreAndMoodRecommendations => {
            let genre = prompt_genre(theme)?;
            let mood = prompt_mood(theme)?;
            recommend(session, Criteria::GenreAndMood { genre, mood }, theme)?;
        }
        MenuAction::SmartRecommendations => {
            println!("\nAnalyzing your listening history...");
            recommend(session, Criteria::History, theme)?;
        }
        MenuAction::SearchSongs => {
            let results = search(session, theme, "Enter search keyword (song name or artist)")?;
            if !results.is_empty()
                && Confirm::with_theme(theme)
                    .with_prompt("Add a song to playlist?")
                    .default(false)
                    .interact()?
            {
                add_selected(session, &results, theme)?;
            }
        }
        MenuAction::ViewPlaylist => show_playlist(session),
        MenuAction::AddSong => {
            let results = search(session, theme, "Search for a song (name or artist)")?;
            add_selected(session, &results, theme)?;
        }
        MenuAction::RemoveSong => {
            show_playlist(session);
            if !session.playlist().is_empty() {
                let name: String = Input::with_theme(theme)
                    .with_prompt("Enter song name to remove")
                    .interact_text()?;
                match session.remove_from_playlist(&name) {
                    0 => println!("'{name}' not found in playlist!"),
                    _ => println!("'{name}' removed from playlist!"),
                }
            }
        }
        MenuAction::TrackSong => {
            let results = search(session, theme, "Search for a song to track")?;
            if let Some(song) = select_song(&results, theme)? {
                session.track(&song)?;
                println!("'{}' added to your listening history!", song.song_name);
            }
        }
        MenuAction::SavePlaylist => {
            if session.playlist().is_empty() {
                println!("\nYour playlist is empty! Add some songs first.\n");
            } else {
                let name: String = Input::with_theme(theme)
                    .with_prompt("Enter filename (or press Enter for auto-name)")
                    .allow_empty(true)
                    .interact_text()?;
                let path = session.save_playlist(Some(&name))?;
                println!("Your playlist has been saved to {}", path.display());
            }
        }
        MenuAction::PlaylistStatistics => match session.statistics() {
            Some(stats) => display::print_statistics(&stats),
            None => println!("\nNo songs in playlist to analyze!\n"),
        },
        MenuAction::GenreChart => chart(session, ChartKind::GenreBar)?,
        MenuAction::MoodChart => chart(session, ChartKind::MoodPie)?,
        MenuAction::CompleteAnalysis => chart(session, ChartKind::Analysis)?,
        MenuAction::BrowseSongs => {
            let all: Vec<Song> = session.catalog().songs().to_vec();
            offer_songs(session, "All Available Songs", &all, theme)?;
        }
        MenuAction::TopSongs => {
            let count = prompt_count(theme, "How many top songs to display?")?;
            let top = session.top(count);
            offer_songs(session, &format!("Top {count} Most Popular Songs"), &top, theme)?;
        }
        MenuAction::ClearPlaylist => {
            if Confirm::with_theme(theme)
                .with_prompt("Are you sure you want to clear your playlist?")
                .default(false)
                .interact()?
            {
                session.clear_playlist();
                println!("Playlist cleared!");
            }
        }
        MenuAction::Exit => {}
    }
    Ok(())
}

fn recommend(session: &mut Session, criteria: Criteria, theme: &ColorfulTheme) -> Result<()> {
    let count = prompt_count(theme, "How many songs to recommend?")?;
    println!("\nGenerating recommendations ({criteria})...");
    let recommendation = session.recommend(criteria, count)?;
    display::print_recommendation(&recommendation);
    Ok(())
}

fn search(session: &Session, theme: &ColorfulTheme, prompt: &str) -> Result<Vec<Song>> {
    let keyword: String = Input::with_theme(theme).with_prompt(prompt).interact_text()?;
    let results = session.search(&keyword);
    if results.is_empty() {
        println!("\nNo songs found matching '{keyword}'");
    } else {
        let refs: Vec<&Song> = results.iter().collect();
        display::print_songs(&format!("Search Results for '{keyword}'"), &refs);
    }
    Ok(results)
}

fn show_playlist(session: &Session) {
    let playlist = session.playlist();
    if playlist.is_empty() {
        println!("\nYour playlist is empty! Add some songs first.\n");
        return;
    }
    let refs: Vec<&Song> = playlist.songs().iter().collect();
    display::print_songs(&format!("{}'s Playlist", playlist.username()), &refs);
}

fn chart(session: &Session, kind: ChartKind) -> Result<()> {
    if session.playlist().is_empty() {
        println!("\nYour playlist is empty! Add some songs first.\n");
        return Ok(());
    }
    let output = session.chart(kind)?;
    println!("\n{}", output.text);
    println!("Chart saved as {}", output.path.display());
    Ok(())
}

fn offer_songs(
    session: &mut Session,
    title: &str,
    songs: &[Song],
    theme: &ColorfulTheme,
) -> Result<()> {
    let refs: Vec<&Song> = songs.iter().collect();
    display::print_songs(title, &refs);
    if !songs.is_empty()
        && Confirm::with_theme(theme)
            .with_prompt("Add a song to playlist?")
            .default(false)
            .interact()?
    {
        add_selected(session, songs, theme)?;
    }
    Ok(())
}

fn add_selected(session: &mut Session, songs: &[Song], theme: &ColorfulTheme) -> Result<()> {
    if let Some(song) = select_song(songs, theme)? {
        let name = song.song_name.clone();
        match session.add_to_playlist(song) {
            AddOutcome::Added => println!("'{name}' added to your playlist!"),
            AddOutcome::AlreadyPresent => println!("'{name}' is already in your playlist!"),
        }
    }
    Ok(())
}

/// Let the user pick one of `songs`. `None` when cancelled or nothing to pick.
fn select_song(songs: &[Song], theme: &ColorfulTheme) -> Result<Option<Song>> {
    if songs.is_empty() {
        return Ok(None);
    }
    let items: Vec<String> = songs
        .iter()
        .map(|s| {
            format!("{} - {} ({}, {}, {})", s.song_name, s.artist, s.genre, s.mood, s.popularity)
        })
        .collect();
    let picked = Select::with_theme(theme)
        .with_prompt("Select a song (Esc to cancel)")
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(picked.map(|idx| songs[idx].clone()))
}

fn prompt_username(theme: &ColorfulTheme) -> Result<String> {
    let typed: String = Input::with_theme(theme)
        .with_prompt("Enter your username")
        .validate_with(|input: &String| -> Result<(), &str> {
            clean_username(input).map(|_| ()).ok_or("Username cannot be blank")
        })
        .interact_text()?;
    clean_username(&typed).ok_or_else(|| anyhow::anyhow!("Username cannot be blank"))
}

fn prompt_mood(theme: &ColorfulTheme) -> Result<String> {
    prompt_label(theme, "Select mood", &KNOWN_MOODS, "Type custom mood", normalize_mood)
}

fn prompt_genre(theme: &ColorfulTheme) -> Result<String> {
    prompt_label(theme, "Select genre", &KNOWN_GENRES, "Type custom genre", normalize_genre)
}

fn prompt_label(
    theme: &ColorfulTheme,
    prompt: &str,
    known: &[&str],
    custom_prompt: &str,
    normalize: fn(&str) -> Option<String>,
) -> Result<String> {
    let mut items: Vec<&str> = known.to_vec();
    items.push("Other...");

    let idx = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;
    if let Some(label) = known.get(idx) {
        return Ok((*label).to_string());
    }

    let typed: String = Input::with_theme(theme)
        .with_prompt(custom_prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            normalize(input).map(|_| ()).ok_or("Invalid choice. Please try again.")
        })
        .interact_text()?;
    normalize(&typed).ok_or_else(|| anyhow::anyhow!("Invalid choice: {typed}"))
}

fn prompt_count(theme: &ColorfulTheme, prompt: &str) -> Result<usize> {
    let typed: String = Input::with_theme(theme)
        .with_prompt(format!("{prompt} (default: {DEFAULT_COUNT})"))
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            parse_count(input).map(|_| ()).ok_or("Please enter a whole number")
        })
        .interact_text()?;
    parse_count(&typed).ok_or_else(|| anyhow::anyhow!("Invalid count: {typed}"))
}

/// Count typed at a prompt. Blank or zero means [`DEFAULT_COUNT`].
#[must_use]
pub fn parse_count(input: &str) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return Some(DEFAULT_COUNT);
    }
    match input.parse::<usize>() {
        Ok(0) => Some(DEFAULT_COUNT),
        Ok(count) => Some(count),
        Err(_) => None,
    }
}
