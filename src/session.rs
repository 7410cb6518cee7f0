//! # Session Module
//!
//! One user's working state: the catalog, the shared listening history and
//! the current playlist. Every menu entry and CLI subcommand that touches
//! user state goes through a [`Session`].

use anyhow::{bail, Context, Result};
use chrono::Local;
use log::{debug, info};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::catalog::Catalog;
use crate::chart::{self, ChartKind};
use crate::config::RuntimeConfig;
use crate::history::{History, HistoryEntry, RECENT_LIMIT};
use crate::playlist::{AddOutcome, Playlist, PlaylistStats};
use crate::recommend::{self, Criteria};
use crate::report::RecommendationReport;
use crate::song::Song;
use crate::stats::Tally;

/// Profile summary for the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub mood: String,
    pub playlist_len: usize,
    pub history_len: usize,
    pub favorite_genre: Option<String>,
    pub favorite_mood: Option<String>,
    /// Most recent first.
    pub recent: Vec<HistoryEntry>,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Username: {}", self.username)?;
        writeln!(f, "Current Mood: {}", self.mood)?;
        writeln!(f, "Songs in Current Playlist: {}", self.playlist_len)?;

        if self.history_len == 0 {
            return writeln!(f, "No listening history found for this user.");
        }

        writeln!(f, "Total Songs in History: {}", self.history_len)?;
        writeln!(f, "Favorite Genre: {}", self.favorite_genre.as_deref().unwrap_or("N/A"))?;
        writeln!(f, "Favorite Mood: {}", self.favorite_mood.as_deref().unwrap_or("N/A"))?;
        writeln!(f)?;
        writeln!(f, "Recent Listening History:")?;
        for (idx, entry) in self.recent.iter().enumerate() {
            writeln!(
                f,
                "{}. {} ({}) - {}",
                idx + 1,
                entry.song_name,
                entry.genre,
                entry.timestamp
            )?;
        }
        Ok(())
    }
}

/// Outcome of [`Session::recommend`].
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub criteria: Criteria,
    pub songs: Vec<Song>,
    pub elapsed: Duration,
    pub report: RecommendationReport,
    /// Set when the report was written to disk.
    pub report_path: Option<PathBuf>,
}

/// A drawn chart: terminal text plus the SVG file it was saved to.
#[derive(Debug, Clone)]
pub struct ChartOutput {
    pub text: String,
    pub path: PathBuf,
}

/// One user's catalog, history and playlist.
#[derive(Debug)]
pub struct Session {
    config: RuntimeConfig,
    catalog: Catalog,
    history: History,
    playlist: Playlist,
}

impl Session {
    /// Load the catalog and history named by `config`.
    ///
    /// # Errors
    ///
    /// Fails when the catalog cannot be read or contains no valid songs.
    pub fn start(config: RuntimeConfig, username: &str, mood: &str) -> Result<Self> {
        let catalog = Catalog::load(&config.catalog_path).context("Could not load songs database")?;
        if catalog.is_empty() {
            bail!(
                "Could not load songs database: {} has no valid songs",
                config.catalog_path.display()
            );
        }
        let history = History::load(&config.history_path)?;
        Ok(Self::with_state(config, catalog, history, username, mood))
    }

    /// Assemble a session from already loaded parts.
    #[must_use]
    pub fn with_state(
        config: RuntimeConfig,
        catalog: Catalog,
        history: History,
        username: &str,
        mood: &str,
    ) -> Self {
        debug!("Session for {username} with {} songs", catalog.len());
        Self {
            config,
            catalog,
            history,
            playlist: Playlist::new(username, mood),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    #[must_use]
    pub fn username(&self) -> &str {
        self.playlist.username()
    }

    #[must_use]
    pub fn profile(&self) -> Profile {
        let history = self.history.for_user(self.username());
        Profile {
            username: self.username().to_string(),
            mood: self.playlist.mood().to_string(),
            playlist_len: self.playlist.len(),
            history_len: history.len(),
            favorite_genre: history.favorite_genre(),
            favorite_mood: history.favorite_mood(),
            recent: history.recent(RECENT_LIMIT).into_iter().cloned().collect(),
        }
    }

    /// Recommend up to `count` songs. A non-empty result becomes the playlist.
    pub fn recommend(&mut self, criteria: Criteria, count: usize) -> Result<Recommendation> {
        let started = Instant::now();
        let songs: Vec<Song> = recommend::recommend(
            self.catalog.songs(),
            &criteria,
            &self.history.for_user(self.username()),
            count,
        )
        .into_iter()
        .cloned()
        .collect();
        let elapsed = started.elapsed();
        info!(
            "Recommendation generated in {:.4} seconds ({criteria})",
            elapsed.as_secs_f64()
        );

        if !songs.is_empty() {
            self.playlist.replace(songs.clone());
        }

        let report = RecommendationReport::new(
            self.username(),
            &criteria.describe(),
            &songs,
            Local::now().naive_local(),
        );
        let report_path = if self.config.write_reports && !songs.is_empty() {
            Some(report.save(&self.config.data_dir)?)
        } else {
            None
        };

        Ok(Recommendation { criteria, songs, elapsed, report, report_path })
    }

    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<Song> {
        recommend::search(self.catalog.songs(), keyword)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn top(&self, count: usize) -> Vec<Song> {
        recommend::top_songs(self.catalog.songs(), count)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn add_to_playlist(&mut self, song: Song) -> AddOutcome {
        self.playlist.add(song)
    }

    /// Returns how many songs were removed.
    pub fn remove_from_playlist(&mut self, name: &str) -> usize {
        self.playlist.remove_named(name)
    }

    pub fn clear_playlist(&mut self) {
        self.playlist.clear();
    }

    /// Append `song` to the listening history for this user.
    pub fn track(&mut self, song: &Song) -> Result<HistoryEntry> {
        let username = self.username().to_string();
        self.history.record(&username, song)
    }

    /// Save the playlist under `name`, or under its default name.
    pub fn save_playlist(&self, name: Option<&str>) -> Result<PathBuf> {
        if self.playlist.is_empty() {
            bail!("Your playlist is empty! Add some songs first.");
        }
        let path = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => self.config.playlist_path(name),
            None => self.config.playlist_path(&self.playlist.default_file_name()),
        };
        self.playlist.save(&path)?;
        Ok(path)
    }

    #[must_use]
    pub fn statistics(&self) -> Option<PlaylistStats> {
        self.playlist.statistics()
    }

    /// Draw `kind` for the current playlist.
    pub fn chart(&self, kind: ChartKind) -> Result<ChartOutput> {
        if self.playlist.is_empty() {
            bail!("Your playlist is empty! Add some songs first.");
        }
        draw_chart(self.playlist.songs(), kind, &self.config)
    }
}

/// Trimmed username, or `None` when nothing but whitespace was given.
#[must_use]
pub fn clean_username(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Draw `kind` for any list of songs into the configured data directory.
pub fn draw_chart(songs: &[Song], kind: ChartKind, config: &RuntimeConfig) -> Result<ChartOutput> {
    let genres = Tally::from_labels(songs.iter().map(|s| s.genre.as_str()));
    let moods = Tally::from_labels(songs.iter().map(|s| s.mood.as_str()));
    let path = config.chart_path(kind.file_name());

    let text = match kind {
        ChartKind::GenreBar => {
            chart::write_bar_chart(&genres, &path)?;
            chart::render_bar(&genres, "Genre Distribution")
        }
        ChartKind::MoodPie => {
            chart::write_pie_chart(&moods, &path)?;
            chart::render_pie(&moods, "Mood Distribution")
        }
        ChartKind::Analysis => {
            chart::write_analysis(&genres, &moods, &path)?;
            format!(
                "{}\n{}",
                chart::render_bar(&genres, "Genre Distribution"),
                chart::render_pie(&moods, "Mood Distribution")
            )
        }
    };

    Ok(ChartOutput { text, path })
}
