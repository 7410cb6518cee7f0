//! # Playlist Module
//!
//! The in-memory playlist for one user and its CSV export. A saved playlist
//! has the header `username,song_name,artist,genre,mood,popularity` and can
//! be read back with [`Playlist::load`].

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::recommend;
use crate::song::Song;
use crate::stats::Tally;

/// Mood assigned to playlists read back from disk, where it isn't stored.
pub const LOADED_MOOD: &str = "Mixed";

/// How many songs the statistics list as most popular.
pub const TOP_IN_STATS: usize = 5;

/// Result of [`Playlist::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Serialize, Deserialize)]
struct PlaylistRow {
    username: String,
    song_name: String,
    artist: String,
    genre: String,
    mood: String,
    popularity: u8,
}

/// Ordered songs picked by one user during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    username: String,
    mood: String,
    songs: Vec<Song>,
}

impl Playlist {
    #[must_use]
    pub fn new(username: &str, mood: &str) -> Self {
        Self {
            username: username.to_string(),
            mood: mood.to_string(),
            songs: Vec::new(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn mood(&self) -> &str {
        &self.mood
    }

    pub fn set_mood(&mut self, mood: &str) {
        self.mood = mood.to_string();
    }

    #[must_use]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Append `song` unless an identical record is already present.
    pub fn add(&mut self, song: Song) -> AddOutcome {
        if self.songs.contains(&song) {
            return AddOutcome::AlreadyPresent;
        }
        debug!("Adding '{}' to {}'s playlist", song.song_name, self.username);
        self.songs.push(song);
        AddOutcome::Added
    }

    /// Remove every song called `name` (ignoring case). Returns how many went.
    pub fn remove_named(&mut self, name: &str) -> usize {
        let name = name.trim().to_lowercase();
        let before = self.songs.len();
        self.songs.retain(|song| song.song_name.to_lowercase() != name);
        before - self.songs.len()
    }

    pub fn clear(&mut self) {
        self.songs.clear();
    }

    /// Swap in a new set of songs, e.g. a fresh recommendation.
    pub fn replace(&mut self, songs: Vec<Song>) {
        self.songs = songs;
    }

    /// `playlist_<user>_<mood>.csv`, safe to use as a file name.
    #[must_use]
    pub fn default_file_name(&self) -> String {
        format!(
            "playlist_{}_{}.csv",
            sanitize(&self.username),
            sanitize(&self.mood.to_lowercase())
        )
    }

    /// Write the playlist as CSV.
    ///
    /// # Errors
    ///
    /// Saving an empty playlist is refused. I/O failures carry the path.
    pub fn save(&self, path: &Path) -> Result<()> {
        if self.is_empty() {
            bail!("No songs in playlist to save");
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut wtr = WriterBuilder::new()
            .from_path(path)
            .with_context(|| format!("Failed to create playlist file {}", path.display()))?;
        for song in &self.songs {
            wtr.serialize(PlaylistRow {
                username: self.username.clone(),
                song_name: song.song_name.clone(),
                artist: song.artist.clone(),
                genre: song.genre.clone(),
                mood: song.mood.clone(),
                popularity: song.popularity,
            })
            .with_context(|| format!("Failed to write playlist {}", path.display()))?;
        }
        wtr.flush()
            .with_context(|| format!("Failed to write playlist {}", path.display()))?;

        info!("Playlist saved to {}", path.display());
        Ok(())
    }

    /// Read a playlist written by [`Playlist::save`].
    ///
    /// The owner is taken from the first row. Rows that fail song validation
    /// are rejected rather than skipped, since a saved playlist is our own output.
    pub fn load(path: &Path) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open playlist {}", path.display()))?;

        let mut playlist: Option<Self> = None;
        for (index, result) in rdr.deserialize::<PlaylistRow>().enumerate() {
            let row = result
                .with_context(|| format!("Invalid row {} in {}", index + 2, path.display()))?;
            let song = Song::new(
                &row.song_name,
                &row.artist,
                &row.genre,
                &row.mood,
                i64::from(row.popularity),
            )
            .with_context(|| format!("Invalid song on row {} in {}", index + 2, path.display()))?;

            playlist
                .get_or_insert_with(|| Self::new(&row.username, LOADED_MOOD))
                .songs
                .push(song);
        }

        playlist.with_context(|| format!("Playlist {} has no songs", path.display()))
    }

    /// Breakdown of the playlist, or `None` when it is empty.
    #[must_use]
    pub fn statistics(&self) -> Option<PlaylistStats> {
        PlaylistStats::from_songs(&self.songs)
    }
}

/// Summary numbers shown by the statistics view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistStats {
    pub total: usize,
    pub average_popularity: f64,
    pub genres: Tally,
    pub moods: Tally,
    pub top_songs: Vec<Song>,
}

impl PlaylistStats {
    /// `None` for an empty song list.
    #[must_use]
    pub fn from_songs(songs: &[Song]) -> Option<Self> {
        if songs.is_empty() {
            return None;
        }

        let sum: u32 = songs.iter().map(|s| u32::from(s.popularity)).sum();
        Some(Self {
            total: songs.len(),
            average_popularity: f64::from(sum) / songs.len() as f64,
            genres: Tally::from_labels(songs.iter().map(|s| s.genre.as_str())),
            moods: Tally::from_labels(songs.iter().map(|s| s.mood.as_str())),
            top_songs: recommend::top_songs(songs, TOP_IN_STATS)
                .into_iter()
                .cloned()
                .collect(),
        })
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
