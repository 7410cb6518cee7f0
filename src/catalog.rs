//! # Catalog Module
//!
//! Loads the song catalog from a CSV file with the header
//! `song_name,artist,genre,mood,popularity`. Column order is free and extra
//! columns are ignored.
//!
//! Rows that cannot be parsed or fail validation are skipped. Every skip is
//! logged and kept in [`Catalog::skipped`] so callers can report them.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::song::{self, Song, SongError};

/// Raw catalog row before validation. Missing columns and empty cells are `None`.
#[derive(Debug, Deserialize)]
struct SongRecord {
    song_name: Option<String>,
    artist: Option<String>,
    genre: Option<String>,
    mood: Option<String>,
    popularity: Option<String>,
}

impl SongRecord {
    fn into_song(self) -> Result<Song, SongError> {
        let song_name = self.song_name.ok_or(SongError::MissingField("song_name"))?;
        let artist = self.artist.ok_or(SongError::MissingField("artist"))?;
        let genre = self.genre.ok_or(SongError::MissingField("genre"))?;
        let mood = self.mood.ok_or(SongError::MissingField("mood"))?;
        let popularity = self.popularity.ok_or(SongError::MissingField("popularity"))?;
        let popularity = song::parse_popularity(&popularity)?;

        Song::new(&song_name, &artist, &genre, &mood, popularity)
    }
}

/// A catalog row that was left out while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line in the source file, when known.
    pub line: Option<u64>,
    pub reason: String,
}

/// The static list of songs available for recommendations.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<Song>,
    skipped: Vec<SkippedRow>,
}

impl Catalog {
    /// Read the catalog at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable, or has no header row.
    /// Individual bad rows never fail the load.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Songs database not found at {}", path.display()))?;
        let catalog = Self::from_reader(file)
            .with_context(|| format!("Failed to read songs database {}", path.display()))?;

        info!("Loaded {} songs from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Read a catalog from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers().context("Missing CSV header row")?.clone();

        let mut songs = Vec::new();
        let mut skipped = Vec::new();
        let mut seen_names = HashSet::new();

        for result in rdr.records() {
            match result {
                Ok(record) => match parse_record(&record, &headers) {
                    Ok(song) => {
                        if !seen_names.insert(song.song_name.to_lowercase()) {
                            debug!("Duplicate song name in catalog: {}", song.song_name);
                        }
                        songs.push(song);
                    }
                    Err(reason) => {
                        let line = record.position().map(csv::Position::line);
                        warn!("Skipping invalid song entry (line {line:?}): {reason}");
                        skipped.push(SkippedRow { line, reason });
                    }
                },
                Err(err) => {
                    let line = err.position().map(csv::Position::line);
                    warn!("Skipping malformed catalog row (line {line:?}): {err}");
                    skipped.push(SkippedRow { line, reason: err.to_string() });
                }
            }
        }

        Ok(Self { songs, skipped })
    }

    /// Build a catalog from already validated songs.
    #[must_use]
    pub fn from_songs(songs: Vec<Song>) -> Self {
        Self { songs, skipped: Vec::new() }
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

    /// Rows dropped during loading, in file order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// First song whose name equals `name`, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Song> {
        let name = name.trim().to_lowercase();
        self.songs.iter().find(|song| song.song_name.to_lowercase() == name)
    }

    /// Duplicate check used before adding a song by name.
    #[must_use]
    pub fn contains_song_named(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }
}

fn parse_record(record: &StringRecord, headers: &StringRecord) -> Result<Song, String> {
    let raw: SongRecord = record
        .deserialize(Some(headers))
        .map_err(|err| err.to_string())?;
    raw.into_song().map_err(|err| err.to_string())
}
