//! # History Module
//!
//! Append-only listening log shared by every user of a data directory.
//!
//! The log lives in a CSV file with the header
//! `username,song_name,timestamp,genre,mood`. Rows are only ever appended;
//! existing rows are never rewritten. Per-user analysis goes through the
//! [`UserHistory`] view.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::song::Song;
use crate::stats::Tally;

/// Format used for history timestamps, e.g. `2024-12-01 18:30:05`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How many entries a profile shows as "recent".
pub const RECENT_LIMIT: usize = 5;

/// One listened song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub username: String,
    pub song_name: String,
    pub timestamp: String,
    pub genre: String,
    pub mood: String,
}

impl HistoryEntry {
    /// Parsed timestamp, if the stored text follows [`TIMESTAMP_FORMAT`].
    #[must_use]
    pub fn listened_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}

/// The full listening log, backed by a CSV file.
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Load the log at `path`. A missing file is an empty history.
    ///
    /// # Errors
    ///
    /// Fails only when an existing file cannot be opened. Unparseable rows
    /// are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("{} not found. Starting with empty history.", path.display());
                return Ok(Self::empty(path));
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to open history file {}", path.display()));
            }
        };

        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(file);
        let mut entries = Vec::new();
        for result in rdr.deserialize::<HistoryEntry>() {
            match result {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!("Skipping unreadable history row: {err}"),
            }
        }

        info!("Loaded {} history entries from {}", entries.len(), path.display());
        Ok(Self { path: path.to_path_buf(), entries })
    }

    /// An empty log that will be created at `path` on first append.
    #[must_use]
    pub fn empty(path: &Path) -> Self {
        Self { path: path.to_path_buf(), entries: Vec::new() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record `song` for `username` at the current local time.
    pub fn record(&mut self, username: &str, song: &Song) -> Result<HistoryEntry> {
        self.append(username, song, Local::now().naive_local())
    }

    /// Append one row to the file and to the in-memory log.
    ///
    /// The header is written when the file is new or empty.
    pub fn append(
        &mut self,
        username: &str,
        song: &Song,
        at: NaiveDateTime,
    ) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            username: username.to_string(),
            song_name: song.song_name.clone(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            genre: song.genre.clone(),
            mood: song.mood.clone(),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history file {}", self.path.display()))?;
        let needs_header = file
            .metadata()
            .with_context(|| format!("Failed to inspect {}", self.path.display()))?
            .len()
            == 0;

        let mut wtr = WriterBuilder::new().has_headers(needs_header).from_writer(file);
        wtr.serialize(&entry)
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        wtr.flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;

        debug!("Appended '{}' for {} to history", entry.song_name, entry.username);
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Entries belonging to `username` (exact match).
    #[must_use]
    pub fn for_user(&self, username: &str) -> UserHistory<'_> {
        UserHistory {
            entries: self.entries.iter().filter(|e| e.username == username).collect(),
        }
    }
}

/// One user's slice of the log, oldest first.
#[derive(Debug, Clone, Default)]
pub struct UserHistory<'a> {
    entries: Vec<&'a HistoryEntry>,
}

impl<'a> UserHistory<'a> {
    #[must_use]
    pub fn entries(&self) -> &[&'a HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn genres(&self) -> Tally {
        Tally::from_labels(self.entries.iter().map(|e| e.genre.as_str()))
    }

    #[must_use]
    pub fn moods(&self) -> Tally {
        Tally::from_labels(self.entries.iter().map(|e| e.mood.as_str()))
    }

    #[must_use]
    pub fn favorite_genre(&self) -> Option<String> {
        self.genres().most_common().map(str::to_string)
    }

    #[must_use]
    pub fn favorite_mood(&self) -> Option<String> {
        self.moods().most_common().map(str::to_string)
    }

    /// The last `n` entries, most recent first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<&'a HistoryEntry> {
        self.entries.iter().rev().take(n).copied().collect()
    }

    /// Names of every song this user has listened to.
    #[must_use]
    pub fn listened_names(&self) -> HashSet<&'a str> {
        self.entries.iter().map(|e| e.song_name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 1)
            .unwrap()
            .and_hms_opt(hour, 30, 5)
            .unwrap()
    }

    fn song(name: &str, genre: &str, mood: &str) -> Song {
        Song::new(name, "Artist", genre, mood, 50).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let history = History::load(&dir.path().join("playlist_history.csv")).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist_history.csv");
        let mut history = History::load(&path).unwrap();

        history.append("ana", &song("One", "Pop", "Happy"), at(9)).unwrap();
        history.append("ana", &song("Two", "Rock", "Sad"), at(10)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "username,song_name,timestamp,genre,mood");
        assert_eq!(lines[1], "ana,One,2024-12-01 09:30:05,Pop,Happy");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_append_is_persistent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.csv");

        let mut history = History::load(&path).unwrap();
        let entry = history.append("ben", &song("Song", "Jazz", "Calm"), at(20)).unwrap();
        assert_eq!(entry.listened_at(), Some(at(20)));

        let mut reloaded = History::load(&path).unwrap();
        assert_eq!(reloaded.entries(), history.entries());

        reloaded.append("ben", &song("Other", "Jazz", "Calm"), at(21)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("username,").count(), 1);
        assert_eq!(History::load(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_unreadable_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist_history.csv");
        let original = "\
username,song_name,timestamp,genre,mood
ana,One,2024-12-01 09:30:05,Pop,Happy
ana,Broken
ana,Two,2024-12-01 10:30:05,Rock,Sad
";
        fs::write(&path, original).unwrap();

        let mut history = History::load(&path).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[1].song_name, "Two");

        history.append("ana", &song("Three", "Jazz", "Calm"), at(11)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(original));
        assert_eq!(text.lines().count(), 5);
        assert_eq!(text.lines().last(), Some("ana,Three,2024-12-01 11:30:05,Jazz,Calm"));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_user_view_favorites_and_recent() {
        let dir = TempDir::new().unwrap();
        let mut history = History::empty(&dir.path().join("h.csv"));
        history.append("ana", &song("A", "Pop", "Happy"), at(1)).unwrap();
        history.append("ben", &song("B", "Rock", "Sad"), at(2)).unwrap();
        history.append("ana", &song("C", "Rock", "Happy"), at(3)).unwrap();
        history.append("ana", &song("D", "Rock", "Calm"), at(4)).unwrap();

        let ana = history.for_user("ana");
        assert_eq!(ana.len(), 3);
        assert_eq!(ana.favorite_genre().as_deref(), Some("Rock"));
        assert_eq!(ana.favorite_mood().as_deref(), Some("Happy"));

        let recent: Vec<&str> = ana.recent(2).iter().map(|e| e.song_name.as_str()).collect();
        assert_eq!(recent, vec!["D", "C"]);
        assert!(ana.listened_names().contains("A"));
        assert!(!ana.listened_names().contains("B"));

        assert!(history.for_user("carl").is_empty());
        assert_eq!(history.for_user("carl").favorite_genre(), None);
    }
}
